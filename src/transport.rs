//! HTTP transport boundary
//!
//! The client only needs "post these bytes, give me the reply bytes and its
//! content type". [`Transport`] is that seam; [`HttpTransport`] is the real
//! implementation and tests substitute their own.

use reqwest::header::CONTENT_TYPE;

use crate::error::Result;

/// An outbound request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Content-Type header value
    pub content_type: String,
    /// Encoded body
    pub body: Vec<u8>,
}

/// An inbound response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value, if present
    pub content_type: Option<String>,
    /// Raw body
    pub body: Vec<u8>,
}

/// Sends one request and returns the full response
pub trait Transport {
    /// POST `request` to `url` and wait for the complete response
    fn post(&self, url: &str, request: HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn post(&self, url: &str, request: HttpRequest) -> Result<HttpResponse> {
        (**self).post(url, request)
    }
}

/// Blocking HTTP transport backed by `reqwest`
///
/// No timeout is set beyond reqwest's defaults.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Create a transport with a fresh connection pool
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("jutge-api-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    #[must_use]
    pub const fn from_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, request: HttpRequest) -> Result<HttpResponse> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, request.content_type)
            .body(request.body)
            .send()?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes()?.to_vec();

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}
