//! `multipart/form-data` wire codec
//!
//! Encodes a list of form parts into a request body and decodes a multipart
//! body back into its parts. Only what the Jutge exchange needs is handled:
//! CRLF line endings, a `boundary` parameter, and per-part headers.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{ClientError, Result};

const CRLF: &[u8] = b"\r\n";
const HEADER_END: &[u8] = b"\r\n\r\n";

static BOUNDARY_COUNTER: AtomicU64 = AtomicU64::new(0);

// =============================================================================
// PARTS
// =============================================================================

/// One part of a decoded multipart body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Header name/value pairs in wire order
    pub headers: Vec<(String, String)>,
    /// Raw part content
    pub body: Vec<u8>,
}

impl Part {
    /// Value of the first header named `name` (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The `name` parameter of the Content-Disposition header
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        let disposition = self.header("content-disposition")?;
        disposition.split(';').map(str::trim).find_map(|param| {
            param
                .strip_prefix("name=")
                .map(|value| value.trim_matches('"'))
        })
    }
}

/// A part to be encoded into a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl FormPart {
    /// A plain text field (no Content-Type header)
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: None,
            body: value.into().into_bytes(),
        }
    }

    /// A file field
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        body: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            filename: Some(filename.into()),
            content_type: Some(content_type.into()),
            body,
        }
    }

    fn header_block(&self) -> String {
        let mut headers = format!("Content-Disposition: form-data; name=\"{}\"", quote(&self.name));
        if let Some(filename) = &self.filename {
            headers.push_str(&format!("; filename=\"{}\"", quote(filename)));
        }
        if let Some(content_type) = &self.content_type {
            headers.push_str(&format!("\r\nContent-Type: {content_type}"));
        }
        headers
    }
}

/// An encoded multipart body with its content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedForm {
    /// `multipart/form-data; boundary=...`
    pub content_type: String,
    /// Encoded body
    pub body: Vec<u8>,
}

fn quote(value: &str) -> String {
    value.replace('"', "%22").replace(['\r', '\n'], " ")
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encode parts into a `multipart/form-data` body
#[must_use]
pub fn encode(parts: &[FormPart]) -> EncodedForm {
    let headers: Vec<String> = parts.iter().map(FormPart::header_block).collect();
    let boundary = loop {
        let candidate = next_boundary();
        let needle = candidate.as_bytes();
        let clashes = parts.iter().any(|p| find(&p.body, needle, 0).is_some())
            || headers.iter().any(|h| h.contains(&candidate));
        if !clashes {
            break candidate;
        }
    };

    let mut body = Vec::new();
    for (part, header) in parts.iter().zip(&headers) {
        body.extend_from_slice(b"--");
        body.extend_from_slice(boundary.as_bytes());
        body.extend_from_slice(CRLF);
        body.extend_from_slice(header.as_bytes());
        body.extend_from_slice(HEADER_END);
        body.extend_from_slice(&part.body);
        body.extend_from_slice(CRLF);
    }
    body.extend_from_slice(b"--");
    body.extend_from_slice(boundary.as_bytes());
    body.extend_from_slice(b"--\r\n");

    EncodedForm {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        body,
    }
}

fn next_boundary() -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let count = BOUNDARY_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("jutge-{nanos:x}-{count:x}")
}

// =============================================================================
// DECODING
// =============================================================================

/// Media type of a Content-Type value, lowercased and without parameters
#[must_use]
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Whether a Content-Type value declares a multipart body
#[must_use]
pub fn is_multipart(content_type: &str) -> bool {
    media_type(content_type).starts_with("multipart/")
}

/// The `boundary` parameter of a Content-Type value
pub fn boundary(content_type: &str) -> Result<String> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ClientError::protocol("The multipart content type has no boundary"))
}

/// Decode a multipart body into its parts, in wire order
pub fn decode(content_type: &str, body: &[u8]) -> Result<Vec<Part>> {
    if !is_multipart(content_type) {
        return Err(ClientError::protocol("The content type is not multipart"));
    }
    let delimiter = format!("--{}", boundary(content_type)?).into_bytes();
    let mut closing = CRLF.to_vec();
    closing.extend_from_slice(&delimiter);

    let mut pos = find(body, &delimiter, 0)
        .ok_or_else(|| ClientError::protocol("The multipart body has no opening boundary"))?;
    let mut parts = Vec::new();

    loop {
        pos += delimiter.len();
        if body[pos..].starts_with(b"--") {
            log::trace!("decoded {} multipart part(s)", parts.len());
            return Ok(parts);
        }
        // anything after the delimiter up to the line end is padding
        let line_end = find(body, CRLF, pos)
            .ok_or_else(|| ClientError::protocol("The multipart body is truncated"))?;
        let start = line_end + CRLF.len();
        let end = find(body, &closing, start)
            .ok_or_else(|| ClientError::protocol("The multipart body has no closing boundary"))?;
        parts.push(parse_part(&body[start..end])?);
        pos = end + CRLF.len();
    }
}

fn parse_part(raw: &[u8]) -> Result<Part> {
    let (head, body) = if let Some(rest) = raw.strip_prefix(CRLF) {
        (&raw[..0], rest)
    } else {
        let split = find(raw, HEADER_END, 0)
            .ok_or_else(|| ClientError::protocol("A multipart part has no header terminator"))?;
        (&raw[..split], &raw[split + HEADER_END.len()..])
    };

    let headers = String::from_utf8_lossy(head)
        .split("\r\n")
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.split_once(':')
                .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
                .ok_or_else(|| ClientError::protocol(format!("Malformed part header: {line}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Part {
        headers,
        body: body.to_vec(),
    })
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|i| i + from)
}
