//! Request envelopes and response answers
//!
//! A request is a multipart form with one text field `data` holding the JSON
//! envelope `{func, input, meta}` and one `file_<i>` field per input stream.
//! A response is a multipart body with at most one header-less JSON part (the
//! answer) and any number of attachments, each with a Content-Type and a
//! filename.

use std::io::Read;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::download::Download;
use super::multipart::{self, FormPart};
use crate::error::{ClientError, ErrorDescriptor, Result, classify};
use crate::transport::{HttpRequest, HttpResponse};

/// Name of the form field carrying the envelope
pub const DATA_FIELD: &str = "data";

/// Content type given to input file parts
pub const INPUT_FILE_TYPE: &str = "application/octet-stream";

static FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"filename="(.+)""#).expect("filename pattern is valid"));

/// Session metadata attached to authenticated requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Opaque session token
    pub token: String,
    /// Exam context, if any
    #[serde(default)]
    pub exam: Option<String>,
}

impl Meta {
    /// Metadata for a plain (non-exam) session
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            exam: None,
        }
    }
}

/// The JSON document describing one remote invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Remote function name, e.g. `misc.get_time`
    pub func: String,
    /// Argument payload
    pub input: Value,
    /// Session metadata, `null` when anonymous
    pub meta: Option<Meta>,
}

/// Build the multipart request for an invocation
///
/// Input streams are read to the end but not closed; they map to `file_0`,
/// `file_1`, ... in order.
pub fn build_request(
    func: &str,
    input: Value,
    meta: Option<&Meta>,
    ifiles: &mut [&mut dyn Read],
) -> Result<HttpRequest> {
    let envelope = Envelope {
        func: func.to_string(),
        input,
        meta: meta.cloned(),
    };
    let mut parts = vec![FormPart::text(DATA_FIELD, serde_json::to_string(&envelope)?)];
    for (index, ifile) in ifiles.iter_mut().enumerate() {
        let mut bytes = Vec::new();
        ifile.read_to_end(&mut bytes)?;
        let name = format!("file_{index}");
        parts.push(FormPart::file(name.clone(), name, INPUT_FILE_TYPE, bytes));
    }

    let form = multipart::encode(&parts);
    Ok(HttpRequest {
        content_type: form.content_type,
        body: form.body,
    })
}

/// Parse a response into its output and attachments
///
/// Fails with [`ClientError::Protocol`] on any deviation from the response
/// contract and with the classified error when the answer carries one.
pub fn parse_response(response: &HttpResponse) -> Result<(Value, Vec<Download>)> {
    let content_type = response.content_type.as_deref().unwrap_or_default();
    if !multipart::is_multipart(content_type) {
        return Err(ClientError::protocol(format!(
            "The content type is not multipart/form-data (got '{content_type}', status {})",
            response.status
        )));
    }

    let mut answer: Option<Value> = None;
    let mut downloads = Vec::new();
    for part in multipart::decode(content_type, &response.body)? {
        if let Some(mime_type) = part.header("content-type") {
            let filename = extract_filename(part.header("content-disposition").unwrap_or_default())?;
            let mime_type = mime_type.to_string();
            downloads.push(Download::new(part.body, filename, mime_type));
        } else {
            if answer.is_some() {
                return Err(ClientError::protocol("There are multiple parts with JSON content"));
            }
            let value = serde_json::from_slice(&part.body)
                .map_err(|e| ClientError::protocol(format!("The JSON part is malformed: {e}")))?;
            answer = Some(value);
        }
    }

    let Some(Value::Object(mut answer)) = answer else {
        return Err(ClientError::protocol("The answer is not an object"));
    };

    let operation_id = answer
        .get("operation_id")
        .and_then(Value::as_str)
        .map(str::to_string);

    match answer.remove("error") {
        None | Some(Value::Null) => {},
        Some(error) => {
            let descriptor: ErrorDescriptor = serde_json::from_value(error)
                .map_err(|e| ClientError::protocol(format!("The error field is malformed: {e}")))?;
            return Err(classify(descriptor, operation_id.as_deref()));
        },
    }

    let output = answer.remove("output").unwrap_or(Value::Null);
    Ok((output, downloads))
}

/// The single `filename="..."` value of a Content-Disposition header
pub fn extract_filename(disposition: &str) -> Result<String> {
    let mut matches = FILENAME.captures_iter(disposition);
    match (matches.next(), matches.next()) {
        (Some(caps), None) => Ok(caps[1].to_string()),
        _ => Err(ClientError::protocol("The part does not have a filename")),
    }
}
