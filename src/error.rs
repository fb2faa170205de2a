//! Client error types and server error classification
//!
//! Every failure surfaced by the client is a [`ClientError`]. The first six
//! variants are the domain taxonomy: four server-declared categories, protocol
//! violations, and unrecognized server error names. The rest are ambient
//! failures (transport, I/O, encoding, configuration).

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Error categories, independent of the message they carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Credentials invalid or session expired
    Unauthorized,
    /// Informational condition reported as an error
    Info,
    /// Requested resource absent
    NotFound,
    /// Caller-supplied input rejected by the server
    Input,
    /// Response violates the multipart/JSON contract
    Protocol,
    /// Server reported an error name outside the recognized set
    Unknown,
    /// HTTP layer failure
    Transport,
    /// Local I/O failure
    Io,
    /// JSON or YAML (de)serialization failure
    Encoding,
    /// Configuration could not be read or written
    Config,
}

impl ErrorKind {
    /// Name of the kind as the server spells it
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "UnauthorizedError",
            Self::Info => "InfoError",
            Self::NotFound => "NotFoundError",
            Self::Input => "InputError",
            Self::Protocol => "ProtocolError",
            Self::Unknown => "UnknownError",
            Self::Transport => "TransportError",
            Self::Io => "IoError",
            Self::Encoding => "EncodingError",
            Self::Config => "ConfigError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by every client operation
#[derive(Debug, Error)]
pub enum ClientError {
    /// Credentials invalid or session expired
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Server-declared informational condition
    #[error("{0}")]
    Info(String),

    /// Requested resource absent
    #[error("not found: {0}")]
    NotFound(String),

    /// Input rejected by the server
    #[error("invalid input: {0}")]
    Input(String),

    /// Response does not follow the multipart/JSON contract
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Unrecognized server error
    #[error("unknown error: {0}")]
    Unknown(String),

    /// The HTTP request could not be completed
    #[error("transport error: {0}")]
    Transport(String),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML encoding or decoding failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Local I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded or saved
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Category of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Info(_) => ErrorKind::Info,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Input(_) => ErrorKind::Input,
            Self::Protocol(_) => ErrorKind::Protocol,
            Self::Unknown(_) => ErrorKind::Unknown,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Json(_) | Self::Yaml(_) => ErrorKind::Encoding,
            Self::Io(_) => ErrorKind::Io,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Create a protocol error
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Whether this error means the session is not (or no longer) valid
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Result alias used throughout the crate
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Error description carried in the `error` field of an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    /// Server-declared error category
    pub name: String,
    /// Human-readable message, `"Unknown error"` when missing, null or empty
    #[serde(default = "default_message", deserialize_with = "message_or_default")]
    pub message: String,
}

fn default_message() -> String {
    "Unknown error".to_string()
}

fn message_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|message| !message.is_empty())
        .unwrap_or_else(default_message))
}

/// Map a server error description onto a [`ClientError`]
///
/// `operation_id` identifies the failed server operation. It is logged for
/// correlation and otherwise unused.
#[must_use]
pub fn classify(error: ErrorDescriptor, operation_id: Option<&str>) -> ClientError {
    log::debug!(
        "server error {} (operation {})",
        error.name,
        operation_id.unwrap_or("-")
    );
    match error.name.as_str() {
        "UnauthorizedError" => ClientError::Unauthorized(error.message),
        "InfoError" => ClientError::Info(error.message),
        "NotFoundError" => ClientError::NotFound(error.message),
        "InputError" => ClientError::Input(error.message),
        other => ClientError::Unknown(format!("server reported '{other}'")),
    }
}
