//! Downloaded attachments

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A binary attachment received in a response
///
/// Bytes are fully buffered. The value is immutable; [`Download::write`] is its
/// only side effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Download {
    data: Vec<u8>,
    name: String,
    #[serde(rename = "type")]
    mime_type: String,
}

impl Download {
    /// Create a download from its parts
    #[must_use]
    pub fn new(data: Vec<u8>, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Raw bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// File name declared by the server
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared content type
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Take ownership of the bytes
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Write the bytes to `path`, replacing any existing content
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, &self.data)?;
        Ok(())
    }
}
