//! Output formatting for human, JSON and YAML modes

use serde::Serialize;

use crate::error::Result;
use crate::util;

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
    /// YAML output
    Yaml,
}

impl OutputMode {
    /// Render a serializable value for this mode
    ///
    /// Human mode prints strings bare and everything else as YAML.
    pub fn render<T: Serialize + ?Sized>(self, value: &T) -> Result<String> {
        let value = serde_json::to_value(value)?;
        Ok(match (self, &value) {
            (Self::Json, _) => serde_json::to_string_pretty(&value)?,
            (Self::Human, serde_json::Value::String(s)) => s.clone(),
            (Self::Human | Self::Yaml, _) => util::emit_yaml(&value).trim_end().to_string(),
        })
    }
}
