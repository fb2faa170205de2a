//! JSON and YAML text conversions
//!
//! YAML always goes through the JSON representation: YAML text is parsed into
//! a JSON value, and JSON values are emitted as block-style YAML with 4-space
//! indentation. Unicode is kept verbatim in both directions.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;

/// Indentation step of emitted YAML
const INDENT: usize = 4;

/// Parse a JSON string into a typed value
pub fn from_json<T: DeserializeOwned>(s: &str) -> Result<T> {
    Ok(serde_json::from_str(s)?)
}

/// Serialize a value into a JSON string
pub fn to_json<T: Serialize + ?Sized>(obj: &T) -> Result<String> {
    Ok(serde_json::to_string(obj)?)
}

/// Convert a JSON string into a YAML string
pub fn json_to_yaml(s: &str) -> Result<String> {
    let value: Value = serde_json::from_str(s)?;
    Ok(emit_yaml(&value))
}

/// Convert a YAML string into a JSON string
pub fn yaml_to_json(s: &str) -> Result<String> {
    let value: Value = serde_yaml::from_str(s)?;
    Ok(serde_json::to_string(&value)?)
}

/// Serialize a value into a YAML string
pub fn to_yaml<T: Serialize + ?Sized>(obj: &T) -> Result<String> {
    json_to_yaml(&to_json(obj)?)
}

/// Parse a YAML string into a typed value
pub fn from_yaml<T: DeserializeOwned>(s: &str) -> Result<T> {
    from_json(&yaml_to_json(s)?)
}

/// Render a JSON value as a YAML document
#[must_use]
pub fn emit_yaml(value: &Value) -> String {
    let mut out = String::new();
    match value {
        Value::Object(map) if !map.is_empty() => emit_block(value, 0, &mut out),
        Value::Array(items) if !items.is_empty() => emit_block(value, 0, &mut out),
        _ => {
            out.push_str(&scalar(value));
            out.push('\n');
        },
    }
    out
}

/// Whether a value is written as an indented block rather than inline
fn is_block(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

fn emit_block(value: &Value, indent: usize, out: &mut String) {
    let pad = " ".repeat(indent);
    match value {
        Value::Object(map) => {
            for (key, item) in map {
                out.push_str(&pad);
                out.push_str(&string_scalar(key));
                out.push(':');
                if is_block(item) {
                    out.push('\n');
                    emit_block(item, indent + INDENT, out);
                } else {
                    out.push(' ');
                    out.push_str(&scalar(item));
                    out.push('\n');
                }
            }
        },
        Value::Array(items) => {
            for item in items {
                if is_block(item) {
                    // first line of the nested block shares the dash line
                    let mut nested = String::new();
                    emit_block(item, indent + INDENT, &mut nested);
                    out.push_str(&pad);
                    out.push_str("-   ");
                    out.push_str(&nested[indent + INDENT..]);
                } else {
                    out.push_str(&pad);
                    out.push_str("- ");
                    out.push_str(&scalar(item));
                    out.push('\n');
                }
            }
        },
        _ => {
            out.push_str(&pad);
            out.push_str(&scalar(value));
            out.push('\n');
        },
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => string_scalar(s),
        Value::Object(_) => "{}".to_string(),
        Value::Array(_) => "[]".to_string(),
    }
}

fn string_scalar(s: &str) -> String {
    if is_plain_safe(s) {
        s.to_string()
    } else {
        double_quoted(s)
    }
}

/// Characters YAML cannot carry raw inside a scalar
fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}')
}

/// Whether `s` reads back as the same string when written unquoted
fn is_plain_safe(s: &str) -> bool {
    const INDICATORS: &[char] = &[
        ':', '#', '\'', '"', '{', '}', '[', ']', ',', '&', '*', '!', '|', '>', '%', '@', '`',
    ];
    if s.is_empty() || s.trim() != s || s.starts_with(['-', '?', '<', '=', '~']) {
        return false;
    }
    if s.chars().any(|c| needs_escape(c) || INDICATORS.contains(&c)) {
        return false;
    }
    // booleans for YAML 1.1 readers such as PyYAML
    if matches!(
        s,
        "yes" | "Yes" | "YES" | "no" | "No" | "NO" | "on" | "On" | "ON" | "off" | "Off" | "OFF"
    ) {
        return false;
    }
    matches!(
        serde_yaml::from_str::<serde_yaml::Value>(s),
        Ok(serde_yaml::Value::String(ref parsed)) if parsed == s
    )
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if needs_escape(c) => {
                let code = u32::from(c);
                if code <= 0xFFFF {
                    out.push_str(&format!("\\u{code:04X}"));
                } else {
                    out.push_str(&format!("\\U{code:08X}"));
                }
            },
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
