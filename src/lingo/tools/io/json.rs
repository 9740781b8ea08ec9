use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::lingo::tools::error::{Location, Result, ToolError};
use crate::lingo::tools::model::TreeValue;

/// Layout of rendered JSON documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonStyle {
    /// Spaces per nesting level.
    pub indent: usize,
    /// Write characters outside ASCII as `\uXXXX` escapes.
    pub escape_non_ascii: bool,
}

impl Default for JsonStyle {
    fn default() -> Self {
        Self {
            indent: 4,
            escape_non_ascii: false,
        }
    }
}

/// Parses JSON text into a tree, keeping object key order.
pub fn parse_json(text: &str) -> Result<TreeValue> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|err| {
        let location = (err.line() > 0).then(|| Location {
            line: err.line(),
            column: err.column(),
        });
        ToolError::Parse {
            format: "JSON".to_string(),
            location,
            message: err.to_string(),
        }
    })?;
    Ok(TreeValue::from(value))
}

/// Renders a tree as indented JSON.
pub fn render_json(value: &TreeValue, style: &JsonStyle) -> Result<String> {
    let indent = " ".repeat(style.indent);
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let text = String::from_utf8(buffer)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    if style.escape_non_ascii {
        Ok(escape_non_ascii(&text))
    } else {
        Ok(text)
    }
}

// Non-ASCII characters can only occur inside string literals of the
// serialized output, so escaping them textually keeps the document valid.
fn escape_non_ascii(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii() {
            escaped.push(ch);
            continue;
        }
        let mut units = [0u16; 2];
        for unit in ch.encode_utf16(&mut units) {
            escaped.push_str(&format!("\\u{unit:04x}"));
        }
    }
    escaped
}
