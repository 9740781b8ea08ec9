use serde_json::Number;
use serde_yaml::Value;

use crate::lingo::tools::error::{Location, Result, ToolError};
use crate::lingo::tools::model::{Mapping, ScalarValue, TreeValue};

/// How string scalars are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// Every string, keys included, is single-quoted.
    #[default]
    Single,
    /// Strings are left unquoted unless YAML requires quotes.
    Plain,
}

/// Layout of rendered YAML documents. Output is always block style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YamlStyle {
    pub quotes: QuoteStyle,
    /// Spaces per nesting level of mappings. Used by [`QuoteStyle::Single`].
    pub indent: usize,
}

impl Default for YamlStyle {
    fn default() -> Self {
        Self {
            quotes: QuoteStyle::default(),
            indent: 2,
        }
    }
}

/// Parses YAML text into a tree.
///
/// Tags are ignored in favour of the tagged value. Scalar keys are turned
/// into their text; keys that are sequences or mappings are rejected.
pub fn parse_yaml(text: &str) -> Result<TreeValue> {
    let value: Value = serde_yaml::from_str(text).map_err(|err| ToolError::Parse {
        format: "YAML".to_string(),
        location: err.location().map(|location| Location {
            line: location.line(),
            column: location.column(),
        }),
        message: err.to_string(),
    })?;
    yaml_to_tree(value)
}

fn yaml_to_tree(value: Value) -> Result<TreeValue> {
    Ok(match value {
        Value::Null => TreeValue::Scalar(ScalarValue::Null),
        Value::Bool(value) => TreeValue::Scalar(ScalarValue::Boolean(value)),
        Value::Number(number) => TreeValue::Scalar(yaml_number(&number)),
        Value::String(value) => TreeValue::Scalar(ScalarValue::String(value)),
        Value::Sequence(items) => TreeValue::Sequence(
            items
                .into_iter()
                .map(yaml_to_tree)
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Mapping(entries) => {
            let mut mapping = Mapping::with_capacity(entries.len());
            for (key, value) in entries {
                mapping.insert(yaml_key(key)?, yaml_to_tree(value)?);
            }
            TreeValue::Mapping(mapping)
        }
        Value::Tagged(tagged) => yaml_to_tree(tagged.value)?,
    })
}

fn yaml_number(number: &serde_yaml::Number) -> ScalarValue {
    if let Some(value) = number.as_i64() {
        ScalarValue::Number(Number::from(value))
    } else if let Some(value) = number.as_u64() {
        ScalarValue::Number(Number::from(value))
    } else {
        number
            .as_f64()
            .and_then(Number::from_f64)
            .map(ScalarValue::Number)
            .unwrap_or_else(|| ScalarValue::String(number.to_string()))
    }
}

fn yaml_key(key: Value) -> Result<String> {
    match key {
        Value::String(value) => Ok(value),
        Value::Bool(value) => Ok(value.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Tagged(tagged) => yaml_key(tagged.value),
        other => Err(ToolError::Parse {
            format: "YAML".to_string(),
            location: None,
            message: format!("unsupported mapping key {other:?}"),
        }),
    }
}

/// Renders a tree as block-style YAML.
pub fn render_yaml(value: &TreeValue, style: &YamlStyle) -> Result<String> {
    match style.quotes {
        QuoteStyle::Plain => Ok(serde_yaml::to_string(value)?),
        QuoteStyle::Single => {
            let emitter = QuotingEmitter {
                indent: style.indent.max(1),
            };
            let mut output = String::new();
            emitter.emit_root(value, &mut output);
            Ok(output)
        }
    }
}

struct QuotingEmitter {
    indent: usize,
}

impl QuotingEmitter {
    fn emit_root(&self, value: &TreeValue, out: &mut String) {
        match value {
            TreeValue::Mapping(entries) if !entries.is_empty() => {
                self.emit_mapping(entries, 0, out);
            }
            TreeValue::Sequence(items) if !items.is_empty() => {
                self.emit_sequence(items, 0, out);
            }
            leaf => {
                out.push_str(&inline_value(leaf));
                out.push('\n');
            }
        }
    }

    fn emit_mapping(&self, entries: &Mapping, level: usize, out: &mut String) {
        for (key, value) in entries {
            push_indent(out, level);
            out.push_str(&quote(key));
            out.push(':');
            match value {
                TreeValue::Mapping(children) if !children.is_empty() => {
                    out.push('\n');
                    self.emit_mapping(children, level + self.indent, out);
                }
                // Sequences under a key sit at the key's own column.
                TreeValue::Sequence(items) if !items.is_empty() => {
                    out.push('\n');
                    self.emit_sequence(items, level, out);
                }
                leaf => {
                    out.push(' ');
                    out.push_str(&inline_value(leaf));
                    out.push('\n');
                }
            }
        }
    }

    fn emit_sequence(&self, items: &[TreeValue], level: usize, out: &mut String) {
        for item in items {
            push_indent(out, level);
            out.push('-');
            match item {
                TreeValue::Mapping(children) if !children.is_empty() => {
                    out.push(' ');
                    let mut nested = String::new();
                    self.emit_mapping(children, level + 2, &mut nested);
                    out.push_str(&nested[level + 2..]);
                }
                TreeValue::Sequence(children) if !children.is_empty() => {
                    out.push(' ');
                    let mut nested = String::new();
                    self.emit_sequence(children, level + 2, &mut nested);
                    out.push_str(&nested[level + 2..]);
                }
                leaf => {
                    out.push(' ');
                    out.push_str(&inline_value(leaf));
                    out.push('\n');
                }
            }
        }
    }
}

fn push_indent(out: &mut String, level: usize) {
    out.push_str(&" ".repeat(level));
}

fn inline_value(value: &TreeValue) -> String {
    match value {
        TreeValue::Mapping(_) => "{}".to_string(),
        TreeValue::Sequence(_) => "[]".to_string(),
        TreeValue::Scalar(ScalarValue::String(text)) => quote(text),
        TreeValue::Scalar(ScalarValue::Number(number)) => number.to_string(),
        TreeValue::Scalar(ScalarValue::Boolean(flag)) => flag.to_string(),
        TreeValue::Scalar(ScalarValue::Null) => "null".to_string(),
    }
}

/// Single-quotes a string. Text holding control characters cannot be
/// expressed in single quotes and is double-quoted with escapes instead.
fn quote(text: &str) -> String {
    if text.chars().any(char::is_control) {
        return double_quote(text);
    }
    format!("'{}'", text.replace('\'', "''"))
}

fn double_quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            '\0' => quoted.push_str("\\0"),
            ch if ch.is_control() && (ch as u32) <= 0xff => {
                quoted.push_str(&format!("\\x{:02X}", ch as u32));
            }
            ch if ch.is_control() => quoted.push_str(&format!("\\u{:04X}", ch as u32)),
            ch => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}
