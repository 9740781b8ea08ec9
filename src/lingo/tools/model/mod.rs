use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Number;

/// Dotted key path addressing a leaf of a tree, e.g. `menu.file.open`.
pub type FlatKey = String;

/// Ordered children of a mapping node.
pub type Mapping = IndexMap<String, TreeValue>;

/// Single-level view of a tree: key path → leaf value.
///
/// Leaves are scalars, sequences, or empty mappings; a non-empty mapping never
/// appears as a value. Entries keep the order in which they were inserted.
pub type FlatMap = IndexMap<FlatKey, TreeValue>;

/// Represents a scalar literal value in a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// Plain string literal.
    String(String),
    /// Number literal. Integers and floats keep their original spelling.
    Number(Number),
    /// Boolean literal.
    Boolean(bool),
    /// Explicit `null` literal.
    Null,
}

impl ScalarValue {
    /// Text used for the scalar once it lives in a spreadsheet cell.
    pub fn to_text(&self) -> String {
        match self {
            ScalarValue::String(value) => value.clone(),
            ScalarValue::Number(value) => value.to_string(),
            ScalarValue::Boolean(value) => value.to_string(),
            ScalarValue::Null => String::new(),
        }
    }
}

/// In-memory form shared by JSON and YAML documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TreeValue {
    /// Keyed children. Equality ignores key order.
    Mapping(Mapping),
    /// Ordered list of values.
    Sequence(Vec<TreeValue>),
    /// Leaf literal.
    Scalar(ScalarValue),
}

impl TreeValue {
    /// Creates an empty mapping node.
    pub fn empty() -> Self {
        TreeValue::Mapping(Mapping::new())
    }

    /// Creates a string leaf.
    pub fn string(value: impl Into<String>) -> Self {
        TreeValue::Scalar(ScalarValue::String(value.into()))
    }

    /// Returns `true` for nodes that carry nothing: an empty mapping or `null`.
    pub fn is_empty_document(&self) -> bool {
        match self {
            TreeValue::Mapping(entries) => entries.is_empty(),
            TreeValue::Scalar(ScalarValue::Null) => true,
            _ => false,
        }
    }

    /// Returns the children when the node is a mapping.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            TreeValue::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the string payload of a string leaf.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TreeValue::Scalar(ScalarValue::String(value)) => Some(value),
            _ => None,
        }
    }
}

impl From<ScalarValue> for TreeValue {
    fn from(value: ScalarValue) -> Self {
        TreeValue::Scalar(value)
    }
}

impl From<serde_json::Value> for TreeValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => TreeValue::Scalar(ScalarValue::Null),
            serde_json::Value::Bool(value) => TreeValue::Scalar(ScalarValue::Boolean(value)),
            serde_json::Value::Number(value) => TreeValue::Scalar(ScalarValue::Number(value)),
            serde_json::Value::String(value) => TreeValue::Scalar(ScalarValue::String(value)),
            serde_json::Value::Array(items) => {
                TreeValue::Sequence(items.into_iter().map(TreeValue::from).collect())
            }
            serde_json::Value::Object(object) => TreeValue::Mapping(
                object
                    .into_iter()
                    .map(|(key, value)| (key, TreeValue::from(value)))
                    .collect(),
            ),
        }
    }
}
