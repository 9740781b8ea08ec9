//! Format codecs and file adapters.

pub mod excel_read;
pub mod excel_write;
pub mod fs;
pub mod json;
pub mod yaml;

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::lingo::tools::error::{Result, ToolError};
use crate::lingo::tools::model::TreeValue;

pub use json::JsonStyle;
pub use yaml::{QuoteStyle, YamlStyle};

/// Text formats holding a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    Json,
    Yaml,
}

impl fmt::Display for TreeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeFormat::Json => write!(f, "json"),
            TreeFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Every file format the tool reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Tree(TreeFormat),
    Excel,
}

impl FileFormat {
    /// Infers the format from a file extension, ignoring case.
    pub fn detect(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(FileFormat::Tree(TreeFormat::Json)),
            "yaml" | "yml" => Some(FileFormat::Tree(TreeFormat::Yaml)),
            "xlsx" => Some(FileFormat::Excel),
            _ => None,
        }
    }

    /// Like [`FileFormat::detect`] but fails for unknown extensions.
    pub fn require(path: &Path) -> Result<Self> {
        Self::detect(path).ok_or_else(|| ToolError::UnsupportedFormat(path.to_path_buf()))
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Tree(format) => format.fmt(f),
            FileFormat::Excel => write!(f, "xlsx"),
        }
    }
}

/// Serializer settings for tree documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub json: JsonStyle,
    pub yaml: YamlStyle,
}

/// Parses a JSON or YAML document.
pub fn parse_tree(text: &str, format: TreeFormat) -> Result<TreeValue> {
    match format {
        TreeFormat::Json => json::parse_json(text),
        TreeFormat::Yaml => yaml::parse_yaml(text),
    }
}

/// Serializes a tree as JSON or YAML text.
pub fn render_tree(
    value: &TreeValue,
    format: TreeFormat,
    options: &RenderOptions,
) -> Result<String> {
    match format {
        TreeFormat::Json => json::render_json(value, &options.json),
        TreeFormat::Yaml => yaml::render_yaml(value, &options.yaml),
    }
}

/// Reads and parses a tree document, choosing the codec from the extension.
pub fn read_tree(path: &Path) -> Result<TreeValue> {
    let format = tree_format(path)?;
    let text =
        std::fs::read_to_string(path).map_err(|err| ToolError::from(err).in_file(path))?;
    let tree = parse_tree(&text, format).map_err(|err| err.in_file(path))?;
    debug!(path = %path.display(), %format, "parsed tree document");
    Ok(tree)
}

/// Renders a tree in memory, then writes it atomically.
pub fn write_tree(path: &Path, value: &TreeValue, options: &RenderOptions) -> Result<()> {
    let text = render_document(path, value, options)?;
    fs::write_atomic(path, text.as_bytes()).map_err(|err| err.in_file(path))
}

/// Renders the document that [`write_tree`] would write to `path`.
pub fn render_document(
    path: &Path,
    value: &TreeValue,
    options: &RenderOptions,
) -> Result<String> {
    let format = tree_format(path)?;
    render_tree(value, format, options).map_err(|err| err.in_file(path))
}

fn tree_format(path: &Path) -> Result<TreeFormat> {
    match FileFormat::require(path)? {
        FileFormat::Tree(format) => Ok(format),
        FileFormat::Excel => Err(ToolError::UnsupportedFormat(path.to_path_buf())),
    }
}
