use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Line and column of a syntax error inside a text document. Both are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

/// Error type covering the different failure cases that can occur when the
/// tool ingests, transforms, or emits data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when YAML serialization fails.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a JSON or YAML document is malformed.
    #[error("{format} parse error{}: {message}", location_suffix(.location))]
    Parse {
        format: String,
        location: Option<Location>,
        message: String,
    },

    /// Raised when a sheet lacks one of the columns the conversion needs.
    #[error("sheet '{sheet}' is missing required column '{column}'")]
    SchemaMismatch { sheet: String, column: String },

    /// Raised when a key path nests below a segment that already holds a leaf
    /// and the conflict policy forbids overwriting it.
    #[error("key '{key}' conflicts with the value already stored at '{path}'")]
    StructuralConflict { key: String, path: String },

    /// Raised when a mapping key contains the path separator and the
    /// separator policy rejects such keys.
    #[error("key path '{path}' contains the separator '{separator}' inside a segment")]
    SeparatorInKey { path: String, separator: char },

    /// Raised when a leaf would be stored without a key, such as a scalar
    /// document root or an empty top-level key.
    #[error("leaf value has an empty key path")]
    EmptyKeyPath,

    /// Raised when two columns of a sheet would share a header.
    #[error("column '{0}' appears more than once in the sheet header")]
    DuplicateColumn(String),

    /// Raised when a sheet does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the CLI receives an unsupported conversion request.
    #[error("unsupported conversion from {from:?} to {to:?}")]
    UnsupportedConversion { from: String, to: String },

    /// Raised when a file extension does not map to a known format.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Attaches the file being processed to an underlying failure.
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<ToolError>,
    },

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl ToolError {
    /// Wraps the error with the path of the file that triggered it.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            already @ ToolError::File { .. } => already,
            other => ToolError::File {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the innermost error, skipping file annotations.
    pub fn root(&self) -> &ToolError {
        match self {
            ToolError::File { source, .. } => source.root(),
            other => other,
        }
    }
}

fn location_suffix(location: &Option<Location>) -> String {
    location
        .map(|location| format!(" at {location}"))
        .unwrap_or_default()
}
