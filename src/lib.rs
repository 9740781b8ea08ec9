//! Core library for the lingo-tools command line application.
//!
//! The library converts translation resources between JSON, YAML, and Excel
//! and keeps two language trees aligned in a single review sheet. The modules
//! are structured to keep responsibilities narrow and composable: the tree
//! codecs and file adapters live under [`lingo::tools::io`], the tree model in
//! [`lingo::tools::model`], dotted key-path encoding in
//! [`lingo::tools::flatten`], row layout in [`lingo::tools::table`], the
//! two-language merge in [`lingo::tools::bilingual`], and the file-level
//! orchestration under [`lingo::tools::sync`].

pub mod lingo;

pub use lingo::tools::{Result, ToolError, bilingual, error, flatten, io, model, sync, table};
