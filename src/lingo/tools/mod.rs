pub mod bilingual;
pub mod error;
pub mod flatten;
pub mod io;
pub mod model;
pub mod sync;
pub mod table;

pub use error::{Result, ToolError};
