use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::lingo::tools::error::Result;

/// Complete contents waiting in a temporary file next to their destination.
///
/// Dropping a staged write without committing removes the temporary file and
/// leaves the destination untouched.
#[derive(Debug)]
pub struct StagedWrite {
    file: NamedTempFile,
    target: PathBuf,
    bytes: usize,
}

impl StagedWrite {
    /// Renames the temporary file over the destination.
    pub fn commit(self) -> Result<()> {
        self.file.persist(&self.target).map_err(|err| err.error)?;
        debug!(path = %self.target.display(), bytes = self.bytes, "file written");
        Ok(())
    }
}

/// Writes and flushes `contents` into a temporary file in the directory of
/// `path`, ready to be committed.
pub fn stage(path: &Path, contents: &[u8]) -> Result<StagedWrite> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(directory)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    Ok(StagedWrite {
        file,
        target: path.to_path_buf(),
        bytes: contents.len(),
    })
}

/// Writes `contents` to `path` so that readers see either the previous file or
/// the complete new one.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    stage(path, contents)?.commit()
}
