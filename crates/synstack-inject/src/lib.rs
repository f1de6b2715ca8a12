//! Config-file injection and macro substitution for synstack.
//!
//! This crate is the disk mutation layer: the injector engine appends
//! fragment content to generated build files between marker comments, and
//! the macro updater rewrites architecture-specific configuration files
//! from `key=value` macro pairs, preserving originals under a backup
//! directory. All rewrites go through write-temp-then-atomic-persist.

pub mod backup;
pub mod inject;
pub mod macro_update;

pub use backup::{preserve, relocate, BACKUP_DIR};
pub use inject::{inject_fragment, INJECT_BEGIN_PREFIX, INJECT_END_PREFIX};
pub use macro_update::{update_macros, MacroUpdateOutcome};

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use synstack_schema::ResolveError;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("injection target does not exist: {0}")]
    TargetNotFound(PathBuf),
    #[error("macro target directory not found or not a directory: {0}")]
    TargetDirNotFound(PathBuf),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Fsync a directory to ensure that a preceding `rename()` is durable.
///
/// On Linux with ext4 `data=ordered` (the default), renames are usually
/// durable without an explicit dir fsync, but POSIX does not guarantee this.
pub(crate) fn fsync_dir(dir: &Path) -> Result<(), io::Error> {
    let f = std::fs::File::open(dir)?;
    f.sync_all()
}

/// Replace `path` atomically: write a temp file in the same directory,
/// fsync it, persist over the destination, fsync the directory.
pub(crate) fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), io::Error> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    fsync_dir(dir)
}
