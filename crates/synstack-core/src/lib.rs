//! Orchestration engine for synstack installs.
//!
//! This crate ties schema parsing and the disk mutation layer together into
//! the `Engine` — load a configure directory, then apply every injector
//! fragment and the macro update pass against the resolved install tree,
//! under an advisory install-root lock.

pub mod engine;
pub mod lock;
pub mod report;

pub use engine::{ApplyOptions, Engine};
pub use lock::InstallLock;
pub use report::ApplyReport;

use synstack_inject::InjectError;
use synstack_schema::{ManifestError, ResolveError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),
    #[error("inject error: {0}")]
    Inject(#[from] InjectError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
