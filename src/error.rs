//! Error types for the keyword scanning pipeline
//!
//! Source-access and configuration problems are detected before any thread is
//! spawned. Read failures can only happen once lines are already flowing.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to open a line source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("file path does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("file could not be opened: {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file is empty: {}", path.display())]
    Empty { path: PathBuf },
}

/// Invalid pipeline or keyword configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("batch size must be greater than 0")]
    ZeroBatchSize,

    #[error("line buffer size must be greater than 0")]
    ZeroBufferSize,

    #[error("keywords must not be empty strings")]
    EmptyKeyword,
}

/// Any failure of a full scan
#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The stream failed after `line` lines were handed to the workers.
    /// Counts gathered up to that point are discarded.
    #[error("read error after line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
}
