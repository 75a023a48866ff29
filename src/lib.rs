// Core library for the kwtally keyword counter

pub mod colors;
pub mod config;
pub mod counter;
pub mod error;
pub mod formatters;
pub mod parallel;
pub mod platform;
pub mod source;
pub mod stats;

use std::path::Path;

pub use config::KwConfig;
pub use counter::{count_line, KeywordCounts, KeywordSet};
pub use error::{ConfigError, ScanError, SourceError};
pub use parallel::{KeywordProcessor, ParallelConfig, ScanReport};
pub use source::LineSource;

/// Count keyword lines in the file at `path` using `num_workers` threads.
///
/// Configuration and source errors are reported before any thread starts.
pub fn count_keywords<P, I, S>(
    path: P,
    keywords: I,
    num_workers: usize,
) -> Result<KeywordCounts, ScanError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let processor = KeywordProcessor::new(
        ParallelConfig::with_workers(num_workers),
        KeywordSet::new(keywords)?,
    )?;
    let source = LineSource::open(path)?;
    Ok(processor.process(source)?.counts)
}
