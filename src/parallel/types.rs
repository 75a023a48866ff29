//! Type definitions for parallel processing
//!
//! Contains the pipeline configuration, the batch handed from workers to the
//! aggregator, and the final scan report.

use crate::counter::KeywordCounts;
use crate::error::ConfigError;
use crate::stats::ProcessingStats;

/// Lines a worker counts before handing its tally to the aggregator
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Capacity of the line channel between the reader and the workers
pub const DEFAULT_BUFFER_SIZE: usize = 100;

/// Configuration for parallel processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelConfig {
    pub num_workers: usize,
    pub batch_size: usize,
    pub buffer_size: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            batch_size: DEFAULT_BATCH_SIZE,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl ParallelConfig {
    pub fn with_workers(num_workers: usize) -> Self {
        Self {
            num_workers,
            ..Self::default()
        }
    }

    /// A pool without workers would never drain the line channel
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.buffer_size == 0 {
            return Err(ConfigError::ZeroBufferSize);
        }
        Ok(())
    }

    /// The merge channel holds about one pending batch per worker
    pub fn merge_buffer_size(&self) -> usize {
        self.num_workers
    }
}

/// Partial counts from one worker, covering at most `batch_size` lines
#[derive(Debug)]
pub struct CountBatch {
    pub worker_id: usize,
    pub counts: KeywordCounts,
    pub lines: usize,
}

/// Outcome of a complete (or interrupted) scan
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub counts: KeywordCounts,
    pub stats: ProcessingStats,
    /// Set when a shutdown request stopped the reader early. The counts then
    /// cover exactly the lines read before the request.
    pub interrupted: bool,
}
