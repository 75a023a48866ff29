//! Parallel keyword counting
//!
//! Splits the scan across a fixed pool of worker threads and folds their
//! partial counts together on a single aggregator thread.
//!
//! # Module Structure
//!
//! - `types`: Configuration, the worker-to-aggregator batch, and the scan report
//! - `worker`: Worker thread with its local tally
//! - `aggregator`: Aggregator thread that owns the final counts
//! - `processor`: Main KeywordProcessor orchestration

mod aggregator;
mod processor;
mod types;
mod worker;

// Re-export public types
pub use processor::KeywordProcessor;
pub use types::{CountBatch, ParallelConfig, ScanReport, DEFAULT_BATCH_SIZE, DEFAULT_BUFFER_SIZE};
