//! Worker thread for parallel processing
//!
//! Each worker pulls lines from the shared line channel, tallies keyword
//! matches locally, and hands off a batch every `batch_size` lines.

use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;

use crate::counter::{count_line, merge_counts, KeywordCounts, KeywordSet};

use super::types::CountBatch;

/// Worker-private tally since the last flush
#[derive(Debug)]
pub(crate) struct LocalTally {
    worker_id: usize,
    counts: KeywordCounts,
    lines: usize,
    batch_size: usize,
}

impl LocalTally {
    pub(crate) fn new(worker_id: usize, batch_size: usize) -> Self {
        Self {
            worker_id,
            counts: KeywordCounts::new(),
            lines: 0,
            batch_size,
        }
    }

    pub(crate) fn record(&mut self, line_counts: KeywordCounts) {
        merge_counts(&mut self.counts, line_counts);
        self.lines += 1;
    }

    pub(crate) fn is_full(&self) -> bool {
        self.lines >= self.batch_size
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.lines > 0
    }

    /// Hand the tally off as a batch and start over empty
    pub(crate) fn take_batch(&mut self) -> CountBatch {
        let lines = std::mem::take(&mut self.lines);
        CountBatch {
            worker_id: self.worker_id,
            counts: std::mem::take(&mut self.counts),
            lines,
        }
    }
}

/// Worker thread: runs until the line channel is closed and drained.
///
/// Sending a full batch blocks while the merge channel is full, which pauses
/// line consumption until the aggregator catches up. Returns the number of
/// lines this worker counted.
pub(crate) fn worker_thread(
    worker_id: usize,
    line_receiver: Receiver<String>,
    batch_sender: Sender<CountBatch>,
    keywords: Arc<KeywordSet>,
    batch_size: usize,
) -> usize {
    tracing::trace!(worker_id, "worker started");

    let mut tally = LocalTally::new(worker_id, batch_size);
    let mut total_lines = 0usize;

    while let Ok(line) = line_receiver.recv() {
        tally.record(count_line(&line, &keywords));
        total_lines += 1;

        if tally.is_full() {
            let batch = tally.take_batch();
            tracing::trace!(worker_id, lines = batch.lines, "flushing batch");
            if batch_sender.send(batch).is_err() {
                // Aggregator is gone, nothing left to report to
                tracing::warn!(worker_id, "merge channel closed early");
                return total_lines;
            }
        }
    }

    if tally.is_pending() {
        let batch = tally.take_batch();
        tracing::trace!(worker_id, lines = batch.lines, "flushing final batch");
        if batch_sender.send(batch).is_err() {
            tracing::warn!(worker_id, "merge channel closed early");
        }
    }

    tracing::debug!(worker_id, lines = total_lines, "worker finished");
    total_lines
}
