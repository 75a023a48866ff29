//! Aggregator thread for parallel processing
//!
//! Sole owner of the final counts. Workers never see this state; batches
//! arrive by value over the merge channel.

use crossbeam_channel::Receiver;

use crate::counter::{merge_counts, KeywordCounts};

use super::types::CountBatch;

/// Everything the aggregator folded together
#[derive(Debug, Default)]
pub(crate) struct Aggregate {
    pub counts: KeywordCounts,
    pub lines_counted: usize,
    pub batches: usize,
}

impl Aggregate {
    pub(crate) fn absorb(&mut self, batch: CountBatch) {
        merge_counts(&mut self.counts, batch.counts);
        self.lines_counted += batch.lines;
        self.batches += 1;
    }
}

/// Aggregator thread: drains the merge channel until every sender is dropped.
///
/// The returned value travels back through the thread's join handle, which
/// doubles as the completion signal for the coordinator.
pub(crate) fn aggregator_thread(batch_receiver: Receiver<CountBatch>) -> Aggregate {
    let mut aggregate = Aggregate::default();

    while let Ok(batch) = batch_receiver.recv() {
        tracing::trace!(
            worker_id = batch.worker_id,
            lines = batch.lines,
            "merging batch"
        );
        aggregate.absorb(batch);
    }

    tracing::debug!(
        batches = aggregate.batches,
        lines = aggregate.lines_counted,
        "aggregator finished"
    );
    aggregate
}
