//! Main parallel processor
//!
//! Contains the KeywordProcessor struct that orchestrates the parallel pipeline:
//! reader (caller thread) -> line channel -> workers -> merge channel -> aggregator.

use crossbeam_channel::{bounded, never, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crate::counter::KeywordSet;
use crate::error::{ConfigError, ScanError};
use crate::platform::Ctrl;
use crate::source::LineSource;
use crate::stats::ProcessingStats;

use super::aggregator::aggregator_thread;
use super::types::{CountBatch, ParallelConfig, ScanReport};
use super::worker::worker_thread;

/// How the reader loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FeedOutcome {
    lines_read: usize,
    interrupted: bool,
}

/// Main parallel processor
#[derive(Debug, Clone)]
pub struct KeywordProcessor {
    config: ParallelConfig,
    keywords: Arc<KeywordSet>,
}

impl KeywordProcessor {
    pub fn new(config: ParallelConfig, keywords: KeywordSet) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            keywords: Arc::new(keywords),
        })
    }

    pub fn config(&self) -> &ParallelConfig {
        &self.config
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Scan `source` to completion. Panics under the same conditions as
    /// [`process_with_ctrl`](Self::process_with_ctrl).
    pub fn process(&self, source: LineSource) -> Result<ScanReport, ScanError> {
        self.process_with_ctrl(source, &never())
    }

    /// Scan `source`, stopping early when a shutdown request arrives on `ctrl_rx`.
    ///
    /// The report is returned only after every worker has flushed and the
    /// aggregator has merged every batch. A read error still tears the
    /// pipeline down cleanly but discards the counts.
    ///
    /// # Panics
    ///
    /// Re-raises a panic from a worker or the aggregator thread after it is
    /// joined. Neither has a failure path of its own, so this only happens on
    /// a bug.
    pub fn process_with_ctrl(
        &self,
        source: LineSource,
        ctrl_rx: &Receiver<Ctrl>,
    ) -> Result<ScanReport, ScanError> {
        let start = Instant::now();
        let label = source.label().to_string();

        let (line_sender, line_receiver) = bounded::<String>(self.config.buffer_size);
        let (batch_sender, batch_receiver) =
            bounded::<CountBatch>(self.config.merge_buffer_size());

        let aggregator_handle = thread::spawn(move || aggregator_thread(batch_receiver));

        let mut worker_handles = Vec::with_capacity(self.config.num_workers);
        for worker_id in 0..self.config.num_workers {
            let line_receiver = line_receiver.clone();
            let batch_sender = batch_sender.clone();
            let keywords = Arc::clone(&self.keywords);
            let batch_size = self.config.batch_size;

            let handle = thread::spawn(move || {
                worker_thread(worker_id, line_receiver, batch_sender, keywords, batch_size)
            });
            worker_handles.push(handle);
        }
        // Only workers may hold the receiving end, so sends fail instead of
        // hanging if the whole pool is gone
        drop(line_receiver);

        tracing::debug!(
            source = %label,
            workers = self.config.num_workers,
            batch_size = self.config.batch_size,
            "pipeline started"
        );

        let feed = feed_lines(source, &line_sender, ctrl_rx);

        // No more work: workers drain the channel, flush and exit
        drop(line_sender);
        for (idx, handle) in worker_handles.into_iter().enumerate() {
            handle
                .join()
                .unwrap_or_else(|e| panic!("Worker thread {} panicked: {:?}", idx, e));
        }

        // No more batches: the aggregator finishes once it has merged the rest
        drop(batch_sender);
        let aggregate = aggregator_handle
            .join()
            .unwrap_or_else(|e| panic!("Aggregator thread panicked: {:?}", e));

        let feed = feed?;
        debug_assert_eq!(feed.lines_read, aggregate.lines_counted);

        let stats = ProcessingStats {
            lines_read: feed.lines_read,
            lines_counted: aggregate.lines_counted,
            batches_merged: aggregate.batches,
            workers: self.config.num_workers,
            processing_time: start.elapsed(),
        };

        if feed.interrupted {
            tracing::warn!(source = %label, lines = stats.lines_read, "scan interrupted");
        } else {
            tracing::info!(
                source = %label,
                lines = stats.lines_read,
                batches = stats.batches_merged,
                elapsed_ms = stats.processing_time.as_millis() as u64,
                "scan finished"
            );
        }

        Ok(ScanReport {
            counts: aggregate.counts,
            stats,
            interrupted: feed.interrupted,
        })
    }
}

/// Reader loop: stream lines into the bounded line channel.
///
/// Blocks whenever the channel is full, so a slow pool throttles reading.
fn feed_lines(
    source: LineSource,
    line_sender: &Sender<String>,
    ctrl_rx: &Receiver<Ctrl>,
) -> Result<FeedOutcome, ScanError> {
    let mut lines_read = 0usize;

    for line in source.lines() {
        if let Ok(Ctrl::Shutdown) = ctrl_rx.try_recv() {
            return Ok(FeedOutcome {
                lines_read,
                interrupted: true,
            });
        }

        let line = line.map_err(|source| {
            tracing::error!(line = lines_read, error = %source, "read failed");
            ScanError::Read {
                line: lines_read,
                source,
            }
        })?;

        if line_sender.send(line).is_err() {
            break;
        }
        lines_read += 1;
    }

    Ok(FeedOutcome {
        lines_read,
        interrupted: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::io::{self, Cursor, Read};

    const SAMPLE: &str = "2023-10-28 12:00:01 - INFO - User logged in
2023-10-28 12:00:03 - ERROR - Database connection failed
2023-10-28 12:00:04 - DEBUG - Cache hit for request
2023-10-28 12:00:05 - INFO - User logged out
2023-10-28 12:00:07 - ERROR - Timeout reached while processing
2023-10-28 12:00:08 - INFO - User logged in
";

    fn processor(workers: usize, batch_size: usize) -> KeywordProcessor {
        let config = ParallelConfig {
            num_workers: workers,
            batch_size,
            buffer_size: 4,
        };
        KeywordProcessor::new(config, KeywordSet::new(["INFO", "ERROR", "DEBUG"]).unwrap())
            .unwrap()
    }

    fn source(text: &str) -> LineSource {
        LineSource::from_reader(Cursor::new(text.as_bytes().to_vec()), "sample").unwrap()
    }

    #[test]
    fn test_sample_counts_with_two_workers() {
        let report = processor(2, 1000).process(source(SAMPLE)).unwrap();
        assert_eq!(report.counts.get("INFO"), Some(&3));
        assert_eq!(report.counts.get("ERROR"), Some(&2));
        assert_eq!(report.counts.get("DEBUG"), Some(&1));
        assert_eq!(report.counts.len(), 3);
        assert!(!report.interrupted);
        assert_eq!(report.stats.lines_read, 6);
        assert_eq!(report.stats.lines_counted, 6);
        assert_eq!(report.stats.workers, 2);
    }

    #[test]
    fn test_more_workers_than_lines() {
        let report = processor(16, 1).process(source("ERROR\n")).unwrap();
        assert_eq!(report.counts.get("ERROR"), Some(&1));
        assert_eq!(report.stats.batches_merged, 1);
    }

    #[test]
    fn test_batch_count_follows_batch_size() {
        let text: String = (0..10).map(|i| format!("INFO {}\n", i)).collect();
        let report = processor(1, 3).process(source(&text)).unwrap();
        assert_eq!(report.counts.get("INFO"), Some(&10));
        // 3 + 3 + 3 + 1
        assert_eq!(report.stats.batches_merged, 4);
    }

    #[test]
    fn test_rejects_zero_workers() {
        let err = KeywordProcessor::new(
            ParallelConfig::with_workers(0),
            KeywordSet::new(["INFO"]).unwrap(),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::NoWorkers);
    }

    #[test]
    fn test_shutdown_before_start_counts_nothing() {
        let (ctrl_tx, ctrl_rx) = unbounded();
        ctrl_tx.send(Ctrl::Shutdown).unwrap();

        let report = processor(2, 1000)
            .process_with_ctrl(source(SAMPLE), &ctrl_rx)
            .unwrap();
        assert!(report.interrupted);
        assert_eq!(report.stats.lines_read, 0);
        assert!(report.counts.is_empty());
    }

    #[test]
    fn test_full_line_channel_blocks_reader() {
        let (line_tx, line_rx) = bounded::<String>(1);
        let reader = thread::spawn(move || {
            feed_lines(source("INFO 1\nINFO 2\nINFO 3\n"), &line_tx, &never())
        });

        // One line fits in the channel, the reader waits on the second
        thread::sleep(std::time::Duration::from_millis(100));
        assert!(!reader.is_finished());

        let received: Vec<String> = line_rx.iter().collect();
        assert_eq!(received, vec!["INFO 1", "INFO 2", "INFO 3"]);

        let outcome = reader.join().unwrap().unwrap();
        assert_eq!(
            outcome,
            FeedOutcome {
                lines_read: 3,
                interrupted: false,
            }
        );
    }

    #[test]
    fn test_read_error_fails_the_scan() {
        struct Truncated {
            inner: Cursor<Vec<u8>>,
        }
        impl Read for Truncated {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                match self.inner.read(buf)? {
                    0 => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated")),
                    n => Ok(n),
                }
            }
        }

        let reader = Truncated {
            inner: Cursor::new(b"INFO a\nERROR b\n".to_vec()),
        };
        let source = LineSource::from_reader(reader, "truncated").unwrap();
        let err = processor(2, 1000).process(source).unwrap_err();
        match err {
            ScanError::Read { line, .. } => assert_eq!(line, 2),
            other => panic!("expected read error, got {:?}", other),
        }
    }
}
