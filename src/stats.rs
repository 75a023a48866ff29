use std::time::Duration;

/// Statistics collected during one scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    pub lines_read: usize,
    pub lines_counted: usize,
    pub batches_merged: usize,
    pub workers: usize,
    pub processing_time: Duration,
}

impl ProcessingStats {
    pub fn format_stats(&self) -> String {
        let mut output = format!(
            "Lines processed: {} total, {} batches from {} workers",
            self.lines_read, self.batches_merged, self.workers
        );

        let processing_time_ms = self.processing_time.as_millis();
        output.push_str(&format!(" in {}ms", processing_time_ms));

        if processing_time_ms > 0 && self.lines_read > 0 {
            let lines_per_sec = (self.lines_read as f64 * 1000.0) / processing_time_ms as f64;
            output.push_str(&format!(" ({:.0} lines/s)", lines_per_sec));
        }

        output
    }
}
