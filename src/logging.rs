//! Logging configuration and initialization
//!
//! Diagnostics go to stderr so they never mix with the report on stdout.

use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count
fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize tracing. `RUST_LOG` takes precedence over `-v`.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("kwtally={}", log_level(verbose))));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(verbose >= 3) // Show line numbers for -vvv
        .init();

    debug!("kwtally started with verbosity level: {}", verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(log_level(0), "error");
        assert_eq!(log_level(1), "info");
        assert_eq!(log_level(2), "debug");
        assert_eq!(log_level(3), "trace");
        assert_eq!(log_level(9), "trace");
    }
}
