// CLI-specific types and structures
// This module contains the command-line interface definitions and their conversion to KwConfig

use clap::Parser;
use kwtally::config::{
    ColorMode, InputConfig, KwConfig, OutputConfig, OutputFormat, PerformanceConfig,
    ProcessingConfig, DEFAULT_KEYWORDS,
};
use kwtally::parallel::{DEFAULT_BATCH_SIZE, DEFAULT_BUFFER_SIZE};

// CLI structure - contains all command-line arguments and options
#[derive(Parser, Debug)]
#[command(name = "kwtally")]
#[command(about = "Count log lines containing keywords, in parallel")]
#[command(
    long_about = "Count log lines containing keywords, in parallel\n\nEvery line is checked for each keyword (case-insensitive substring match).\nA keyword counts at most once per line. Gzip and zstd input is decompressed automatically.\n\nCOMMON EXAMPLES:\n  kwtally app.log\n  kwtally app.log.gz -k error,warn,timeout -j 8\n  zcat old.log.gz | kwtally - -F json"
)]
#[command(author = "Dirk Loss <mail@dirk-loss.de>")]
#[command(version)]
#[command(args_override_self = true)]
pub struct Cli {
    /// Input file (stdin if not specified, or use "-" to explicitly specify stdin)
    pub file: Option<String>,

    /// Comma-separated keywords to count (case-insensitive)
    #[arg(short = 'k', long = "keywords", help_heading = "Processing Options")]
    pub keywords: Option<String>,

    /// Number of worker threads (default: number of CPUs)
    #[arg(short = 'j', long = "threads", help_heading = "Performance Options")]
    pub threads: Option<usize>,

    /// Lines a worker counts before handing its tally to the aggregator
    #[arg(long = "batch-size", default_value_t = DEFAULT_BATCH_SIZE, help_heading = "Performance Options")]
    pub batch_size: usize,

    /// Number of lines buffered between the reader and the workers
    #[arg(long = "buffer-size", default_value_t = DEFAULT_BUFFER_SIZE, help_heading = "Performance Options")]
    pub buffer_size: usize,

    /// Output format
    #[arg(
        short = 'F',
        long = "output-format",
        value_enum,
        default_value = "default",
        help_heading = "Output Options"
    )]
    pub output_format: OutputFormat,

    /// When to use colors
    #[arg(long = "color", value_enum, default_value = "auto", help_heading = "Output Options")]
    pub color: ColorMode,

    /// Print processing statistics to stderr
    #[arg(short = 's', long = "stats", help_heading = "Output Options")]
    pub stats: bool,

    /// Increase diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help_heading = "Output Options")]
    pub verbose: u8,

    /// Specify custom configuration file path
    #[arg(long = "config-file", help_heading = "Configuration Options")]
    pub config_file: Option<String>,

    /// Ignore configuration file
    #[arg(long = "ignore-config", help_heading = "Configuration Options")]
    pub ignore_config: bool,

    /// Show configuration file and exit
    #[arg(long = "show-config", help_heading = "Configuration Options")]
    pub show_config: bool,
}

impl Cli {
    /// Keywords from `--keywords`, or the standard log levels
    pub fn keyword_list(&self) -> Vec<String> {
        match &self.keywords {
            Some(list) => list
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
            None => DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn to_config(&self) -> KwConfig {
        let defaults = KwConfig::default();
        KwConfig {
            input: InputConfig {
                file: self.file.clone().filter(|f| f != "-"),
            },
            processing: ProcessingConfig {
                keywords: self.keyword_list(),
            },
            performance: PerformanceConfig {
                threads: self.threads.unwrap_or(defaults.performance.threads),
                batch_size: self.batch_size,
                buffer_size: self.buffer_size,
            },
            output: OutputConfig {
                format: self.output_format,
                color: self.color,
                stats: self.stats,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["kwtally", "app.log"]).unwrap();
        let config = cli.to_config();
        assert_eq!(config.input.file.as_deref(), Some("app.log"));
        assert_eq!(config.processing.keywords, vec!["INFO", "ERROR", "DEBUG"]);
        assert_eq!(config.performance.batch_size, 1000);
        assert_eq!(config.performance.buffer_size, 100);
        assert!(config.performance.threads >= 1);
        assert_eq!(config.output.format, OutputFormat::Default);
    }

    #[test]
    fn test_keyword_list_trims_and_skips_blanks() {
        let cli = Cli::try_parse_from(["kwtally", "-k", " warn, error ,,timeout", "x.log"]).unwrap();
        assert_eq!(cli.keyword_list(), vec!["warn", "error", "timeout"]);
    }

    #[test]
    fn test_dash_means_stdin() {
        let cli = Cli::try_parse_from(["kwtally", "-"]).unwrap();
        assert!(cli.to_config().input.file.is_none());
    }

    #[test]
    fn test_later_flags_override_earlier_ones() {
        let cli = Cli::try_parse_from(["kwtally", "-j", "2", "-k", "a", "-j", "5", "-k", "b", "x.log"])
            .unwrap();
        assert_eq!(cli.threads, Some(5));
        assert_eq!(cli.keyword_list(), vec!["b"]);
    }

    #[test]
    fn test_output_options() {
        let cli =
            Cli::try_parse_from(["kwtally", "-F", "json", "--color", "never", "-s", "-vv", "x.log"])
                .unwrap();
        let config = cli.to_config();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.color, ColorMode::Never);
        assert!(config.output.stats);
        assert_eq!(cli.verbose, 2);
    }
}
