use clap::ValueEnum;

use crate::counter::KeywordSet;
use crate::error::ConfigError;
use crate::parallel::ParallelConfig;

/// Keywords counted when none are given
pub const DEFAULT_KEYWORDS: [&str; 3] = ["INFO", "ERROR", "DEBUG"];

/// Main configuration struct for kwtally
#[derive(Debug, Clone)]
pub struct KwConfig {
    pub input: InputConfig,
    pub processing: ProcessingConfig,
    pub performance: PerformanceConfig,
    pub output: OutputConfig,
}

/// Input configuration
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// File to scan; `None` reads stdin
    pub file: Option<String>,
}

/// Processing configuration
#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub keywords: Vec<String>,
}

/// Performance configuration
#[derive(Debug, Clone)]
pub struct PerformanceConfig {
    pub threads: usize,
    pub batch_size: usize,
    pub buffer_size: usize,
}

/// Output configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color: ColorMode,
    pub stats: bool,
}

/// Output format enumeration
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Default,
    Json,
    Csv,
}

/// Color output mode
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Decide whether to emit ANSI colors on a stream. `NO_COLOR` wins even
    /// over `--color always`.
    pub fn use_colors(self, is_tty: bool, no_color: bool) -> bool {
        match self {
            ColorMode::Never => false,
            ColorMode::Always => !no_color,
            ColorMode::Auto => is_tty && !no_color,
        }
    }
}

impl Default for KwConfig {
    fn default() -> Self {
        let parallel = ParallelConfig::default();
        Self {
            input: InputConfig { file: None },
            processing: ProcessingConfig {
                keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            },
            performance: PerformanceConfig {
                threads: parallel.num_workers,
                batch_size: parallel.batch_size,
                buffer_size: parallel.buffer_size,
            },
            output: OutputConfig {
                format: OutputFormat::default(),
                color: ColorMode::default(),
                stats: false,
            },
        }
    }
}

impl KwConfig {
    pub fn keyword_set(&self) -> Result<KeywordSet, ConfigError> {
        KeywordSet::new(&self.processing.keywords)
    }

    pub fn parallel_config(&self) -> ParallelConfig {
        ParallelConfig {
            num_workers: self.performance.threads,
            batch_size: self.performance.batch_size,
            buffer_size: self.performance.buffer_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_counts_standard_levels() {
        let config = KwConfig::default();
        let keywords = config.keyword_set().unwrap();
        assert_eq!(
            keywords.iter().collect::<Vec<_>>(),
            vec!["INFO", "ERROR", "DEBUG"]
        );
        assert!(config.parallel_config().validate().is_ok());
        assert_eq!(config.output.format, OutputFormat::Default);
    }

    #[test]
    fn test_parallel_config_mirrors_performance_section() {
        let mut config = KwConfig::default();
        config.performance.threads = 3;
        config.performance.batch_size = 50;
        config.performance.buffer_size = 7;

        assert_eq!(
            config.parallel_config(),
            ParallelConfig {
                num_workers: 3,
                batch_size: 50,
                buffer_size: 7,
            }
        );
    }

    #[test]
    fn test_color_mode_resolution() {
        assert!(!ColorMode::Never.use_colors(true, false));
        assert!(ColorMode::Always.use_colors(false, false));
        assert!(!ColorMode::Always.use_colors(true, true));
        assert!(ColorMode::Auto.use_colors(true, false));
        assert!(!ColorMode::Auto.use_colors(false, false));
        assert!(!ColorMode::Auto.use_colors(true, true));
    }
}
