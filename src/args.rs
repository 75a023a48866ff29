//! CLI argument processing module
//!
//! Merges config file defaults into the raw arguments, parses them, and
//! validates combinations clap cannot express.

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;
use crate::config_file::ConfigFile;

/// Upper bound on worker threads, guards against typos like `-j 10000`
const MAX_THREADS: usize = 1000;

/// Validate CLI arguments for early error detection
pub fn validate_cli_args(cli: &Cli) -> Result<()> {
    match cli.threads {
        Some(0) => return Err(anyhow::anyhow!("Thread count must be at least 1")),
        Some(n) if n > MAX_THREADS => {
            return Err(anyhow::anyhow!(
                "Thread count too high (max {})",
                MAX_THREADS
            ))
        }
        _ => {}
    }

    if cli.batch_size == 0 {
        return Err(anyhow::anyhow!("Batch size must be greater than 0"));
    }

    if cli.buffer_size == 0 {
        return Err(anyhow::anyhow!("Buffer size must be greater than 0"));
    }

    if cli.keywords.is_some() && cli.keyword_list().is_empty() {
        return Err(anyhow::anyhow!("--keywords needs at least one keyword"));
    }

    Ok(())
}

/// Extract --config-file argument from raw args
pub fn extract_config_file_arg(args: &[String]) -> Option<String> {
    args.iter().enumerate().find_map(|(i, arg)| {
        if arg == "--config-file" {
            args.get(i + 1).cloned()
        } else {
            arg.strip_prefix("--config-file=").map(str::to_string)
        }
    })
}

/// Apply config file defaults (unless `--ignore-config`) and parse.
///
/// Clap prints usage errors and `--help` itself and exits.
pub fn process_args_with_config(raw_args: &[String]) -> Result<Cli> {
    let args = resolve_args_with_config(raw_args)?;
    Ok(Cli::parse_from(args))
}

/// Raw arguments with config file defaults spliced in
pub fn resolve_args_with_config(raw_args: &[String]) -> Result<Vec<String>> {
    if raw_args.iter().any(|arg| arg == "--ignore-config") {
        return Ok(raw_args.to_vec());
    }

    let config_file_path = extract_config_file_arg(raw_args);
    let config = ConfigFile::load_with_custom_path(config_file_path.as_deref())?;
    config.apply_defaults(raw_args)
}
