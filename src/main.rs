use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver};
use std::io::IsTerminal;

use kwtally::colors::ColorScheme;
use kwtally::formatters::format_report;
use kwtally::platform::{Ctrl, ExitCode, SafeStdout, SignalHandler};
use kwtally::{KeywordProcessor, KwConfig, LineSource};

mod args;
mod cli;
mod config_file;
mod logging;

use config_file::ConfigFile;

fn main() {
    let raw_args: Vec<String> = std::env::args().collect();

    // Process command line arguments with config file support
    let cli = match args::process_args_with_config(&raw_args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("kwtally: Error: {:#}", e);
            ExitCode::InvalidUsage.exit();
        }
    };

    logging::init_logging(cli.verbose);

    if cli.show_config {
        print!("{}", ConfigFile::describe_config(cli.config_file.as_deref()));
        ExitCode::Success.exit();
    }

    // Validate CLI argument combinations
    if let Err(e) = args::validate_cli_args(&cli) {
        eprintln!("kwtally: Error: {}", e);
        ExitCode::InvalidUsage.exit();
    }

    // Broadcast channel for shutdown requests from the signal handler
    let (ctrl_tx, ctrl_rx) = unbounded::<Ctrl>();
    let _signal_handler = match SignalHandler::new(ctrl_tx) {
        Ok(handler) => handler,
        Err(e) => {
            eprintln!("kwtally: Failed to initialize signal handling: {}", e);
            ExitCode::GeneralError.exit();
        }
    };

    let config = cli.to_config();
    match run(&config, &ctrl_rx) {
        Ok(code) => code.exit(),
        Err(e) => {
            eprintln!("kwtally: Error: {:#}", e);
            ExitCode::GeneralError.exit();
        }
    }
}

/// Scan the configured input and print the report
fn run(config: &KwConfig, ctrl_rx: &Receiver<Ctrl>) -> Result<ExitCode> {
    let keywords = config.keyword_set()?;
    let processor = KeywordProcessor::new(config.parallel_config(), keywords)?;

    let source = match &config.input.file {
        Some(path) => LineSource::open(path)?,
        None => {
            if std::io::stdin().is_terminal() {
                anyhow::bail!("no input file or stdin provided (use '-h' for help)");
            }
            LineSource::stdin()?
        }
    };

    let report = processor.process_with_ctrl(source, ctrl_rx)?;

    let no_color = std::env::var_os("NO_COLOR").is_some();
    let use_colors = config
        .output
        .color
        .use_colors(std::io::stdout().is_terminal(), no_color);
    let mut stdout = SafeStdout::new();
    stdout.write_all(&format_report(
        &report.counts,
        config.output.format,
        use_colors,
    ))?;

    if config.output.stats {
        eprintln!("{}", report.stats.format_stats());
    }

    if report.interrupted {
        let colors = ColorScheme::new(
            config
                .output
                .color
                .use_colors(std::io::stderr().is_terminal(), no_color),
        );
        eprintln!(
            "{}kwtally: scan interrupted, counts cover the first {} lines only{}",
            colors.notice, report.stats.lines_read, colors.reset
        );
        return Ok(ExitCode::for_interrupted_run());
    }

    Ok(ExitCode::Success)
}
