//! semlens CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use semlens_cli::logging::{LogConfig, LogFormat, init_logging};
use semlens_ingest::IngestError;
use semlens_project::ProjectError;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    run_add, run_init, run_join, run_lineage, run_profile, run_schemas, run_view,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let outcome = match &cli.command {
        Command::Schemas => run_schemas(),
        Command::Profile(args) => run_profile(args),
        Command::Init(args) => run_init(args),
        Command::Add(args) => run_add(args),
        Command::View(args) => run_view(args),
        Command::Join(args) => run_join(args),
        Command::Lineage(args) => run_lineage(args),
    };
    let exit_code = match outcome {
        Ok(()) => 0,
        Err(error) => {
            report_error(&error);
            1
        }
    };
    std::process::exit(exit_code);
}

fn report_error(error: &anyhow::Error) {
    if let Some(project_error) = error.downcast_ref::<ProjectError>() {
        eprintln!("error: {}", project_error.user_message());
        if let Some(suggestion) = project_error.suggestion() {
            eprintln!("hint: {suggestion}");
        }
    } else if let Some(ingest_error) = error.chain().find_map(|e| e.downcast_ref::<IngestError>()) {
        eprintln!("error: {error}: {ingest_error}");
    } else {
        eprintln!("error: {error:#}");
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
