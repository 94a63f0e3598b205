//! DCIM Extractor - CLI Entry Point
//!
//! Copies or moves the photos and videos from a mounted iOS device volume
//! into a target folder, then recovers the edited renders the device keeps
//! beside them.
//!
//! This binary is a thin wrapper around the library, handling argument parsing,
//! logging setup, and command dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use dcim_extractor::cli::{self, Args, DualWriter};
use dcim_extractor::core::config::Config;
use env_logger::Builder;
use log::{debug, LevelFilter};
use std::fs::OpenOptions;
use std::io::Write;

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = if let Some(ref config_path) = args.config {
        Config::load(config_path)
            .with_context(|| format!("loading {}", config_path.display()))?
    } else {
        Config::load_default().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config file: {}", e);
            Config::default()
        })
    };

    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }

    init_logging(&config, args.log_level.is_some())?;

    debug!("{} v{}", dcim_extractor::NAME, dcim_extractor::VERSION);

    cli::run_command(&args, &config)
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn init_logging(config: &Config, level_forced: bool) -> Result<()> {
    if config.logging.log_to_file {
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.logging.log_file)
            .with_context(|| {
                format!(
                    "failed to open log file {}",
                    config.logging.log_file.display()
                )
            })?;

        Builder::new()
            .filter_level(parse_level(&config.logging.level))
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{} {} {}] {}",
                    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                    record.level(),
                    record.target(),
                    record.args()
                )
            })
            .target(env_logger::Target::Pipe(Box::new(DualWriter {
                console: std::io::stderr(),
                file: log_file,
            })))
            .init();

        debug!("Logging to file: {}", config.logging.log_file.display());
    } else if level_forced {
        Builder::new()
            .filter_level(parse_level(&config.logging.level))
            .init();
    } else {
        Builder::from_env(env_logger::Env::default().default_filter_or(&config.logging.level))
            .init();
    }

    Ok(())
}
