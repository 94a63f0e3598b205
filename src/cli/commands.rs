//! Command handler implementations
//!
//! This module contains the implementation of all CLI commands.

use crate::cli::progress::{print_header, print_info, print_success, TransferProgress};
use crate::cli::{Args, Commands};
use crate::core::config::{get_config_path, Config, RunConfig};
use crate::core::extractor::{self, ExtractionStats};
use crate::core::transfer::FsTransfer;
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

/// Run the appropriate command based on CLI arguments
pub fn run_command(args: &Args, config: &Config) -> Result<()> {
    match &args.command {
        None | Some(Commands::Extract) => {
            let run_config = build_run_config(args, config);
            let stats = extract(&run_config)?;
            info!("{}", stats);
        }
        Some(Commands::ShowConfig) => {
            show_config(args, config);
        }
        Some(Commands::GenerateConfig { output }) => {
            generate_config_file(output.clone())?;
        }
        Some(Commands::ConfigPath) => {
            println!("{}", Config::get_active_config_path().display());
        }
    }

    Ok(())
}

/// Merge command-line flags over the settings file
pub fn build_run_config(args: &Args, config: &Config) -> RunConfig {
    config.to_run_config(
        args.mount.clone(),
        args.target.clone(),
        args.delete,
        args.dry_run,
    )
}

/// Run an extraction, drawing a spinner for live runs
pub fn extract(run_config: &RunConfig) -> Result<ExtractionStats> {
    if run_config.dry_run {
        return extractor::run(run_config).context("dry run failed");
    }

    let mut progress = TransferProgress::new(FsTransfer);
    match extractor::run_with(run_config, &mut progress) {
        Ok(stats) => {
            progress.finish();
            Ok(stats)
        }
        Err(e) => {
            progress.abandon();
            Err(e).with_context(|| {
                format!(
                    "extraction stopped after {} transfers",
                    progress.transferred()
                )
            })
        }
    }
}

/// Write the example config to `output` or the standard location
pub fn generate_config_file(output: Option<PathBuf>) -> Result<()> {
    let path = match output {
        Some(path) => path,
        None => get_config_path().context("could not determine configuration directory")?,
    };

    Config::write_default_config(&path)?;
    print_success(&format!("Configuration written to {}", path.display()));
    Ok(())
}

/// Print the settings that a run with these arguments would use
pub fn show_config(args: &Args, config: &Config) {
    let run_config = build_run_config(args, config);

    print_header("DCIM Extractor Configuration");
    print_info(&format!(
        "Config file: {}",
        Config::get_active_config_path().display()
    ));
    print_info(&format!("Mount: {}", display_or_unset(&run_config.mount)));
    print_info(&format!("Target: {}", run_config.destination.display()));
    print_info(&format!(
        "Mode: {}",
        if run_config.delete { "move" } else { "copy" }
    ));
    print_info(&format!("Dry run: {}", run_config.dry_run));
    print_info(&format!("Log level: {}", config.logging.level));
    if config.logging.log_to_file {
        print_info(&format!("Log file: {}", config.logging.log_file.display()));
    }
}

fn display_or_unset(path: &std::path::Path) -> String {
    if path.as_os_str().is_empty() {
        "(not set)".to_string()
    } else {
        path.display().to_string()
    }
}
