//! Command-line argument definitions
//!
//! This module defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Copy or move photos and videos, including edited renders, off a mounted iOS device
#[derive(Parser, Debug)]
#[command(name = "dcim-extract")]
#[command(version)]
#[command(about = "Extract photos and videos (with their edits) from a mounted iPhone/iPad volume", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Location of the iOS device mount (overrides config)
    #[arg(short, long, global = true)]
    pub mount: Option<PathBuf>,

    /// Target directory to put photos and videos in (overrides config)
    #[arg(short, long, global = true)]
    pub target: Option<PathBuf>,

    /// Delete original files (move instead of copy)
    #[arg(short, long, global = true)]
    pub delete: bool,

    /// Show operations but don't perform them
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Copy (or move) media and edited renders to the target (default)
    Extract,

    /// Show the effective configuration
    ShowConfig,

    /// Write a commented configuration file
    GenerateConfig {
        /// Output path for the config file (defaults to standard location)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print where the configuration file is read from
    ConfigPath,
}
