//! DCIM Extractor Library
//!
//! Copies or moves photos and videos off a mounted iOS device volume and
//! recovers the edited versions the device keeps in a separate tree.
//!
//! # Architecture
//!
//! - [`core`] - Run configuration, error handling, the transfer executor,
//!   and the two scanners
//! - [`cli`] - Command-line interface (only used by the binary)
//!
//! A run has two phases:
//!
//! 1. Every file in `{mount}/DCIM/*APPLE/` is transferred under its own name.
//!    Other folders under `DCIM` are reported and skipped.
//! 2. For every asset folder under `{mount}/PhotoData/Mutations/DCIM/*APPLE/`,
//!    `Adjustments/FullSizeRender.jpg` (or `.mov`) is transferred as
//!    `<asset>.JPG` (or `.MOV`), with a `-v<n>` suffix when the name is taken.
//!
//! Transfers never overwrite an existing file; a clash stops the run.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use dcim_extractor::core::config::RunConfig;
//! use dcim_extractor::core::extractor;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = RunConfig::new("/mnt/iphone", "/home/me/Pictures/phone")
//!         .with_dry_run(true);
//!
//!     let stats = extractor::run(&config)?;
//!     println!("{}", stats);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
