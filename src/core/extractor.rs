//! Run orchestration
//!
//! A run validates its inputs, makes sure the destination reads as a
//! directory, then scans the primary media tree followed by the mutations
//! tree. The first error from either phase ends the run; files transferred
//! before it stay where they are.

use crate::core::config::RunConfig;
use crate::core::error::{ExtractionError, Result};
use crate::core::mutations::scan_mutations;
use crate::core::primary::scan_primary;
use crate::core::transfer::{DryRunTransfer, FsTransfer, Transfer};
use log::info;
use std::fs;
use std::io;

/// Statistics about one run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractionStats {
    pub files_transferred: usize,
    pub renders_transferred: usize,
    pub renders_versioned: usize,
    pub directories_skipped: usize,
    pub folders_without_render: usize,
}

impl ExtractionStats {
    pub fn total_transferred(&self) -> usize {
        self.files_transferred + self.renders_transferred
    }
}

impl std::fmt::Display for ExtractionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Files: {}, Edited renders: {} ({} renamed), Folders skipped: {}, Edits without render: {}",
            self.files_transferred,
            self.renders_transferred,
            self.renders_versioned,
            self.directories_skipped,
            self.folders_without_render
        )
    }
}

/// Run with the executor implied by `config.dry_run`.
///
/// Dry-run operations are printed to stdout.
pub fn run(config: &RunConfig) -> Result<ExtractionStats> {
    if config.dry_run {
        let mut transfer = DryRunTransfer::new(io::stdout());
        run_with(config, &mut transfer)
    } else {
        run_with(config, &mut FsTransfer)
    }
}

/// Run both scan phases through `transfer`.
pub fn run_with(config: &RunConfig, transfer: &mut dyn Transfer) -> Result<ExtractionStats> {
    let config = config.normalized()?;

    info!("Mount: {}", config.mount.display());
    info!("Target: {}", config.destination.display());
    if config.dry_run {
        info!("Dry run: no files will be copied or moved");
    } else {
        fs::create_dir_all(&config.destination)
            .map_err(|e| ExtractionError::io(&config.destination, e))?;
    }

    let primary = scan_primary(&config, transfer)?;
    info!(
        "Primary media: {} transferred, {} folders skipped",
        primary.files_transferred, primary.directories_skipped
    );

    let mutations = scan_mutations(&config, transfer)?;
    info!(
        "Edited media: {} renders transferred, {} renamed",
        mutations.renders_transferred, mutations.renders_versioned
    );

    Ok(ExtractionStats {
        files_transferred: primary.files_transferred,
        renders_transferred: mutations.renders_transferred,
        renders_versioned: mutations.renders_versioned,
        directories_skipped: primary.directories_skipped,
        folders_without_render: mutations.folders_without_render,
    })
}
