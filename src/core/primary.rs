//! Primary media scanner
//!
//! Walks `{mount}/DCIM` depth first. Only the root and folders whose name
//! ends in `APPLE` (`100APPLE`, `101APPLE`, ...) are descended; any other
//! folder is reported and its whole subtree pruned. Every regular file in a
//! descended folder goes to `{destination}/{file name}`.

use crate::core::config::RunConfig;
use crate::core::error::{ExtractionError, Result};
use crate::core::transfer::{Transfer, TransferOp};
use log::{debug, info, trace, warn};
use std::ffi::OsStr;
use std::io;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Suffix the device gives its per-batch media folders
pub const DEVICE_FOLDER_SUFFIX: &str = "APPLE";

/// What the walker does with a directory it reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirDecision {
    Descend,
    Prune,
}

/// Counters for one primary scan
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PrimaryScanSummary {
    pub files_transferred: usize,
    pub directories_skipped: usize,
}

/// Whether a folder name follows the `NNNAPPLE` convention
pub fn is_device_folder(name: &OsStr) -> bool {
    name.to_string_lossy().ends_with(DEVICE_FOLDER_SUFFIX)
}

fn decide(entry: &DirEntry) -> DirDecision {
    if entry.depth() == 0 || is_device_folder(entry.file_name()) {
        DirDecision::Descend
    } else {
        DirDecision::Prune
    }
}

/// Transfer every file under the eligible `DCIM` folders.
///
/// Stops at the first traversal or transfer error.
pub fn scan_primary(config: &RunConfig, transfer: &mut dyn Transfer) -> Result<PrimaryScanSummary> {
    let root = config.dcim_root();
    let mut summary = PrimaryScanSummary::default();

    info!("Scanning {}", root.display());

    let mut walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(next) = walker.next() {
        let entry = next.map_err(|e| walk_error(e, &root))?;
        let file_type = entry.file_type();

        if file_type.is_dir() {
            match decide(&entry) {
                DirDecision::Descend => trace!("Descending into {}", entry.path().display()),
                DirDecision::Prune => {
                    warn!("Skipping: {}", entry.path().display());
                    summary.directories_skipped += 1;
                    walker.skip_current_dir();
                }
            }
            continue;
        }

        if !file_type.is_file() {
            debug!("Ignoring non-regular file {}", entry.path().display());
            continue;
        }

        let destination = config.destination.join(entry.file_name());
        transfer.transfer(&TransferOp::for_run(config, entry.path(), destination))?;
        summary.files_transferred += 1;
    }

    Ok(summary)
}

fn walk_error(err: walkdir::Error, root: &Path) -> ExtractionError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));
    ExtractionError::traversal(path, source)
}
