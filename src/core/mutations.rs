//! Edited asset recovery
//!
//! The device keeps edits beside the originals under
//! `PhotoData/Mutations/DCIM/<NNNAPPLE>/<asset>/Adjustments/`. When an edit
//! has been baked, the folder holds `FullSizeRender.jpg` (photos) or
//! `FullSizeRender.mov` (videos). Each render is copied out as
//! `<asset>.JPG` / `<asset>.MOV`, with `-v1`, `-v2`, ... appended when the
//! name is already taken in the destination.
//!
//! Collisions are decided on names only. Two different edits that land on
//! the same name are both kept under different versions.

use crate::core::config::RunConfig;
use crate::core::error::{ExtractionError, Result};
use crate::core::primary::is_device_folder;
use crate::core::transfer::{file_exists, Transfer, TransferOp};
use log::{debug, info, trace};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

/// Folder inside an asset folder that holds the renders
const ADJUSTMENTS_DIR: &str = "Adjustments";

/// Base name of a baked render
const RENDER_STEM: &str = "FullSizeRender";

/// Kind of render an asset folder can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    Photo,
    Video,
}

impl RenderKind {
    /// Order in which renders are looked for; the first hit wins.
    pub const PRIORITY: [RenderKind; 2] = [RenderKind::Photo, RenderKind::Video];

    /// Extension of the render file on the device
    pub fn extension(&self) -> &'static str {
        match self {
            RenderKind::Photo => "jpg",
            RenderKind::Video => "mov",
        }
    }

    /// Where this kind of render lives inside an asset folder
    pub fn render_path(&self, asset_folder: &Path) -> PathBuf {
        asset_folder
            .join(ADJUSTMENTS_DIR)
            .join(format!("{}.{}", RENDER_STEM, self.extension()))
    }
}

/// A render paired with the free destination name picked for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCandidate {
    pub kind: RenderKind,
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Version suffix used, if the plain name was taken
    pub version: Option<u32>,
}

/// Counters for one mutation scan
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MutationScanSummary {
    pub renders_transferred: usize,
    pub renders_versioned: usize,
    pub folders_without_render: usize,
}

/// `<asset>.<EXT>` or `<asset>-v<n>.<EXT>`, keeping the asset name's bytes
fn destination_name(asset: &OsStr, ext: &str, version: Option<u32>) -> OsString {
    let mut name = asset.to_os_string();
    if let Some(n) = version {
        name.push(format!("-v{}", n));
    }
    name.push(".");
    name.push(ext);
    name
}

/// Look for a `kind` render in `asset_folder` and pick a destination for it.
///
/// Returns `Ok(None)` when there is no such render, counting a render
/// symlink whose target is gone as no render. Each candidate name is checked
/// against `names` and the search stops at the first free one. The answer is
/// only good until something else writes that name.
pub fn resolve(
    asset_folder: &Path,
    kind: RenderKind,
    destination: &Path,
    names: &dyn Transfer,
) -> Result<Option<RenderedCandidate>> {
    let Some(asset) = asset_folder.file_name() else {
        return Ok(None);
    };

    let source = kind.render_path(asset_folder);
    if !file_exists(&source)? {
        return Ok(None);
    }

    let ext = kind.extension().to_uppercase();

    let mut version = None;
    let mut target = destination.join(destination_name(asset, &ext, version));
    while names.is_occupied(&target)? {
        let next = version.map_or(1, |n| n + 1);
        trace!("{} is taken, trying -v{}", target.display(), next);
        version = Some(next);
        target = destination.join(destination_name(asset, &ext, version));
    }

    Ok(Some(RenderedCandidate {
        kind,
        source,
        destination: target,
        version,
    }))
}

/// Try each render kind in priority order and return the first match.
pub fn match_asset(
    asset_folder: &Path,
    destination: &Path,
    names: &dyn Transfer,
) -> Result<Option<RenderedCandidate>> {
    for kind in RenderKind::PRIORITY {
        if let Some(candidate) = resolve(asset_folder, kind, destination, names)? {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// Immediate subdirectories of `dir`, sorted by name
fn list_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| ExtractionError::traversal(dir, e))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ExtractionError::traversal(dir, e))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| ExtractionError::traversal(&path, e))?;
        if file_type.is_dir() {
            dirs.push(path);
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// Recover the renders of every asset folder under the mutations tree.
///
/// Asset folders without a render are skipped. Listing failures and
/// transfer failures stop the scan.
pub fn scan_mutations(config: &RunConfig, transfer: &mut dyn Transfer) -> Result<MutationScanSummary> {
    let root = config.mutations_root();
    let mut summary = MutationScanSummary::default();

    info!("Scanning {}", root.display());

    for device_folder in list_subdirs(&root)? {
        if !device_folder.file_name().is_some_and(is_device_folder) {
            trace!("Ignoring {}", device_folder.display());
            continue;
        }

        for asset_folder in list_subdirs(&device_folder)? {
            let Some(candidate) = match_asset(&asset_folder, &config.destination, &*transfer)? else {
                debug!("No render in {}", asset_folder.display());
                summary.folders_without_render += 1;
                continue;
            };

            if let Some(version) = candidate.version {
                debug!(
                    "{} collides, saving as version {}",
                    asset_folder.display(),
                    version
                );
                summary.renders_versioned += 1;
            }

            transfer.transfer(&TransferOp::for_run(
                config,
                candidate.source,
                candidate.destination,
            ))?;
            summary.renders_transferred += 1;
        }
    }

    Ok(summary)
}
