//! Transfer executor
//!
//! Moves or copies a single file into the destination folder without ever
//! replacing an existing file. The [`Transfer`] trait is the seam the
//! scanners talk to; [`FsTransfer`] does the real work and
//! [`DryRunTransfer`] only reports what would happen.

use crate::core::config::RunConfig;
use crate::core::error::{ExtractionError, Result};
use log::{debug, warn};
use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Whether the original file survives the transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Copy,
    Move,
}

impl TransferMode {
    pub fn from_delete(delete: bool) -> Self {
        if delete {
            TransferMode::Move
        } else {
            TransferMode::Copy
        }
    }

    /// Shell command keyword used when reporting the operation
    pub fn command(&self) -> &'static str {
        match self {
            TransferMode::Copy => "cp",
            TransferMode::Move => "mv",
        }
    }
}

/// One requested file transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOp {
    pub mode: TransferMode,
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl TransferOp {
    pub fn new(mode: TransferMode, source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Build an operation using the run's delete setting
    pub fn for_run(config: &RunConfig, source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self::new(TransferMode::from_delete(config.delete), source, destination)
    }
}

impl fmt::Display for TransferOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} --no-clobber {} {}",
            self.mode.command(),
            self.source.display(),
            self.destination.display()
        )
    }
}

/// Something that can carry out transfers and answer whether a
/// destination name is taken.
pub trait Transfer {
    /// Perform (or report) `op`. Never overwrites an existing destination.
    fn transfer(&mut self, op: &TransferOp) -> Result<()>;

    /// Whether `path` is already taken from this executor's point of view.
    fn is_occupied(&self, path: &Path) -> Result<bool> {
        path_exists(path)
    }
}

/// Existence check that treats "not found" as `false` and surfaces every
/// other error.
pub fn path_exists(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(ExtractionError::io(path, e)),
    }
}

/// Existence check for a file that is about to be read.
///
/// Symlinks are followed, so a link whose target is gone counts as absent.
/// "Not found" is `false` and every other error is surfaced.
pub fn file_exists(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(metadata.is_file()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(ExtractionError::io(path, e)),
    }
}

/// Performs transfers on the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsTransfer;

impl Transfer for FsTransfer {
    fn transfer(&mut self, op: &TransferOp) -> Result<()> {
        let outcome = match op.mode {
            TransferMode::Copy => copy_no_clobber(&op.source, &op.destination),
            TransferMode::Move => move_no_clobber(&op.source, &op.destination),
        };

        match outcome {
            Ok(bytes) => {
                debug!("{} ({} bytes)", op, bytes);
                Ok(())
            }
            Err(e) => Err(ExtractionError::TransferFailed {
                operation: op.mode.command(),
                source_path: op.source.clone(),
                destination: op.destination.clone(),
                kind: e.kind(),
                message: describe_io_error(&op.destination, &e),
            }),
        }
    }
}

fn describe_io_error(destination: &Path, err: &io::Error) -> String {
    if err.kind() == io::ErrorKind::AlreadyExists {
        format!("{} already exists ({})", destination.display(), err)
    } else {
        err.to_string()
    }
}

/// Copy `source` to a brand new file at `destination`.
///
/// Fails with `AlreadyExists` if anything is at `destination`. A partial
/// destination file is removed when the copy fails midway.
fn copy_no_clobber(source: &Path, destination: &Path) -> io::Result<u64> {
    let mut reader = File::open(source)?;
    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)?;

    match io::copy(&mut reader, &mut writer).and_then(|bytes| writer.sync_all().map(|_| bytes)) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            drop(writer);
            let _ = fs::remove_file(destination);
            Err(e)
        }
    }
}

/// Move `source` to `destination` without replacing an existing file.
///
/// A hard link publishes the destination atomically and fails if the name
/// is taken. Across filesystems the link fails for other reasons, and the
/// move falls back to a no-clobber copy followed by unlinking the source.
fn move_no_clobber(source: &Path, destination: &Path) -> io::Result<u64> {
    let bytes = fs::metadata(source)?.len();

    match fs::hard_link(source, destination) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Err(e),
        Err(e) => {
            debug!(
                "hard link {} -> {} failed ({}), copying instead",
                source.display(),
                destination.display(),
                e
            );
            copy_no_clobber(source, destination)?;
            if let Err(e) = copy_modified_time(source, destination) {
                let _ = fs::remove_file(destination);
                return Err(e);
            }
        }
    }

    fs::remove_file(source)?;
    Ok(bytes)
}

/// Give `destination` the modification time of `source`, as a rename would.
fn copy_modified_time(source: &Path, destination: &Path) -> io::Result<()> {
    let modified = fs::metadata(source)?.modified()?;
    OpenOptions::new()
        .write(true)
        .open(destination)?
        .set_modified(modified)
}

/// Reports operations instead of running them.
///
/// Each operation is written to `out` in `cp`/`mv` command form and kept in
/// an ordered plan. Planned destinations count as occupied so version
/// suffixes match those of a live run.
pub struct DryRunTransfer<W: Write> {
    out: W,
    planned: Vec<TransferOp>,
    reserved: HashSet<PathBuf>,
}

impl<W: Write> DryRunTransfer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            planned: Vec::new(),
            reserved: HashSet::new(),
        }
    }

    /// Operations reported so far, in order
    pub fn planned(&self) -> &[TransferOp] {
        &self.planned
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Transfer for DryRunTransfer<W> {
    fn transfer(&mut self, op: &TransferOp) -> Result<()> {
        if self.is_occupied(&op.destination)? {
            warn!("{} would fail: destination exists", op);
        }

        writeln!(self.out, "{}", op).map_err(|e| ExtractionError::io(&op.destination, e))?;

        self.reserved.insert(op.destination.clone());
        self.planned.push(op.clone());
        Ok(())
    }

    fn is_occupied(&self, path: &Path) -> Result<bool> {
        if self.reserved.contains(path) {
            return Ok(true);
        }
        path_exists(path)
    }
}
