//! Error types for the DCIM extractor
//!
//! Every variant is fatal: scans stop at the first error and the run
//! reports it to the user. A missing render file is not an error, the
//! mutation matcher expresses it as `Ok(None)`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the DCIM extractor
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Required run inputs are missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The directory walk could not read an entry
    #[error("Traversal failed for {path:?}")]
    Traversal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A copy or move failed, including the no-clobber guard tripping
    #[error("Transfer failed: {operation} --no-clobber {} {}: {message}", .source_path.display(), .destination.display())]
    TransferFailed {
        operation: &'static str,
        source_path: PathBuf,
        destination: PathBuf,
        kind: io::ErrorKind,
        message: String,
    },

    /// Filesystem error outside of the walk (name checks, creating the destination)
    #[error("IO error for {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExtractionError {
    /// Wrap an I/O error with the path it concerns
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExtractionError::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a traversal error with the path being read
    pub fn traversal(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExtractionError::Traversal {
            path: path.into(),
            source,
        }
    }

    /// True when the failure came from the destination already existing
    pub fn is_clobber_refusal(&self) -> bool {
        matches!(
            self,
            ExtractionError::TransferFailed {
                kind: io::ErrorKind::AlreadyExists,
                ..
            }
        )
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ExtractionError>;
