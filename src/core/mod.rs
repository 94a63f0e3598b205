//! Core functionality module
//!
//! This module contains the extraction engine: run configuration, error
//! handling, the transfer executor, and the two scanners that find what to
//! transfer.
//!
//! # Submodules
//!
//! - `config` - Run inputs and the TOML settings file
//! - `error` - Error types and result aliases
//! - `transfer` - No-clobber copy/move and dry-run reporting
//! - `primary` - Walk of the `DCIM` media tree
//! - `mutations` - Recovery of edited renders from the mutations tree
//! - `extractor` - Runs both scans in order and collects statistics

pub mod config;
pub mod error;
pub mod extractor;
pub mod mutations;
pub mod primary;
pub mod transfer;

#[cfg(test)]
pub(crate) mod fixtures;
