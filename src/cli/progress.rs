//! Progress display and console output for the CLI
//!
//! Key features:
//! - A spinner that counts transfers while a live run is in progress
//! - The spinner is cleared while each transfer runs; log records written
//!   from the scanners between transfers can share a line with it
//! - A dual writer so log records can go to stderr and a file

use crate::core::error::Result;
use crate::core::transfer::{Transfer, TransferOp};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

// ============================================================================
// Styles
// ============================================================================

/// Get the spinner style for transfer operations
fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⣾⣽⣻⢿⡿⣟⣯⣷")
}

// ============================================================================
// Console output helpers
// ============================================================================

/// Print a header section with a box
pub fn print_header(title: &str) {
    let width = 68;
    let title_padded = format!("{:^width$}", title, width = width - 2);
    println!();
    println!("╔{}╗", "═".repeat(width - 2));
    println!("║{}║", title_padded);
    println!("╚{}╝", "═".repeat(width - 2));
    println!();
}

/// Print a success message with checkmark
pub fn print_success(msg: &str) {
    println!("  ✓ {}", msg);
}

/// Print an info message with bullet
pub fn print_info(msg: &str) {
    println!("  • {}", msg);
}

// ============================================================================
// Transfer progress
// ============================================================================

/// Wraps a live executor and ticks a spinner for every finished transfer
pub struct TransferProgress<T: Transfer> {
    inner: T,
    spinner: ProgressBar,
    start_time: Instant,
    transferred: usize,
}

impl<T: Transfer> TransferProgress<T> {
    pub fn new(inner: T) -> Self {
        Self::with_spinner(inner, ProgressBar::new_spinner())
    }

    /// Wrap `inner` with a spinner that draws nowhere
    pub fn hidden(inner: T) -> Self {
        Self::with_spinner(inner, ProgressBar::hidden())
    }

    fn with_spinner(inner: T, spinner: ProgressBar) -> Self {
        spinner.set_style(spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message("Starting...");

        Self {
            inner,
            spinner,
            start_time: Instant::now(),
            transferred: 0,
        }
    }

    pub fn transferred(&self) -> usize {
        self.transferred
    }

    /// Stop the spinner and leave a final line
    pub fn finish(&self) {
        self.spinner.finish_with_message(format!(
            "✓ {} files transferred in {}",
            self.transferred,
            format_duration(self.start_time.elapsed())
        ));
    }

    /// Stop the spinner without a final line
    pub fn abandon(&self) {
        self.spinner.finish_and_clear();
    }
}

impl<T: Transfer> Transfer for TransferProgress<T> {
    fn transfer(&mut self, op: &TransferOp) -> Result<()> {
        let name = op
            .destination
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.spinner.set_message(format!(
            "{} files transferred, current: {}",
            self.transferred, name
        ));

        let outcome = self.spinner.suspend(|| self.inner.transfer(op));
        if outcome.is_ok() {
            self.transferred += 1;
        }
        outcome
    }

    fn is_occupied(&self, path: &Path) -> Result<bool> {
        self.inner.is_occupied(path)
    }
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, mins)
    } else if secs >= 60 {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

// ============================================================================
// Dual writer for file + console logging
// ============================================================================

/// A writer that writes to both console and file
///
/// Used for logging to both stderr and a log file simultaneously.
pub struct DualWriter {
    pub console: std::io::Stderr,
    pub file: std::fs::File,
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let _ = self.console.write(buf);
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let _ = self.console.flush();
        self.file.flush()
    }
}

// ============================================================================
// Tests
// ============================================================================
