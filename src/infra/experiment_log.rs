// ============================================================
// Layer 6 — Experiment Log
// ============================================================
// Appends human-readable progress lines to
// results/logs/<title>.txt and mirrors each line to tracing.
//
// Two modes, matching how a run uses the file:
//   start()  → truncate, then write (a fresh run)
//   append() → add to the end       (every later message)
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

pub struct ExperimentLog {
    path: PathBuf,
}

impl ExperimentLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Truncate the log and write the first line.
    pub fn start(&self, message: &str) -> Result<()> {
        self.write(message, false)
    }

    /// Append one line.
    pub fn append(&self, message: &str) -> Result<()> {
        self.write(message, true)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, message: &str, append: bool) -> Result<()> {
        tracing::info!("{}", message);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create log directory '{}'", parent.display()))?;
        }

        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&self.path)
            .with_context(|| format!("Cannot open log file '{}'", self.path.display()))?;

        writeln!(f, "{message}")
            .with_context(|| format!("Cannot write to log file '{}'", self.path.display()))?;
        Ok(())
    }
}
