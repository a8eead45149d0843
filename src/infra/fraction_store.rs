// ============================================================
// Layer 6 — Fraction History Store
// ============================================================
// Persists the fraction-of-class-A history so a run that is
// stopped early still leaves its curve on disk.
//
// Shape: history[epoch][eval_set] = fraction in [0, 1]
//
// The whole file is rewritten after every epoch. JSON keeps it
// readable from any plotting tool:
//   [[0.52, 0.08], [0.61, 0.11], ...]

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Per-epoch list of per-evaluation-set fractions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FractionHistory(Vec<Vec<f64>>);

impl FractionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_epoch(&mut self, fractions: Vec<f64>) {
        self.0.push(fractions);
    }

    pub fn epochs(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.0
    }

    /// Errors if any recorded epoch has a different number of sets
    pub fn check_width(&self, num_sets: usize) -> Result<()> {
        if let Some((epoch, row)) = self.0.iter().enumerate().find(|(_, r)| r.len() != num_sets) {
            bail!(
                "fraction history epoch {} has {} evaluation sets, expected {}",
                epoch + 1,
                row.len(),
                num_sets
            );
        }
        Ok(())
    }
}

impl From<Vec<Vec<f64>>> for FractionHistory {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        Self(rows)
    }
}

pub struct FractionStore {
    path: PathBuf,
}

impl FractionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn save(&self, history: &FractionHistory) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create fractions directory '{}'", parent.display()))?;
        }
        let json = serde_json::to_string(history)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Cannot write fractions to '{}'", self.path.display()))?;
        tracing::debug!("Saved {} epochs of fractions", history.epochs());
        Ok(())
    }

    pub fn load(&self) -> Result<FractionHistory> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read fractions from '{}'", self.path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Empty history when nothing has been saved yet
    pub fn load_or_default(&self) -> Result<FractionHistory> {
        if self.path.exists() { self.load() } else { Ok(FractionHistory::new()) }
    }
}
