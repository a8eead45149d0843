// ============================================================
// Layer 6 — Experiment Layout
// ============================================================
// Every artefact of a run lives under <root>/results, keyed
// by the experiment title:
//
//   <root>/results/
//     logs/<title>.txt             ← progress log
//     models/<title>_model.mpk.gz  ← model weights
//     models/<title>_optim.mpk.gz  ← optimizer state
//     models/<title>.ckpt.json     ← epoch + fraction list
//     models/<title>.config.json   ← training configuration
//     fractions/<title>.json       ← fraction history

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

#[derive(Debug, Clone)]
pub struct ExperimentLayout {
    root:  PathBuf,
    title: String,
}

impl ExperimentLayout {
    pub fn new(root: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self { root: root.into(), title: title.into() }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn results_dir(&self) -> PathBuf {
        self.root.join("results")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.results_dir().join("logs")
    }

    pub fn models_dir(&self) -> PathBuf {
        self.results_dir().join("models")
    }

    pub fn fractions_dir(&self) -> PathBuf {
        self.results_dir().join("fractions")
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join(format!("{}.txt", self.title))
    }

    pub fn fractions_file(&self) -> PathBuf {
        self.fractions_dir().join(format!("{}.json", self.title))
    }

    /// Create logs/, models/ and fractions/ (like `mkdir -p`)
    pub fn create_dirs(&self) -> Result<()> {
        for dir in [self.logs_dir(), self.models_dir(), self.fractions_dir()] {
            create_dir(&dir)?;
        }
        Ok(())
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create directory '{}'", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_keyed_by_title() {
        let layout = ExperimentLayout::new("/tmp/run", "baseline");
        assert_eq!(layout.log_file(), PathBuf::from("/tmp/run/results/logs/baseline.txt"));
        assert_eq!(
            layout.fractions_file(),
            PathBuf::from("/tmp/run/results/fractions/baseline.json")
        );
        assert_eq!(layout.models_dir(), PathBuf::from("/tmp/run/results/models"));
    }

    #[test]
    fn test_create_dirs() {
        let tmp    = tempfile::tempdir().unwrap();
        let layout = ExperimentLayout::new(tmp.path(), "x");
        layout.create_dirs().unwrap();
        assert!(layout.logs_dir().is_dir());
        assert!(layout.models_dir().is_dir());
        assert!(layout.fractions_dir().is_dir());
    }
}
