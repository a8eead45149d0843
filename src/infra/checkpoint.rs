// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores a training run using Burn's named
// MessagePack recorder (gzipped, full precision).
//
// What gets saved after every epoch (each overwrites the last):
//   1. <title>_model.mpk.gz  — model parameters
//   2. <title>_optim.mpk.gz  — optimizer state (Adam moments)
//   3. <title>.ckpt.json     — epoch number + fraction list
//
// And once before training:
//   4. <title>.config.json   — the TrainConfig, so evaluation can
//                              rebuild the same architecture
//
// Full precision matters for resume: Adam's second moments are
// tiny and do not survive a round trip through f16. Loading
// fails if the architecture does not match the saved record.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use burn::{
    module::AutodiffModule,
    optim::Optimizer,
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::infra::fraction_store::FractionHistory;
use crate::infra::layout::ExperimentLayout;

type CheckpointRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

/// Extension the recorder appends to every record path
const RECORD_EXT: &str = "mpk.gz";

/// The non-tensor part of a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointMeta {
    pub epoch: usize,
    pub current_fraction_list: FractionHistory,
}

pub struct CheckpointManager {
    dir:   PathBuf,
    title: String,
}

impl CheckpointManager {
    pub fn new(layout: &ExperimentLayout) -> Self {
        Self { dir: layout.models_dir(), title: layout.title().to_string() }
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create models directory '{}'", self.dir.display()))
    }

    // Record paths without extension; the recorder adds .mpk.gz
    fn model_path(&self) -> PathBuf {
        self.dir.join(format!("{}_model", self.title))
    }

    fn optim_path(&self) -> PathBuf {
        self.dir.join(format!("{}_optim", self.title))
    }

    fn staging_path(&self, part: &str) -> PathBuf {
        self.dir.join(format!("{}_{part}_partial", self.title))
    }

    fn meta_path(&self) -> PathBuf {
        self.dir.join(format!("{}.ckpt.json", self.title))
    }

    fn config_path(&self) -> PathBuf {
        self.dir.join(format!("{}.config.json", self.title))
    }

    /// True once at least one epoch has been checkpointed
    pub fn exists(&self) -> bool {
        self.meta_path().exists()
    }

    /// Save model, optimizer and metadata for `epoch`.
    pub fn save<B, M, O>(
        &self,
        model:     &M,
        optim:     &O,
        epoch:     usize,
        fractions: &FractionHistory,
    ) -> Result<()>
    where
        B: AutodiffBackend,
        M: AutodiffModule<B>,
        O: Optimizer<M, B>,
    {
        self.ensure_dir()?;
        let recorder = CheckpointRecorder::new();

        // Stage all three files, then rename them over the previous
        // checkpoint. A failure while serialising leaves it intact.
        let model_stage = self.staging_path("model");
        Recorder::<B>::record(&recorder, model.clone().into_record(), model_stage.clone())
            .with_context(|| format!("Failed to save model to '{}'", model_stage.display()))?;

        let optim_stage = self.staging_path("optim");
        Recorder::<B>::record(&recorder, optim.to_record(), optim_stage.clone())
            .with_context(|| format!("Failed to save optimizer to '{}'", optim_stage.display()))?;

        let meta = CheckpointMeta { epoch, current_fraction_list: fractions.clone() };
        let meta_stage = self.staging_path("ckpt").with_extension("json");
        fs::write(&meta_stage, serde_json::to_string_pretty(&meta)?)
            .with_context(|| format!("Failed to write '{}'", meta_stage.display()))?;

        promote(&model_stage.with_extension(RECORD_EXT), &self.model_path().with_extension(RECORD_EXT))?;
        promote(&optim_stage.with_extension(RECORD_EXT), &self.optim_path().with_extension(RECORD_EXT))?;
        promote(&meta_stage, &self.meta_path())?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    pub fn load_meta(&self) -> Result<CheckpointMeta> {
        let path = self.meta_path();
        let json = fs::read_to_string(&path).with_context(|| {
            format!("Cannot read '{}'. Have you trained this experiment yet?", path.display())
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load saved weights into `model`, which must have the saved architecture.
    pub fn load_model<B: Backend, M: Module<B>>(&self, model: M, device: &B::Device) -> Result<M> {
        let path = self.model_path();
        let record = Recorder::<B>::load(&CheckpointRecorder::new(), path.clone(), device)
            .with_context(|| format!("Cannot load model checkpoint '{}'", path.display()))?;
        Ok(model.load_record(record))
    }

    /// Restore optimizer state saved alongside the model.
    pub fn load_optimizer<B, M, O>(&self, optim: O, device: &B::Device) -> Result<O>
    where
        B: AutodiffBackend,
        M: AutodiffModule<B>,
        O: Optimizer<M, B>,
    {
        let path = self.optim_path();
        let record = Recorder::<B>::load(&CheckpointRecorder::new(), path.clone(), device)
            .with_context(|| format!("Cannot load optimizer checkpoint '{}'", path.display()))?;
        Ok(optim.load_record(record))
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.ensure_dir()?;
        let path = self.config_path();
        fs::write(&path, serde_json::to_string_pretty(cfg)?)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.config_path();
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. Make sure you have run 'train' first.",
                path.display()
            )
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

fn promote(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to)
        .with_context(|| format!("Cannot move '{}' to '{}'", from.display(), to.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::{
        backend::{Autodiff, NdArray},
        nn::{Linear, LinearConfig},
        optim::{AdamConfig, GradientsParams},
    };

    type TestBackend = Autodiff<NdArray>;

    fn linear() -> Linear<TestBackend> {
        LinearConfig::new(2, 1).init(&Default::default())
    }

    fn adam() -> impl Optimizer<Linear<TestBackend>, TestBackend> {
        AdamConfig::new().with_epsilon(1e-8).init::<TestBackend, Linear<TestBackend>>()
    }

    // One Adam step on a loss with a very small gradient
    fn nudge<O>(model: Linear<TestBackend>, optim: &mut O) -> Linear<TestBackend>
    where
        O: Optimizer<Linear<TestBackend>, TestBackend>,
    {
        let input = Tensor::<TestBackend, 2>::ones([1, 2], &Default::default());
        let loss  = model.forward(input).sum().mul_scalar(1e-5);
        let grads = GradientsParams::from_grads(loss.backward(), &model);
        optim.step(1e-3, model, grads)
    }

    fn weights(model: &Linear<TestBackend>) -> Vec<f32> {
        model.weight.val().into_data().iter::<f32>().collect()
    }

    fn manager(root: &Path, title: &str) -> CheckpointManager {
        CheckpointManager::new(&ExperimentLayout::new(root, title))
    }

    #[test]
    fn test_resumed_step_matches_uninterrupted_step() {
        let tmp  = tempfile::tempdir().unwrap();
        let ckpt = manager(tmp.path(), "exact");
        let device = Default::default();

        let mut model = linear();
        let mut optim = adam();
        for _ in 0..3 {
            model = nudge(model, &mut optim);
        }
        ckpt.save::<TestBackend, _, _>(&model, &optim, 3, &FractionHistory::new()).unwrap();

        let restored = ckpt.load_model(linear(), &device).unwrap();
        let mut restored_optim = ckpt
            .load_optimizer::<TestBackend, Linear<TestBackend>, _>(adam(), &device)
            .unwrap();
        assert_eq!(weights(&restored), weights(&model));

        let before   = weights(&model);
        let model    = nudge(model, &mut optim);
        let restored = nudge(restored, &mut restored_optim);

        for ((after, resumed), start) in weights(&model).iter().zip(weights(&restored)).zip(&before) {
            let step         = after - start;
            let resumed_step = resumed - start;
            assert!(step.abs() > 0.0);
            assert!(
                (step - resumed_step).abs() <= 1e-7,
                "uninterrupted step {step}, resumed step {resumed_step}"
            );
        }
    }

    #[test]
    fn test_save_overwrites_and_leaves_no_staging_files() {
        let tmp  = tempfile::tempdir().unwrap();
        let ckpt = manager(tmp.path(), "run");
        let model = linear();
        let optim = adam();

        assert!(!ckpt.exists());
        ckpt.save::<TestBackend, _, _>(&model, &optim, 1, &FractionHistory::from(vec![vec![0.25]]))
            .unwrap();
        ckpt.save::<TestBackend, _, _>(
            &model,
            &optim,
            2,
            &FractionHistory::from(vec![vec![0.25], vec![0.5]]),
        )
        .unwrap();

        assert!(ckpt.exists());
        let meta = ckpt.load_meta().unwrap();
        assert_eq!(meta.epoch, 2);
        assert_eq!(meta.current_fraction_list.epochs(), 2);

        let mut names: Vec<String> = fs::read_dir(tmp.path().join("results/models"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, ["run.ckpt.json", "run_model.mpk.gz", "run_optim.mpk.gz"]);
    }

    #[test]
    fn test_config_round_trip() {
        let tmp  = tempfile::tempdir().unwrap();
        let ckpt = manager(tmp.path(), "cfg");
        assert!(ckpt.load_config().is_err());

        let cfg = TrainConfig { epochs: 7, ..TrainConfig::default() };
        ckpt.save_config(&cfg).unwrap();
        assert_eq!(ckpt.load_config().unwrap().epochs, 7);
    }
}
