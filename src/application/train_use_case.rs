// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates a training run in order:
//
//   Step 1: Validate the configuration
//   Step 2: Load train and test splits     (Layer 4 - data)
//   Step 3: Subsample the training split   (Layer 4 - data)
//   Step 4: Build train + eval loaders     (Layer 4 - data)
//   Step 5: Build model and optimizer      (Layer 5 - ml)
//   Step 6: Restore checkpoint if resuming (Layer 6 - infra)
//   Step 7: Save config                    (Layer 6 - infra)
//   Step 8: Run training loop              (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)

use anyhow::{bail, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, Autodiff, NdArray, Wgpu},
    optim::AdamConfig,
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::application::BackendKind;
use crate::data::{
    loader::CifarLoader,
    loaders::{build_eval_loaders, build_train_loader, LoaderSettings},
    preprocessor::Normalizer,
    sampler::subsample,
    subset::class_counts,
};
use crate::domain::{eval_set::EvalSetSpec, traits::ImageSource};
use crate::infra::{checkpoint::CheckpointManager, layout::ExperimentLayout};
use crate::ml::{
    model::{ConvNet, ConvNetConfig},
    trainer::train,
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All knobs of a run. Saved next to the checkpoint so evaluation
// can rebuild the same model and evaluation sets later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub root:              String,
    pub experiment_title:  String,
    pub data_dir:          String,
    pub epochs:            usize,
    pub batch_size:        usize,
    pub lr:                f64,
    pub num_workers:       usize,
    pub seed:              u64,
    pub log_interval:      usize,
    pub class_a_index:     usize,
    pub num_classes:       usize,
    pub eval_sets:         Vec<EvalSetSpec>,
    pub hidden_size:       usize,
    pub dropout:           f64,
    pub max_train_samples: Option<usize>,
    pub backend:           BackendKind,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            root:              ".".to_string(),
            experiment_title:  "baseline".to_string(),
            data_dir:          "data/cifar-10-batches-bin".to_string(),
            epochs:            10,
            batch_size:        64,
            lr:                1e-3,
            num_workers:       4,
            seed:              42,
            log_interval:      100,
            class_a_index:     5,
            num_classes:       10,
            eval_sets:         vec![
                EvalSetSpec::new("catdog", vec![3, 5]),
                EvalSetSpec::new("other8", vec![0, 1, 2, 4, 6, 7, 8, 9]),
            ],
            hidden_size:       512,
            dropout:           0.5,
            max_train_samples: None,
            backend:           BackendKind::Wgpu,
        }
    }
}

impl TrainConfig {
    pub fn layout(&self) -> ExperimentLayout {
        ExperimentLayout::new(&self.root, &self.experiment_title)
    }

    pub fn loader_settings(&self) -> LoaderSettings {
        LoaderSettings {
            batch_size:  self.batch_size,
            num_workers: self.num_workers,
            seed:        self.seed,
        }
    }

    pub fn model_config(&self, channels: usize) -> ConvNetConfig {
        ConvNetConfig::new(self.num_classes)
            .with_channels(channels)
            .with_hidden_size(self.hidden_size)
            .with_dropout(self.dropout)
    }

    /// Reject configurations that would fail later, mid-run.
    pub fn validate(&self) -> Result<()> {
        if self.experiment_title.trim().is_empty() {
            bail!("experiment title must not be empty");
        }
        if self.batch_size == 0 {
            bail!("batch size must be at least 1");
        }
        if self.log_interval == 0 {
            bail!("log interval must be at least 1");
        }
        if self.class_a_index >= self.num_classes {
            bail!(
                "class A index {} is out of range for {} classes",
                self.class_a_index, self.num_classes
            );
        }
        if self.eval_sets.is_empty() {
            bail!("at least one evaluation set is required");
        }
        for spec in &self.eval_sets {
            spec.validate(self.num_classes)?;
        }
        if !(0.0..1.0).contains(&self.dropout) {
            bail!("dropout must be in [0, 1), got {}", self.dropout);
        }
        Ok(())
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
    resume: bool,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig, resume: bool) -> Self {
        Self { config, resume }
    }

    /// Execute the full training pipeline on the configured backend
    pub fn execute(&self) -> Result<()> {
        self.config.validate()?;

        match self.config.backend {
            BackendKind::Wgpu => {
                let device = WgpuDevice::default();
                tracing::info!("Using WGPU device: {:?}", device);
                self.run::<Wgpu>(device)
            }
            BackendKind::NdArray => {
                tracing::info!("Using NdArray (CPU) backend");
                self.run::<NdArray>(NdArrayDevice::default())
            }
        }
    }

    /// Train on `Autodiff<X>`, evaluate on `X`.
    pub fn run<X: Backend>(&self, device: X::Device) -> Result<()> {
        let cfg = &self.config;
        X::seed(cfg.seed);

        // ── Step 2: Load both splits ─────────────────────────────────────────
        let source = CifarLoader::new(&cfg.data_dir);
        let shape  = source.shape();
        let train_images = source.load_train()?;
        let test_images  = source.load_test()?;

        // ── Step 3: Optional cap on the training split ───────────────────────
        let train_images = subsample(train_images, cfg.max_train_samples, cfg.seed);
        tracing::info!(
            "Training on {} images, per class: {:?}",
            train_images.len(),
            class_counts(&train_images, cfg.num_classes)
        );

        // ── Step 4: DataLoaders ──────────────────────────────────────────────
        let normalizer   = Normalizer::for_shape(shape);
        let settings     = cfg.loader_settings();
        let train_loader = build_train_loader::<Autodiff<X>>(train_images, shape, &normalizer, settings, &device);
        let eval_loaders = build_eval_loaders::<X>(&cfg.eval_sets, &test_images, shape, &normalizer, settings, &device)?;

        // ── Step 5: Model + Adam ─────────────────────────────────────────────
        let model: ConvNet<Autodiff<X>> = cfg.model_config(shape.channels).init(&device);
        let optim = AdamConfig::new()
            .with_epsilon(1e-8)
            .init::<Autodiff<X>, ConvNet<Autodiff<X>>>();
        tracing::info!("Model ready: {} classes, hidden size {}", cfg.num_classes, cfg.hidden_size);

        // ── Step 6: Resume ───────────────────────────────────────────────────
        let layout       = cfg.layout();
        let ckpt_manager = CheckpointManager::new(&layout);

        let (model, optim, resume) = if self.resume && ckpt_manager.exists() {
            let meta = ckpt_manager.load_meta()?;
            if meta.epoch >= cfg.epochs {
                bail!(
                    "experiment '{}' already finished {} epochs; raise --epochs to continue",
                    cfg.experiment_title, meta.epoch
                );
            }
            let model = ckpt_manager.load_model(model, &device)?;
            let optim = ckpt_manager.load_optimizer::<Autodiff<X>, ConvNet<Autodiff<X>>, _>(optim, &device)?;
            tracing::info!("Resuming '{}' from epoch {}", cfg.experiment_title, meta.epoch);
            (model, optim, Some(meta))
        } else {
            if self.resume {
                tracing::warn!("No checkpoint for '{}', starting from scratch", cfg.experiment_title);
            }
            (model, optim, None)
        };

        // ── Step 7: Save config for evaluation ──────────────────────────────
        ckpt_manager.save_config(cfg)?;

        // ── Step 8: Run training loop (Layer 5) ──────────────────────────────
        train(model, &train_loader, &eval_loaders, optim, cfg, resume)?;
        Ok(())
    }
}
