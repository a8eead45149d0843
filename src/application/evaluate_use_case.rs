// ============================================================
// Layer 2 — Evaluate Use Case
// ============================================================
// Rebuilds the model a finished (or interrupted) run saved and
// evaluates it on every evaluation set of that run:
//
//   1. Load <title>.config.json → architecture + eval sets
//   2. Load <title>.ckpt.json   → which epoch we are looking at
//   3. Load the model record into a fresh model
//   4. Filter the test split into the evaluation sets
//   5. evaluation() on each

use anyhow::Result;
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, NdArray, Wgpu},
    prelude::*,
};

use crate::application::{train_use_case::TrainConfig, BackendKind};
use crate::data::{loader::CifarLoader, loaders::build_eval_loaders, preprocessor::Normalizer};
use crate::domain::{evaluation::EvaluationResults, traits::ImageSource};
use crate::infra::{checkpoint::CheckpointManager, layout::ExperimentLayout};
use crate::ml::{evaluator::evaluation, model::ConvNet};

/// Results for one evaluation set.
pub struct SetEvaluation {
    pub name:    String,
    pub results: EvaluationResults,
}

pub struct EvaluationSummary {
    pub epoch:         usize,
    pub class_a_index: usize,
    pub sets:          Vec<SetEvaluation>,
}

pub struct EvaluateUseCase {
    layout:   ExperimentLayout,
    data_dir: Option<String>,
}

impl EvaluateUseCase {
    /// `data_dir` overrides the directory stored in the saved config.
    pub fn new(layout: ExperimentLayout, data_dir: Option<String>) -> Self {
        Self { layout, data_dir }
    }

    pub fn execute(&self) -> Result<EvaluationSummary> {
        let ckpt_manager = CheckpointManager::new(&self.layout);
        let mut cfg = ckpt_manager.load_config()?;
        if let Some(dir) = &self.data_dir {
            cfg.data_dir = dir.clone();
        }

        match cfg.backend {
            BackendKind::Wgpu    => self.run::<Wgpu>(&cfg, &ckpt_manager, WgpuDevice::default()),
            BackendKind::NdArray => self.run::<NdArray>(&cfg, &ckpt_manager, NdArrayDevice::default()),
        }
    }

    fn run<B: Backend>(
        &self,
        cfg:          &TrainConfig,
        ckpt_manager: &CheckpointManager,
        device:       B::Device,
    ) -> Result<EvaluationSummary> {
        let meta = ckpt_manager.load_meta()?;

        let source      = CifarLoader::new(&cfg.data_dir);
        let shape       = source.shape();
        let test_images = source.load_test()?;

        let model: ConvNet<B> = cfg.model_config(shape.channels).init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from epoch {} checkpoint", meta.epoch);

        let loaders = build_eval_loaders::<B>(
            &cfg.eval_sets,
            &test_images,
            shape,
            &Normalizer::for_shape(shape),
            cfg.loader_settings(),
            &device,
        )?;

        let mut sets = Vec::with_capacity(loaders.len());
        for eval in &loaders {
            let results = evaluation(&model, eval.loader.as_ref(), cfg.class_a_index)?;
            sets.push(SetEvaluation { name: eval.name.clone(), results });
        }

        Ok(EvaluationSummary { epoch: meta.epoch, class_a_index: cfg.class_a_index, sets })
    }
}
