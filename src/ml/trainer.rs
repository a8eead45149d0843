// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Epoch loop over Burn's DataLoader with any optimizer:
//
//   for each epoch:
//     for each batch:  forward → cross-entropy → backward → step
//                      (log running AVG loss every log_interval steps)
//     evaluate every evaluation set with model.valid()
//     append this epoch's fractions of class A to the history
//     save checkpoint (model + optimizer + epoch + history)
//     rewrite the fraction history file
//
// The running loss is weighted by batch size, so the last
// (possibly short) batch counts for exactly its samples:
//   AVG Loss = Σ(loss_i * bs_i) / Σ bs_i
//
// Reference: Burn Book §5 (Custom Training Loop)

use anyhow::{bail, Result};
use burn::{
    module::AutodiffModule,
    nn::loss::CrossEntropyLossConfig,
    optim::{GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::loaders::{EvalLoader, TrainLoader};
use crate::infra::{
    checkpoint::{CheckpointManager, CheckpointMeta},
    experiment_log::ExperimentLog,
    fraction_store::{FractionHistory, FractionStore},
    layout::ExperimentLayout,
};
use crate::ml::evaluator::evaluation;
use crate::ml::model::ImageClassifier;

/// Batch-size-weighted mean loss over the epoch so far.
#[derive(Debug, Default, Clone, Copy)]
struct RunningLoss {
    total:   f64,
    samples: usize,
}

impl RunningLoss {
    fn add(&mut self, loss: f64, batch_size: usize) {
        self.total   += loss * batch_size as f64;
        self.samples += batch_size;
    }

    fn average(&self) -> f64 {
        if self.samples == 0 { 0.0 } else { self.total / self.samples as f64 }
    }
}

pub fn train<B, M, O>(
    mut model:    M,
    train_loader: &TrainLoader<B>,
    eval_loaders: &[EvalLoader<B::InnerBackend>],
    mut optim:    O,
    cfg:          &TrainConfig,
    resume:       Option<CheckpointMeta>,
) -> Result<M>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + ImageClassifier<B>,
    M::InnerModule: ImageClassifier<B::InnerBackend>,
    O: Optimizer<M, B>,
{
    if train_loader.total_step == 0 {
        bail!("training set is empty");
    }
    if cfg.log_interval == 0 {
        bail!("log_interval must be at least 1");
    }

    let layout = ExperimentLayout::new(&cfg.root, &cfg.experiment_title);
    layout.create_dirs()?;

    let log            = ExperimentLog::new(layout.log_file());
    let ckpt_manager   = CheckpointManager::new(&layout);
    let fraction_store = FractionStore::new(layout.fractions_file());
    tracing::info!("Logging progress to '{}'", log.path().display());

    // ── Record training process ───────────────────────────────────────────────
    let start_message = format!("Start training the experiment: {}!", cfg.experiment_title);
    let (start_epoch, mut fractions) = match resume {
        Some(meta) => {
            log.append(&start_message)?;
            log.append(&format!("Resuming after epoch {}", meta.epoch))?;
            (meta.epoch, meta.current_fraction_list)
        }
        None => {
            log.start(&start_message)?;
            (0, FractionHistory::new())
        }
    };
    fractions.check_width(eval_loaders.len())?;

    let total_step = train_loader.total_step;
    let num_epochs = cfg.epochs;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in (start_epoch + 1)..=num_epochs {
        let mut running = RunningLoss::default();

        for (i, batch) in train_loader.loader.iter().enumerate() {
            let batch_size = batch.batch_size();

            // Forward pass
            let outputs = model.classify(batch.images);
            let loss = CrossEntropyLossConfig::new()
                .init(&outputs.device())
                .forward(outputs, batch.targets);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();

            // Backward and optimise
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);

            running.add(loss_val, batch_size);

            if (i + 1) % cfg.log_interval == 0 {
                log.append(&format!(
                    "Epoch [{}/{}], Step [{}/{}], AVG Loss: {:.4}",
                    epoch, num_epochs, i + 1, total_step, running.average()
                ))?;
            }
        }

        // ── Evaluate every held-out set ───────────────────────────────────────
        // model.valid() → M::InnerModule on B::InnerBackend, dropout disabled
        let model_valid = model.valid();
        let mut epoch_fractions = Vec::with_capacity(eval_loaders.len());

        for eval in eval_loaders {
            let results = evaluation(&model_valid, eval.loader.as_ref(), cfg.class_a_index)?;
            tracing::debug!("Evaluation '{}' after epoch {}:\n{}", eval.name, epoch, results.report);
            log.append(&format!(
                "Epoch [{}/{}], Eval '{}': accuracy {:.4}, fraction of class {} {:.4}",
                epoch,
                num_epochs,
                eval.name,
                results.accuracy(),
                cfg.class_a_index,
                results.fraction_of_class_a
            ))?;
            epoch_fractions.push(results.fraction_of_class_a);
        }
        fractions.push_epoch(epoch_fractions);

        // ── Persist so an early stop keeps everything so far ──────────────────
        ckpt_manager.save::<B, M, O>(&model, &optim, epoch, &fractions)?;
        fraction_store.save(&fractions)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);
    }

    tracing::info!("Training complete!");
    Ok(model)
}
