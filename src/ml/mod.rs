// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All model math lives here:
//
//   model.rs     — ImageClassifier trait and the ConvNet used
//                  by default (two conv layers, adaptive
//                  pooling, two linear layers)
//
//   trainer.rs   — The training loop: forward, loss, backward,
//                  optimiser step, per-epoch evaluation,
//                  checkpoint and fraction history
//
//   evaluator.rs — One evaluation pass: predictions, report,
//                  fraction of class A
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// Classifier trait and convolutional model
pub mod model;

/// Epoch loop with evaluation and checkpointing
pub mod trainer;

/// Evaluation of one held-out set
pub mod evaluator;
