// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that touch the filesystem or compute
// reports:
//
//   layout.rs          — where every artefact of a run lives
//   experiment_log.rs  — the per-experiment text log
//   checkpoint.rs      — model + optimizer records (Burn's
//                        full-precision MessagePack) and the saved config
//   fraction_store.rs  — fraction-of-class-A history on disk
//   metrics.rs         — classification report
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Results directory layout keyed by experiment title
pub mod layout;

/// Text log of training progress
pub mod experiment_log;

/// Model/optimizer checkpoint saving and loading
pub mod checkpoint;

/// Per-epoch fraction history persistence
pub mod fraction_store;

/// Precision / recall / F1 report
pub mod metrics;
