// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each:
//
//   train_use_case     — train a model, checkpoint every epoch,
//                        track the fraction of class A over time
//   evaluate_use_case  — reload a checkpoint and report on
//                        every evaluation set
//   fractions_use_case — read back the fraction history
//
// Rules for this layer:
//   - No model math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination

use serde::{Deserialize, Serialize};

pub mod train_use_case;

pub mod evaluate_use_case;

pub mod fractions_use_case;

/// Which Burn backend a run uses. Stored in the saved config so
/// evaluation reopens the checkpoint on the same backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// GPU through wgpu
    Wgpu,
    /// CPU through ndarray
    NdArray,
}
