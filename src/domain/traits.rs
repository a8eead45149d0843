// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer asks for "the training images" and
// "the test images" without caring where they live. The CIFAR
// binary loader is the implementation used today; a folder of
// PNGs or a synthetic generator would implement the same trait.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::image::{ImageShape, LabeledImage};

// ─── ImageSource ──────────────────────────────────────────────────────────────
/// Any component that can provide labelled train and test images.
pub trait ImageSource {
    /// Shape shared by every image this source yields
    fn shape(&self) -> ImageShape;

    /// Load the training split
    fn load_train(&self) -> Result<Vec<LabeledImage>>;

    /// Load the held-out test split
    fn load_test(&self) -> Result<Vec<LabeledImage>>;
}
