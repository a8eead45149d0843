// ============================================================
// Layer 4 — Class Subsets
// ============================================================
// Builds evaluation sets out of the test split by keeping only
// the classes an EvalSetSpec names. Order is preserved so the
// same test split always produces the same evaluation set.

use crate::domain::{eval_set::EvalSetSpec, image::LabeledImage};

/// Keep only the images whose label is in `spec`.
pub fn filter_classes(images: &[LabeledImage], spec: &EvalSetSpec) -> Vec<LabeledImage> {
    images
        .iter()
        .filter(|img| spec.contains(img.label))
        .cloned()
        .collect()
}

/// Count images per class, indexed by label.
pub fn class_counts(images: &[LabeledImage], num_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; num_classes];
    for img in images {
        if let Some(slot) = counts.get_mut(img.label) {
            *slot += 1;
        }
    }
    counts
}
