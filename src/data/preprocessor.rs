// ============================================================
// Layer 4 — Pixel Preprocessor
// ============================================================
// Turns raw 8-bit pixels into the floats the network sees.
//
// Steps (applied per value, in order):
//   1. Scale u8 [0, 255] → f32 [0.0, 1.0]
//   2. Subtract the channel mean
//   3. Divide by the channel standard deviation
//
// Pixels are channel-major, so the channel of value i is
// i / (height * width).
//
// Reference: Rust Book §13 (Iterators)

use anyhow::{bail, Result};

use crate::domain::image::ImageShape;

/// Per-channel normalisation statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalizer {
    mean: Vec<f32>,
    std:  Vec<f32>,
}

impl Normalizer {
    /// CIFAR-10 training-set statistics (RGB)
    pub fn cifar() -> Self {
        Self {
            mean: vec![0.4914, 0.4822, 0.4465],
            std:  vec![0.2470, 0.2435, 0.2616],
        }
    }

    pub fn new(mean: Vec<f32>, std: Vec<f32>) -> Result<Self> {
        if mean.is_empty() {
            bail!("at least one channel is required");
        }
        if mean.len() != std.len() {
            bail!("mean has {} channels but std has {}", mean.len(), std.len());
        }
        if std.iter().any(|&s| s <= 0.0) {
            bail!("standard deviations must be positive");
        }
        Ok(Self { mean, std })
    }

    /// Only scales to [0, 1]; used for shapes without known statistics
    pub fn identity(channels: usize) -> Self {
        Self { mean: vec![0.0; channels], std: vec![1.0; channels] }
    }

    /// Statistics suited to a shape: CIFAR constants for RGB, identity otherwise
    pub fn for_shape(shape: ImageShape) -> Self {
        if shape.channels == 3 { Self::cifar() } else { Self::identity(shape.channels) }
    }

    /// Normalise one image's pixels into `out`.
    pub fn apply(&self, pixels: &[u8], shape: ImageShape, out: &mut Vec<f32>) {
        let plane = shape.height * shape.width;
        out.extend(pixels.iter().enumerate().map(|(i, &p)| {
            let c = (i / plane).min(self.mean.len() - 1);
            (p as f32 / 255.0 - self.mean[c]) / self.std[c]
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_scales_to_unit_range() {
        let shape = ImageShape::new(1, 1, 3);
        let mut out = Vec::new();
        Normalizer::identity(1).apply(&[0, 255, 51], shape, &mut out);
        assert_eq!(out.len(), 3);
        assert!((out[0] - 0.0).abs() < 1e-6);
        assert!((out[1] - 1.0).abs() < 1e-6);
        assert!((out[2] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_uses_per_channel_statistics() {
        let shape = ImageShape::new(2, 1, 1);
        let norm  = Normalizer::new(vec![0.0, 0.5], vec![1.0, 0.5]).unwrap();
        let mut out = Vec::new();
        norm.apply(&[255, 255], shape, &mut out);
        assert!((out[0] - 1.0).abs() < 1e-6);
        assert!((out[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_bad_statistics() {
        assert!(Normalizer::new(vec![0.0], vec![1.0, 1.0]).is_err());
        assert!(Normalizer::new(vec![0.0], vec![0.0]).is_err());
    }
}
