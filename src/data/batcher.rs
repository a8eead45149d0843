// ============================================================
// Layer 4 — Image Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<LabeledImage>
// into tensors on the target device.
//
// How batching works here:
//   Input:  Vec of N LabeledImages, each C*H*W bytes
//   Output: ImageBatch with images [N, C, H, W] and targets [N]
//
//   Pixels are normalised into one flat Vec<f32> and reshaped:
//   [i1_c1..., i1_c2..., ..., iN_cC...] → [N, C, H, W]
//
// Tensors are created directly on the batcher's device, which
// is the Rust equivalent of moving images/labels `.to(device)`.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::preprocessor::Normalizer;
use crate::domain::image::{ImageShape, LabeledImage};

/// A batch of images ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct ImageBatch<B: Backend> {
    /// Normalised pixels — shape: [batch_size, channels, height, width]
    pub images: Tensor<B, 4>,

    /// Ground-truth class per image — shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

impl<B: Backend> ImageBatch<B> {
    pub fn batch_size(&self) -> usize {
        self.targets.dims()[0]
    }
}

/// Holds the target device plus what it needs to decode pixels.
#[derive(Clone, Debug)]
pub struct ImageBatcher<B: Backend> {
    pub device:     B::Device,
    pub shape:      ImageShape,
    pub normalizer: Normalizer,
}

impl<B: Backend> ImageBatcher<B> {
    pub fn new(device: B::Device, shape: ImageShape, normalizer: Normalizer) -> Self {
        Self { device, shape, normalizer }
    }
}

impl<B: Backend> Batcher<LabeledImage, ImageBatch<B>> for ImageBatcher<B> {
    fn batch(&self, items: Vec<LabeledImage>) -> ImageBatch<B> {
        let batch_size = items.len();
        let ImageShape { channels, height, width } = self.shape;

        let mut pixels = Vec::with_capacity(batch_size * self.shape.num_values());
        for item in &items {
            self.normalizer.apply(&item.pixels, self.shape, &mut pixels);
        }

        let labels: Vec<i64> = items.iter().map(|item| item.label as i64).collect();

        let images = Tensor::<B, 4>::from_data(
            TensorData::new(pixels, [batch_size, channels, height, width])
                .convert::<B::FloatElem>(),
            &self.device,
        );

        let targets = Tensor::<B, 1, Int>::from_data(
            TensorData::new(labels, [batch_size]).convert::<B::IntElem>(),
            &self.device,
        );

        ImageBatch { images, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes_and_labels() {
        let shape   = ImageShape::new(3, 4, 4);
        let batcher = ImageBatcher::<NdArray>::new(Default::default(), shape, Normalizer::identity(3));
        let items   = vec![
            LabeledImage::new(vec![0; shape.num_values()], 2),
            LabeledImage::new(vec![255; shape.num_values()], 7),
        ];

        let batch = batcher.batch(items);
        assert_eq!(batch.images.dims(), [2, 3, 4, 4]);
        assert_eq!(batch.batch_size(), 2);

        let labels: Vec<i64> = batch.targets.into_data().iter::<i64>().collect();
        assert_eq!(labels, vec![2, 7]);

        let max: f32 = batch.images.max().into_scalar().elem::<f32>();
        assert!((max - 1.0).abs() < 1e-6);
    }
}
