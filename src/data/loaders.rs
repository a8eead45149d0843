// ============================================================
// Layer 4 — DataLoader Construction
// ============================================================
// Wraps datasets in Burn DataLoaders:
//
//   training    → Autodiff backend, shuffled with the run seed
//   evaluation  → inner backend, fixed order, one loader per
//                 EvalSetSpec filtered out of the test split
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

use anyhow::{bail, Result};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    prelude::*,
};
use std::sync::Arc;

use crate::data::{
    batcher::{ImageBatch, ImageBatcher},
    dataset::ImageDataset,
    preprocessor::Normalizer,
    subset::filter_classes,
};
use crate::domain::{
    eval_set::EvalSetSpec,
    image::{ImageShape, LabeledImage},
};

/// Batch size, workers and seed shared by all loaders of a run.
#[derive(Debug, Clone, Copy)]
pub struct LoaderSettings {
    pub batch_size:  usize,
    pub num_workers: usize,
    pub seed:        u64,
}

/// The training loader plus how many batches one epoch yields.
pub struct TrainLoader<B: Backend> {
    pub loader:     Arc<dyn DataLoader<ImageBatch<B>>>,
    pub total_step: usize,
}

/// A named evaluation loader.
pub struct EvalLoader<B: Backend> {
    pub name:   String,
    pub loader: Arc<dyn DataLoader<ImageBatch<B>>>,
}

pub fn build_train_loader<B: Backend>(
    images:     Vec<LabeledImage>,
    shape:      ImageShape,
    normalizer: &Normalizer,
    settings:   LoaderSettings,
    device:     &B::Device,
) -> TrainLoader<B> {
    let dataset    = ImageDataset::new(images);
    let total_step = dataset.num_batches(settings.batch_size);
    let batcher    = ImageBatcher::<B>::new(device.clone(), shape, normalizer.clone());

    let loader = DataLoaderBuilder::new(batcher)
        .batch_size(settings.batch_size)
        .shuffle(settings.seed)
        .num_workers(settings.num_workers)
        .build(dataset);

    TrainLoader { loader, total_step }
}

/// One loader per spec, in spec order. An empty set is an error.
pub fn build_eval_loaders<B: Backend>(
    specs:       &[EvalSetSpec],
    test_images: &[LabeledImage],
    shape:       ImageShape,
    normalizer:  &Normalizer,
    settings:    LoaderSettings,
    device:      &B::Device,
) -> Result<Vec<EvalLoader<B>>> {
    specs
        .iter()
        .map(|spec| {
            let images = filter_classes(test_images, spec);
            if images.is_empty() {
                bail!("evaluation set '{spec}' has no test images");
            }
            tracing::info!("Evaluation set '{}': {} images", spec.name, images.len());

            let batcher = ImageBatcher::<B>::new(device.clone(), shape, normalizer.clone());
            let loader  = DataLoaderBuilder::new(batcher)
                .batch_size(settings.batch_size)
                .num_workers(settings.num_workers)
                .build(ImageDataset::new(images));

            Ok(EvalLoader { name: spec.name.clone(), loader })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    const SHAPE: ImageShape = ImageShape { channels: 1, height: 2, width: 2 };

    fn test_images() -> Vec<LabeledImage> {
        [0usize, 3, 5, 5, 1, 3, 5]
            .iter()
            .map(|&l| LabeledImage::new(vec![0; SHAPE.num_values()], l))
            .collect()
    }

    fn settings() -> LoaderSettings {
        LoaderSettings { batch_size: 2, num_workers: 1, seed: 0 }
    }

    #[test]
    fn test_eval_loaders_follow_spec_order() {
        let specs = vec![EvalSetSpec::new("catdog", vec![3, 5]), EvalSetSpec::new("rest", vec![0, 1])];
        let loaders = build_eval_loaders::<NdArray>(
            &specs, &test_images(), SHAPE, &Normalizer::identity(1), settings(), &Default::default(),
        )
        .unwrap();

        assert_eq!(loaders.len(), 2);
        assert_eq!(loaders[0].name, "catdog");

        let count = |l: &EvalLoader<NdArray>| -> usize { l.loader.iter().map(|b| b.batch_size()).sum() };
        assert_eq!(count(&loaders[0]), 5);
        assert_eq!(count(&loaders[1]), 2);
    }

    #[test]
    fn test_empty_eval_set_is_an_error() {
        let specs = vec![EvalSetSpec::new("none", vec![9])];
        let result = build_eval_loaders::<NdArray>(
            &specs, &test_images(), SHAPE, &Normalizer::identity(1), settings(), &Default::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_train_loader_counts_steps() {
        let loader = build_train_loader::<NdArray>(
            test_images(), SHAPE, &Normalizer::identity(1), settings(), &Default::default(),
        );
        assert_eq!(loader.total_step, 4);
        assert_eq!(loader.loader.iter().count(), 4);
    }
}
