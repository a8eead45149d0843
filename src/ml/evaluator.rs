// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Runs a model over one evaluation set and reports:
//   - the true and predicted label of every image
//   - a classification report
//   - the fraction of predictions equal to class A
//
// Call it with model.valid() so it runs on the inner backend:
// no autodiff graph is built and dropout is disabled.

use anyhow::{bail, Result};
use burn::{data::dataloader::DataLoader, prelude::*};

use crate::data::batcher::ImageBatch;
use crate::domain::evaluation::EvaluationResults;
use crate::infra::metrics::{fraction_of_class, ClassificationReport};
use crate::ml::model::ImageClassifier;

pub fn evaluation<B, M>(
    model:         &M,
    loader:        &dyn DataLoader<ImageBatch<B>>,
    class_a_index: usize,
) -> Result<EvaluationResults>
where
    B: Backend,
    M: ImageClassifier<B>,
{
    let mut y_trues: Vec<usize> = Vec::new();
    let mut y_preds: Vec<usize> = Vec::new();

    for batch in loader.iter() {
        let logits = model.classify(batch.images);

        // argmax(1) returns [batch, 1]; flatten to [batch]
        let predicted = logits.argmax(1).flatten::<1>(0, 1);

        y_preds.extend(predicted.into_data().iter::<i64>().map(|p| p as usize));
        y_trues.extend(batch.targets.into_data().iter::<i64>().map(|t| t as usize));
    }

    let Some(fraction_of_class_a) = fraction_of_class(&y_preds, class_a_index) else {
        bail!("evaluation set is empty, cannot compute the fraction of class {class_a_index}");
    };

    let report = ClassificationReport::compute(&y_trues, &y_preds).to_string();

    Ok(EvaluationResults { y_trues, y_preds, report, fraction_of_class_a })
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::data::dataloader::DataLoaderBuilder;

    use crate::data::{batcher::ImageBatcher, dataset::ImageDataset, preprocessor::Normalizer};
    use crate::domain::image::{ImageShape, LabeledImage};

    /// Predicts class 1 when the first pixel is bright, class 0 otherwise.
    struct Threshold;

    impl<B: Backend> ImageClassifier<B> for Threshold {
        fn classify(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
            let [n, _, _, _] = images.dims();
            let first = images.slice([0..n, 0..1, 0..1, 0..1]).reshape([n, 1]);
            Tensor::cat(vec![first.clone().neg(), first], 1)
        }
    }

    fn loader(labels_and_pixels: &[(usize, u8)]) -> std::sync::Arc<dyn DataLoader<ImageBatch<NdArray>>> {
        let shape  = ImageShape::new(1, 2, 2);
        let images = labels_and_pixels
            .iter()
            .map(|&(label, px)| LabeledImage::new(vec![px; shape.num_values()], label))
            .collect();
        let batcher = ImageBatcher::<NdArray>::new(Default::default(), shape, Normalizer::new(vec![0.5], vec![0.5]).unwrap());
        DataLoaderBuilder::new(batcher).batch_size(2).build(ImageDataset::new(images))
    }

    #[test]
    fn test_fraction_counts_predicted_class() {
        // pixels 255 → class 1, pixels 0 → class 0
        let data = loader(&[(1, 255), (0, 255), (0, 0), (1, 255), (0, 0)]);
        let results = evaluation(&Threshold, data.as_ref(), 1).unwrap();

        assert_eq!(results.y_trues, vec![1, 0, 0, 1, 0]);
        assert_eq!(results.y_preds, vec![1, 1, 0, 1, 0]);
        assert!((results.fraction_of_class_a - 0.6).abs() < 1e-9);
        assert!((results.accuracy() - 0.8).abs() < 1e-9);
        assert!(results.report.contains("accuracy"));
    }

    #[test]
    fn test_empty_set_is_an_error() {
        let data = loader(&[]);
        assert!(evaluation(&Threshold, data.as_ref(), 1).is_err());
    }
}
