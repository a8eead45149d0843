use burn::data::dataset::Dataset;

use crate::domain::image::LabeledImage;

/// In-memory image dataset handed to Burn's DataLoader.
pub struct ImageDataset {
    images: Vec<LabeledImage>,
}

impl ImageDataset {
    pub fn new(images: Vec<LabeledImage>) -> Self { Self { images } }

    /// Number of batches one pass over the dataset yields
    pub fn num_batches(&self, batch_size: usize) -> usize {
        self.images.len().div_ceil(batch_size.max(1))
    }
}

impl Dataset<LabeledImage> for ImageDataset {
    fn get(&self, index: usize) -> Option<LabeledImage> {
        self.images.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.images.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_batches_rounds_up() {
        let images = (0..10).map(|i| LabeledImage::new(vec![0; 3], i % 2)).collect();
        let ds = ImageDataset::new(images);
        assert_eq!(ds.len(), 10);
        assert_eq!(ds.num_batches(4), 3);
        assert_eq!(ds.num_batches(10), 1);
        assert_eq!(ds.get(3).map(|img| img.label), Some(1));
        assert!(ds.get(10).is_none());
    }
}
