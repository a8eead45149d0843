// ============================================================
// Layer 4 — CIFAR Binary Loader
// ============================================================
// Loads images from the CIFAR-10 binary distribution
// (cifar-10-batches-bin).
//
// File layout:
//   data_batch_1.bin .. data_batch_5.bin  ← training split
//   test_batch.bin                        ← test split
//
// Every file is a flat sequence of fixed-size records:
//   <1 byte label><1024 red><1024 green><1024 blue>
//
// The pixel block is already channel-major, which is exactly
// the layout LabeledImage expects, so each record is copied
// out as-is.
//
// Reference: https://www.cs.toronto.edu/~kriz/cifar.html
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::image::{ImageShape, LabeledImage};
use crate::domain::traits::ImageSource;

const TRAIN_FILES: [&str; 5] = [
    "data_batch_1.bin",
    "data_batch_2.bin",
    "data_batch_3.bin",
    "data_batch_4.bin",
    "data_batch_5.bin",
];
const TEST_FILE: &str = "test_batch.bin";

/// Loads CIFAR-10 style binary batches from a directory.
pub struct CifarLoader {
    dir:         PathBuf,
    shape:       ImageShape,
    num_classes: usize,
}

impl CifarLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), shape: ImageShape::CIFAR, num_classes: 10 }
    }

    fn load_files(&self, names: &[&str]) -> Result<Vec<LabeledImage>> {
        if !self.dir.is_dir() {
            bail!(
                "Data directory '{}' does not exist. Download cifar-10-binary.tar.gz and extract it there.",
                self.dir.display()
            );
        }

        let mut images = Vec::new();
        for name in names {
            let path  = self.dir.join(name);
            let batch = read_batch(&path, self.shape, self.num_classes)?;
            tracing::debug!("Loaded {} images from '{}'", batch.len(), path.display());
            images.extend(batch);
        }
        Ok(images)
    }
}

impl ImageSource for CifarLoader {
    fn shape(&self) -> ImageShape {
        self.shape
    }

    fn load_train(&self) -> Result<Vec<LabeledImage>> {
        let images = self.load_files(&TRAIN_FILES)?;
        tracing::info!("Loaded {} training images from '{}'", images.len(), self.dir.display());
        Ok(images)
    }

    fn load_test(&self) -> Result<Vec<LabeledImage>> {
        let images = self.load_files(&[TEST_FILE])?;
        tracing::info!("Loaded {} test images from '{}'", images.len(), self.dir.display());
        Ok(images)
    }
}

/// Read one binary batch file.
fn read_batch(path: &Path, shape: ImageShape, num_classes: usize) -> Result<Vec<LabeledImage>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    parse_records(&bytes, shape, num_classes)
        .with_context(|| format!("Malformed batch file '{}'", path.display()))
}

/// Split a byte buffer into labelled images.
fn parse_records(bytes: &[u8], shape: ImageShape, num_classes: usize) -> Result<Vec<LabeledImage>> {
    let record_len = 1 + shape.num_values();
    if bytes.len() % record_len != 0 {
        bail!(
            "{} bytes is not a whole number of {}-byte records",
            bytes.len(),
            record_len
        );
    }

    bytes
        .chunks_exact(record_len)
        .enumerate()
        .map(|(i, record)| {
            let label = record[0] as usize;
            if label >= num_classes {
                bail!("record {i} has label {label}, expected < {num_classes}");
            }
            Ok(LabeledImage::new(record[1..].to_vec(), label))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: ImageShape = ImageShape { channels: 3, height: 2, width: 2 };

    fn record(label: u8, fill: u8) -> Vec<u8> {
        let mut r = vec![label];
        r.extend(std::iter::repeat(fill).take(TINY.num_values()));
        r
    }

    #[test]
    fn test_parses_consecutive_records() {
        let mut bytes = record(3, 10);
        bytes.extend(record(5, 20));

        let images = parse_records(&bytes, TINY, 10).unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].label, 3);
        assert_eq!(images[1].label, 5);
        assert!(images[1].pixels.iter().all(|&p| p == 20));
        assert_eq!(images[0].pixels.len(), 12);
    }

    #[test]
    fn test_rejects_truncated_file() {
        let mut bytes = record(1, 0);
        bytes.pop();
        assert!(parse_records(&bytes, TINY, 10).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_label() {
        let bytes = record(12, 0);
        assert!(parse_records(&bytes, TINY, 10).is_err());
    }

    #[test]
    fn test_loads_test_split_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = Vec::new();
        for label in 0..4u8 {
            bytes.push(label);
            bytes.extend(std::iter::repeat(label).take(ImageShape::CIFAR.num_values()));
        }
        fs::write(dir.path().join(TEST_FILE), &bytes).unwrap();

        let loader = CifarLoader::new(dir.path());
        let images = loader.load_test().unwrap();
        assert_eq!(images.len(), 4);
        assert_eq!(images[2].label, 2);
        // training files are absent
        assert!(loader.load_train().is_err());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let loader = CifarLoader::new("/definitely/not/here");
        assert!(loader.load_test().is_err());
    }
}
