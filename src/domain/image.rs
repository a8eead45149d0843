// ============================================================
// Layer 3 — Image Domain Types
// ============================================================
// A labelled image as it comes off disk: raw 8-bit pixels in
// channel-major order (all red, then all green, then all blue)
// and the integer class it belongs to.
//
// Nothing here knows about tensors. Conversion to [C, H, W]
// float tensors happens in the batcher (Layer 4).

/// Dimensions of every image in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageShape {
    pub channels: usize,
    pub height:   usize,
    pub width:    usize,
}

impl ImageShape {
    /// 32x32 RGB, the CIFAR-10 layout
    pub const CIFAR: ImageShape = ImageShape::new(3, 32, 32);

    pub const fn new(channels: usize, height: usize, width: usize) -> Self {
        Self { channels, height, width }
    }

    /// Number of bytes one image occupies (one byte per channel per pixel)
    pub fn num_values(&self) -> usize {
        self.channels * self.height * self.width
    }
}

/// One image with its ground-truth class.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledImage {
    /// Channel-major pixels, length = shape.num_values()
    pub pixels: Vec<u8>,
    pub label:  usize,
}

impl LabeledImage {
    pub fn new(pixels: Vec<u8>, label: usize) -> Self {
        Self { pixels, label }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cifar_shape_size() {
        assert_eq!(ImageShape::CIFAR.num_values(), 3072);
    }
}
