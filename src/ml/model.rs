use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig},
        Dropout, DropoutConfig,
        Linear, LinearConfig,
        PaddingConfig2d,
        Relu,
    },
    prelude::*,
};

/// Anything that maps a batch of images to per-class logits.
///
/// The trainer and evaluator are written against this trait so
/// any Burn module (or a tiny stand-in in tests) can be trained.
pub trait ImageClassifier<B: Backend> {
    /// images: [batch, channels, height, width] → logits: [batch, num_classes]
    fn classify(&self, images: Tensor<B, 4>) -> Tensor<B, 2>;
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct ConvNetConfig {
    pub num_classes: usize,
    #[config(default = 3)]
    pub channels: usize,
    #[config(default = 512)]
    pub hidden_size: usize,
    #[config(default = 0.5)]
    pub dropout: f64,
}

// Feature maps are pooled to a fixed grid so any input size works.
const POOL_SIZE: usize = 8;
const CONV1_OUT: usize = 32;
const CONV2_OUT: usize = 64;

impl ConvNetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ConvNet<B> {
        let conv1 = Conv2dConfig::new([self.channels, CONV1_OUT], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);
        let conv2 = Conv2dConfig::new([CONV1_OUT, CONV2_OUT], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);
        let pool    = AdaptiveAvgPool2dConfig::new([POOL_SIZE, POOL_SIZE]).init();
        let linear1 = LinearConfig::new(CONV2_OUT * POOL_SIZE * POOL_SIZE, self.hidden_size).init(device);
        let linear2 = LinearConfig::new(self.hidden_size, self.num_classes).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        ConvNet { conv1, conv2, pool, linear1, linear2, dropout, activation: Relu::new() }
    }
}

#[derive(Module, Debug)]
pub struct ConvNet<B: Backend> {
    pub conv1:      Conv2d<B>,
    pub conv2:      Conv2d<B>,
    pub pool:       AdaptiveAvgPool2d,
    pub linear1:    Linear<B>,
    pub linear2:    Linear<B>,
    pub dropout:    Dropout,
    pub activation: Relu,
}

impl<B: Backend> ConvNet<B> {
    /// images: [batch, channels, height, width] → [batch, num_classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let [batch_size, _, _, _] = images.dims();

        let x = self.activation.forward(self.dropout.forward(self.conv1.forward(images)));
        let x = self.activation.forward(self.dropout.forward(self.conv2.forward(x)));
        let x = self.pool.forward(x); // [batch, 64, 8, 8]

        let x = x.reshape([batch_size, CONV2_OUT * POOL_SIZE * POOL_SIZE]);
        let x = self.activation.forward(self.dropout.forward(self.linear1.forward(x)));
        self.linear2.forward(x)
    }
}

impl<B: Backend> ImageClassifier<B> for ConvNet<B> {
    fn classify(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        self.forward(images)
    }
}
