//! Logistic win classifier
//!
//! Architecture: Input(16) → Linear(1) → sigmoid = P(fighter1 wins)

use burn::module::Module;
use burn::nn::{Initializer, Linear, LinearConfig};
use burn::tensor::activation::sigmoid;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::features::MatchupFeatures;

/// Configuration for the classifier
#[derive(Debug, Clone)]
pub struct WinClassifierConfig {
    /// Input dimension (matchup features)
    pub input_dim: usize,
}

impl Default for WinClassifierConfig {
    fn default() -> Self {
        WinClassifierConfig {
            input_dim: MatchupFeatures::DIM,
        }
    }
}

/// Single linear layer over normalized matchup features
#[derive(Module, Debug)]
pub struct WinClassifier<B: Backend> {
    linear: Linear<B>,
}

impl<B: Backend> WinClassifier<B> {
    /// Create a new classifier
    ///
    /// Weights start at zero so training is deterministic for a given dataset.
    pub fn new(device: &B::Device, config: WinClassifierConfig) -> Self {
        WinClassifier {
            linear: LinearConfig::new(config.input_dim, 1)
                .with_initializer(Initializer::Zeros)
                .init(device),
        }
    }

    /// Win logit [batch, 1]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        self.linear.forward(features)
    }

    /// P(fighter1 wins) [batch, 1]
    pub fn probability(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        sigmoid(self.forward(features))
    }
}
