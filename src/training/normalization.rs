//! Z-score normalization for matchup features

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::data::FightDataset;
use crate::features::MatchupFeatures;

/// Per-feature mean and standard deviation of a training split
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureNormalization {
    pub mean: Vec<f32>,
    pub std: Vec<f32>,
}

impl Default for FeatureNormalization {
    fn default() -> Self {
        FeatureNormalization {
            mean: vec![0.0; MatchupFeatures::DIM],
            std: vec![1.0; MatchupFeatures::DIM],
        }
    }
}

impl FeatureNormalization {
    /// Compute from training dataset
    pub fn from_dataset(dataset: &FightDataset) -> Self {
        if dataset.is_empty() {
            return Self::default();
        }

        let mut sum = vec![0.0f32; MatchupFeatures::DIM];
        let mut sum_sq = vec![0.0f32; MatchupFeatures::DIM];

        for sample in dataset.samples() {
            let vals = sample.features.to_vec();
            for j in 0..MatchupFeatures::DIM {
                sum[j] += vals[j];
                sum_sq[j] += vals[j] * vals[j];
            }
        }

        let n = dataset.len() as f32;
        let mean: Vec<f32> = sum.iter().map(|s| s / n).collect();
        // Constant columns get a small floor so they normalize to zero
        let std: Vec<f32> = sum_sq
            .iter()
            .zip(mean.iter())
            .map(|(sq, m)| ((sq / n - m * m).max(0.0).sqrt()).max(0.001))
            .collect();

        FeatureNormalization { mean, std }
    }

    /// Normalize a feature tensor using z-score: (x - mean) / std
    pub fn normalize<B: Backend>(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let device = features.device();
        let mean_tensor =
            Tensor::<B, 1>::from_floats(self.mean.as_slice(), &device).unsqueeze_dim(0);
        let std_tensor =
            Tensor::<B, 1>::from_floats(self.std.as_slice(), &device).unsqueeze_dim(0);

        (features - mean_tensor) / std_tensor
    }
}
