//! Burn Dataset implementation for labeled fights
//!
//! One sample per resolved fight: the matchup vector and whether fighter1 won.

use crate::data::database::LabeledFight;
use crate::features::MatchupFeatures;
use burn::data::dataset::Dataset;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// A training sample for the classifier
#[derive(Debug, Clone)]
pub struct FightSample {
    pub features: MatchupFeatures,
    /// Target: did fighter1 win? (1.0 = yes, 0.0 = no)
    pub fighter1_won: f32,
}

impl FightSample {
    pub fn from_labeled(fight: &LabeledFight) -> Self {
        FightSample {
            features: MatchupFeatures::from_stats(&fight.fighter1, &fight.fighter2),
            fighter1_won: if fight.fighter1_won { 1.0 } else { 0.0 },
        }
    }
}

/// Labeled fight samples
#[derive(Debug, Clone, Default)]
pub struct FightDataset {
    samples: Vec<FightSample>,
}

impl FightDataset {
    pub fn from_samples(samples: Vec<FightSample>) -> Self {
        FightDataset { samples }
    }

    pub fn from_labeled_fights(fights: &[LabeledFight]) -> Self {
        Self::from_samples(fights.iter().map(FightSample::from_labeled).collect())
    }

    /// Get the number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if dataset is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[FightSample] {
        &self.samples
    }

    /// Shuffle with a fixed seed, then split into train/holdout
    pub fn split(self, train_ratio: f32, seed: u64) -> (Self, Self) {
        let mut samples = self.samples;
        let mut rng = StdRng::seed_from_u64(seed);
        samples.shuffle(&mut rng);

        let split_idx = (samples.len() as f32 * train_ratio) as usize;
        let holdout = samples.split_off(split_idx.min(samples.len()));

        log::info!(
            "Split {} samples: train={}, holdout={}",
            samples.len() + holdout.len(),
            samples.len(),
            holdout.len()
        );

        (Self::from_samples(samples), Self::from_samples(holdout))
    }
}

impl Dataset<FightSample> for FightDataset {
    fn get(&self, index: usize) -> Option<FightSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

/// Batch of fight samples
#[derive(Debug, Clone)]
pub struct FightBatch<B: Backend> {
    /// Matchup features: [batch, MatchupFeatures::DIM]
    pub features: Tensor<B, 2>,
    /// Target labels: [batch]
    pub fighter1_won: Tensor<B, 1>,
}

/// Batcher for creating training batches
#[derive(Clone)]
pub struct FightBatcher<B: Backend> {
    device: B::Device,
}

impl<B: Backend> FightBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        FightBatcher { device }
    }
}

impl<B: Backend> burn::data::dataloader::batcher::Batcher<B, FightSample, FightBatch<B>>
    for FightBatcher<B>
{
    fn batch(&self, items: Vec<FightSample>, _device: &B::Device) -> FightBatch<B> {
        let batch_size = items.len();

        let mut feature_data = Vec::with_capacity(batch_size * MatchupFeatures::DIM);
        let mut label_data = Vec::with_capacity(batch_size);

        for sample in &items {
            feature_data.extend(sample.features.to_vec());
            label_data.push(sample.fighter1_won);
        }

        let features = Tensor::<B, 1>::from_floats(feature_data.as_slice(), &self.device)
            .reshape([batch_size, MatchupFeatures::DIM]);
        let fighter1_won = Tensor::<B, 1>::from_floats(label_data.as_slice(), &self.device);

        FightBatch {
            features,
            fighter1_won,
        }
    }
}
