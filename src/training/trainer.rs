//! Full-batch trainer for the win classifier

use burn::data::dataloader::batcher::Batcher;
use burn::optim::adaptor::OptimizerAdaptor;
use burn::optim::{GradientsParams, Optimizer, Sgd, SgdConfig};
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::{ElementConversion, Tensor};

use crate::data::{FightBatcher, FightDataset};
use crate::features::MatchupFeatures;
use crate::model::{WinClassifier, WinClassifierConfig};
use crate::training::metrics::{binary_accuracy, TrainingHistory};
use crate::training::normalization::FeatureNormalization;
use crate::training::TrainingError;

/// Class probabilities for one matchup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities {
    pub fighter1: f64,
    pub fighter2: f64,
}

impl ClassProbabilities {
    pub fn from_fighter1(p: f64) -> Self {
        ClassProbabilities {
            fighter1: p,
            fighter2: 1.0 - p,
        }
    }

    /// Predicted class: true when fighter1 is strictly favored.
    /// An even split goes to fighter2.
    pub fn fighter1_favored(&self) -> bool {
        self.fighter1 > 0.5
    }

    pub fn max(&self) -> f64 {
        self.fighter1.max(self.fighter2)
    }
}

/// A classifier fitted on one call's labeled fights
pub struct TrainedClassifier<B: AutodiffBackend> {
    model: WinClassifier<B>,
    norm: FeatureNormalization,
    device: B::Device,
    /// Accuracy on the held-out split (0-1)
    pub holdout_accuracy: f64,
    pub history: TrainingHistory,
}

impl<B: AutodiffBackend> TrainedClassifier<B> {
    /// Class probabilities for a pending matchup
    pub fn predict(&self, features: &MatchupFeatures) -> Result<ClassProbabilities, TrainingError> {
        let x = Tensor::<B, 1>::from_floats(features.to_vec().as_slice(), &self.device)
            .reshape([1, MatchupFeatures::DIM]);
        let x = self.norm.normalize(x);

        let probs = self
            .model
            .probability(x)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| TrainingError::Fault(format!("Failed to read prediction: {:?}", e)))?;

        let p = probs
            .first()
            .copied()
            .ok_or_else(|| TrainingError::Fault("Classifier returned no output".to_string()))?;

        if !p.is_finite() {
            return Err(TrainingError::Fault(format!(
                "Classifier returned invalid probability {}",
                p
            )));
        }

        Ok(ClassProbabilities::from_fighter1(p as f64))
    }
}

/// Trainer using a single linear layer with sigmoid output
pub struct ClassifierTrainer<B: AutodiffBackend> {
    model: WinClassifier<B>,
    optimizer: OptimizerAdaptor<Sgd<B::InnerBackend>, WinClassifier<B>, B>,
    learning_rate: f64,
    log_every: usize,
    device: B::Device,
}

impl<B: AutodiffBackend> ClassifierTrainer<B> {
    /// Create a new trainer
    pub fn new(device: B::Device, learning_rate: f64) -> Self {
        let model = WinClassifier::new(&device, WinClassifierConfig::default());
        let optimizer = SgdConfig::new().init();

        ClassifierTrainer {
            model,
            optimizer,
            learning_rate,
            log_every: 0,
            device,
        }
    }

    /// Log loss and accuracy every `n` epochs (0 disables)
    pub fn with_log_every(mut self, n: usize) -> Self {
        self.log_every = n;
        self
    }

    /// Train on `train`, then measure accuracy on `holdout`
    pub fn train(
        mut self,
        train: &FightDataset,
        holdout: &FightDataset,
        epochs: usize,
    ) -> Result<TrainedClassifier<B>, TrainingError> {
        if train.is_empty() {
            return Err(TrainingError::Fault("Training split is empty".to_string()));
        }
        if holdout.is_empty() {
            return Err(TrainingError::Fault("Holdout split is empty".to_string()));
        }

        let norm = FeatureNormalization::from_dataset(train);
        log::debug!(
            "Feature normalization: {}",
            MatchupFeatures::NAMES
                .iter()
                .zip(norm.mean.iter().zip(&norm.std))
                .map(|(name, (mean, std))| format!("{}={:.3}/{:.3}", name, mean, std))
                .collect::<Vec<_>>()
                .join(", ")
        );

        // Full batch - the datasets are small
        let batcher = FightBatcher::<B>::new(self.device.clone());
        let train_batch = batcher.batch(train.samples().to_vec(), &self.device);
        let holdout_batch = batcher.batch(holdout.samples().to_vec(), &self.device);

        let x_train = norm.normalize(train_batch.features);
        let y_train: Tensor<B, 2> = train_batch.fighter1_won.unsqueeze_dim(1);
        let x_holdout = norm.normalize(holdout_batch.features);
        let y_holdout: Tensor<B, 2> = holdout_batch.fighter1_won.unsqueeze_dim(1);

        let mut history = TrainingHistory::new();

        log::info!(
            "Training classifier on {} fights for {} epochs",
            train.len(),
            epochs
        );

        for epoch in 0..epochs {
            // Forward pass
            let probs = self.model.probability(x_train.clone());

            let loss = binary_cross_entropy(probs.clone(), y_train.clone());
            let loss_val: f32 = loss.clone().into_scalar().elem();
            if !loss_val.is_finite() {
                return Err(TrainingError::Fault(format!(
                    "Loss diverged at epoch {}",
                    epoch + 1
                )));
            }

            // Compute train accuracy before backward
            let train_acc = binary_accuracy(&probs, &y_train)?;

            // Backward pass
            let grads = loss.backward();
            let grads_params = GradientsParams::from_grads(grads, &self.model);

            // Update weights
            self.model = self
                .optimizer
                .step(self.learning_rate, self.model, grads_params);

            history.record_epoch(loss_val as f64, train_acc);

            if self.log_every > 0 && (epoch % self.log_every == 0 || epoch + 1 == epochs) {
                log::info!(
                    "Epoch {}/{}: loss={:.4}, train_acc={:.1}%",
                    epoch + 1,
                    epochs,
                    loss_val,
                    train_acc * 100.0
                );
            }
        }

        let holdout_probs = self.model.probability(x_holdout);
        let holdout_accuracy = binary_accuracy(&holdout_probs, &y_holdout)?;
        log::info!(
            "Holdout accuracy: {:.1}% on {} fights",
            holdout_accuracy * 100.0,
            holdout.len()
        );

        Ok(TrainedClassifier {
            model: self.model,
            norm,
            device: self.device,
            holdout_accuracy,
            history,
        })
    }
}

fn binary_cross_entropy<B: AutodiffBackend>(
    probs: Tensor<B, 2>,
    targets: Tensor<B, 2>,
) -> Tensor<B, 1> {
    let eps = 1e-7;
    let probs_clamped = probs.clamp(eps, 1.0 - eps);
    let loss = targets.clone().neg() * probs_clamped.clone().log()
        - (targets.neg() + 1.0) * (probs_clamped.neg() + 1.0).log();
    loss.mean()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FightSample;
    use crate::ClassifierBackend;

    /// Fighter1 wins exactly when the win-rate difference is positive
    fn separable(n: usize) -> FightDataset {
        let samples = (0..n)
            .map(|i| {
                let diff = if i % 2 == 0 { 0.3 } else { -0.3 } + (i as f32) * 0.001;
                FightSample {
                    features: MatchupFeatures {
                        win_rate_diff: diff,
                        f1_win_rate: 0.5 + diff / 2.0,
                        f2_win_rate: 0.5 - diff / 2.0,
                        ..Default::default()
                    },
                    fighter1_won: if diff > 0.0 { 1.0 } else { 0.0 },
                }
            })
            .collect();
        FightDataset::from_samples(samples)
    }

    #[test]
    fn test_training_reduces_loss() {
        let (train, holdout) = separable(40).split(0.8, 42);
        let trainer = ClassifierTrainer::<ClassifierBackend>::new(Default::default(), 0.1);

        let trained = trainer.train(&train, &holdout, 100).unwrap();
        let losses = &trained.history.losses;
        assert_eq!(losses.len(), 100);
        assert!(losses[99] < losses[0]);
        assert!((losses[0] - std::f64::consts::LN_2).abs() < 1e-3);
    }

    #[test]
    fn test_separable_data_is_learned() {
        let (train, holdout) = separable(40).split(0.8, 42);
        let trainer = ClassifierTrainer::<ClassifierBackend>::new(Default::default(), 0.1);
        let trained = trainer.train(&train, &holdout, 200).unwrap();

        assert!(trained.holdout_accuracy > 0.99);

        let strong = MatchupFeatures {
            win_rate_diff: 0.3,
            f1_win_rate: 0.65,
            f2_win_rate: 0.35,
            ..Default::default()
        };
        let probs = trained.predict(&strong).unwrap();
        assert!(probs.fighter1_favored());
        assert!((probs.fighter1 + probs.fighter2 - 1.0).abs() < 1e-9);
        assert!(probs.max() <= 1.0);
    }

    #[test]
    fn test_training_is_deterministic() {
        let run = || {
            let (train, holdout) = separable(30).split(0.8, 42);
            ClassifierTrainer::<ClassifierBackend>::new(Default::default(), 0.1)
                .train(&train, &holdout, 50)
                .unwrap()
                .predict(&MatchupFeatures::default())
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_even_probability_favors_fighter2() {
        let even = ClassProbabilities::from_fighter1(0.5);
        assert!(!even.fighter1_favored());
        assert_eq!(even.max(), 0.5);
        assert!(ClassProbabilities::from_fighter1(0.51).fighter1_favored());
        assert!(!ClassProbabilities::from_fighter1(0.49).fighter1_favored());
    }

    #[test]
    fn test_empty_holdout_is_a_fault() {
        let train = separable(10);
        let trainer = ClassifierTrainer::<ClassifierBackend>::new(Default::default(), 0.1);
        let result = trainer.train(&train, &FightDataset::default(), 10);
        assert!(matches!(result, Err(TrainingError::Fault(_))));
    }
}
