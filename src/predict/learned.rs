//! Learned win predictor
//!
//! Fits a fresh classifier on every resolved fight in the store, then
//! scores the pending matchup with it.

use burn::tensor::backend::AutodiffBackend;

use crate::data::{Database, FightDataset, LabeledFight};
use crate::features::MatchupFeatures;
use crate::predict::result::Corner;
use crate::training::{ClassProbabilities, ClassifierTrainer, TrainedClassifier, TrainingError};
use crate::{ClassifierBackend, TrainingConfig};

/// Fit a classifier on labeled fights
pub fn fit<B: AutodiffBackend>(
    fights: &[LabeledFight],
    config: &TrainingConfig,
    device: B::Device,
) -> Result<TrainedClassifier<B>, TrainingError> {
    if fights.len() < config.min_samples {
        return Err(TrainingError::InsufficientData {
            samples: fights.len(),
            required: config.min_samples,
        });
    }

    let dataset = FightDataset::from_labeled_fights(fights);
    let (train, holdout) = dataset.split(config.train_ratio, config.seed);

    ClassifierTrainer::<B>::new(device, config.learning_rate)
        .with_log_every(config.log_every)
        .train(&train, &holdout, config.epochs)
}

/// Load every resolved fight from the store and fit on it
pub fn train_from_database(
    db: &Database,
    config: &TrainingConfig,
) -> Result<TrainedClassifier<ClassifierBackend>, TrainingError> {
    let fights = db
        .labeled_fights()
        .map_err(|e| TrainingError::Fault(format!("Failed to load training fights: {}", e)))?;
    log::debug!("Loaded {} resolved fights for training", fights.len());

    fit::<ClassifierBackend>(&fights, config, Default::default())
}

/// Learned call for one matchup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearnedVerdict {
    pub probabilities: ClassProbabilities,
    pub winner: Corner,
    /// Percentage in [0, 100]
    pub confidence: f64,
    /// Holdout accuracy percentage in [0, 100]
    pub accuracy: f64,
}

/// Score a matchup with a fitted classifier
pub fn predict<B: AutodiffBackend>(
    classifier: &TrainedClassifier<B>,
    features: &MatchupFeatures,
) -> Result<LearnedVerdict, TrainingError> {
    let probabilities = classifier.predict(features)?;

    let winner = if probabilities.fighter1_favored() {
        Corner::Fighter1
    } else {
        Corner::Fighter2
    };

    Ok(LearnedVerdict {
        probabilities,
        winner,
        confidence: probabilities.max() * 100.0,
        accuracy: classifier.holdout_accuracy * 100.0,
    })
}
