//! Classifier training
//!
//! Feature normalization, the training loop and metrics tracking.

pub mod metrics;
pub mod normalization;
pub mod trainer;

use thiserror::Error;

pub use metrics::TrainingHistory;
pub use normalization::FeatureNormalization;
pub use trainer::{ClassProbabilities, ClassifierTrainer, TrainedClassifier};

/// Reasons a classifier could not be produced
///
/// Neither is fatal: the caller falls back to heuristic scoring.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainingError {
    #[error("Insufficient training data: have {samples} resolved fights, need {required}")]
    InsufficientData { samples: usize, required: usize },

    #[error("Training failed: {0}")]
    Fault(String),
}
