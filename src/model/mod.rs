//! Classifier architecture
//!
//! Logistic model mapping a matchup vector to P(fighter1 wins).

pub mod win_classifier;

pub use win_classifier::{WinClassifier, WinClassifierConfig};
