//! Prediction and inference
//!
//! Learned and heuristic scoring, factor generation and the pipeline that
//! ties them together.

pub mod factors;
pub mod heuristic;
pub mod inference;
pub mod learned;
pub mod result;

pub use inference::{format_prediction, PredictionOutcome, Predictor};
pub use result::{
    Corner, FighterSummary, MatchResponse, ModelAccuracy, PredictionResult, WinnerRef,
};
