//! Training metrics and evaluation

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use std::fmt;

use super::TrainingError;

/// Share of predictions on the right side of 0.5
pub fn binary_accuracy<B: Backend>(
    probs: &Tensor<B, 2>,
    targets: &Tensor<B, 2>,
) -> Result<f64, TrainingError> {
    let probs = probs
        .clone()
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| TrainingError::Fault(format!("Failed to read probabilities: {:?}", e)))?;
    let targets = targets
        .clone()
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| TrainingError::Fault(format!("Failed to read targets: {:?}", e)))?;

    if probs.is_empty() {
        return Ok(0.0);
    }

    let correct = probs
        .iter()
        .zip(targets.iter())
        .filter(|(p, t)| (**p >= 0.5) == (**t >= 0.5))
        .count();

    Ok(correct as f64 / probs.len() as f64)
}

/// Training history for tracking progress
#[derive(Debug, Clone, Default)]
pub struct TrainingHistory {
    pub losses: Vec<f64>,
    pub train_accuracies: Vec<f64>,
}

impl TrainingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record metrics for an epoch
    pub fn record_epoch(&mut self, loss: f64, train_accuracy: f64) {
        self.losses.push(loss);
        self.train_accuracies.push(train_accuracy);
    }

    pub fn epochs(&self) -> usize {
        self.losses.len()
    }

    pub fn final_loss(&self) -> Option<f64> {
        self.losses.last().copied()
    }

    pub fn final_train_accuracy(&self) -> Option<f64> {
        self.train_accuracies.last().copied()
    }
}

impl fmt::Display for TrainingHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.final_loss(), self.final_train_accuracy()) {
            (Some(loss), Some(acc)) => write!(
                f,
                "{} epochs | Loss: {:.4} | Train acc: {:.2}%",
                self.epochs(),
                loss,
                acc * 100.0
            ),
            _ => write!(f, "untrained"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_binary_accuracy() {
        let device = Default::default();
        let probs = Tensor::<TestBackend, 1>::from_floats([0.9, 0.2, 0.6, 0.4], &device)
            .reshape([4, 1]);
        let targets = Tensor::<TestBackend, 1>::from_floats([1.0, 0.0, 0.0, 0.0], &device)
            .reshape([4, 1]);

        let acc = binary_accuracy(&probs, &targets).unwrap();
        assert!((acc - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_history() {
        let mut history = TrainingHistory::new();
        assert_eq!(history.to_string(), "untrained");

        history.record_epoch(0.69, 0.5);
        history.record_epoch(0.41, 0.8);
        assert_eq!(history.epochs(), 2);
        assert_eq!(history.final_loss(), Some(0.41));
        assert!(history.to_string().starts_with("2 epochs"));
    }
}
