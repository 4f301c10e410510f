//! Match prediction pipeline
//!
//! Fetches both fighters, derives the matchup features, tries the learned
//! classifier and falls back to heuristic scoring when it is unavailable.

use crate::data::Database;
use crate::features::{FighterStats, MatchupFeatures};
use crate::predict::factors;
use crate::predict::heuristic;
use crate::predict::learned;
use crate::predict::result::{
    round1, Corner, FighterSummary, MatchResponse, ModelAccuracy, PredictionResult, WinnerRef,
};
use crate::training::TrainingError;
use crate::{FightError, FighterId, Result, TrainingConfig};

/// Which scoring path produced a prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PredictionOutcome {
    Learned {
        winner: Corner,
        confidence: f64,
        /// Holdout accuracy percentage
        accuracy: f64,
    },
    Heuristic {
        winner: Corner,
        confidence: f64,
    },
}

impl PredictionOutcome {
    pub fn winner(&self) -> Corner {
        match self {
            PredictionOutcome::Learned { winner, .. } | PredictionOutcome::Heuristic { winner, .. } => {
                *winner
            }
        }
    }

    pub fn confidence(&self) -> f64 {
        match self {
            PredictionOutcome::Learned { confidence, .. }
            | PredictionOutcome::Heuristic { confidence, .. } => *confidence,
        }
    }

    pub fn model_accuracy(&self) -> ModelAccuracy {
        match self {
            PredictionOutcome::Learned { accuracy, .. } => ModelAccuracy::Measured(round1(*accuracy)),
            PredictionOutcome::Heuristic { .. } => ModelAccuracy::Fallback,
        }
    }
}

/// Predictor for fight outcomes
///
/// Holds no model between calls: every prediction retrains on the current
/// contents of the store.
pub struct Predictor {
    db: Database,
    training: TrainingConfig,
}

impl Predictor {
    pub fn new(db: Database, training: TrainingConfig) -> Self {
        Predictor { db, training }
    }

    /// Predict a fight between two stored fighters
    pub fn predict_match(
        &self,
        fighter1: FighterId,
        fighter2: FighterId,
        weight_class: &str,
        rounds: u32,
    ) -> Result<PredictionResult> {
        let stats1 = self
            .db
            .fighter_stats(fighter1)?
            .ok_or(FightError::FighterNotFound(fighter1))?;
        let stats2 = self
            .db
            .fighter_stats(fighter2)?
            .ok_or(FightError::FighterNotFound(fighter2))?;

        let features = MatchupFeatures::from_stats(&stats1, &stats2);
        let outcome = self.score(&stats1, &stats2, &features);
        let factors = factors::explain(&stats1, &stats2, &features);

        let winner = outcome.winner().pick(&stats1, &stats2);
        log::info!(
            "{} vs {}: {} ({:.1}%)",
            stats1.name(),
            stats2.name(),
            winner.name(),
            outcome.confidence()
        );

        Ok(PredictionResult {
            fighter1: FighterSummary::from_stats(&stats1),
            fighter2: FighterSummary::from_stats(&stats2),
            predicted_winner: WinnerRef::from_stats(winner),
            confidence: round1(outcome.confidence()),
            factors,
            weight_class: weight_class.to_string(),
            rounds,
            model_accuracy: outcome.model_accuracy(),
        })
    }

    /// Predict and convert any failure into an error record
    pub fn respond(
        &self,
        fighter1: FighterId,
        fighter2: FighterId,
        weight_class: &str,
        rounds: u32,
    ) -> MatchResponse {
        match self.predict_match(fighter1, fighter2, weight_class, rounds) {
            Ok(result) => MatchResponse::Prediction(Box::new(result)),
            Err(e) => error_response(&e),
        }
    }

    /// Pick the scoring path once per call
    fn score(
        &self,
        stats1: &FighterStats,
        stats2: &FighterStats,
        features: &MatchupFeatures,
    ) -> PredictionOutcome {
        let learned = learned::train_from_database(&self.db, &self.training)
            .and_then(|classifier| learned::predict(&classifier, features));

        match learned {
            Ok(verdict) => {
                log::debug!(
                    "Learned path: P(fighter1)={:.3}, holdout accuracy {:.1}%",
                    verdict.probabilities.fighter1,
                    verdict.accuracy
                );
                PredictionOutcome::Learned {
                    winner: verdict.winner,
                    confidence: verdict.confidence,
                    accuracy: verdict.accuracy,
                }
            }
            Err(e) => {
                match &e {
                    TrainingError::InsufficientData { .. } => log::info!("{}; using heuristic", e),
                    TrainingError::Fault(_) => log::warn!("{}; using heuristic", e),
                }
                let verdict = heuristic::compare(stats1, stats2);
                log::debug!(
                    "Heuristic path: scores {:.4} vs {:.4}",
                    verdict.fighter1_score,
                    verdict.fighter2_score
                );
                PredictionOutcome::Heuristic {
                    winner: verdict.winner,
                    confidence: verdict.confidence,
                }
            }
        }
    }
}

/// Error record for a failed prediction
pub fn error_response(error: &FightError) -> MatchResponse {
    match error {
        FightError::FighterNotFound(id) => {
            log::info!("{} not found", id);
            MatchResponse::error(error.to_string())
        }
        other => {
            log::error!("Prediction failed: {}", other);
            MatchResponse::error(format!("Prediction error: {}", other))
        }
    }
}

/// Format a prediction for display
pub fn format_prediction(pred: &PredictionResult) -> String {
    let accuracy = match pred.model_accuracy {
        ModelAccuracy::Measured(pct) => format!("{:.1}%", pct),
        ModelAccuracy::Fallback => ModelAccuracy::FALLBACK_LABEL.to_string(),
    };
    let context = match (pred.weight_class.is_empty(), pred.rounds) {
        (true, rounds) => format!("{} rounds", rounds),
        (false, rounds) => format!("{}, {} rounds", pred.weight_class, rounds),
    };

    let mut out = format!(
        r#"
┌─────────────────────────────────────────────────┐
│  {} vs {}
│  {}
├─────────────────────────────────────────────────┤
│  Records:          {}-{} vs {}-{}
│  Predicted winner: {} {:.1}%
│  Model accuracy:   {}
├─────────────────────────────────────────────────┤
"#,
        pred.fighter1.name,
        pred.fighter2.name,
        context,
        pred.fighter1.wins,
        pred.fighter1.losses,
        pred.fighter2.wins,
        pred.fighter2.losses,
        pred.predicted_winner.name,
        pred.confidence,
        accuracy
    );
    for factor in &pred.factors {
        out.push_str(&format!("│  - {}\n", factor));
    }
    out.push_str("└─────────────────────────────────────────────────┘\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Fighter, FightRecord, Stance};
    use tempfile::TempDir;

    fn fighter(id: i64, name: &str, record: (u32, u32), finishes: (u32, u32)) -> Fighter {
        let mut f = Fighter::new(id, name);
        f.wins = record.0;
        f.losses = record.1;
        f.ko_wins = finishes.0;
        f.submission_wins = finishes.1;
        f
    }

    fn setup(fights: &[(i64, i64, Option<i64>)]) -> (TempDir, Predictor) {
        let dir = TempDir::new().unwrap();
        let db = Database::create(dir.path().join("fights.db")).unwrap();

        let mut alpha = fighter(1, "Alpha", (10, 2), (5, 1));
        alpha.height_cm = Some(180.0);
        alpha.reach_cm = Some(185.0);
        alpha.stance = Some(Stance::Orthodox);
        let mut bravo = fighter(2, "Bravo", (4, 6), (1, 1));
        bravo.height_cm = Some(170.0);
        bravo.reach_cm = Some(175.0);
        bravo.stance = Some(Stance::Southpaw);

        db.insert_fighter(&alpha).unwrap();
        db.insert_fighter(&bravo).unwrap();
        db.insert_fighter(&fighter(3, "Charlie", (0, 0), (0, 0))).unwrap();

        for (f1, f2, winner) in fights {
            db.insert_fight(&FightRecord::new(
                FighterId(*f1),
                FighterId(*f2),
                winner.map(FighterId),
            ))
            .unwrap();
        }

        (dir, Predictor::new(db, TrainingConfig::default()))
    }

    #[test]
    fn test_heuristic_path_with_little_history() {
        let (_dir, predictor) = setup(&[(1, 2, Some(1)), (1, 3, Some(1))]);

        let result = predictor
            .predict_match(FighterId(1), FighterId(2), "Lightweight", 3)
            .unwrap();
        assert_eq!(result.model_accuracy, ModelAccuracy::Fallback);
        assert_eq!(result.predicted_winner.name, "Alpha");
        assert!(result.confidence >= 55.0 && result.confidence <= 95.0);
        assert_eq!(result.weight_class, "Lightweight");
        assert_eq!(result.rounds, 3);
        assert_eq!(result.fighter1.total_fights, 2);
        assert_eq!(result.fighter1.wins, 2);
        assert_eq!(result.fighter2.losses, 1);
        assert!(result.factors[0].starts_with("Alpha has higher win rate"));
    }

    #[test]
    fn test_learned_path_with_enough_history() {
        let fights = [
            (1, 2, Some(1)),
            (1, 3, Some(1)),
            (2, 3, Some(2)),
            (3, 2, Some(2)),
            (1, 2, Some(2)),
            (3, 1, Some(1)),
        ];
        let (_dir, predictor) = setup(&fights);

        let result = predictor
            .predict_match(FighterId(1), FighterId(2), "", 5)
            .unwrap();
        match result.model_accuracy {
            ModelAccuracy::Measured(pct) => assert!((0.0..=100.0).contains(&pct)),
            ModelAccuracy::Fallback => panic!("expected the learned path"),
        }
        assert!((0.0..=100.0).contains(&result.confidence));
        assert_eq!(result.rounds, 5);
    }

    #[test]
    fn test_missing_fighter() {
        let (_dir, predictor) = setup(&[]);

        let err = predictor
            .predict_match(FighterId(1), FighterId(99), "", 3)
            .unwrap_err();
        assert!(matches!(err, FightError::FighterNotFound(FighterId(99))));

        let response = predictor.respond(FighterId(99), FighterId(1), "", 3);
        assert_eq!(response, MatchResponse::error("Fighter not found"));
    }

    #[test]
    fn test_unexpected_fault_becomes_error_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fights.db");
        let db = Database::create(&path).unwrap();
        let predictor = Predictor::new(db, TrainingConfig::default());

        // Replace the store with something that is not a database
        std::fs::write(&path, vec![b'x'; 4096]).unwrap();

        match predictor.respond(FighterId(1), FighterId(2), "", 3) {
            MatchResponse::Error { error } => assert!(error.starts_with("Prediction error: ")),
            other => panic!("expected an error record, got {:?}", other),
        }
    }

    #[test]
    fn test_outcome_accessors() {
        let learned = PredictionOutcome::Learned {
            winner: Corner::Fighter1,
            confidence: 71.25,
            accuracy: 66.666,
        };
        assert_eq!(learned.winner(), Corner::Fighter1);
        assert_eq!(learned.model_accuracy(), ModelAccuracy::Measured(66.7));

        let heuristic = PredictionOutcome::Heuristic {
            winner: Corner::Fighter2,
            confidence: 55.0,
        };
        assert_eq!(heuristic.confidence(), 55.0);
        assert_eq!(heuristic.model_accuracy(), ModelAccuracy::Fallback);
    }

    #[test]
    fn test_format_prediction() {
        let (_dir, predictor) = setup(&[(1, 2, Some(1))]);
        let result = predictor
            .predict_match(FighterId(1), FighterId(2), "Welterweight", 3)
            .unwrap();

        let table = format_prediction(&result);
        assert!(table.contains("Alpha vs Bravo"));
        assert!(table.contains("Welterweight, 3 rounds"));
        assert!(table.contains("N/A (fallback method)"));
        assert!(table.contains("- Alpha has higher win rate"));
    }
}
