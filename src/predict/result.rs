//! Prediction output records

use serde::{Serialize, Serializer};

use crate::features::FighterStats;
use crate::FighterId;

/// Positional slot of a fighter in a matchup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    Fighter1,
    Fighter2,
}

impl Corner {
    /// Pick the value belonging to this corner
    pub fn pick<'a, T>(&self, fighter1: &'a T, fighter2: &'a T) -> &'a T {
        match self {
            Corner::Fighter1 => fighter1,
            Corner::Fighter2 => fighter2,
        }
    }
}

/// Fighter summary echoed in the result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FighterSummary {
    pub id: FighterId,
    pub name: String,
    pub nickname: Option<String>,
    pub win_rate: f64,
    pub total_fights: u32,
    pub wins: u32,
    pub losses: u32,
}

impl FighterSummary {
    pub fn from_stats(stats: &FighterStats) -> Self {
        FighterSummary {
            id: stats.id(),
            name: stats.name().to_string(),
            nickname: stats.fighter.nickname.clone(),
            win_rate: stats.win_rate(),
            total_fights: stats.total_fights,
            wins: stats.wins,
            losses: stats.losses,
        }
    }
}

/// Identity of the predicted winner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinnerRef {
    pub id: FighterId,
    pub name: String,
    pub nickname: Option<String>,
}

impl WinnerRef {
    pub fn from_stats(stats: &FighterStats) -> Self {
        WinnerRef {
            id: stats.id(),
            name: stats.name().to_string(),
            nickname: stats.fighter.nickname.clone(),
        }
    }
}

/// Quality of the model behind a prediction
///
/// Serializes as the holdout accuracy percentage, or as a marker string
/// when the heuristic was used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelAccuracy {
    Measured(f64),
    Fallback,
}

impl ModelAccuracy {
    pub const FALLBACK_LABEL: &'static str = "N/A (fallback method)";
}

impl Serialize for ModelAccuracy {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ModelAccuracy::Measured(pct) => serializer.serialize_f64(*pct),
            ModelAccuracy::Fallback => serializer.serialize_str(Self::FALLBACK_LABEL),
        }
    }
}

/// Full prediction for one matchup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub fighter1: FighterSummary,
    pub fighter2: FighterSummary,
    pub predicted_winner: WinnerRef,
    /// Percentage in [0, 100], one decimal place
    pub confidence: f64,
    pub factors: Vec<String>,
    pub weight_class: String,
    pub rounds: u32,
    pub model_accuracy: ModelAccuracy,
}

/// What the tool emits: a prediction or a lone error message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MatchResponse {
    Prediction(Box<PredictionResult>),
    Error { error: String },
}

impl MatchResponse {
    pub fn error(message: impl Into<String>) -> Self {
        MatchResponse::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, MatchResponse::Error { .. })
    }
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
