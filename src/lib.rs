//! Combat-sports matchup prediction
//!
//! Predicts the probable winner of a fight between two competitors from
//! historical fight records, using a classifier trained per call with a
//! deterministic scoring formula as fallback.

pub mod data;
pub mod features;
pub mod model;
pub mod predict;
pub mod training;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Backend used to train and evaluate the win classifier
pub type ClassifierBackend = burn::backend::Autodiff<burn::backend::NdArray<f32>>;

/// Unique identifier for a fighter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FighterId(pub i64);

impl fmt::Display for FighterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fighter({})", self.0)
    }
}

/// Fighting stance
///
/// Stored as a free-text label; equality is by label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stance {
    Orthodox,
    Southpaw,
    Switch,
    Other(String),
}

impl Stance {
    /// Parse a stored label. Blank labels mean the stance is unknown.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        Some(Stance::from(label.to_string()))
    }

    pub fn label(&self) -> &str {
        match self {
            Stance::Orthodox => "Orthodox",
            Stance::Southpaw => "Southpaw",
            Stance::Switch => "Switch",
            Stance::Other(label) => label,
        }
    }
}

impl From<String> for Stance {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Orthodox" => Stance::Orthodox,
            "Southpaw" => Stance::Southpaw,
            "Switch" => Stance::Switch,
            _ => Stance::Other(label),
        }
    }
}

impl From<Stance> for String {
    fn from(stance: Stance) -> Self {
        stance.label().to_string()
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fighter row as stored: identity, physical attributes and career counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    pub id: FighterId,
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub weight_class: Option<String>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub reach_cm: Option<f64>,
    #[serde(default)]
    pub stance: Option<Stance>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub draws: u32,
    #[serde(default)]
    pub ko_wins: u32,
    #[serde(default)]
    pub submission_wins: u32,
    #[serde(default)]
    pub decision_wins: u32,
}

impl Fighter {
    /// Create a fighter with no recorded attributes
    pub fn new(id: i64, name: &str) -> Self {
        Fighter {
            id: FighterId(id),
            name: name.to_string(),
            nickname: None,
            weight_class: None,
            height_cm: None,
            reach_cm: None,
            stance: None,
            wins: 0,
            losses: 0,
            draws: 0,
            ko_wins: 0,
            submission_wins: 0,
            decision_wins: 0,
        }
    }
}

/// A single historical contest
///
/// `fighter1` and `fighter2` are positional slots, not a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightRecord {
    pub fighter1: FighterId,
    pub fighter2: FighterId,
    /// None for draws and unresolved bouts
    #[serde(default)]
    pub winner: Option<FighterId>,
    #[serde(default)]
    pub fight_date: Option<String>,
    #[serde(default)]
    pub weight_class: Option<String>,
    #[serde(default)]
    pub rounds: Option<u32>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub event_name: Option<String>,
}

impl FightRecord {
    /// A fight between two fighters with the given winner
    pub fn new(fighter1: FighterId, fighter2: FighterId, winner: Option<FighterId>) -> Self {
        FightRecord {
            fighter1,
            fighter2,
            winner,
            fight_date: None,
            weight_class: None,
            rounds: None,
            method: None,
            event_name: None,
        }
    }

    /// Check if fighter1 is the recorded winner (None when unresolved)
    pub fn fighter1_won(&self) -> Option<bool> {
        self.winner.map(|w| w == self.fighter1)
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum FightError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Fighter not found")]
    FighterNotFound(FighterId),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, FightError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub training: TrainingConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    /// Fewer resolved fights than this routes to the heuristic
    pub min_samples: usize,
    pub train_ratio: f32,
    pub seed: u64,
    pub log_every: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    pub database_path: String,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            epochs: 200,
            learning_rate: 0.1,
            min_samples: 5,
            train_ratio: 0.8,
            seed: 42,
            log_every: 50,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            database_path: "data/ufc_data.db".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            training: TrainingConfig::default(),
            data: DataConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FightError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| FightError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FightError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stance_parse() {
        assert_eq!(Stance::parse("Southpaw"), Some(Stance::Southpaw));
        assert_eq!(Stance::parse(" Orthodox "), Some(Stance::Orthodox));
        assert_eq!(Stance::parse(""), None);
        assert_eq!(
            Stance::parse("Open Stance"),
            Some(Stance::Other("Open Stance".to_string()))
        );
    }

    #[test]
    fn test_fighter1_won() {
        let fight = FightRecord::new(FighterId(1), FighterId(2), Some(FighterId(1)));
        assert_eq!(fight.fighter1_won(), Some(true));

        let draw = FightRecord::new(FighterId(1), FighterId(2), None);
        assert_eq!(draw.fighter1_won(), None);
    }

    #[test]
    fn test_not_found_message() {
        let err = FightError::FighterNotFound(FighterId(99));
        assert_eq!(err.to_string(), "Fighter not found");
    }

    #[test]
    fn test_config_roundtrip_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
