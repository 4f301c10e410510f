//! Data access and training datasets
//!
//! SQLite queries over fighters and fights, plus the Burn dataset built from them.

pub mod database;
pub mod dataset;

pub use database::{Database, DatabaseStats, LabeledFight, Roster};
pub use dataset::{FightBatch, FightBatcher, FightDataset, FightSample};
