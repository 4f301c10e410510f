//! Feature extraction
//!
//! Converts stored fighter records into rates and model-ready vectors.

pub mod fighter_stats;
pub mod matchup;

pub use fighter_stats::FighterStats;
pub use matchup::MatchupFeatures;
