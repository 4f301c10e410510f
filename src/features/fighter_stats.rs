//! Fighter statistics aggregated from fight history
//!
//! Combines a stored fighter row with counts computed from the fights table.

use crate::{Fighter, FighterId, Stance};

/// A fighter's row plus record counts derived from the fights table
#[derive(Debug, Clone, PartialEq)]
pub struct FighterStats {
    pub fighter: Fighter,
    /// Every fight row involving this fighter, resolved or not
    pub total_fights: u32,
    /// Fights where this fighter is the recorded winner
    pub wins: u32,
    /// Resolved fights won by the opponent
    pub losses: u32,
}

impl FighterStats {
    /// Stats for a fighter with no recorded fights
    pub fn new(fighter: Fighter) -> Self {
        FighterStats {
            fighter,
            total_fights: 0,
            wins: 0,
            losses: 0,
        }
    }

    /// Set the record counts
    pub fn with_record(mut self, wins: u32, losses: u32, unresolved: u32) -> Self {
        self.wins = wins;
        self.losses = losses;
        self.total_fights = wins + losses + unresolved;
        self
    }

    pub fn id(&self) -> FighterId {
        self.fighter.id
    }

    pub fn name(&self) -> &str {
        &self.fighter.name
    }

    pub fn stance(&self) -> Option<&Stance> {
        self.fighter.stance.as_ref()
    }

    pub fn height_cm(&self) -> Option<f64> {
        self.fighter.height_cm
    }

    pub fn reach_cm(&self) -> Option<f64> {
        self.fighter.reach_cm
    }

    pub fn ko_wins(&self) -> u32 {
        self.fighter.ko_wins
    }

    pub fn submission_wins(&self) -> u32 {
        self.fighter.submission_wins
    }

    /// Wins plus losses (draws and unresolved bouts excluded)
    pub fn resolved_fights(&self) -> u32 {
        self.wins + self.losses
    }

    /// Win ratio (0-1), 0 for a fighter with no resolved fights
    pub fn win_rate(&self) -> f64 {
        self.wins as f64 / self.resolved_fights().max(1) as f64
    }

    /// Share of fights finished by knockout or submission
    pub fn finish_rate(&self) -> f64 {
        let finishes = self.fighter.ko_wins + self.fighter.submission_wins;
        finishes as f64 / self.total_fights.max(1) as f64
    }
}
