//! Matchup feature vector
//!
//! Encodes a fighter pair as a fixed-order numeric vector. The same layout
//! is used to build training samples and to score a pending fight.

use crate::features::FighterStats;
use crate::Stance;

/// Comparative features for one fighter pair, from fighter1's perspective
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchupFeatures {
    // Rates (6)
    pub f1_win_rate: f32,
    pub f2_win_rate: f32,
    /// f1 - f2
    pub win_rate_diff: f32,
    pub f1_finish_rate: f32,
    pub f2_finish_rate: f32,
    /// f1 - f2
    pub finish_rate_diff: f32,

    // Physical and style (4)
    /// f1 - f2 in cm, 0 if either height is unknown
    pub height_diff: f32,
    /// f1 - f2 in cm, 0 if either reach is unknown
    pub reach_diff: f32,
    /// +1 southpaw fighter1 vs other stance, -1 the reverse, 0 otherwise
    pub stance_advantage: f32,
    /// f1 total fights - f2 total fights
    pub experience_diff: f32,

    // Raw counts (6)
    pub f1_wins: f32,
    pub f2_wins: f32,
    pub f1_ko_wins: f32,
    pub f2_ko_wins: f32,
    pub f1_sub_wins: f32,
    pub f2_sub_wins: f32,
}

impl MatchupFeatures {
    pub const DIM: usize = 16;

    /// Feature names in vector order
    pub const NAMES: [&'static str; Self::DIM] = [
        "f1_win_rate",
        "f2_win_rate",
        "win_rate_diff",
        "f1_finish_rate",
        "f2_finish_rate",
        "finish_rate_diff",
        "height_diff",
        "reach_diff",
        "stance_advantage",
        "experience_diff",
        "f1_wins",
        "f2_wins",
        "f1_ko_wins",
        "f2_ko_wins",
        "f1_sub_wins",
        "f2_sub_wins",
    ];

    pub fn from_stats(f1: &FighterStats, f2: &FighterStats) -> Self {
        let f1_win_rate = f1.win_rate();
        let f2_win_rate = f2.win_rate();
        let f1_finish_rate = f1.finish_rate();
        let f2_finish_rate = f2.finish_rate();

        MatchupFeatures {
            f1_win_rate: f1_win_rate as f32,
            f2_win_rate: f2_win_rate as f32,
            win_rate_diff: (f1_win_rate - f2_win_rate) as f32,
            f1_finish_rate: f1_finish_rate as f32,
            f2_finish_rate: f2_finish_rate as f32,
            finish_rate_diff: (f1_finish_rate - f2_finish_rate) as f32,
            height_diff: physical_diff(f1.height_cm(), f2.height_cm()) as f32,
            reach_diff: physical_diff(f1.reach_cm(), f2.reach_cm()) as f32,
            stance_advantage: stance_advantage(f1.stance(), f2.stance()),
            experience_diff: f1.total_fights as f32 - f2.total_fights as f32,
            f1_wins: f1.wins as f32,
            f2_wins: f2.wins as f32,
            f1_ko_wins: f1.ko_wins() as f32,
            f2_ko_wins: f2.ko_wins() as f32,
            f1_sub_wins: f1.submission_wins() as f32,
            f2_sub_wins: f2.submission_wins() as f32,
        }
    }

    pub fn to_vec(&self) -> Vec<f32> {
        vec![
            // Rates (6)
            self.f1_win_rate,
            self.f2_win_rate,
            self.win_rate_diff,
            self.f1_finish_rate,
            self.f2_finish_rate,
            self.finish_rate_diff,
            // Physical and style (4)
            self.height_diff,
            self.reach_diff,
            self.stance_advantage,
            self.experience_diff,
            // Raw counts (6)
            self.f1_wins,
            self.f2_wins,
            self.f1_ko_wins,
            self.f2_ko_wins,
            self.f1_sub_wins,
            self.f2_sub_wins,
        ]
    }
}

/// Difference of two optional measurements; missing data means no advantage
pub fn physical_diff(a: Option<f64>, b: Option<f64>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => a - b,
        _ => 0.0,
    }
}

/// Signed southpaw edge for fighter1
///
/// Zero when either stance is unknown or both match. Otherwise +1 when
/// fighter1 is the southpaw, -1 for any other mismatch.
pub fn stance_advantage(f1: Option<&Stance>, f2: Option<&Stance>) -> f32 {
    match (f1, f2) {
        (Some(a), Some(b)) if a != b => {
            if *a == Stance::Southpaw {
                1.0
            } else {
                -1.0
            }
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fighter;

    fn stats(
        id: i64,
        record: (u32, u32),
        finishes: (u32, u32),
        height: Option<f64>,
        reach: Option<f64>,
        stance: Option<Stance>,
    ) -> FighterStats {
        let mut fighter = Fighter::new(id, "Test");
        fighter.ko_wins = finishes.0;
        fighter.submission_wins = finishes.1;
        fighter.height_cm = height;
        fighter.reach_cm = reach;
        fighter.stance = stance;
        FighterStats::new(fighter).with_record(record.0, record.1, 0)
    }

    #[test]
    fn test_feature_layout() {
        let a = stats(1, (10, 2), (5, 1), Some(180.0), Some(185.0), Some(Stance::Orthodox));
        let b = stats(2, (4, 6), (1, 1), Some(170.0), Some(175.0), Some(Stance::Southpaw));

        let features = MatchupFeatures::from_stats(&a, &b);
        let v = features.to_vec();

        assert_eq!(v.len(), MatchupFeatures::DIM);
        assert!((v[0] - 10.0 / 12.0).abs() < 1e-6);
        assert!((v[1] - 0.4).abs() < 1e-6);
        assert!((v[2] - (10.0 / 12.0 - 0.4)).abs() < 1e-6);
        assert!((v[3] - 0.5).abs() < 1e-6);
        assert!((v[4] - 0.2).abs() < 1e-6);
        assert_eq!(v[6], 10.0);
        assert_eq!(v[7], 10.0);
        assert_eq!(v[8], -1.0);
        assert_eq!(v[9], 2.0);
        assert_eq!(&v[10..], &[10.0, 4.0, 5.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_names_follow_vector_order() {
        let a = stats(1, (3, 1), (0, 0), Some(180.0), Some(182.0), None);
        let b = stats(2, (1, 1), (0, 0), Some(176.0), Some(180.0), None);
        let features = MatchupFeatures::from_stats(&a, &b);
        let v = features.to_vec();

        assert_eq!(MatchupFeatures::NAMES.len(), v.len());
        let at = |name: &str| v[MatchupFeatures::NAMES.iter().position(|n| *n == name).unwrap()];
        assert_eq!(at("height_diff"), features.height_diff);
        assert_eq!(at("reach_diff"), features.reach_diff);
        assert_eq!(at("f1_wins"), 3.0);
        assert_eq!(at("f2_sub_wins"), features.f2_sub_wins);
    }

    #[test]
    fn test_derivation_is_stable() {
        let a = stats(1, (7, 3), (2, 2), Some(183.0), None, Some(Stance::Switch));
        let b = stats(2, (5, 5), (1, 0), None, Some(190.0), None);

        let first = MatchupFeatures::from_stats(&a, &b).to_vec();
        let second = MatchupFeatures::from_stats(&a, &b).to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_physical_data_is_zero() {
        let a = stats(1, (1, 0), (0, 0), Some(190.0), None, None);
        let b = stats(2, (1, 0), (0, 0), None, Some(170.0), None);

        let features = MatchupFeatures::from_stats(&a, &b);
        assert_eq!(features.height_diff, 0.0);
        assert_eq!(features.reach_diff, 0.0);
    }

    #[test]
    fn test_stance_advantage_antisymmetric() {
        let south = Stance::Southpaw;
        let orth = Stance::Orthodox;

        assert_eq!(stance_advantage(Some(&south), Some(&orth)), 1.0);
        assert_eq!(stance_advantage(Some(&orth), Some(&south)), -1.0);
        assert_eq!(stance_advantage(Some(&south), Some(&south)), 0.0);
        assert_eq!(stance_advantage(None, Some(&south)), 0.0);
        assert_eq!(stance_advantage(Some(&south), None), 0.0);
    }

    #[test]
    fn test_stance_mismatch_without_southpaw() {
        // Any mismatch that is not a southpaw fighter1 reads as -1
        let switch = Stance::Switch;
        let orth = Stance::Orthodox;
        assert_eq!(stance_advantage(Some(&switch), Some(&orth)), -1.0);
        assert_eq!(stance_advantage(Some(&orth), Some(&switch)), -1.0);
    }
}
