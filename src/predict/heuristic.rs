//! Deterministic fallback scoring
//!
//! Weighted composite of record, finishing, experience and physical size.
//! Always available, needs no history beyond the two fighters' own stats.

use crate::features::FighterStats;
use crate::predict::result::Corner;

const WIN_RATE_WEIGHT: f64 = 0.40;
const FINISH_RATE_WEIGHT: f64 = 0.20;
const EXPERIENCE_WEIGHT: f64 = 0.15;
const HEIGHT_WEIGHT: f64 = 0.10;
const REACH_WEIGHT: f64 = 0.10;
const ACTIVITY_WEIGHT: f64 = 0.05;

/// Fights after which experience stops adding to the score
const EXPERIENCE_CAP: f64 = 20.0;

const DEFAULT_HEIGHT_CM: f64 = 175.0;
const HEIGHT_SCALE_CM: f64 = 190.0;
const DEFAULT_REACH_CM: f64 = 180.0;
const REACH_SCALE_CM: f64 = 200.0;

const CONFIDENCE_FLOOR: f64 = 55.0;
const CONFIDENCE_CEILING: f64 = 95.0;

/// Composite score in [0, 1]
pub fn score(stats: &FighterStats) -> f64 {
    let total = stats.total_fights.max(1) as f64;

    let win_rate = stats.win_rate();
    let finish_rate = stats.finish_rate();
    let experience = (total / EXPERIENCE_CAP).min(1.0);
    let height = stats.height_cm().unwrap_or(DEFAULT_HEIGHT_CM) / HEIGHT_SCALE_CM;
    let reach = stats.reach_cm().unwrap_or(DEFAULT_REACH_CM) / REACH_SCALE_CM;
    // Overlaps with win_rate but weighted separately
    let activity = stats.wins as f64 / total;

    let score = win_rate * WIN_RATE_WEIGHT
        + finish_rate * FINISH_RATE_WEIGHT
        + experience * EXPERIENCE_WEIGHT
        + height * HEIGHT_WEIGHT
        + reach * REACH_WEIGHT
        + activity * ACTIVITY_WEIGHT;

    score.clamp(0.0, 1.0)
}

/// Heuristic comparison of two fighters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicVerdict {
    pub fighter1_score: f64,
    pub fighter2_score: f64,
    pub winner: Corner,
    /// Percentage in [55, 95]
    pub confidence: f64,
}

/// Score both fighters; equal scores favor fighter2
pub fn compare(fighter1: &FighterStats, fighter2: &FighterStats) -> HeuristicVerdict {
    let fighter1_score = score(fighter1);
    let fighter2_score = score(fighter2);

    let winner = if fighter1_score > fighter2_score {
        Corner::Fighter1
    } else {
        Corner::Fighter2
    };

    let confidence =
        ((fighter1_score - fighter2_score).abs() * 100.0 + CONFIDENCE_FLOOR).min(CONFIDENCE_CEILING);

    HeuristicVerdict {
        fighter1_score,
        fighter2_score,
        winner,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Fighter, Stance};

    fn fighter(
        id: i64,
        record: (u32, u32),
        finishes: (u32, u32),
        height: Option<f64>,
        reach: Option<f64>,
        stance: Option<Stance>,
    ) -> FighterStats {
        let mut f = Fighter::new(id, &format!("Fighter {}", id));
        f.ko_wins = finishes.0;
        f.submission_wins = finishes.1;
        f.height_cm = height;
        f.reach_cm = reach;
        f.stance = stance;
        FighterStats::new(f).with_record(record.0, record.1, 0)
    }

    #[test]
    fn test_favors_stronger_fighter() {
        let a = fighter(1, (10, 2), (5, 1), Some(180.0), Some(185.0), Some(Stance::Orthodox));
        let b = fighter(2, (4, 6), (1, 1), Some(170.0), Some(175.0), Some(Stance::Southpaw));

        let verdict = compare(&a, &b);
        assert_eq!(verdict.winner, Corner::Fighter1);
        assert!(verdict.confidence > 55.0);
        assert!((verdict.fighter1_score - 0.7522).abs() < 1e-3);
        assert!((verdict.fighter2_score - 0.4720).abs() < 1e-3);

        // Swapping corners flips the winner but not the confidence
        let swapped = compare(&b, &a);
        assert_eq!(swapped.winner, Corner::Fighter2);
        assert!((swapped.confidence - verdict.confidence).abs() < 1e-12);
    }

    #[test]
    fn test_tie_favors_fighter2() {
        let a = fighter(1, (6, 3), (2, 2), Some(178.0), Some(183.0), Some(Stance::Orthodox));
        let b = fighter(2, (6, 3), (2, 2), Some(178.0), Some(183.0), Some(Stance::Orthodox));

        let verdict = compare(&a, &b);
        assert_eq!(verdict.fighter1_score, verdict.fighter2_score);
        assert_eq!(verdict.winner, Corner::Fighter2);
        assert_eq!(verdict.confidence, 55.0);
    }

    #[test]
    fn test_score_with_missing_fields() {
        let empty = fighter(1, (0, 0), (0, 0), None, None, None);
        let s = score(&empty);
        // experience 1/20, default height and reach
        let expected = 0.05 * 0.15 + (175.0 / 190.0) * 0.1 + (180.0 / 200.0) * 0.1;
        assert!((s - expected).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn test_score_is_capped() {
        // Finish counters beyond the fight count and huge frames
        let outlier = fighter(1, (30, 0), (40, 10), Some(260.0), Some(280.0), None);
        assert_eq!(score(&outlier), 1.0);
    }

    #[test]
    fn test_confidence_bounds() {
        let best = fighter(1, (30, 0), (40, 10), Some(260.0), Some(280.0), None);
        let worst = fighter(2, (0, 30), (0, 0), Some(150.0), Some(150.0), None);
        let verdict = compare(&best, &worst);
        assert_eq!(verdict.confidence, 95.0);

        let close = compare(
            &fighter(1, (5, 5), (1, 1), None, None, None),
            &fighter(2, (5, 5), (1, 0), None, None, None),
        );
        assert!(close.confidence >= 55.0 && close.confidence <= 95.0);
    }
}
