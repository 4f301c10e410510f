//! Human-readable reasons behind a prediction

use crate::features::{FighterStats, MatchupFeatures};

/// Height or reach gap (cm) worth mentioning
const PHYSICAL_GAP_CM: f64 = 5.0;

/// Difference in total fights worth mentioning
const EXPERIENCE_GAP: u32 = 5;

/// Explain the notable differences between two fighters
///
/// Factors come in a fixed order: win rate (always present), height, reach,
/// finish rate, experience, then stance. Each one names the fighter holding
/// the edge; a win-rate tie names fighter2.
pub fn explain(
    fighter1: &FighterStats,
    fighter2: &FighterStats,
    features: &MatchupFeatures,
) -> Vec<String> {
    let mut factors = Vec::new();

    let (f1_rate, f2_rate) = (fighter1.win_rate(), fighter2.win_rate());
    factors.push(if f1_rate > f2_rate {
        format!(
            "{} has higher win rate ({:.1}% vs {:.1}%)",
            fighter1.name(),
            f1_rate * 100.0,
            f2_rate * 100.0
        )
    } else {
        format!(
            "{} has higher win rate ({:.1}% vs {:.1}%)",
            fighter2.name(),
            f2_rate * 100.0,
            f1_rate * 100.0
        )
    });

    if let Some(factor) = physical_factor("height", features.height_diff, fighter1, fighter2) {
        factors.push(factor);
    }
    if let Some(factor) = physical_factor("reach", features.reach_diff, fighter1, fighter2) {
        factors.push(factor);
    }

    let (f1_finish, f2_finish) = (fighter1.finish_rate(), fighter2.finish_rate());
    if f1_finish != f2_finish {
        let (leader, high, low) = if f1_finish > f2_finish {
            (fighter1, f1_finish, f2_finish)
        } else {
            (fighter2, f2_finish, f1_finish)
        };
        factors.push(format!(
            "{} has higher finish rate ({:.1}% vs {:.1}%)",
            leader.name(),
            high * 100.0,
            low * 100.0
        ));
    }

    let (f1_total, f2_total) = (fighter1.total_fights, fighter2.total_fights);
    if f1_total.abs_diff(f2_total) > EXPERIENCE_GAP {
        let leader = if f1_total > f2_total { fighter1 } else { fighter2 };
        factors.push(format!(
            "{} has significantly more experience ({} vs {} fights)",
            leader.name(),
            f1_total.max(f2_total),
            f1_total.min(f2_total)
        ));
    }

    if features.stance_advantage != 0.0 {
        factors.push("Stance mismatch could create interesting dynamics".to_string());
    }

    factors
}

fn physical_factor(
    attribute: &str,
    diff: f32,
    fighter1: &FighterStats,
    fighter2: &FighterStats,
) -> Option<String> {
    let diff = diff as f64;
    if diff.abs() <= PHYSICAL_GAP_CM {
        return None;
    }
    let leader = if diff > 0.0 { fighter1 } else { fighter2 };
    Some(format!(
        "{} has {} advantage ({:.0}cm)",
        leader.name(),
        attribute,
        diff.abs()
    ))
}
