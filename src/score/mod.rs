// src/score/mod.rs

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::instrument;

use crate::aggregate::OwnerSummary;

pub mod superlatives;

pub use superlatives::{select_all, Eligibility, Outcome, Superlative};

/// Which title term goes into the legacy score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyVariant {
    /// `championships × championship_weight`
    #[default]
    Flat,
    /// `championship_points` (era weighted)
    EraWeighted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub championship_weight: f64,
    pub win_weight: f64,
    pub points_divisor: f64,
    pub legacy: LegacyVariant,
    pub dynasty_win_rate_weight: f64,
    pub dynasty_points_divisor: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            championship_weight: 50.0,
            win_weight: 2.0,
            points_divisor: 100.0,
            legacy: LegacyVariant::Flat,
            dynasty_win_rate_weight: 100.0,
            dynasty_points_divisor: 500.0,
        }
    }
}

/// Division that treats a zero (or negative) divisor as "term contributes nothing".
fn ratio(numerator: f64, divisor: f64) -> f64 {
    if divisor > 0.0 {
        numerator / divisor
    } else {
        0.0
    }
}

/// The "GOAT score": rings, then wins, then raw scoring.
pub fn legacy_score(s: &OwnerSummary, w: &ScoreWeights) -> f64 {
    let titles = match w.legacy {
        LegacyVariant::Flat => f64::from(s.championships) * w.championship_weight,
        LegacyVariant::EraWeighted => s.championship_points,
    };
    titles + s.total_wins * w.win_weight + ratio(s.total_points_for, w.points_divisor)
}

pub fn dynasty_index(s: &OwnerSummary, w: &ScoreWeights) -> f64 {
    s.championship_points
        + s.win_rate * w.dynasty_win_rate_weight
        + ratio(s.total_points_for, w.dynasty_points_divisor)
}

/// Denominator is floored at one move.
pub fn points_for_per_transaction(s: &OwnerSummary) -> f64 {
    s.total_points_for / s.total_transactions.max(1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    #[serde(flatten)]
    pub summary: OwnerSummary,
    pub legacy_score: f64,
    pub dynasty_index: f64,
    pub points_for_per_transaction: f64,
}

impl LeaderboardEntry {
    pub fn new(summary: OwnerSummary, weights: &ScoreWeights) -> Self {
        Self {
            legacy_score: legacy_score(&summary, weights),
            dynasty_index: dynasty_index(&summary, weights),
            points_for_per_transaction: points_for_per_transaction(&summary),
            summary,
        }
    }

    pub fn owner(&self) -> &str {
        &self.summary.owner
    }
}

/// Championships, then win rate, then total wins; all descending.
pub fn rank_order(a: &OwnerSummary, b: &OwnerSummary) -> Ordering {
    b.championships
        .cmp(&a.championships)
        .then_with(|| b.win_rate.total_cmp(&a.win_rate))
        .then_with(|| b.total_wins.total_cmp(&a.total_wins))
}

/// Score every owner and sort. Ties past the third key keep input order.
#[instrument(level = "debug", skip_all, fields(owners = summaries.len()))]
pub fn leaderboard(summaries: Vec<OwnerSummary>, weights: &ScoreWeights) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = summaries
        .into_iter()
        .map(|s| LeaderboardEntry::new(s, weights))
        .collect();
    entries.sort_by(|a, b| rank_order(&a.summary, &b.summary));
    entries
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::aggregate::OwnerSummary;

    pub fn summary(owner: &str, championships: u32, wins: f64, losses: f64) -> OwnerSummary {
        let games = wins + losses;
        OwnerSummary {
            owner: owner.to_string(),
            championships,
            championship_years: Vec::new(),
            championship_points: f64::from(championships) * 50.0,
            undated_titles: 0,
            seasons: 1,
            total_wins: wins,
            total_losses: losses,
            total_points_for: 1000.0,
            total_points_against: 900.0,
            total_transactions: 10.0,
            games,
            win_rate: if games > 0.0 { wins / games } else { 0.0 },
            point_differential: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::summary;
    use super::*;

    #[test]
    fn rings_outrank_win_rate() {
        let a = summary("A", 2, 5.0, 5.0);
        let b = summary("B", 1, 9.0, 1.0);
        let board = leaderboard(vec![b, a], &ScoreWeights::default());
        assert_eq!(board[0].owner(), "A");
        assert_eq!(board[1].owner(), "B");
    }

    #[test]
    fn win_rate_then_total_wins_break_ties() {
        let a = summary("A", 0, 6.0, 4.0);
        let b = summary("B", 0, 12.0, 8.0);
        let c = summary("C", 0, 8.0, 2.0);
        let board = leaderboard(vec![a, b, c], &ScoreWeights::default());
        let names: Vec<_> = board.iter().map(|e| e.owner()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
    }

    #[test]
    fn full_ties_keep_input_order() {
        let board = leaderboard(
            vec![summary("Q", 1, 5.0, 5.0), summary("P", 1, 5.0, 5.0)],
            &ScoreWeights::default(),
        );
        assert_eq!(board[0].owner(), "Q");
        assert_eq!(board[1].owner(), "P");
    }

    #[test]
    fn legacy_score_flat_and_era_weighted() {
        let mut s = summary("A", 2, 20.0, 10.0);
        s.total_points_for = 2500.0;
        s.championship_points = 75.0;

        let flat = ScoreWeights::default();
        assert_eq!(legacy_score(&s, &flat), 2.0 * 50.0 + 20.0 * 2.0 + 25.0);

        let era = ScoreWeights {
            legacy: LegacyVariant::EraWeighted,
            ..ScoreWeights::default()
        };
        assert_eq!(legacy_score(&s, &era), 75.0 + 40.0 + 25.0);
    }

    #[test]
    fn weights_are_overridable() {
        let s = summary("A", 1, 10.0, 0.0);
        let w = ScoreWeights {
            championship_weight: 100.0,
            win_weight: 1.0,
            points_divisor: 0.0,
            ..ScoreWeights::default()
        };
        assert_eq!(legacy_score(&s, &w), 110.0);
    }

    #[test]
    fn dynasty_index_formula() {
        let mut s = summary("A", 1, 3.0, 1.0);
        s.total_points_for = 5000.0;
        s.championship_points = 50.0;
        assert_eq!(dynasty_index(&s, &ScoreWeights::default()), 50.0 + 75.0 + 10.0);
    }

    #[test]
    fn points_per_transaction_survives_zero_moves() {
        let mut s = summary("A", 0, 1.0, 1.0);
        s.total_transactions = 0.0;
        s.total_points_for = 1234.0;
        let v = points_for_per_transaction(&s);
        assert!(v.is_finite());
        assert_eq!(v, 1234.0);

        s.total_transactions = 4.0;
        assert_eq!(points_for_per_transaction(&s), 308.5);
    }
}
