use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::LeaderboardEntry;
use crate::aggregate::AggregateConfig;
use crate::process::CanonicalRow;

pub const NO_ELIGIBLE_OWNER: &str = "no eligible owner";
pub const NO_ELIGIBLE_ROWS: &str = "no eligible rows";
pub const NOT_ENOUGH_DATA: &str = "not enough data";

/// Who gets considered for owner-level awards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Eligibility {
    /// Owners with fewer counted seasons are skipped.
    pub min_seasons: u32,
    /// Seasons with games an owner needs before "most consistent" looks at them.
    pub consistency_min_seasons: u32,
}

impl Default for Eligibility {
    fn default() -> Self {
        Self {
            min_seasons: 1,
            consistency_min_seasons: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Winner {
        owner: String,
        value: f64,
        detail: String,
    },
    NotAvailable {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Superlative {
    pub title: &'static str,
    pub outcome: Outcome,
}

impl Superlative {
    fn winner(title: &'static str, owner: &str, value: f64, detail: impl Into<String>) -> Self {
        Self {
            title,
            outcome: Outcome::Winner {
                owner: owner.to_string(),
                value,
                detail: detail.into(),
            },
        }
    }

    fn unavailable(title: &'static str, reason: &str) -> Self {
        Self {
            title,
            outcome: Outcome::NotAvailable {
                reason: reason.to_string(),
            },
        }
    }

    pub fn owner(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Winner { owner, .. } => Some(owner),
            Outcome::NotAvailable { .. } => None,
        }
    }
}

/// First item holding the extreme key. `prefer(a, b)` is true when `a` beats `b`.
fn pick<'a, T>(
    items: impl IntoIterator<Item = &'a T>,
    key: impl Fn(&T) -> f64,
    prefer: impl Fn(f64, f64) -> bool,
) -> Option<(&'a T, f64)> {
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let k = key(item);
        match best {
            Some((_, b)) if !prefer(k, b) => {}
            _ => best = Some((item, k)),
        }
    }
    best
}

fn higher(a: f64, b: f64) -> bool {
    a > b
}

fn lower(a: f64, b: f64) -> bool {
    a < b
}

fn eligible<'a>(
    entries: &'a [LeaderboardEntry],
    rules: &'a Eligibility,
) -> impl Iterator<Item = &'a LeaderboardEntry> + 'a {
    entries
        .iter()
        .filter(move |e| e.summary.seasons >= rules.min_seasons)
}

pub fn goat(entries: &[LeaderboardEntry], rules: &Eligibility) -> Superlative {
    const TITLE: &str = "GOAT";
    match pick(eligible(entries, rules), |e| e.legacy_score, higher) {
        Some((e, v)) => Superlative::winner(
            TITLE,
            e.owner(),
            v,
            format!("{} Rings", e.summary.championships),
        ),
        None => Superlative::unavailable(TITLE, NO_ELIGIBLE_OWNER),
    }
}

pub fn transaction_terrorist(entries: &[LeaderboardEntry], rules: &Eligibility) -> Superlative {
    const TITLE: &str = "Transaction Terrorist";
    match pick(eligible(entries, rules), |e| e.summary.total_transactions, higher) {
        Some((e, v)) => Superlative::winner(TITLE, e.owner(), v, "moves"),
        None => Superlative::unavailable(TITLE, NO_ELIGIBLE_OWNER),
    }
}

pub fn most_wins_no_ring(entries: &[LeaderboardEntry], rules: &Eligibility) -> Superlative {
    const TITLE: &str = "Most Wins, No Ring";
    let ringless = eligible(entries, rules).filter(|e| e.summary.championships == 0);
    match pick(ringless, |e| e.summary.total_wins, higher) {
        Some((e, v)) => Superlative::winner(TITLE, e.owner(), v, "wins"),
        None => Superlative::unavailable(TITLE, NO_ELIGIBLE_OWNER),
    }
}

/// Champion row with the fewest points scored.
pub fn luckiest_champion(rows: &[CanonicalRow]) -> Superlative {
    const TITLE: &str = "Luckiest Champion";
    let champs = rows.iter().filter(|r| r.is_champion);
    match pick(champs, |r| r.points_for, lower) {
        Some((r, v)) => Superlative::winner(TITLE, &r.owner, v, r.season.clone()),
        None => Superlative::unavailable(TITLE, NO_ELIGIBLE_ROWS),
    }
}

pub fn highest_single_season(rows: &[CanonicalRow]) -> Superlative {
    const TITLE: &str = "Highest Single Season";
    match pick(rows, |r| r.points_for, higher) {
        Some((r, v)) => Superlative::winner(TITLE, &r.owner, v, r.season.clone()),
        None => Superlative::unavailable(TITLE, NO_ELIGIBLE_ROWS),
    }
}

/// Population variance. Caller guarantees a non-empty slice.
fn variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// Lowest spread of per-season win rate. Seasons without games are ignored;
/// needs at least two qualifying owners to mean anything.
pub fn most_consistent(rows: &[CanonicalRow], rules: &Eligibility) -> Superlative {
    const TITLE: &str = "Most Consistent";

    let mut order: Vec<&str> = Vec::new();
    let mut rates: HashMap<&str, Vec<f64>> = HashMap::new();
    for r in rows.iter().filter(|r| r.games() > 0.0) {
        rates
            .entry(r.owner.as_str())
            .or_insert_with(|| {
                order.push(r.owner.as_str());
                Vec::new()
            })
            .push(r.win_rate());
    }

    let needed = rules.consistency_min_seasons.max(1) as usize;
    let candidates: Vec<(&str, f64, usize)> = order
        .into_iter()
        .filter_map(|owner| {
            let seasons = &rates[owner];
            (seasons.len() >= needed).then(|| (owner, variance(seasons), seasons.len()))
        })
        .collect();

    if candidates.len() < 2 {
        return Superlative::unavailable(TITLE, NOT_ENOUGH_DATA);
    }

    match pick(&candidates, |c| c.1, lower) {
        Some((&(owner, v, n), _)) => {
            Superlative::winner(TITLE, owner, v, format!("win-rate variance over {} seasons", n))
        }
        None => Superlative::unavailable(TITLE, NOT_ENOUGH_DATA),
    }
}

/// Every award, in display order. The per-season awards only see rows inside
/// the stats window of `stats`, the same rows the totals are built from.
pub fn select_all(
    entries: &[LeaderboardEntry],
    rows: &[CanonicalRow],
    rules: &Eligibility,
    stats: &AggregateConfig,
) -> Vec<Superlative> {
    let in_window: Vec<CanonicalRow> = rows
        .iter()
        .filter(|r| stats.counts_toward_stats(r))
        .cloned()
        .collect();
    vec![
        goat(entries, rules),
        transaction_terrorist(entries, rules),
        most_wins_no_ring(entries, rules),
        luckiest_champion(&in_window),
        most_consistent(&in_window, rules),
        highest_single_season(&in_window),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::test_support::summary;
    use crate::score::{LeaderboardEntry, ScoreWeights};

    fn entry(owner: &str, rings: u32, wins: f64, losses: f64) -> LeaderboardEntry {
        LeaderboardEntry::new(summary(owner, rings, wins, losses), &ScoreWeights::default())
    }

    fn season(owner: &str, season: &str, champ: bool, w: f64, l: f64, pf: f64) -> CanonicalRow {
        CanonicalRow {
            owner: owner.to_string(),
            season: season.to_string(),
            year: season.parse().ok(),
            is_champion: champ,
            wins: w,
            losses: l,
            points_for: pf,
            points_against: 0.0,
            transactions: 0.0,
        }
    }

    #[test]
    fn most_wins_no_ring_picks_best_ringless_owner() {
        let entries = vec![
            entry("Champ", 1, 50.0, 10.0),
            entry("Bridesmaid", 0, 45.0, 15.0),
            entry("Scrub", 0, 20.0, 40.0),
        ];
        let s = most_wins_no_ring(&entries, &Eligibility::default());
        assert_eq!(s.owner(), Some("Bridesmaid"));
    }

    #[test]
    fn most_wins_no_ring_when_everyone_has_a_ring() {
        let entries = vec![entry("A", 1, 10.0, 5.0), entry("B", 2, 8.0, 7.0)];
        let s = most_wins_no_ring(&entries, &Eligibility::default());
        assert_eq!(
            s.outcome,
            Outcome::NotAvailable {
                reason: NO_ELIGIBLE_OWNER.to_string()
            }
        );
    }

    #[test]
    fn min_seasons_gate_filters_owners() {
        let mut rookie = entry("Rookie", 0, 14.0, 0.0);
        rookie.summary.seasons = 1;
        rookie.summary.total_transactions = 99.0;
        let mut vet = entry("Vet", 0, 30.0, 30.0);
        vet.summary.seasons = 5;

        let rules = Eligibility {
            min_seasons: 3,
            ..Eligibility::default()
        };
        let entries = vec![rookie, vet];
        assert_eq!(transaction_terrorist(&entries, &rules).owner(), Some("Vet"));
        assert_eq!(
            transaction_terrorist(&entries, &Eligibility::default()).owner(),
            Some("Rookie")
        );
    }

    #[test]
    fn goat_is_highest_legacy_score() {
        let entries = vec![entry("A", 0, 80.0, 10.0), entry("B", 1, 10.0, 10.0)];
        let s = goat(&entries, &Eligibility::default());
        // A: 160 + 10, B: 50 + 20 + 10
        assert_eq!(s.owner(), Some("A"));
    }

    #[test]
    fn empty_inputs_are_not_available() {
        let rules = Eligibility::default();
        for s in select_all(&[], &[], &rules, &AggregateConfig::default()) {
            assert!(matches!(s.outcome, Outcome::NotAvailable { .. }), "{}", s.title);
        }
    }

    #[test]
    fn luckiest_champion_and_highest_single_season() {
        let rows = vec![
            season("A", "2018", true, 9.0, 4.0, 1700.0),
            season("B", "2019", true, 8.0, 5.0, 1450.0),
            season("C", "2019", false, 11.0, 2.0, 1950.5),
        ];
        let lucky = luckiest_champion(&rows);
        assert_eq!(lucky.owner(), Some("B"));
        let high = highest_single_season(&rows);
        assert_eq!(
            high.outcome,
            Outcome::Winner {
                owner: "C".to_string(),
                value: 1950.5,
                detail: "2019".to_string()
            }
        );
    }

    #[test]
    fn most_consistent_needs_two_qualifying_owners() {
        let rules = Eligibility {
            consistency_min_seasons: 2,
            ..Eligibility::default()
        };
        let rows = vec![
            season("Steady", "2019", false, 7.0, 7.0, 0.0),
            season("Steady", "2020", false, 7.0, 7.0, 0.0),
            season("Swingy", "2019", false, 13.0, 1.0, 0.0),
            season("Swingy", "2020", false, 1.0, 13.0, 0.0),
            season("OneYear", "2020", false, 7.0, 7.0, 0.0),
        ];
        let s = most_consistent(&rows, &rules);
        match s.outcome {
            Outcome::Winner { owner, value, .. } => {
                assert_eq!(owner, "Steady");
                assert_eq!(value, 0.0);
            }
            other => panic!("unexpected {:?}", other),
        }

        let few = &rows[..2];
        assert_eq!(
            most_consistent(few, &rules).outcome,
            Outcome::NotAvailable {
                reason: NOT_ENOUGH_DATA.to_string()
            }
        );
    }

    #[test]
    fn ties_resolve_to_first_candidate() {
        let rows = vec![
            season("First", "2019", false, 1.0, 1.0, 100.0),
            season("Second", "2019", false, 1.0, 1.0, 100.0),
        ];
        assert_eq!(highest_single_season(&rows).owner(), Some("First"));
    }

    #[test]
    fn per_season_awards_respect_stats_window() {
        let stats = AggregateConfig {
            stats_from_year: Some(2014),
            ..AggregateConfig::default()
        };
        let rows = vec![
            season("Old", "2010", true, 0.0, 0.0, 0.0),
            season("Old", "2016", false, 8.0, 6.0, 1600.0),
            season("Old", "2017", false, 7.0, 7.0, 1550.0),
            season("Old", "2018", false, 9.0, 5.0, 1650.0),
            season("New", "2016", true, 10.0, 4.0, 1500.0),
            season("New", "2017", false, 7.0, 7.0, 1450.0),
            season("New", "2018", false, 8.0, 6.0, 1480.0),
        ];
        let awards = select_all(&[], &rows, &Eligibility::default(), &stats);
        let by_title = |t: &str| awards.iter().find(|s| s.title == t).unwrap();

        assert_eq!(
            by_title("Luckiest Champion").outcome,
            Outcome::Winner {
                owner: "New".to_string(),
                value: 1500.0,
                detail: "2016".to_string()
            }
        );
        assert_eq!(by_title("Highest Single Season").owner(), Some("Old"));
        match &by_title("Most Consistent").outcome {
            Outcome::Winner { detail, .. } => assert!(detail.ends_with("3 seasons"), "{}", detail),
            other => panic!("unexpected {:?}", other),
        }

        let everything = select_all(&[], &rows, &Eligibility::default(), &AggregateConfig::default());
        assert_eq!(everything[3].owner(), Some("Old"));
    }
}
