//! Owner-level reduction of canonical season rows.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use crate::process::CanonicalRow;

/// Per-title weight by era. Titles before `boundary_year` count `early_weight`,
/// titles from `boundary_year` on count `modern_weight`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EraWeights {
    pub boundary_year: i32,
    pub early_weight: f64,
    pub modern_weight: f64,
}

impl Default for EraWeights {
    fn default() -> Self {
        Self {
            boundary_year: 2014,
            early_weight: 25.0,
            modern_weight: 50.0,
        }
    }
}

impl EraWeights {
    /// Weight of one title won in `year`. Undated titles weigh nothing.
    pub fn title_weight(&self, year: Option<i32>) -> f64 {
        match year {
            Some(y) if y < self.boundary_year => self.early_weight,
            Some(_) => self.modern_weight,
            None => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    pub era: EraWeights,
    /// When set, win/loss/points/transaction totals only use seasons from this
    /// year on. Title counts always span every season.
    pub stats_from_year: Option<i32>,
}

impl AggregateConfig {
    /// Whether `row` feeds stat totals and the per-season awards.
    pub(crate) fn counts_toward_stats(&self, row: &CanonicalRow) -> bool {
        match (self.stats_from_year, row.year) {
            (None, _) => true,
            (Some(cutoff), Some(y)) => y >= cutoff,
            (Some(_), None) => false,
        }
    }
}

/// All-time numbers for one owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerSummary {
    pub owner: String,
    pub championships: u32,
    /// Season labels of title rows, sorted.
    pub championship_years: Vec<String>,
    pub championship_points: f64,
    /// Titles whose season label carries no year; left out of `championship_points`.
    pub undated_titles: u32,
    /// Seasons that fed the stat totals.
    pub seasons: u32,
    pub total_wins: f64,
    pub total_losses: f64,
    pub total_points_for: f64,
    pub total_points_against: f64,
    pub total_transactions: f64,
    pub games: f64,
    pub win_rate: f64,
    pub point_differential: f64,
}

impl OwnerSummary {
    pub fn championship_years_display(&self) -> String {
        self.championship_years.join(", ")
    }
}

/// Group rows by exact owner and reduce each group. Owners come back in the
/// order they first appear in `rows`.
#[instrument(level = "debug", skip_all, fields(rows = rows.len()))]
pub fn aggregate(rows: &[CanonicalRow], config: &AggregateConfig) -> Vec<OwnerSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&CanonicalRow>> = HashMap::new();
    for row in rows {
        groups
            .entry(row.owner.as_str())
            .or_insert_with(|| {
                order.push(row.owner.as_str());
                Vec::new()
            })
            .push(row);
    }

    let summaries: Vec<OwnerSummary> = order
        .into_iter()
        .map(|owner| summarize(owner, &groups[owner], config))
        .collect();
    debug!(owners = summaries.len(), "aggregated owners");
    summaries
}

/// Reduce one owner's rows.
pub fn summarize(owner: &str, rows: &[&CanonicalRow], config: &AggregateConfig) -> OwnerSummary {
    let mut championships = 0u32;
    let mut undated_titles = 0u32;
    let mut championship_points = 0.0;
    let mut championship_years = Vec::new();

    let mut seasons = 0u32;
    let (mut wins, mut losses, mut pf, mut pa, mut tx) = (0.0, 0.0, 0.0, 0.0, 0.0);

    for row in rows {
        if row.is_champion {
            championships += 1;
            championship_years.push(row.season.clone());
            if row.year.is_none() {
                undated_titles += 1;
                warn!(
                    owner,
                    season = %row.season,
                    "title has no year in its season label; left out of championship points"
                );
            }
            championship_points += config.era.title_weight(row.year);
        }

        if config.counts_toward_stats(row) {
            seasons += 1;
            wins += row.wins;
            losses += row.losses;
            pf += row.points_for;
            pa += row.points_against;
            tx += row.transactions;
        }
    }
    championship_years.sort();

    let games = wins + losses;
    let win_rate = if games > 0.0 { wins / games } else { 0.0 };

    OwnerSummary {
        owner: owner.to_string(),
        championships,
        championship_years,
        championship_points,
        undated_titles,
        seasons,
        total_wins: wins,
        total_losses: losses,
        total_points_for: pf,
        total_points_against: pa,
        total_transactions: tx,
        games,
        win_rate,
        point_differential: pf - pa,
    }
}
