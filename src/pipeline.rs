// src/pipeline.rs
//
// load → resolve → normalize → aggregate → score, as one call.

use anyhow::Result;
use std::path::Path;
use tracing::{info, instrument};

use crate::aggregate::aggregate;
use crate::config::AppConfig;
use crate::process::{load_csv, normalize, CanonicalRow, RawTable};
use crate::schema::{resolve, ColumnMap};
use crate::score::{leaderboard, select_all, LeaderboardEntry, Superlative};

/// Everything the leaderboard command prints or exports.
#[derive(Debug, Clone)]
pub struct LeagueReport {
    pub columns: ColumnMap,
    pub rows: Vec<CanonicalRow>,
    pub entries: Vec<LeaderboardEntry>,
    pub superlatives: Vec<Superlative>,
}

/// Score an already-loaded table. Fails only when a logical column is missing;
/// the error is a [`crate::error::SchemaError`] underneath.
pub fn build_report(table: &RawTable, cfg: &AppConfig) -> Result<LeagueReport> {
    let columns = resolve(&table.headers, &cfg.columns)?;
    let rows = normalize(table, &columns);
    let summaries = aggregate(&rows, &cfg.scoring.aggregate_config());
    let entries = leaderboard(summaries, &cfg.scoring.weights);
    let superlatives = select_all(
        &entries,
        &rows,
        &cfg.scoring.eligibility,
        &cfg.scoring.aggregate_config(),
    );
    Ok(LeagueReport {
        columns,
        rows,
        entries,
        superlatives,
    })
}

#[instrument(level = "info", skip(path, cfg), fields(path = %path.display()))]
pub fn run_leaderboard(path: &Path, cfg: &AppConfig) -> Result<LeagueReport> {
    let table = load_csv(path)?;
    let report = build_report(&table, cfg)?;
    info!(
        rows = report.rows.len(),
        owners = report.entries.len(),
        "leaderboard ready"
    );
    Ok(report)
}
