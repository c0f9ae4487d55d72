// src/fetch/mod.rs
//
// Pulls league history from the Sleeper API and writes it as CSV the
// leaderboard can read back.

pub mod client;
pub mod standings;
pub mod types;
pub mod weekly;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument, warn};

pub use client::SleeperClient;
pub use types::{StandingsRow, WeeklyHighRow};

use crate::config::SleeperConfig;

/// Standings for every configured season reachable from `cfg.league_id`,
/// newest season first.
#[instrument(level = "info", skip(client, cfg), fields(league_id = %cfg.league_id))]
pub async fn pull_standings(client: &SleeperClient, cfg: &SleeperConfig) -> Result<Vec<StandingsRow>> {
    let chain = standings::league_chain(client, &cfg.league_id, &cfg.seasons)
        .await
        .with_context(|| format!("walking league history from {}", cfg.league_id))?;

    let mut rows = Vec::new();
    for (season, league_id) in chain.seasons_newest_first() {
        let season_rows = standings::pull_season(
            client,
            &season,
            &league_id,
            cfg.max_transaction_weeks,
            cfg.champion_bracket_wins,
        )
        .await
        .with_context(|| format!("pulling season {} (league {})", season, league_id))?;
        rows.extend(season_rows);
    }
    if rows.is_empty() {
        warn!("no standings rows pulled");
    }
    info!(rows = rows.len(), pulled_at = %Utc::now().to_rfc3339(), "standings pull complete");
    Ok(rows)
}

#[instrument(level = "info", skip(client, cfg), fields(league_id = %cfg.league_id))]
pub async fn pull_weekly_high(client: &SleeperClient, cfg: &SleeperConfig) -> Result<Vec<WeeklyHighRow>> {
    let rows = weekly::pull_weekly_high(client, &cfg.league_id, &cfg.weeks)
        .await
        .with_context(|| format!("pulling weekly high scorers for league {}", cfg.league_id))?;
    info!(rows = rows.len(), pulled_at = %Utc::now().to_rfc3339(), "weekly pull complete");
    Ok(rows)
}

/// Serialize `rows` to `path` with a header line, creating parent dirs.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    crate::export::ensure_parent(path)?;
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating CSV {:?}", path))?;
    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("writing row to {:?}", path))?;
    }
    wtr.flush().with_context(|| format!("flushing {:?}", path))?;
    info!(path = %path.display(), rows = rows.len(), "wrote csv");
    Ok(())
}
