use serde::Serialize;
use tracing::{debug, instrument};

use super::utils::{clean_str, coerce_number, extract_year};
use super::RawTable;
use crate::schema::{ColumnMap, LogicalField};

/// Placeholder owner for rows whose owner cell is blank.
pub const UNKNOWN_OWNER: &str = "Unknown";

/// One owner-season in canonical shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRow {
    pub owner: String,
    /// Season label as found in the source.
    pub season: String,
    /// First four-digit run in `season`, if any.
    pub year: Option<i32>,
    pub is_champion: bool,
    pub wins: f64,
    pub losses: f64,
    pub points_for: f64,
    pub points_against: f64,
    pub transactions: f64,
}

impl CanonicalRow {
    pub fn games(&self) -> f64 {
        self.wins + self.losses
    }

    pub fn win_rate(&self) -> f64 {
        let games = self.games();
        if games > 0.0 {
            self.wins / games
        } else {
            0.0
        }
    }
}

/// `Y` (any case, any padding) is a title. Everything else, blanks included, is not.
pub fn parse_champion_flag(raw: &str) -> bool {
    clean_str(raw).to_uppercase() == "Y"
}

/// Project every raw row onto the canonical shape. Never drops a row.
#[instrument(level = "debug", skip_all, fields(rows = table.len()))]
pub fn normalize(table: &RawTable, columns: &ColumnMap) -> Vec<CanonicalRow> {
    let owner = columns.index(LogicalField::Owner);
    let season = columns.index(LogicalField::Season);
    let champ = columns.index(LogicalField::Champion);
    let wins = columns.index(LogicalField::Wins);
    let losses = columns.index(LogicalField::Losses);
    let pf = columns.index(LogicalField::PointsFor);
    let pa = columns.index(LogicalField::PointsAgainst);
    let tx = columns.index(LogicalField::Transactions);

    let out: Vec<CanonicalRow> = (0..table.len())
        .map(|r| {
            let name = clean_str(table.cell(r, owner));
            let season_label = table.cell(r, season).to_string();
            CanonicalRow {
                owner: if name.is_empty() {
                    UNKNOWN_OWNER.to_string()
                } else {
                    name
                },
                year: extract_year(&season_label),
                season: season_label,
                is_champion: parse_champion_flag(table.cell(r, champ)),
                wins: coerce_number(table.cell(r, wins)),
                losses: coerce_number(table.cell(r, losses)),
                points_for: coerce_number(table.cell(r, pf)),
                points_against: coerce_number(table.cell(r, pa)),
                transactions: coerce_number(table.cell(r, tx)),
            }
        })
        .collect();

    debug!(rows = out.len(), "normalized season rows");
    out
}
