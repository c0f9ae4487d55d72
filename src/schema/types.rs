// src/schema/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight fields every season table has to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    Owner,
    Season,
    Champion,
    Wins,
    Losses,
    PointsFor,
    PointsAgainst,
    Transactions,
}

impl LogicalField {
    pub const ALL: [LogicalField; 8] = [
        LogicalField::Owner,
        LogicalField::Season,
        LogicalField::Champion,
        LogicalField::Wins,
        LogicalField::Losses,
        LogicalField::PointsFor,
        LogicalField::PointsAgainst,
        LogicalField::Transactions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalField::Owner => "owner",
            LogicalField::Season => "season",
            LogicalField::Champion => "champion",
            LogicalField::Wins => "wins",
            LogicalField::Losses => "losses",
            LogicalField::PointsFor => "points_for",
            LogicalField::PointsAgainst => "points_against",
            LogicalField::Transactions => "transactions",
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn aliases(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Ordered alias lists per logical field. Earlier aliases win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAliases {
    pub owner: Vec<String>,
    pub season: Vec<String>,
    pub champion: Vec<String>,
    pub wins: Vec<String>,
    pub losses: Vec<String>,
    pub points_for: Vec<String>,
    pub points_against: Vec<String>,
    pub transactions: Vec<String>,
}

impl ColumnAliases {
    pub fn for_field(&self, field: LogicalField) -> &[String] {
        match field {
            LogicalField::Owner => &self.owner,
            LogicalField::Season => &self.season,
            LogicalField::Champion => &self.champion,
            LogicalField::Wins => &self.wins,
            LogicalField::Losses => &self.losses,
            LogicalField::PointsFor => &self.points_for,
            LogicalField::PointsAgainst => &self.points_against,
            LogicalField::Transactions => &self.transactions,
        }
    }
}

impl Default for ColumnAliases {
    /// Spreadsheet-style headers first, then the headers written by `pull standings`.
    fn default() -> Self {
        Self {
            owner: aliases(&[
                "Owner(s)",
                "Owners",
                "Owner",
                "Username",
                "Team Owner",
                "display_name",
            ]),
            season: aliases(&["Season", "FF Year"]),
            champion: aliases(&["Fantasy Champ", "Champion", "Champ", "Is Champ"]),
            wins: aliases(&["Wins", "W", "Win", "Total Wins"]),
            losses: aliases(&["Losses", "L", "Loss", "Total Losses"]),
            points_for: aliases(&["PF", "Points For", "PointsFor", "Pts For", "Total PF"]),
            points_against: aliases(&[
                "PA",
                "Points Against",
                "PointsAgainst",
                "Pts Against",
                "Total PA",
            ]),
            transactions: aliases(&[
                "Transactions",
                "Total Transactions",
                "Moves",
                "Total Moves",
                "total_transactions",
            ]),
        }
    }
}
