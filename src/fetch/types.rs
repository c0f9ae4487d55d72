// src/fetch/types.rs
//
// Response shapes for the handful of Sleeper endpoints we read. Only the
// fields we use are declared; everything else in the payload is ignored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct League {
    pub league_id: String,
    pub season: String,
    #[serde(default)]
    pub previous_league_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Roster season totals. Points come split into whole and hundredths.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RosterSettings {
    pub wins: Option<i64>,
    pub losses: Option<i64>,
    pub fpts: Option<i64>,
    pub fpts_decimal: Option<i64>,
    pub fpts_against: Option<i64>,
    pub fpts_against_decimal: Option<i64>,
    /// Max possible points ("ppts"), not present in every league.
    pub ppts: Option<i64>,
    pub ppts_decimal: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Roster {
    pub roster_id: i64,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub settings: Option<RosterSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DraftSummary {
    #[serde(default)]
    pub draft_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Draft {
    /// Draft slot ("1", "2", ...) to roster id.
    #[serde(default)]
    pub slot_to_roster_id: Option<HashMap<String, Option<i64>>>,
}

/// One playoff bracket game. `w`/`l` are roster ids once the game is decided;
/// `p` is the placement the game decides (1 = championship).
#[derive(Debug, Clone, Deserialize)]
pub struct BracketMatch {
    #[serde(default)]
    pub w: Option<i64>,
    #[serde(default)]
    pub l: Option<i64>,
    #[serde(default)]
    pub p: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub roster_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Matchup {
    #[serde(default)]
    pub roster_id: Option<i64>,
    #[serde(default)]
    pub matchup_id: Option<i64>,
    #[serde(default)]
    pub points: Option<f64>,
}

/// `whole + decimal / 100`. `None` when neither half is present.
pub fn to_points(whole: Option<i64>, decimal: Option<i64>) -> Option<f64> {
    if whole.is_none() && decimal.is_none() {
        return None;
    }
    Some(whole.unwrap_or(0) as f64 + decimal.unwrap_or(0) as f64 / 100.0)
}

/// One line of the standings export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsRow {
    pub season: String,
    pub draft_slot: Option<u32>,
    pub roster_id: i64,
    pub username: String,
    pub display_name: String,
    pub wins: Option<i64>,
    pub losses: Option<i64>,
    pub pf: Option<f64>,
    pub max_pf: Option<f64>,
    pub pa: Option<f64>,
    pub playoff_wins: u32,
    pub playoff_losses: u32,
    pub champion: String,
    pub total_transactions: u32,
}

/// One line of the weekly high-scorer export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyHighRow {
    pub week: u32,
    pub matchup_id: i64,
    pub roster_id: i64,
    pub username: String,
    pub display_name: String,
    pub points: Option<f64>,
    pub opponent_roster_id: Option<i64>,
    pub opponent_username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_points_joins_whole_and_hundredths() {
        let pf = to_points(Some(1432), Some(56)).unwrap();
        assert!((pf - 1432.56).abs() < 1e-9);
        assert_eq!(to_points(Some(1500), None), Some(1500.0));
        assert_eq!(to_points(None, Some(7)), Some(0.07));
        assert_eq!(to_points(None, None), None);
    }

    #[test]
    fn roster_payload_parses_with_missing_fields() {
        let json = r#"[
            {"roster_id": 1, "owner_id": "u1", "settings": {"wins": 9, "losses": 5, "fpts": 1700, "fpts_decimal": 12, "waiver_position": 3}},
            {"roster_id": 2, "owner_id": null, "settings": null, "players": ["4034"]}
        ]"#;
        let rosters: Vec<Roster> = serde_json::from_str(json).unwrap();
        assert_eq!(rosters.len(), 2);
        let s = rosters[0].settings.clone().unwrap();
        assert_eq!(s.wins, Some(9));
        assert_eq!(s.ppts, None);
        assert!(rosters[1].owner_id.is_none());
        assert!(rosters[1].settings.is_none());
    }

    #[test]
    fn bracket_payload_parses_objects_in_team_slots() {
        let json = r#"[
            {"r": 1, "m": 1, "t1": 3, "t2": 6, "w": 3, "l": 6},
            {"r": 3, "m": 7, "t1": {"w": 5}, "t2": {"w": 6}, "w": null, "l": null, "p": 1}
        ]"#;
        let games: Vec<BracketMatch> = serde_json::from_str(json).unwrap();
        assert_eq!(games[0].w, Some(3));
        assert_eq!(games[1].p, Some(1));
        assert_eq!(games[1].w, None);
    }
}
