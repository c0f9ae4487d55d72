// src/fetch/weekly.rs

use std::collections::HashMap;
use tracing::{debug, info, instrument};

use super::client::{SleeperClient, SleeperResult};
use super::standings::user_map;
use super::types::{Matchup, Roster, User, WeeklyHighRow};

/// roster_id → owner user id
pub fn roster_owners(rosters: &[Roster]) -> HashMap<i64, String> {
    rosters
        .iter()
        .filter_map(|r| Some((r.roster_id, r.owner_id.clone()?)))
        .collect()
}

/// Top-scoring team of a week and the team it played.
///
/// Entries with points beat entries without; among equals the first wins.
/// Returns `None` for an empty week or when the leader has no matchup id.
pub fn week_high_scorer(
    week: u32,
    matchups: &[Matchup],
    owners: &HashMap<i64, String>,
    users: &HashMap<String, (String, String)>,
) -> Option<WeeklyHighRow> {
    let mut best: Option<&Matchup> = None;
    for m in matchups {
        let beats = match best {
            None => true,
            Some(b) => match (m.points, b.points) {
                (Some(p), Some(q)) => p > q,
                (Some(_), None) => true,
                _ => false,
            },
        };
        if beats {
            best = Some(m);
        }
    }
    let best = best?;
    let (matchup_id, roster_id) = (best.matchup_id?, best.roster_id?);

    let opponent_roster_id = matchups
        .iter()
        .filter(|m| m.matchup_id == Some(matchup_id))
        .filter_map(|m| m.roster_id)
        .find(|&r| r != roster_id);

    let lookup = |rid: i64| {
        owners
            .get(&rid)
            .and_then(|uid| users.get(uid))
            .cloned()
            .unwrap_or_default()
    };
    let (username, display_name) = lookup(roster_id);
    let opponent_username = opponent_roster_id
        .map(|r| lookup(r).0)
        .unwrap_or_default();

    Some(WeeklyHighRow {
        week,
        matchup_id,
        roster_id,
        username,
        display_name,
        points: best.points,
        opponent_roster_id,
        opponent_username,
    })
}

/// One row per week that has a decided leader.
#[instrument(level = "info", skip(client, weeks))]
pub async fn pull_weekly_high(
    client: &SleeperClient,
    league_id: &str,
    weeks: &[u32],
) -> SleeperResult<Vec<WeeklyHighRow>> {
    let users: Vec<User> = client.users(league_id).await?;
    let rosters = client.rosters(league_id).await?;
    let users = user_map(&users);
    let owners = roster_owners(&rosters);

    let mut rows = Vec::with_capacity(weeks.len());
    for &week in weeks {
        let matchups = client.matchups(league_id, week).await?;
        match week_high_scorer(week, &matchups, &owners, &users) {
            Some(row) => {
                debug!(week, roster_id = row.roster_id, points = ?row.points, "weekly high");
                rows.push(row);
            }
            None => debug!(week, "no matchups"),
        }
    }
    info!(weeks = weeks.len(), rows = rows.len(), "pulled weekly high scorers");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(roster: i64, matchup: Option<i64>, points: Option<f64>) -> Matchup {
        Matchup {
            roster_id: Some(roster),
            matchup_id: matchup,
            points,
        }
    }

    fn lookups() -> (HashMap<i64, String>, HashMap<String, (String, String)>) {
        let owners = HashMap::from([
            (1, "u1".to_string()),
            (2, "u2".to_string()),
            (3, "u3".to_string()),
        ]);
        let users = HashMap::from([
            ("u1".to_string(), ("alice".to_string(), "Alice".to_string())),
            ("u2".to_string(), ("bob".to_string(), "Bobby".to_string())),
        ]);
        (owners, users)
    }

    #[test]
    fn picks_top_score_and_its_opponent() {
        let (owners, users) = lookups();
        let week = vec![
            m(1, Some(1), Some(101.5)),
            m(3, Some(2), Some(99.0)),
            m(2, Some(1), Some(140.2)),
            m(4, Some(2), Some(120.0)),
        ];
        let row = week_high_scorer(3, &week, &owners, &users).unwrap();
        assert_eq!(row.week, 3);
        assert_eq!(row.roster_id, 2);
        assert_eq!(row.username, "bob");
        assert_eq!(row.display_name, "Bobby");
        assert_eq!(row.points, Some(140.2));
        assert_eq!(row.opponent_roster_id, Some(1));
        assert_eq!(row.opponent_username, "alice");
    }

    #[test]
    fn scored_entries_beat_unscored_ones() {
        let (owners, users) = lookups();
        let week = vec![m(1, Some(1), None), m(2, Some(1), Some(0.0))];
        let row = week_high_scorer(1, &week, &owners, &users).unwrap();
        assert_eq!(row.roster_id, 2);
    }

    #[test]
    fn bye_week_leader_has_no_opponent() {
        let (owners, users) = lookups();
        let week = vec![m(3, Some(7), Some(88.0)), m(1, Some(1), Some(70.0))];
        let row = week_high_scorer(1, &week, &owners, &users).unwrap();
        assert_eq!(row.roster_id, 3);
        assert_eq!(row.username, "");
        assert_eq!(row.opponent_roster_id, None);
        assert_eq!(row.opponent_username, "");
    }

    #[test]
    fn empty_week_or_missing_matchup_id_gives_nothing() {
        let (owners, users) = lookups();
        assert!(week_high_scorer(1, &[], &owners, &users).is_none());
        let week = vec![m(1, None, Some(150.0)), m(2, Some(1), Some(90.0))];
        assert!(week_high_scorer(1, &week, &owners, &users).is_none());
    }

    #[test]
    fn roster_owners_skip_orphans() {
        let rosters: Vec<Roster> = serde_json::from_str(
            r#"[{"roster_id": 1, "owner_id": "u1"}, {"roster_id": 2, "owner_id": null}]"#,
        )
        .unwrap();
        let owners = roster_owners(&rosters);
        assert_eq!(owners.len(), 1);
        assert_eq!(owners.get(&1).map(String::as_str), Some("u1"));
    }
}
