// src/fetch/standings.rs

use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, instrument, warn};

use super::client::{SleeperClient, SleeperResult};
use super::types::{
    to_points, BracketMatch, Draft, DraftSummary, League, Roster, StandingsRow, Transaction, User,
};

/// Walks a league's history backwards through `previous_league_id`.
#[derive(Debug, Clone)]
pub struct LeagueChain {
    targets: BTreeSet<String>,
    found: BTreeMap<String, String>,
}

impl LeagueChain {
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            found: BTreeMap::new(),
        }
    }

    /// Record `league`; returns the next league id to visit, or `None` once
    /// every target season is known or the chain ends.
    pub fn visit(&mut self, league: &League) -> Option<String> {
        if self.targets.contains(&league.season) && !self.found.contains_key(&league.season) {
            self.found
                .insert(league.season.clone(), league.league_id.clone());
        }
        if self.is_complete() {
            return None;
        }
        league
            .previous_league_id
            .clone()
            .filter(|id| !id.is_empty() && id != "0")
    }

    pub fn is_complete(&self) -> bool {
        self.targets.iter().all(|s| self.found.contains_key(s))
    }

    pub fn missing(&self) -> Vec<String> {
        self.targets
            .iter()
            .filter(|s| !self.found.contains_key(*s))
            .cloned()
            .collect()
    }

    /// season → league id, newest season first.
    pub fn seasons_newest_first(&self) -> Vec<(String, String)> {
        self.found
            .iter()
            .rev()
            .map(|(s, l)| (s.clone(), l.clone()))
            .collect()
    }
}

/// Resolve league ids for `targets`, starting from `start_league_id`.
#[instrument(level = "info", skip(client, targets))]
pub async fn league_chain(
    client: &SleeperClient,
    start_league_id: &str,
    targets: &[String],
) -> SleeperResult<LeagueChain> {
    let mut chain = LeagueChain::new(targets.iter().cloned());
    let mut next = Some(start_league_id.to_string());
    let mut visited = BTreeSet::new();

    while let Some(id) = next.take() {
        if !visited.insert(id.clone()) {
            warn!(league_id = %id, "league chain loops back on itself; stopping");
            break;
        }
        let Some(league) = client.league(&id).await? else {
            warn!(league_id = %id, "league not found; chain ends here");
            break;
        };
        debug!(league_id = %league.league_id, season = %league.season, name = ?league.name, "visited league");
        next = chain.visit(&league);
    }

    let missing = chain.missing();
    if !missing.is_empty() {
        warn!(
            ?missing,
            "could not find league ids for some seasons; the start league is not linked to them via previous_league_id"
        );
    }
    Ok(chain)
}

/// user_id → (username, display_name)
pub fn user_map(users: &[User]) -> HashMap<String, (String, String)> {
    users
        .iter()
        .filter(|u| !u.user_id.is_empty())
        .map(|u| {
            (
                u.user_id.clone(),
                (
                    u.username.clone().unwrap_or_default(),
                    u.display_name.clone().unwrap_or_default(),
                ),
            )
        })
        .collect()
}

/// The season's main draft: first completed one, else the first listed.
pub fn pick_draft_id(drafts: &[DraftSummary]) -> Option<String> {
    drafts
        .iter()
        .find(|d| d.status.as_deref() == Some("complete") && d.draft_id.is_some())
        .or_else(|| drafts.first())
        .and_then(|d| d.draft_id.clone())
}

/// roster_id → draft slot, inverted from the draft's slot map.
pub fn draft_slots(draft: &Draft) -> HashMap<i64, u32> {
    draft
        .slot_to_roster_id
        .iter()
        .flatten()
        .filter_map(|(slot, roster)| Some(((*roster)?, slot.trim().parse().ok()?)))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayoffRecords {
    pub wins: HashMap<i64, u32>,
    pub losses: HashMap<i64, u32>,
    pub champion: Option<i64>,
}

/// Playoff wins and losses across both brackets, plus the title winner.
///
/// The champion is the winner of the winners-bracket game deciding first
/// place. Brackets without placements fall back to the roster with exactly
/// `champion_bracket_wins` winners-bracket wins.
pub fn playoff_records(
    winners: &[BracketMatch],
    losers: &[BracketMatch],
    champion_bracket_wins: u32,
) -> PlayoffRecords {
    let mut rec = PlayoffRecords::default();
    let mut bracket_wins: HashMap<i64, u32> = HashMap::new();

    for game in winners {
        if let Some(w) = game.w {
            *rec.wins.entry(w).or_default() += 1;
            *bracket_wins.entry(w).or_default() += 1;
        }
        if let Some(l) = game.l {
            *rec.losses.entry(l).or_default() += 1;
        }
    }
    for game in losers {
        if let Some(w) = game.w {
            *rec.wins.entry(w).or_default() += 1;
        }
        if let Some(l) = game.l {
            *rec.losses.entry(l).or_default() += 1;
        }
    }

    rec.champion = if winners.iter().any(|g| g.p.is_some()) {
        winners.iter().find(|g| g.p == Some(1)).and_then(|g| g.w)
    } else {
        let mut hits: Vec<i64> = bracket_wins
            .iter()
            .filter(|&(_, &n)| n == champion_bracket_wins)
            .map(|(&r, _)| r)
            .collect();
        hits.sort_unstable();
        if hits.len() > 1 {
            warn!(?hits, "several rosters match the champion win count; taking none");
            None
        } else {
            hits.pop()
        }
    };
    rec
}

/// Running per-roster transaction counts, fed one week at a time.
#[derive(Debug, Clone, Default)]
pub struct TransactionTally {
    pub counts: HashMap<i64, u32>,
    empty_streak: u32,
}

impl TransactionTally {
    /// Consecutive empty weeks after which the season is treated as over.
    pub const EMPTY_WEEKS_TO_STOP: u32 = 3;

    /// Count each transaction once per involved roster. Returns `false` once
    /// enough empty weeks have gone by that later weeks are not worth fetching.
    pub fn add_week(&mut self, txs: &[Transaction]) -> bool {
        if txs.is_empty() {
            self.empty_streak += 1;
            return self.empty_streak < Self::EMPTY_WEEKS_TO_STOP;
        }
        self.empty_streak = 0;
        for tx in txs {
            for &rid in tx.roster_ids.iter().flatten() {
                *self.counts.entry(rid).or_default() += 1;
            }
        }
        true
    }
}

/// Everything a season's standings rows are built from.
#[derive(Debug, Clone, Default)]
pub struct SeasonInputs {
    pub users: Vec<User>,
    pub rosters: Vec<Roster>,
    pub draft_slots: HashMap<i64, u32>,
    pub playoffs: PlayoffRecords,
    pub transactions: HashMap<i64, u32>,
}

/// One row per roster, sorted like a standings page: wins, then points for.
pub fn season_rows(season: &str, inputs: &SeasonInputs) -> Vec<StandingsRow> {
    let users = user_map(&inputs.users);
    let mut rows: Vec<StandingsRow> = inputs
        .rosters
        .iter()
        .map(|r| {
            let settings = r.settings.clone().unwrap_or_default();
            let (username, display_name) = r
                .owner_id
                .as_ref()
                .and_then(|id| users.get(id))
                .cloned()
                .unwrap_or_default();
            let rid = r.roster_id;
            StandingsRow {
                season: season.to_string(),
                draft_slot: inputs.draft_slots.get(&rid).copied(),
                roster_id: rid,
                username,
                display_name,
                wins: settings.wins,
                losses: settings.losses,
                pf: to_points(settings.fpts, settings.fpts_decimal),
                max_pf: to_points(settings.ppts, settings.ppts_decimal),
                pa: to_points(settings.fpts_against, settings.fpts_against_decimal),
                playoff_wins: inputs.playoffs.wins.get(&rid).copied().unwrap_or(0),
                playoff_losses: inputs.playoffs.losses.get(&rid).copied().unwrap_or(0),
                champion: if inputs.playoffs.champion == Some(rid) {
                    "Y".to_string()
                } else {
                    "N".to_string()
                },
                total_transactions: inputs.transactions.get(&rid).copied().unwrap_or(0),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.wins
            .unwrap_or(0)
            .cmp(&a.wins.unwrap_or(0))
            .then_with(|| b.pf.unwrap_or(0.0).total_cmp(&a.pf.unwrap_or(0.0)))
    });
    rows
}

async fn fetch_draft_slots(client: &SleeperClient, league_id: &str) -> SleeperResult<HashMap<i64, u32>> {
    let drafts = client.drafts(league_id).await?;
    let Some(draft_id) = pick_draft_id(&drafts) else {
        debug!(league_id, "no draft found");
        return Ok(HashMap::new());
    };
    Ok(client
        .draft(&draft_id)
        .await?
        .map(|d| draft_slots(&d))
        .unwrap_or_default())
}

async fn fetch_transactions(
    client: &SleeperClient,
    league_id: &str,
    max_weeks: u32,
) -> SleeperResult<HashMap<i64, u32>> {
    let mut tally = TransactionTally::default();
    for week in 1..=max_weeks {
        let txs = client.transactions(league_id, week).await?;
        debug!(league_id, week, count = txs.len(), "transactions");
        if !tally.add_week(&txs) {
            break;
        }
    }
    Ok(tally.counts)
}

/// Pull every input for one season and build its standings rows.
#[instrument(level = "info", skip(client))]
pub async fn pull_season(
    client: &SleeperClient,
    season: &str,
    league_id: &str,
    max_transaction_weeks: u32,
    champion_bracket_wins: u32,
) -> SleeperResult<Vec<StandingsRow>> {
    let users = client.users(league_id).await?;
    let draft_slots = fetch_draft_slots(client, league_id).await?;
    let winners = client.winners_bracket(league_id).await?;
    let losers = client.losers_bracket(league_id).await?;
    let playoffs = playoff_records(&winners, &losers, champion_bracket_wins);
    let transactions = fetch_transactions(client, league_id, max_transaction_weeks).await?;
    let rosters = client.rosters(league_id).await?;

    let inputs = SeasonInputs {
        users,
        rosters,
        draft_slots,
        playoffs,
        transactions,
    };
    let rows = season_rows(season, &inputs);
    info!(season, rows = rows.len(), champion = ?inputs.playoffs.champion, "pulled season");
    Ok(rows)
}
