// src/fetch/client.rs

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};
use url::Url;

use super::types::{BracketMatch, Draft, DraftSummary, League, Matchup, Roster, Transaction, User};
use crate::config::SleeperConfig;
use crate::error::SleeperError;

pub type SleeperResult<T> = std::result::Result<T, SleeperError>;

/// Pause before retry number `attempt` (1-based): `initial`, then doubling.
/// Saturates instead of overflowing for silly retry counts.
pub fn backoff_ms(initial: u64, attempt: u32) -> u64 {
    let factor = 2u64.checked_pow(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    initial.saturating_mul(factor)
}

/// Thin read-only client for the Sleeper v1 REST API.
///
/// Requests run one at a time with a fixed pause after each, and transport or
/// 5xx failures are retried with exponential backoff.
#[derive(Clone)]
pub struct SleeperClient {
    http: Client,
    base: Url,
    delay: Duration,
    max_retries: u32,
    initial_backoff_ms: u64,
}

impl SleeperClient {
    pub fn new(cfg: &SleeperConfig) -> SleeperResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        // Url::join drops the last segment unless the base ends in '/'.
        let mut base = cfg.base_url.trim_end_matches('/').to_string();
        base.push('/');
        Ok(Self {
            http,
            base: Url::parse(&base)?,
            delay: Duration::from_millis(cfg.request_delay_ms),
            max_retries: cfg.max_retries,
            initial_backoff_ms: cfg.initial_backoff_ms,
        })
    }

    pub fn endpoint(&self, path: &str) -> SleeperResult<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    async fn get_json_core<T: DeserializeOwned>(&self, url: &Url) -> SleeperResult<T> {
        debug!("GET {}", url);
        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SleeperError::Status {
                url: url.to_string(),
                status,
            });
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|source| SleeperError::Json {
            url: url.to_string(),
            source,
        })
    }

    /// GET `path` relative to the API root and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> SleeperResult<T> {
        let url = self.endpoint(path)?;
        let mut attempts = 0;
        let result = loop {
            match self.get_json_core(&url).await {
                Ok(v) => break Ok(v),
                Err(e) if e.is_retryable() && attempts < self.max_retries => {
                    attempts += 1;
                    let backoff = backoff_ms(self.initial_backoff_ms, attempts);
                    warn!(%url, attempt = attempts, delay_ms = backoff, error = %e, "Retrying");
                    sleep(Duration::from_millis(backoff)).await;
                }
                Err(e) => {
                    if e.is_retryable() {
                        error!(%url, error = %e, "Exhausted retries");
                    }
                    break Err(e);
                }
            }
        };
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        result
    }

    /// `None` when the league id is unknown (the API answers `null`).
    pub async fn league(&self, league_id: &str) -> SleeperResult<Option<League>> {
        self.get_json(&format!("league/{}", league_id)).await
    }

    pub async fn users(&self, league_id: &str) -> SleeperResult<Vec<User>> {
        self.get_json(&format!("league/{}/users", league_id)).await
    }

    pub async fn rosters(&self, league_id: &str) -> SleeperResult<Vec<Roster>> {
        self.get_json(&format!("league/{}/rosters", league_id)).await
    }

    pub async fn drafts(&self, league_id: &str) -> SleeperResult<Vec<DraftSummary>> {
        self.get_json(&format!("league/{}/drafts", league_id)).await
    }

    pub async fn draft(&self, draft_id: &str) -> SleeperResult<Option<Draft>> {
        self.get_json(&format!("draft/{}", draft_id)).await
    }

    pub async fn winners_bracket(&self, league_id: &str) -> SleeperResult<Vec<BracketMatch>> {
        let games: Option<Vec<BracketMatch>> = self
            .get_json(&format!("league/{}/winners_bracket", league_id))
            .await?;
        Ok(games.unwrap_or_default())
    }

    /// The API docs spell this endpoint two ways; try the correct one first.
    pub async fn losers_bracket(&self, league_id: &str) -> SleeperResult<Vec<BracketMatch>> {
        let games: Option<Vec<BracketMatch>> = match self
            .get_json(&format!("league/{}/losers_bracket", league_id))
            .await
        {
            Err(SleeperError::Status { status, .. }) => {
                warn!(league_id, %status, "losers_bracket failed, trying loses_bracket");
                self.get_json(&format!("league/{}/loses_bracket", league_id))
                    .await?
            }
            other => other?,
        };
        Ok(games.unwrap_or_default())
    }

    /// Transactions processed in `week` (Sleeper calls it a round).
    pub async fn transactions(&self, league_id: &str, week: u32) -> SleeperResult<Vec<Transaction>> {
        let txs: Option<Vec<Transaction>> = self
            .get_json(&format!("league/{}/transactions/{}", league_id, week))
            .await?;
        Ok(txs.unwrap_or_default())
    }

    pub async fn matchups(&self, league_id: &str, week: u32) -> SleeperResult<Vec<Matchup>> {
        let games: Option<Vec<Matchup>> = self
            .get_json(&format!("league/{}/matchups/{}", league_id, week))
            .await?;
        Ok(games.unwrap_or_default())
    }
}
