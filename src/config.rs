// src/config.rs

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{debug, info};

use crate::aggregate::{AggregateConfig, EraWeights};
use crate::schema::ColumnAliases;
use crate::score::{Eligibility, ScoreWeights};

/// Upper bound on `sleeper.max_retries`; backoff doubles per attempt.
pub const MAX_RETRIES: u32 = 10;

/// Everything tunable, loaded from an optional YAML file. Missing keys fall
/// back to their defaults section by section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub columns: ColumnAliases,
    pub scoring: ScoringConfig,
    pub sleeper: SleeperConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub era: EraWeights,
    pub stats_from_year: Option<i32>,
    pub weights: ScoreWeights,
    pub eligibility: Eligibility,
}

impl ScoringConfig {
    pub fn aggregate_config(&self) -> AggregateConfig {
        AggregateConfig {
            era: self.era,
            stats_from_year: self.stats_from_year,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleeperConfig {
    pub base_url: String,
    /// Most recent league; older seasons are found through `previous_league_id`.
    pub league_id: String,
    pub seasons: Vec<String>,
    pub request_delay_ms: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub timeout_secs: u64,
    pub max_transaction_weeks: u32,
    /// Winners-bracket wins that make a champion when no game carries a placement.
    pub champion_bracket_wins: u32,
    /// Weeks scanned by the weekly high-scorer pull.
    pub weeks: Vec<u32>,
}

impl Default for SleeperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.sleeper.app/v1".to_string(),
            league_id: "1257104872696713216".to_string(),
            seasons: ["2025", "2024", "2023", "2022"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            request_delay_ms: 200,
            max_retries: 3,
            initial_backoff_ms: 500,
            timeout_secs: 30,
            max_transaction_weeks: 18,
            champion_bracket_wins: 2,
            weeks: (1..=15).collect(),
        }
    }
}

impl AppConfig {
    /// Read and validate a YAML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        let cfg = Self::from_yaml(&text).with_context(|| format!("in config {:?}", path))?;
        info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// `path` when given, built-in defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                debug!("no config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Self = serde_yaml::from_str(text).context("parsing YAML config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.sleeper;
        if s.league_id.trim().is_empty() {
            bail!("sleeper.league_id must not be empty");
        }
        if s.champion_bracket_wins == 0 {
            bail!("sleeper.champion_bracket_wins must be at least 1");
        }
        if s.max_retries > MAX_RETRIES {
            bail!(
                "sleeper.max_retries is {}; at most {} retries are allowed",
                s.max_retries,
                MAX_RETRIES
            );
        }
        if let Some(w) = s.weeks.iter().find(|&&w| w == 0) {
            bail!("sleeper.weeks contains week {}; weeks start at 1", w);
        }
        let e = &self.scoring.era;
        if !(e.early_weight.is_finite() && e.modern_weight.is_finite()) {
            bail!("scoring.era weights must be finite numbers");
        }
        Ok(())
    }
}

/// Parse a week list such as `1-15`, `3` or `1-4,9,12-13`.
pub fn parse_weeks(list: &str) -> Result<Vec<u32>> {
    let mut weeks = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((a, b)) => {
                let start: u32 = a.trim().parse().with_context(|| format!("bad week {:?}", a))?;
                let end: u32 = b.trim().parse().with_context(|| format!("bad week {:?}", b))?;
                if start == 0 || end < start {
                    bail!("bad week range {:?}", part);
                }
                weeks.extend(start..=end);
            }
            None => {
                let w: u32 = part.parse().with_context(|| format!("bad week {:?}", part))?;
                if w == 0 {
                    bail!("weeks start at 1");
                }
                weeks.push(w);
            }
        }
    }
    if weeks.is_empty() {
        bail!("no weeks given");
    }
    Ok(weeks)
}
