//! Leaderboard payload types as served by the ranking endpoint

use chrono::{DateTime, NaiveDateTime};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::LoadError;

/// Skill verdict the analyzer assigned to a player
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Verdict {
    Accurate,
    SlightlyRusty,
    Rusty,
    Overranked,
    Inactive,
    Insufficient,
    Expired,
    /// A verdict this build does not know; kept verbatim
    Unknown(String),
}

impl Verdict {
    /// All verdicts the analyzer is known to emit
    pub fn known() -> [Verdict; 7] {
        [
            Verdict::Accurate,
            Verdict::SlightlyRusty,
            Verdict::Rusty,
            Verdict::Overranked,
            Verdict::Inactive,
            Verdict::Insufficient,
            Verdict::Expired,
        ]
    }

    pub fn parse(raw: &str) -> Self {
        Verdict::from(raw.to_string())
    }

    /// Wire value, e.g. `slightly_rusty`
    pub fn as_str(&self) -> &str {
        match self {
            Verdict::Accurate => "accurate",
            Verdict::SlightlyRusty => "slightly_rusty",
            Verdict::Rusty => "rusty",
            Verdict::Overranked => "overranked",
            Verdict::Inactive => "inactive",
            Verdict::Insufficient => "insufficient",
            Verdict::Expired => "expired",
            Verdict::Unknown(raw) => raw,
        }
    }

    /// Badge label; unknown verdicts show their raw value
    pub fn label(&self) -> &str {
        match self {
            Verdict::Accurate => "Accurate",
            Verdict::SlightlyRusty => "Slightly",
            Verdict::Rusty => "Rusty",
            Verdict::Overranked => "Overranked",
            Verdict::Inactive => "Inactive",
            Verdict::Insufficient => "Insufficient",
            Verdict::Expired => "Expired",
            Verdict::Unknown(raw) => raw,
        }
    }

    pub fn css_class(&self) -> String {
        format!("verdict-{}", self.as_str())
    }
}

impl Default for Verdict {
    fn default() -> Self {
        Verdict::Unknown("unknown".to_string())
    }
}

impl From<String> for Verdict {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "accurate" => Verdict::Accurate,
            "slightly_rusty" => Verdict::SlightlyRusty,
            "rusty" => Verdict::Rusty,
            "overranked" => Verdict::Overranked,
            "inactive" => Verdict::Inactive,
            "insufficient" => Verdict::Insufficient,
            "expired" => Verdict::Expired,
            _ => Verdict::Unknown(raw),
        }
    }
}

impl From<Verdict> for String {
    fn from(verdict: Verdict) -> Self {
        verdict.as_str().to_string()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ranked player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    #[serde(default)]
    pub rank: u32,
    /// Position on the game's own global ranking
    #[serde(default)]
    pub rank_global: Option<u64>,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub recent_skill: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub peak_skill: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub skill_match: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub confidence: f64,
    #[serde(default)]
    pub verdict: Verdict,
    /// ISO-8601 time of the analysis behind this row
    #[serde(default)]
    pub analysis_timestamp: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub osu_id: Option<u64>,
    #[serde(default)]
    pub pp: Option<f64>,
    #[serde(default)]
    pub skill_score: Option<f64>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl LeaderboardEntry {
    /// Analysis time in ms since the epoch, if present and parseable
    pub fn analysis_time_ms(&self) -> Option<f64> {
        let raw = self.analysis_timestamp.as_deref()?;
        let parsed = parse_timestamp_ms(raw);
        if parsed.is_none() {
            warn!("Unreadable analysis timestamp {:?} for {}", raw, self.username);
        }
        parsed
    }

    /// Whether the analysis behind this row is older than `max_age_ms`
    pub fn is_analysis_stale(&self, now_ms: f64, max_age_ms: f64) -> bool {
        self.analysis_time_ms()
            .is_some_and(|analysed| now_ms - analysed > max_age_ms)
    }
}

/// Aggregates over the whole (filtered) leaderboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub total_players: u64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub avg_skill: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub top_skill: f64,
    /// Percentage
    #[serde(default, deserialize_with = "zero_if_null")]
    pub avg_confidence: f64,
}

/// A successful leaderboard answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub stats: Stats,
    /// Server time in ms since the epoch
    #[serde(default)]
    pub timestamp: Option<f64>,
}

/// Filters the endpoint echoes back
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EchoedFilters {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub verdict: Option<String>,
}

/// Raw endpoint body: either a leaderboard or `{ "error": ... }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiPayload {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub leaderboard: Option<Vec<LeaderboardEntry>>,
    #[serde(default)]
    pub stats: Option<Stats>,
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub total_entries: Option<u64>,
    #[serde(default)]
    pub filters: Option<EchoedFilters>,
}

impl ApiPayload {
    pub fn from_json(body: &str) -> Result<Self, LoadError> {
        serde_json::from_str(body).map_err(|e| LoadError::Decode(e.to_string()))
    }

    /// An `error` field wins over any data sent alongside it.
    pub fn into_response(self) -> Result<LeaderboardResponse, LoadError> {
        if let Some(error) = self.error.filter(|e| !e.is_empty()) {
            return Err(LoadError::Server(error));
        }
        let leaderboard = self
            .leaderboard
            .ok_or_else(|| LoadError::Decode("missing leaderboard".to_string()))?;
        let stats = self
            .stats
            .ok_or_else(|| LoadError::Decode("missing stats".to_string()))?;

        Ok(LeaderboardResponse {
            leaderboard,
            stats,
            timestamp: self.timestamp,
        })
    }
}

/// Parse an ISO-8601 timestamp into ms since the epoch.
///
/// Offsets are honoured; timestamps without one are taken as UTC.
pub fn parse_timestamp_ms(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis() as f64);
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc().timestamp_millis() as f64)
}

fn zero_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}
