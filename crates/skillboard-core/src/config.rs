//! Tunables for the leaderboard view and the navigation overlay
//!
//! Both configs are handed over from page script as plain objects, so every
//! field is optional and falls back to its default.

use serde::{Deserialize, Serialize};

use crate::filter::{LeaderboardQuery, VerdictFilter, DEFAULT_LIMIT};

pub const DEFAULT_FALLBACK_AVATAR: &str = "https://a.ppy.sh/14752899?1628953484.png";

/// Configuration for the leaderboard view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfig {
    /// Leaderboard endpoint, queried with `verdict` and `limit`
    pub endpoint: String,
    /// How long a cached response is served without a request
    pub cache_ttl_ms: u32,
    /// How long a request may take before it is given up
    pub load_timeout_ms: u32,
    /// Quiet period after a filter change before reloading
    pub debounce_ms: u32,
    /// Interval of the forced background reload
    pub auto_refresh_ms: u32,
    /// Analyses older than this get an "Expired" annotation
    pub expiry_ms: u32,
    pub fallback_avatar: String,
    pub initial_filter: String,
    pub initial_limit: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            endpoint: "/api/leaderboard".to_string(),
            cache_ttl_ms: 30_000,
            load_timeout_ms: 10_000,
            debounce_ms: 300,
            auto_refresh_ms: 300_000,
            expiry_ms: 24 * 60 * 60 * 1000,
            fallback_avatar: DEFAULT_FALLBACK_AVATAR.to_string(),
            initial_filter: "all".to_string(),
            initial_limit: DEFAULT_LIMIT,
        }
    }
}

impl ViewConfig {
    pub fn initial_query(&self) -> LeaderboardQuery {
        LeaderboardQuery::new(VerdictFilter::parse(&self.initial_filter), self.initial_limit)
    }
}

/// Configuration for the navigation overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderConfig {
    /// The overlay hides itself after this long no matter what
    pub failsafe_ms: u32,
    /// Delay between a trigger and the overlay appearing
    pub show_delay_ms: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            failsafe_ms: 10_000,
            show_delay_ms: 50,
        }
    }
}
