//! Seams between the load driver and the outside world
//!
//! The browser build implements these with `fetch`, the DOM and
//! `setTimeout`; tests implement them with in-memory mocks.

use futures::future::LocalBoxFuture;

use crate::controller::StatsDisplay;
use crate::error::LoadError;
use crate::filter::LeaderboardQuery;
use crate::model::LeaderboardResponse;

/// Where leaderboard data comes from
pub trait LeaderboardSource {
    /// Start fetching `query`.
    ///
    /// Dropping the returned future gives the request up; implementations
    /// should abort the underlying transfer when they can.
    fn fetch(&self, query: &LeaderboardQuery)
        -> LocalBoxFuture<'static, Result<LeaderboardResponse, LoadError>>;
}

/// Where rendered output goes
pub trait Surface {
    /// Replace the leaderboard content area
    fn set_content(&self, html: &str);

    fn set_stats(&self, stats: &StatsDisplay);

    /// Show the "last updated" time, in ms since the epoch
    fn set_last_updated(&self, timestamp_ms: f64);
}

/// Wall clock and timers
pub trait Clock {
    /// Milliseconds since the epoch
    fn now_ms(&self) -> f64;

    /// Resolves after `ms`; dropping it early cancels the timer
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()>;
}
