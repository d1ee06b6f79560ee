//! Skillboard core
//!
//! Everything the leaderboard page does that does not touch the DOM lives
//! here: payload decoding, the short-lived response cache, row and section
//! markup, the view-controller with its load driver, and the state behind the
//! navigation loading overlay. The browser build in `skillboard-wasm` plugs
//! a DOM surface, a `fetch` transport and real timers into these pieces.

pub mod board;
pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod format;
pub mod loader;
pub mod markup;
pub mod model;
pub mod sequence;
pub mod source;

#[cfg(test)]
mod testing;

pub use board::Board;
pub use cache::{CacheEntry, ResponseCache};
pub use config::{LoaderConfig, ViewConfig};
pub use controller::{
    load_leaderboard, LeaderboardController, LoadStep, PendingLoad, StatsDisplay, ViewUpdate,
};
pub use error::LoadError;
pub use filter::{parse_limit, CacheKey, LeaderboardQuery, VerdictFilter};
pub use loader::{OverlayState, OverlayText};
pub use model::{ApiPayload, LeaderboardEntry, LeaderboardResponse, Stats, Verdict};
pub use sequence::{Debounce, Generation, Ticket};
pub use source::{Clock, LeaderboardSource, Surface};
