//! In-memory stand-ins for the browser seams, used by unit tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;

use crate::controller::StatsDisplay;
use crate::error::LoadError;
use crate::filter::LeaderboardQuery;
use crate::model::{LeaderboardEntry, LeaderboardResponse, Stats, Verdict};
use crate::source::{Clock, LeaderboardSource, Surface};

pub fn entry(username: &str, rank: u32, verdict: Verdict) -> LeaderboardEntry {
    LeaderboardEntry {
        username: username.to_string(),
        rank,
        rank_global: None,
        recent_skill: 5.0,
        peak_skill: 6.0,
        skill_match: 83.3,
        confidence: 50.0,
        verdict,
        analysis_timestamp: None,
        avatar_url: None,
        osu_id: None,
        pp: None,
        skill_score: None,
        updated_at: None,
    }
}

/// `count` players named `player1..` in rank order
pub fn ranked(count: u32, verdict: Verdict) -> Vec<LeaderboardEntry> {
    (1..=count)
        .map(|rank| entry(&format!("player{}", rank), rank, verdict.clone()))
        .collect()
}

pub fn response(leaderboard: Vec<LeaderboardEntry>) -> LeaderboardResponse {
    LeaderboardResponse {
        stats: Stats {
            total_players: leaderboard.len() as u64,
            avg_skill: 10.04,
            top_skill: 10.04,
            avg_confidence: 50.0,
        },
        leaderboard,
        timestamp: None,
    }
}

/// Bumps a counter when dropped
struct DropCounter(Rc<Cell<usize>>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

#[derive(Default)]
struct SourceState {
    reply: Option<Result<LeaderboardResponse, LoadError>>,
    hang: bool,
    queries: Vec<LeaderboardQuery>,
}

/// Source answering every fetch with a canned reply, or never
#[derive(Default)]
pub struct MockSource {
    state: RefCell<SourceState>,
    dropped: Rc<Cell<usize>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, reply: Result<LeaderboardResponse, LoadError>) {
        let mut state = self.state.borrow_mut();
        state.reply = Some(reply);
        state.hang = false;
    }

    /// Make every later fetch pend forever
    pub fn hang(&self) {
        self.state.borrow_mut().hang = true;
    }

    pub fn calls(&self) -> usize {
        self.state.borrow().queries.len()
    }

    pub fn queries(&self) -> Vec<LeaderboardQuery> {
        self.state.borrow().queries.clone()
    }

    /// Hung fetches that were given up
    pub fn dropped(&self) -> usize {
        self.dropped.get()
    }
}

impl LeaderboardSource for MockSource {
    fn fetch(
        &self,
        query: &LeaderboardQuery,
    ) -> LocalBoxFuture<'static, Result<LeaderboardResponse, LoadError>> {
        let mut state = self.state.borrow_mut();
        state.queries.push(query.clone());

        if state.hang {
            let guard = DropCounter(self.dropped.clone());
            return async move {
                let _guard = guard;
                future::pending().await
            }
            .boxed_local();
        }

        let reply = state
            .reply
            .clone()
            .unwrap_or_else(|| Err(LoadError::Network("no reply configured".to_string())));
        future::ready(reply).boxed_local()
    }
}

/// Surface recording everything written to it
#[derive(Default)]
pub struct MockSurface {
    history: RefCell<Vec<String>>,
    stats: RefCell<Option<StatsDisplay>>,
    last_updated: Cell<Option<f64>>,
}

impl MockSurface {
    pub fn content(&self) -> String {
        self.history.borrow().last().cloned().unwrap_or_default()
    }

    pub fn content_history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }

    pub fn stats(&self) -> Option<StatsDisplay> {
        self.stats.borrow().clone()
    }

    pub fn last_updated(&self) -> Option<f64> {
        self.last_updated.get()
    }
}

impl Surface for MockSurface {
    fn set_content(&self, html: &str) {
        self.history.borrow_mut().push(html.to_string());
    }

    fn set_stats(&self, stats: &StatsDisplay) {
        *self.stats.borrow_mut() = Some(stats.clone());
    }

    fn set_last_updated(&self, timestamp_ms: f64) {
        self.last_updated.set(Some(timestamp_ms));
    }
}

/// Hand-driven clock. Sleeps pend forever unless told to expire.
pub struct MockClock {
    now: Cell<f64>,
    expire: Cell<bool>,
    requested: RefCell<Vec<u32>>,
    started: Rc<Cell<usize>>,
    finished: Rc<Cell<usize>>,
}

impl MockClock {
    pub fn at(now_ms: f64) -> Self {
        Self {
            now: Cell::new(now_ms),
            expire: Cell::new(false),
            requested: RefCell::new(Vec::new()),
            started: Rc::new(Cell::new(0)),
            finished: Rc::new(Cell::new(0)),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    /// Make every later sleep resolve immediately
    pub fn expire_sleeps(&self) {
        self.expire.set(true);
    }

    pub fn requested(&self) -> Vec<u32> {
        self.requested.borrow().clone()
    }

    /// Sleeps neither finished nor dropped yet
    pub fn active_timers(&self) -> usize {
        self.started.get() - self.finished.get()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }

    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        self.requested.borrow_mut().push(ms);
        self.started.set(self.started.get() + 1);
        let guard = DropCounter(self.finished.clone());

        if self.expire.get() {
            async move {
                let _guard = guard;
            }
            .boxed_local()
        } else {
            async move {
                let _guard = guard;
                future::pending::<()>().await
            }
            .boxed_local()
        }
    }
}
