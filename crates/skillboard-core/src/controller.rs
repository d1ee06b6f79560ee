//! The leaderboard view-controller and its load driver

use std::cell::RefCell;

use futures::future::{self, Either};
use log::{debug, error, info};

use crate::board::Board;
use crate::cache::ResponseCache;
use crate::config::ViewConfig;
use crate::error::LoadError;
use crate::filter::{parse_limit, LeaderboardQuery, VerdictFilter};
use crate::format::{one_decimal, percent};
use crate::markup::{self, RowContext};
use crate::model::{LeaderboardEntry, LeaderboardResponse, Stats};
use crate::sequence::{Debounce, Generation, Ticket};
use crate::source::{Clock, LeaderboardSource, Surface};

/// Stats cells, already formatted
#[derive(Debug, Clone, PartialEq)]
pub struct StatsDisplay {
    pub total_players: String,
    pub avg_skill: String,
    pub top_skill: String,
    pub avg_confidence: String,
}

impl From<&Stats> for StatsDisplay {
    fn from(stats: &Stats) -> Self {
        Self {
            total_players: stats.total_players.to_string(),
            avg_skill: one_decimal(stats.avg_skill),
            top_skill: one_decimal(stats.top_skill),
            avg_confidence: percent(stats.avg_confidence),
        }
    }
}

/// Everything a finished load changes on the page
#[derive(Debug, Clone, PartialEq)]
pub struct ViewUpdate {
    pub content: String,
    pub stats: Option<StatsDisplay>,
    pub last_updated_ms: Option<f64>,
}

impl ViewUpdate {
    pub fn apply(&self, surface: &(impl Surface + ?Sized)) {
        if let Some(stats) = &self.stats {
            surface.set_stats(stats);
        }
        surface.set_content(&self.content);
        if let Some(timestamp) = self.last_updated_ms {
            surface.set_last_updated(timestamp);
        }
    }
}

/// A network load that has been started and not yet settled
#[derive(Debug)]
pub struct PendingLoad {
    ticket: Ticket,
    pub query: LeaderboardQuery,
}

/// What [`LeaderboardController::begin_load`] decided
#[derive(Debug)]
pub enum LoadStep {
    /// Served from cache; apply and stop
    Ready(ViewUpdate),
    /// Show the loading state and fetch
    Fetch(PendingLoad),
}

/// Owns all page state of the leaderboard view.
///
/// Only the most recently started load may change what is displayed; a load
/// that is overtaken by a newer one, or that lost the race against its
/// timeout, is dropped when it settles.
#[derive(Debug)]
pub struct LeaderboardController {
    config: ViewConfig,
    viewer: String,
    query: LeaderboardQuery,
    cache: ResponseCache,
    snapshot: Vec<LeaderboardEntry>,
    loads: Generation,
    filter_changes: Debounce<LeaderboardQuery>,
}

impl LeaderboardController {
    pub fn new(viewer: impl Into<String>, config: ViewConfig) -> Self {
        Self {
            query: config.initial_query(),
            cache: ResponseCache::new(f64::from(config.cache_ttl_ms)),
            viewer: viewer.into(),
            snapshot: Vec::new(),
            loads: Generation::default(),
            filter_changes: Debounce::default(),
            config,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn query(&self) -> &LeaderboardQuery {
        &self.query
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Rows of the last accepted response
    pub fn snapshot(&self) -> &[LeaderboardEntry] {
        &self.snapshot
    }

    pub fn set_query(&mut self, query: LeaderboardQuery) {
        self.query = query;
    }

    /// Record raw control values; they take effect when the returned ticket
    /// is passed to [`Self::apply_filter_change`] after the debounce delay.
    pub fn schedule_filter_change(&mut self, verdict: &str, limit: &str) -> Ticket {
        let query = LeaderboardQuery::new(
            VerdictFilter::parse(verdict),
            parse_limit(limit, self.query.limit),
        );
        self.filter_changes.schedule(query)
    }

    /// Adopt the scheduled filters if `ticket` is still the latest change
    pub fn apply_filter_change(&mut self, ticket: Ticket) -> bool {
        match self.filter_changes.fire(ticket) {
            Some(query) => {
                self.query = query;
                true
            }
            None => false,
        }
    }

    pub fn begin_load(&mut self, use_cache: bool, now_ms: f64) -> LoadStep {
        // Any load started now overtakes whatever is still in flight
        let ticket = self.loads.advance();
        let query = self.query.clone();

        if use_cache {
            if let Some(entry) = self.cache.get(&query, now_ms) {
                debug!(
                    "Using cached leaderboard for {} (limit {})",
                    query.filter.as_query_value(),
                    query.limit
                );
                let payload = entry.payload.clone();
                let last_updated = payload.timestamp.unwrap_or(now_ms);
                return LoadStep::Ready(self.accept(payload, now_ms, last_updated));
            }
        }

        LoadStep::Fetch(PendingLoad { ticket, query })
    }

    /// Settle `load`. `None` means a newer load owns the page.
    pub fn finish_load(
        &mut self,
        load: PendingLoad,
        result: Result<LeaderboardResponse, LoadError>,
        now_ms: f64,
    ) -> Option<ViewUpdate> {
        if !self.loads.is_current(load.ticket) {
            debug!(
                "Discarding superseded leaderboard load for {} (limit {})",
                load.query.filter.as_query_value(),
                load.query.limit
            );
            return None;
        }
        // Settles once
        self.loads.invalidate();

        match result {
            Ok(payload) => {
                info!(
                    "Loaded {} leaderboard rows for {}",
                    payload.leaderboard.len(),
                    load.query.filter.as_query_value()
                );
                self.cache.insert(load.query, payload.clone(), now_ms);
                let purged = self.cache.sweep(now_ms);
                if purged > 0 {
                    debug!("Purged {} expired leaderboard cache entries", purged);
                }
                Some(self.accept(payload, now_ms, now_ms))
            }
            Err(err) => {
                error!("Leaderboard load error: {}", err);
                Some(ViewUpdate {
                    content: markup::error_state(&err.to_string()),
                    stats: None,
                    last_updated_ms: None,
                })
            }
        }
    }

    fn accept(
        &mut self,
        payload: LeaderboardResponse,
        now_ms: f64,
        last_updated_ms: f64,
    ) -> ViewUpdate {
        let stats = StatsDisplay::from(&payload.stats);
        self.snapshot = payload.leaderboard;
        ViewUpdate {
            content: self.render(now_ms),
            stats: Some(stats),
            last_updated_ms: Some(last_updated_ms),
        }
    }

    /// Markup for the current snapshot under the current filters
    pub fn render(&self, now_ms: f64) -> String {
        let ctx = RowContext {
            now_ms,
            expiry_ms: f64::from(self.config.expiry_ms),
            fallback_avatar: &self.config.fallback_avatar,
        };
        Board::partition(
            &self.snapshot,
            &self.viewer,
            &self.query.filter,
            self.query.limit,
        )
        .render(&ctx)
    }
}

/// Run one load of the leaderboard against `source`, drawing onto `surface`.
///
/// The fetch races a timeout of `load_timeout_ms`; whichever loses is
/// dropped, which cancels the timer or gives up the request. The controller
/// is never borrowed across an await.
pub async fn load_leaderboard<S, D, C>(
    view: &RefCell<LeaderboardController>,
    source: &S,
    surface: &D,
    clock: &C,
    use_cache: bool,
) where
    S: LeaderboardSource + ?Sized,
    D: Surface + ?Sized,
    C: Clock + ?Sized,
{
    let step = view.borrow_mut().begin_load(use_cache, clock.now_ms());
    let pending = match step {
        LoadStep::Ready(update) => {
            update.apply(surface);
            return;
        }
        LoadStep::Fetch(pending) => pending,
    };

    surface.set_content(&markup::loading_state());

    let timeout_ms = view.borrow().config().load_timeout_ms;
    let fetch = source.fetch(&pending.query);
    let timeout = clock.sleep(timeout_ms);

    let result = match future::select(fetch, timeout).await {
        Either::Left((result, _timer)) => result,
        Either::Right(((), _request)) => Err(LoadError::Timeout),
    };

    let update = view
        .borrow_mut()
        .finish_load(pending, result, clock.now_ms());
    if let Some(update) = update {
        update.apply(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Verdict;
    use crate::testing::{entry, ranked, response, MockClock, MockSource, MockSurface};
    use futures::executor::block_on;

    fn controller(viewer: &str) -> RefCell<LeaderboardController> {
        RefCell::new(LeaderboardController::new(viewer, ViewConfig::default()))
    }

    #[test]
    fn test_fresh_load_renders_and_caches() {
        let view = controller("");
        let source = MockSource::new();
        source.respond(Ok(response(vec![entry("a", 1, Verdict::Rusty)])));
        let surface = MockSurface::default();
        let clock = MockClock::at(1_000.0);

        block_on(load_leaderboard(&view, &source, &surface, &clock, false));

        assert_eq!(source.calls(), 1);
        assert!(surface.content().contains(">Rusty</span>"));
        assert_eq!(surface.stats().unwrap().avg_confidence, "50.0%");
        assert_eq!(surface.last_updated(), Some(1_000.0));
        assert_eq!(surface.content_history()[0], markup::loading_state());
        assert_eq!(view.borrow().cache().len(), 1);
        assert_eq!(view.borrow().snapshot().len(), 1);
        assert_eq!(clock.active_timers(), 0);
    }

    #[test]
    fn test_fresh_cache_skips_network() {
        let view = controller("");
        let source = MockSource::new();
        let mut payload = response(ranked(5, Verdict::Accurate));
        payload.timestamp = Some(555.0);
        source.respond(Ok(payload));
        let surface = MockSurface::default();
        let clock = MockClock::at(0.0);

        block_on(load_leaderboard(&view, &source, &surface, &clock, false));
        let first_render = surface.content();

        clock.set(29_999.0);
        block_on(load_leaderboard(&view, &source, &surface, &clock, true));

        assert_eq!(source.calls(), 1);
        assert_eq!(surface.content(), first_render);
        // No loading placeholder on the cached path
        assert_eq!(
            surface
                .content_history()
                .iter()
                .filter(|html| **html == markup::loading_state())
                .count(),
            1
        );
        // Cached renders show the server timestamp
        assert_eq!(surface.last_updated(), Some(555.0));
    }

    #[test]
    fn test_cache_bypassed_when_stale_or_forced() {
        let view = controller("");
        let source = MockSource::new();
        source.respond(Ok(response(ranked(2, Verdict::Accurate))));
        let surface = MockSurface::default();
        let clock = MockClock::at(0.0);

        block_on(load_leaderboard(&view, &source, &surface, &clock, true));
        block_on(load_leaderboard(&view, &source, &surface, &clock, false));
        assert_eq!(source.calls(), 2);

        clock.set(30_000.0);
        block_on(load_leaderboard(&view, &source, &surface, &clock, true));
        assert_eq!(source.calls(), 3);
    }

    #[test]
    fn test_old_entries_swept_on_next_fetch() {
        let view = controller("");
        let source = MockSource::new();
        source.respond(Ok(response(ranked(2, Verdict::Rusty))));
        let surface = MockSurface::default();
        let clock = MockClock::at(0.0);

        block_on(load_leaderboard(&view, &source, &surface, &clock, false));
        let first_key = view.borrow().query().clone();

        view.borrow_mut()
            .set_query(LeaderboardQuery::new(VerdictFilter::Only(Verdict::Rusty), 50));
        clock.set(60_001.0);
        block_on(load_leaderboard(&view, &source, &surface, &clock, true));

        let view = view.borrow();
        assert!(!view.cache().contains(&first_key));
        assert!(view.cache().contains(view.query()));
        assert_eq!(view.cache().len(), 1);
    }

    #[test]
    fn test_timeout_renders_error_and_clears_timer() {
        let view = controller("");
        let source = MockSource::new();
        source.hang();
        let surface = MockSurface::default();
        let clock = MockClock::at(0.0);
        clock.expire_sleeps();

        block_on(load_leaderboard(&view, &source, &surface, &clock, false));

        assert!(surface.content().contains("Loading timeout"));
        assert!(surface.content().contains(r#"data-action="reload""#));
        assert_eq!(clock.requested(), vec![10_000]);
        assert_eq!(clock.active_timers(), 0);
        assert_eq!(source.dropped(), 1);
        assert!(surface.stats().is_none());
    }

    #[test]
    fn test_failures_render_error_state() {
        let view = controller("");
        let source = MockSource::new();
        source.respond(Err(LoadError::Http {
            status: 502,
            status_text: "Bad Gateway".to_string(),
        }));
        let surface = MockSurface::default();
        let clock = MockClock::at(0.0);

        block_on(load_leaderboard(&view, &source, &surface, &clock, false));
        assert!(surface.content().contains("HTTP 502: Bad Gateway"));
        assert!(surface.content().contains("Try Again"));
        assert!(view.borrow().cache().is_empty());
        assert_eq!(clock.active_timers(), 0);

        source.respond(Err(LoadError::Server("Rate limited".to_string())));
        block_on(load_leaderboard(&view, &source, &surface, &clock, false));
        assert!(surface.content().contains("<p>Rate limited</p>"));
    }

    #[test]
    fn test_superseded_load_is_discarded() {
        let mut view = LeaderboardController::new("", ViewConfig::default());
        let old = match view.begin_load(false, 0.0) {
            LoadStep::Fetch(pending) => pending,
            LoadStep::Ready(_) => panic!("nothing cached yet"),
        };
        let newer = match view.begin_load(false, 1.0) {
            LoadStep::Fetch(pending) => pending,
            LoadStep::Ready(_) => panic!("nothing cached yet"),
        };

        let fresh = view.finish_load(newer, Ok(response(ranked(3, Verdict::Accurate))), 2.0);
        assert!(fresh.is_some());

        let stale = view.finish_load(old, Ok(response(ranked(9, Verdict::Rusty))), 3.0);
        assert!(stale.is_none());
        assert_eq!(view.snapshot().len(), 3);
    }

    #[test]
    fn test_cached_render_overtakes_inflight_load() {
        let mut view = LeaderboardController::new("", ViewConfig::default());
        let first = match view.begin_load(false, 0.0) {
            LoadStep::Fetch(pending) => pending,
            LoadStep::Ready(_) => panic!("nothing cached yet"),
        };
        assert!(view
            .finish_load(first, Ok(response(ranked(2, Verdict::Accurate))), 0.0)
            .is_some());

        let slow = match view.begin_load(false, 10.0) {
            LoadStep::Fetch(pending) => pending,
            LoadStep::Ready(_) => panic!("forced loads skip the cache"),
        };
        assert!(matches!(view.begin_load(true, 20.0), LoadStep::Ready(_)));
        assert!(view
            .finish_load(slow, Ok(response(ranked(7, Verdict::Rusty))), 30.0)
            .is_none());
        assert_eq!(view.snapshot().len(), 2);
    }

    #[test]
    fn test_filter_debounce_uses_latest_change() {
        let view = controller("");
        let first = view.borrow_mut().schedule_filter_change("rusty", "10");
        let second = view.borrow_mut().schedule_filter_change("accurate", "25");

        assert!(!view.borrow_mut().apply_filter_change(first));
        assert!(view.borrow_mut().apply_filter_change(second));
        let query = view.borrow().query().clone();
        assert_eq!(query, LeaderboardQuery::new(VerdictFilter::Only(Verdict::Accurate), 25));

        let source = MockSource::new();
        source.respond(Ok(response(ranked(3, Verdict::Accurate))));
        block_on(load_leaderboard(
            &view,
            &source,
            &MockSurface::default(),
            &MockClock::at(0.0),
            true,
        ));
        assert_eq!(source.calls(), 1);
        assert_eq!(source.queries(), vec![query]);
    }

    #[test]
    fn test_viewer_position_section() {
        let view = controller("player3");
        let source = MockSource::new();
        source.respond(Ok(response(ranked(10, Verdict::Accurate))));
        let surface = MockSurface::default();

        block_on(load_leaderboard(&view, &source, &surface, &MockClock::at(0.0), false));

        let html = surface.content();
        assert!(html.contains("Your Position"));
        assert!(html.contains("Global Leaderboard"));
        assert_eq!(html.matches("you-badge").count(), 1);
    }

    #[test]
    fn test_driver_accepts_trait_objects() {
        let view = controller("");
        let source = MockSource::new();
        source.respond(Ok(response(ranked(3, Verdict::Accurate))));
        let surface = MockSurface::default();
        let clock = MockClock::at(2_000.0);

        let dyn_source: &dyn LeaderboardSource = &source;
        let dyn_surface: &dyn Surface = &surface;
        let dyn_clock: &dyn Clock = &clock;

        block_on(load_leaderboard(&view, dyn_source, dyn_surface, dyn_clock, false));
        assert!(surface.content().contains("player3"));

        // Second pass is served from cache through the same trait objects
        block_on(load_leaderboard(&view, dyn_source, dyn_surface, dyn_clock, true));
        assert_eq!(source.calls(), 1);
        assert_eq!(surface.last_updated(), Some(2_000.0));
    }

    #[test]
    fn test_stats_display() {
        let stats = Stats {
            total_players: 1204,
            avg_skill: 6.04,
            top_skill: 9.87,
            avg_confidence: 71.26,
        };
        let display = StatsDisplay::from(&stats);
        assert_eq!(display.total_players, "1204");
        assert_eq!(display.avg_skill, "6.0");
        assert_eq!(display.top_skill, "9.9");
        assert_eq!(display.avg_confidence, "71.3%");
    }
}
