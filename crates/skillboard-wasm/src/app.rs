//! Browser wiring of the leaderboard view

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::{Interval, Timeout};
use skillboard_core::markup::RELOAD_ACTION;
use skillboard_core::{load_leaderboard, LeaderboardController, ViewConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event};

use crate::clock::BrowserClock;
use crate::dom::{self, DomSurface, CONTENT_ID, LIMIT_FILTER_ID, VERDICT_FILTER_ID};
use crate::styles::{LEADERBOARD_CSS, LEADERBOARD_STYLE_ID};
use crate::transport::FetchSource;

struct AppInner {
    view: RefCell<LeaderboardController>,
    document: Document,
    surface: DomSurface,
    source: FetchSource,
    clock: BrowserClock,
    debounce_timer: RefCell<Option<Timeout>>,
    refresh_timer: RefCell<Option<Interval>>,
}

impl AppInner {
    fn spawn_load(self: &Rc<Self>, use_cache: bool) {
        let inner = Rc::clone(self);
        spawn_local(async move {
            load_leaderboard(
                &inner.view,
                &inner.source,
                &inner.surface,
                &inner.clock,
                use_cache,
            )
            .await;
        });
    }

    /// Record new filter values and (re)start the quiet period
    fn filters_changed(self: &Rc<Self>, verdict: &str, limit: &str) {
        let (ticket, delay) = {
            let mut view = self.view.borrow_mut();
            let ticket = view.schedule_filter_change(verdict, limit);
            (ticket, view.config().debounce_ms)
        };

        let weak = Rc::downgrade(self);
        let timer = Timeout::new(delay, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let applied = inner.view.borrow_mut().apply_filter_change(ticket);
            if applied {
                inner.spawn_load(true);
            }
        });
        // The previous quiet period is cancelled by the replacement
        self.debounce_timer.borrow_mut().replace(timer);
    }

    fn controls_changed(self: &Rc<Self>) {
        let verdict = dom::control_value(&self.document, VERDICT_FILTER_ID).unwrap_or_default();
        let limit = dom::control_value(&self.document, LIMIT_FILTER_ID).unwrap_or_default();
        self.filters_changed(&verdict, &limit);
    }

    fn bind_controls(self: &Rc<Self>) -> Result<(), JsValue> {
        for id in [VERDICT_FILTER_ID, LIMIT_FILTER_ID] {
            let Some(control) = self.document.get_element_by_id(id) else {
                log::debug!("#{} not on this page", id);
                continue;
            };
            let weak = Rc::downgrade(self);
            dom::listen(&control, "change", move |_event| {
                if let Some(inner) = weak.upgrade() {
                    inner.controls_changed();
                }
            })?;
        }

        let Some(content) = self.document.get_element_by_id(CONTENT_ID) else {
            log::warn!("#{} not found; leaderboard controls not bound", CONTENT_ID);
            return Ok(());
        };
        dom::install_avatar_fallback(&content)?;

        let weak = Rc::downgrade(self);
        dom::listen(&content, "click", move |event: Event| {
            if is_reload_click(&event) {
                if let Some(inner) = weak.upgrade() {
                    inner.spawn_load(false);
                }
            }
        })
    }

    fn start_auto_refresh(self: &Rc<Self>) {
        let period = self.view.borrow().config().auto_refresh_ms;
        if period == 0 {
            return;
        }
        let weak: Weak<Self> = Rc::downgrade(self);
        let interval = Interval::new(period, move || {
            if let Some(inner) = weak.upgrade() {
                inner.spawn_load(false);
            }
        });
        self.refresh_timer.borrow_mut().replace(interval);
    }
}

fn is_reload_click(event: &Event) -> bool {
    let selector = format!(r#"[data-action="{}"]"#, RELOAD_ACTION);
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .and_then(|element| element.closest(&selector).ok().flatten())
        .is_some()
}

/// The leaderboard page: filters, cache, auto-refresh and rendering
#[wasm_bindgen]
pub struct LeaderboardApp {
    inner: Rc<AppInner>,
}

#[wasm_bindgen]
impl LeaderboardApp {
    /// Attach to the current page for `username` (empty when signed out).
    ///
    /// `config` is an optional object of `ViewConfig` fields; the first load
    /// runs as soon as the document has been parsed.
    #[wasm_bindgen(constructor)]
    pub fn new(username: &str, config: JsValue) -> Result<LeaderboardApp, JsValue> {
        let config: ViewConfig = if config.is_undefined() || config.is_null() {
            ViewConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };

        let document = dom::document()?;
        dom::inject_style(&document, LEADERBOARD_STYLE_ID, LEADERBOARD_CSS)?;

        let inner = Rc::new(AppInner {
            source: FetchSource::new(config.endpoint.clone()),
            view: RefCell::new(LeaderboardController::new(username, config)),
            surface: DomSurface::new(document.clone()),
            clock: BrowserClock,
            debounce_timer: RefCell::new(None),
            refresh_timer: RefCell::new(None),
            document: document.clone(),
        });

        let weak = Rc::downgrade(&inner);
        dom::when_ready(&document, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Err(err) = inner.bind_controls() {
                log::error!(
                    "Failed to bind leaderboard controls: {}",
                    crate::transport::js_error_message(err, "unknown error")
                );
            }
            inner.start_auto_refresh();
            inner.spawn_load(false);
        })?;

        Ok(LeaderboardApp { inner })
    }

    /// Reload, serving a fresh cached response when `use_cache` allows
    #[wasm_bindgen]
    pub fn load(&self, use_cache: bool) {
        self.inner.spawn_load(use_cache);
    }

    /// Reload from the network
    #[wasm_bindgen]
    pub fn retry(&self) {
        self.inner.spawn_load(false);
    }

    /// Switch filters right away, superseding any pending control change
    #[wasm_bindgen]
    pub fn set_filters(&self, verdict: &str, limit: &str) {
        let applied = {
            let mut view = self.inner.view.borrow_mut();
            let ticket = view.schedule_filter_change(verdict, limit);
            view.apply_filter_change(ticket)
        };
        self.inner.debounce_timer.borrow_mut().take();
        if applied {
            self.inner.spawn_load(true);
        }
    }
}
