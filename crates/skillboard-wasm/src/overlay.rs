//! Browser wiring of the navigation loading overlay

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use skillboard_core::loader::{
    form_navigates, link_navigates, overlay_markup, ACTIVE_CLASS, HIDE_WINDOW_EVENTS,
    LOGOUT_LINK_SELECTOR, NAVIGATION_LINK_SELECTOR, OVERLAY_ID,
};
use skillboard_core::{LoaderConfig, OverlayState, OverlayText};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, PageTransitionEvent};

use crate::dom;
use crate::styles::{OVERLAY_CSS, OVERLAY_STYLE_ID};

struct LoaderInner {
    element: Element,
    state: RefCell<OverlayState>,
    config: LoaderConfig,
    failsafe_timer: RefCell<Option<Timeout>>,
    delay_timer: RefCell<Option<Timeout>>,
}

impl LoaderInner {
    fn write_text(&self, text: &OverlayText) {
        for (selector, value) in [(".loading-text", &text.message), (".loading-tip", &text.tip)] {
            if let Ok(Some(node)) = self.element.query_selector(selector) {
                node.set_text_content(Some(value.as_str()));
            }
        }
    }

    fn set_active(&self, active: bool) {
        let classes = self.element.class_list();
        let result = if active {
            classes.add_1(ACTIVE_CLASS)
        } else {
            classes.remove_1(ACTIVE_CLASS)
        };
        if let Err(err) = result {
            log::warn!(
                "Could not toggle #{}: {}",
                OVERLAY_ID,
                crate::transport::js_error_message(err, "class list rejected the change")
            );
        }
    }

    fn show(self: &Rc<Self>, text: OverlayText) {
        self.write_text(&text);
        let ticket = self.state.borrow_mut().show(text);
        self.set_active(true);

        let weak = Rc::downgrade(self);
        let failsafe = Timeout::new(self.config.failsafe_ms, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            // Only flips state; the slot holding this timer is left alone
            let expired = inner.state.borrow_mut().failsafe_elapsed(ticket);
            if expired {
                log::debug!("Loading overlay failsafe fired");
                inner.set_active(false);
            }
        });
        self.failsafe_timer.borrow_mut().replace(failsafe);
    }

    fn hide(&self) {
        self.state.borrow_mut().hide();
        self.set_active(false);
        self.failsafe_timer.borrow_mut().take();
    }

    /// Show `text` after the trigger delay, so the triggering click or
    /// submit goes through first
    fn show_soon(self: &Rc<Self>, text: OverlayText) {
        let ticket = self.state.borrow_mut().request_show(text);
        let weak = Rc::downgrade(self);
        let delay = Timeout::new(self.config.show_delay_ms, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let due = inner.state.borrow_mut().delay_elapsed(ticket);
            if let Some(text) = due {
                inner.show(text);
            }
        });
        self.delay_timer.borrow_mut().replace(delay);
    }

    fn bind_hide_events(self: &Rc<Self>, document: &Document) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("No window")?;

        let weak = Rc::downgrade(self);
        let watched = document.clone();
        dom::listen(document, "visibilitychange", move |_event| {
            if watched.hidden() {
                return;
            }
            if let Some(inner) = weak.upgrade() {
                inner.hide();
            }
        })?;

        for name in HIDE_WINDOW_EVENTS {
            let weak = Rc::downgrade(self);
            dom::listen(&window, name, move |event: Event| {
                if let Some(page) = event.dyn_ref::<PageTransitionEvent>() {
                    if page.persisted() {
                        log::debug!("Page restored from the back/forward cache");
                    }
                }
                if let Some(inner) = weak.upgrade() {
                    inner.hide();
                }
            })?;
        }
        Ok(())
    }

    fn bind_triggers(self: &Rc<Self>, document: &Document) -> Result<(), JsValue> {
        for link in elements(document, NAVIGATION_LINK_SELECTOR)? {
            let weak = Rc::downgrade(self);
            let target = link.clone();
            dom::listen(&link, "click", move |_event| {
                let href = target.get_attribute("href");
                let window_target = target.get_attribute("target");
                if !link_navigates(href.as_deref(), window_target.as_deref()) {
                    return;
                }
                if let Some(inner) = weak.upgrade() {
                    inner.show_soon(OverlayText::redirecting());
                }
            })?;
        }

        for link in elements(document, LOGOUT_LINK_SELECTOR)? {
            let weak = Rc::downgrade(self);
            dom::listen(&link, "click", move |_event| {
                if let Some(inner) = weak.upgrade() {
                    inner.show_soon(OverlayText::logging_out());
                }
            })?;
        }

        for form in elements(document, "form")? {
            let weak = Rc::downgrade(self);
            let target = form.clone();
            dom::listen(&form, "submit", move |_event| {
                let is_search = target.class_list().contains("search-form");
                if !form_navigates(is_search, target.get_attribute("action").as_deref()) {
                    return;
                }
                if let Some(inner) = weak.upgrade() {
                    inner.show_soon(OverlayText::processing());
                }
            })?;
        }
        Ok(())
    }
}

fn elements(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let nodes = document.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|index| nodes.get(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn find_or_insert_overlay(document: &Document) -> Result<Element, JsValue> {
    if let Some(existing) = document.get_element_by_id(OVERLAY_ID) {
        return Ok(existing);
    }
    let body = document.body().ok_or("No <body>")?;
    body.insert_adjacent_html("beforeend", &overlay_markup(&OverlayText::default()))?;
    document
        .get_element_by_id(OVERLAY_ID)
        .ok_or_else(|| "Loading overlay could not be inserted".into())
}

/// Full-page overlay shown while the browser navigates away
#[wasm_bindgen]
pub struct NavigationLoader {
    inner: Rc<LoaderInner>,
}

#[wasm_bindgen]
impl NavigationLoader {
    /// Attach to `#global-loader`, creating it if the page lacks one.
    ///
    /// `config` is an optional object of `LoaderConfig` fields.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<NavigationLoader, JsValue> {
        let config: LoaderConfig = if config.is_undefined() || config.is_null() {
            LoaderConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };

        let document = dom::document()?;
        dom::inject_style(&document, OVERLAY_STYLE_ID, OVERLAY_CSS)?;

        let inner = Rc::new(LoaderInner {
            element: find_or_insert_overlay(&document)?,
            state: RefCell::new(OverlayState::new()),
            config,
            failsafe_timer: RefCell::new(None),
            delay_timer: RefCell::new(None),
        });
        inner.bind_hide_events(&document)?;

        let weak = Rc::downgrade(&inner);
        let ready_document = document.clone();
        dom::when_ready(&document, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Err(err) = inner.bind_triggers(&ready_document) {
                log::error!(
                    "Failed to bind loading overlay triggers: {}",
                    crate::transport::js_error_message(err, "unknown error")
                );
            }
        })?;

        Ok(NavigationLoader { inner })
    }

    /// Show the overlay; omitted texts fall back to the redirect message
    #[wasm_bindgen]
    pub fn show(&self, message: Option<String>, tip: Option<String>) {
        let default = OverlayText::default();
        self.inner.show(OverlayText::new(
            message.unwrap_or(default.message),
            tip.unwrap_or(default.tip),
        ));
    }

    #[wasm_bindgen]
    pub fn show_with_custom_text(&self, message: &str, tip: &str) {
        self.inner.show(OverlayText::new(message, tip));
    }

    #[wasm_bindgen]
    pub fn hide(&self) {
        self.inner.hide();
    }

    #[wasm_bindgen]
    pub fn is_visible(&self) -> bool {
        self.inner.state.borrow().is_visible()
    }
}
