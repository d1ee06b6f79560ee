//! DOM access shared by the leaderboard view and the overlay

use skillboard_core::{StatsDisplay, Surface};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlImageElement, HtmlInputElement, HtmlSelectElement,
};

pub const CONTENT_ID: &str = "leaderboard-content";
pub const LAST_UPDATED_ID: &str = "last-updated";
pub const VERDICT_FILTER_ID: &str = "verdict-filter";
pub const LIMIT_FILTER_ID: &str = "limit-filter";

const FALLBACK_ATTRIBUTE: &str = "data-fallback";

pub fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .ok_or("No window")?
        .document()
        .ok_or_else(|| "No document".into())
}

/// Writes the leaderboard into the page by element id
#[derive(Debug, Clone)]
pub struct DomSurface {
    document: Document,
}

impl DomSurface {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn set_text(&self, id: &str, text: &str) {
        match self.document.get_element_by_id(id) {
            Some(element) => element.set_text_content(Some(text)),
            None => log::debug!("#{} not on this page", id),
        }
    }
}

impl Surface for DomSurface {
    fn set_content(&self, html: &str) {
        match self.document.get_element_by_id(CONTENT_ID) {
            Some(element) => element.set_inner_html(html),
            None => log::warn!("#{} not found; leaderboard not drawn", CONTENT_ID),
        }
    }

    fn set_stats(&self, stats: &StatsDisplay) {
        self.set_text("total-players", &stats.total_players);
        self.set_text("avg-skill", &stats.avg_skill);
        self.set_text("top-skill", &stats.top_skill);
        self.set_text("avg-confidence", &stats.avg_confidence);
    }

    fn set_last_updated(&self, timestamp_ms: f64) {
        let date = js_sys::Date::new(&JsValue::from_f64(timestamp_ms));
        let local: String = date.to_locale_string("default", &JsValue::UNDEFINED).into();
        self.set_text(LAST_UPDATED_ID, &format!("Last updated: {}", local));
    }
}

/// Current value of a `<select>` or `<input>`
pub fn control_value(document: &Document, id: &str) -> Option<String> {
    let element = document.get_element_by_id(id)?;
    if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        return Some(select.value());
    }
    element.dyn_ref::<HtmlInputElement>().map(HtmlInputElement::value)
}

/// Append a `<style>` block to `<head>` unless one with `id` exists
pub fn inject_style(document: &Document, id: &str, css: &str) -> Result<(), JsValue> {
    if document.get_element_by_id(id).is_some() {
        return Ok(());
    }
    let head = document.head().ok_or("No <head>")?;
    let style = document.create_element("style")?;
    style.set_id(id);
    style.set_text_content(Some(css));
    head.append_child(&style)?;
    Ok(())
}

/// Attach a listener for the lifetime of the page
pub fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Run `f` once the document has been parsed
pub fn when_ready<F>(document: &Document, f: F) -> Result<(), JsValue>
where
    F: FnOnce() + 'static,
{
    if document.ready_state() == "loading" {
        let callback = Closure::once_into_js(f);
        document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())?;
    } else {
        f();
    }
    Ok(())
}

/// Swap broken avatars inside `container` for their `data-fallback` image.
///
/// `error` does not bubble, so the listener sits in the capture phase. The
/// attribute is removed on first use; a broken fallback is left alone.
pub fn install_avatar_fallback(container: &Element) -> Result<(), JsValue> {
    let handler = Closure::wrap(Box::new(|event: Event| {
        let Some(image) = event
            .target()
            .and_then(|target| target.dyn_into::<HtmlImageElement>().ok())
        else {
            return;
        };
        if let Some(fallback) = image.get_attribute(FALLBACK_ATTRIBUTE) {
            if image.remove_attribute(FALLBACK_ATTRIBUTE).is_err() {
                log::warn!("Could not clear avatar fallback; it may be retried");
            }
            image.set_src(&fallback);
        }
    }) as Box<dyn FnMut(Event)>);
    container.add_event_listener_with_callback_and_bool(
        "error",
        handler.as_ref().unchecked_ref(),
        true,
    )?;
    handler.forget();
    Ok(())
}
