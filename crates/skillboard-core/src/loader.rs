//! State behind the full-page navigation loading overlay
//!
//! The overlay is either hidden or visible. Showing it arms a failsafe that
//! hides it again; each kind of pending timer (the failsafe and the short
//! delay before showing) exists at most once.

use crate::format::escape_html;
use crate::sequence::{Debounce, Generation, Ticket};

/// Id of the overlay element
pub const OVERLAY_ID: &str = "global-loader";

/// Class that makes the overlay visible
pub const ACTIVE_CLASS: &str = "active";

/// Links that lead to another page of the app
pub const NAVIGATION_LINK_SELECTOR: &str =
    r#"a[href="/login"], a[href="/dashboard"], .main-login-btn"#;

/// Links that end the session
pub const LOGOUT_LINK_SELECTOR: &str = r#".logout-link, a[href*="/logout"]"#;

/// Window events after which the overlay must not be showing
pub const HIDE_WINDOW_EVENTS: [&str; 4] = ["pageshow", "load", "popstate", "focus"];

/// Text shown on the overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayText {
    pub message: String,
    pub tip: String,
}

impl OverlayText {
    pub fn new(message: impl Into<String>, tip: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tip: tip.into(),
        }
    }

    pub fn redirecting() -> Self {
        Self::new("Redirecting...", "Hang tight while we connect you")
    }

    pub fn logging_out() -> Self {
        Self::new("Logging out...", "See you next time!")
    }

    pub fn processing() -> Self {
        Self::new("Processing...", "Please wait while we process your request")
    }
}

impl Default for OverlayText {
    fn default() -> Self {
        Self::redirecting()
    }
}

/// Overlay element, inserted when the page does not provide one
pub fn overlay_markup(text: &OverlayText) -> String {
    format!(
        r#"<div id="{OVERLAY_ID}">
  <div class="loading">
    <div class="loading-spinner"></div>
    <p class="loading-text">{message}</p>
    <p class="loading-tip">{tip}</p>
  </div>
</div>"#,
        message = escape_html(&text.message),
        tip = escape_html(&text.tip),
    )
}

/// Whether a navigation link click should bring up the overlay.
///
/// New-tab links, in-page anchors and mail links leave the page in place.
pub fn link_navigates(href: Option<&str>, target: Option<&str>) -> bool {
    if target == Some("_blank") {
        return false;
    }
    match href {
        Some(href) => !(href.starts_with('#') || href.starts_with("mailto:")),
        None => true,
    }
}

/// Whether submitting a form should bring up the overlay; search forms don't.
pub fn form_navigates(has_search_class: bool, action: Option<&str>) -> bool {
    !has_search_class && !action.is_some_and(|action| action.contains("search"))
}

/// Visibility, text and timer bookkeeping of the overlay
#[derive(Debug, Default)]
pub struct OverlayState {
    visible: bool,
    text: OverlayText,
    failsafe: Generation,
    delayed: Debounce<OverlayText>,
}

impl OverlayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn text(&self) -> &OverlayText {
        &self.text
    }

    /// Show now. The returned ticket belongs to the failsafe timer; any
    /// earlier failsafe is void.
    pub fn show(&mut self, text: OverlayText) -> Ticket {
        self.text = text;
        self.visible = true;
        self.failsafe.advance()
    }

    /// Hide and disarm the failsafe
    pub fn hide(&mut self) {
        self.visible = false;
        self.failsafe.invalidate();
    }

    /// The failsafe timer for `ticket` went off; true if it hid the overlay
    pub fn failsafe_elapsed(&mut self, ticket: Ticket) -> bool {
        if self.failsafe.is_current(ticket) && self.visible {
            self.hide();
            true
        } else {
            false
        }
    }

    /// Queue `text` to be shown once the trigger delay passes
    pub fn request_show(&mut self, text: OverlayText) -> Ticket {
        self.delayed.schedule(text)
    }

    /// The trigger delay for `ticket` passed; the text to show, if still due
    pub fn delay_elapsed(&mut self, ticket: Ticket) -> Option<OverlayText> {
        self.delayed.fire(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_and_hide() {
        let mut overlay = OverlayState::new();
        assert!(!overlay.is_visible());
        assert_eq!(overlay.text(), &OverlayText::redirecting());

        overlay.show(OverlayText::logging_out());
        assert!(overlay.is_visible());
        assert_eq!(overlay.text().message, "Logging out...");

        overlay.hide();
        assert!(!overlay.is_visible());
    }

    #[test]
    fn test_failsafe_hides() {
        let mut overlay = OverlayState::new();
        let ticket = overlay.show(OverlayText::processing());
        assert!(overlay.failsafe_elapsed(ticket));
        assert!(!overlay.is_visible());
    }

    #[test]
    fn test_second_show_replaces_failsafe() {
        let mut overlay = OverlayState::new();
        let first = overlay.show(OverlayText::redirecting());
        let second = overlay.show(OverlayText::processing());

        assert!(!overlay.failsafe_elapsed(first));
        assert!(overlay.is_visible());
        assert!(overlay.failsafe_elapsed(second));
    }

    #[test]
    fn test_hide_disarms_failsafe() {
        let mut overlay = OverlayState::new();
        let ticket = overlay.show(OverlayText::redirecting());
        overlay.hide();
        overlay.show(OverlayText::redirecting());
        // A timer from before the hide must not cut the new show short
        assert!(!overlay.failsafe_elapsed(ticket));
        assert!(overlay.is_visible());
    }

    #[test]
    fn test_delayed_show_latest_wins() {
        let mut overlay = OverlayState::new();
        let first = overlay.request_show(OverlayText::redirecting());
        let second = overlay.request_show(OverlayText::logging_out());
        assert_eq!(overlay.delay_elapsed(first), None);
        assert_eq!(overlay.delay_elapsed(second), Some(OverlayText::logging_out()));
    }

    #[test]
    fn test_overlay_markup() {
        let html = overlay_markup(&OverlayText::default());
        assert!(html.starts_with(r#"<div id="global-loader">"#));
        assert!(html.contains(r#"<p class="loading-text">Redirecting...</p>"#));
        assert!(html.contains("Hang tight while we connect you"));
        assert!(!html.contains(ACTIVE_CLASS));
    }

    #[test]
    fn test_link_navigates() {
        assert!(link_navigates(Some("/login"), None));
        assert!(link_navigates(Some("/dashboard"), Some("_self")));
        assert!(!link_navigates(Some("/login"), Some("_blank")));
        assert!(!link_navigates(Some("#top"), None));
        assert!(!link_navigates(Some("mailto:admin@example.com"), None));
    }

    #[test]
    fn test_form_navigates() {
        assert!(form_navigates(false, Some("/analyze")));
        assert!(form_navigates(false, None));
        assert!(!form_navigates(true, Some("/analyze")));
        assert!(!form_navigates(false, Some("/search?q=x")));
    }
}
