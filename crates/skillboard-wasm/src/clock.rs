//! Wall clock and timers backed by the browser

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use gloo_timers::future::TimeoutFuture;
use skillboard_core::Clock;

/// `Date.now()` and `setTimeout`
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        // Dropping a TimeoutFuture clears the timeout
        TimeoutFuture::new(ms).boxed_local()
    }
}
