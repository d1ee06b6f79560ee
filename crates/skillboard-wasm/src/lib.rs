//! WebAssembly build of the skillboard leaderboard page
//!
//! This crate wires the page logic from `skillboard-core` to the browser:
//! the DOM, `fetch`, timers and the console.

use wasm_bindgen::prelude::*;

mod app;
mod clock;
mod dom;
mod logger;
mod overlay;
mod styles;
mod transport;


pub use app::LeaderboardApp;
pub use overlay::NavigationLoader;

// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    logger::init(level);
}
