//! Failures of a leaderboard load

/// Everything that can go wrong between asking for the leaderboard and
/// having a payload to render.
///
/// The `Display` text is shown verbatim in the inline error state.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },
    /// The endpoint answered 2xx but the body carried an `error` field.
    #[error("{0}")]
    Server(String),
    /// No answer arrived before the load timeout elapsed.
    #[error("Loading timeout - please refresh the page")]
    Timeout,
    /// The request never produced a response (offline, CORS, aborted).
    #[error("{0}")]
    Network(String),
    /// The body could not be read as a leaderboard payload.
    #[error("Invalid response: {0}")]
    Decode(String),
}
