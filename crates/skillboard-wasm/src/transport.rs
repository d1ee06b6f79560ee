//! Leaderboard requests over `fetch`

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use skillboard_core::{ApiPayload, LeaderboardQuery, LeaderboardResponse, LeaderboardSource, LoadError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, RequestInit, Response};

/// Fetches the leaderboard from an HTTP endpoint
#[derive(Debug, Clone)]
pub struct FetchSource {
    endpoint: String,
}

impl FetchSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// Endpoint with the query's parameters appended
    pub fn url(&self, query: &LeaderboardQuery) -> String {
        let params = query
            .params()
            .iter()
            .map(|(name, value)| {
                let value: String = js_sys::encode_uri_component(value).into();
                format!("{}={}", name, value)
            })
            .collect::<Vec<_>>()
            .join("&");
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.endpoint, separator, params)
    }
}

impl LeaderboardSource for FetchSource {
    fn fetch(
        &self,
        query: &LeaderboardQuery,
    ) -> LocalBoxFuture<'static, Result<LeaderboardResponse, LoadError>> {
        request(self.url(query)).boxed_local()
    }
}

/// Aborts the request when dropped before it completed
struct AbortOnDrop {
    controller: Option<AbortController>,
}

impl AbortOnDrop {
    fn new(controller: AbortController) -> Self {
        Self {
            controller: Some(controller),
        }
    }

    fn disarm(&mut self) {
        self.controller = None;
    }
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if let Some(controller) = self.controller.take() {
            log::debug!("Aborting leaderboard request");
            controller.abort();
        }
    }
}

async fn request(url: String) -> Result<LeaderboardResponse, LoadError> {
    let window = web_sys::window().ok_or_else(|| LoadError::Network("No window".to_string()))?;
    let controller = AbortController::new().map_err(network_error)?;

    let headers = Headers::new().map_err(network_error)?;
    headers.set("Cache-Control", "no-cache").map_err(network_error)?;
    headers.set("Pragma", "no-cache").map_err(network_error)?;

    let init = RequestInit::new();
    init.set_method("GET");
    init.set_headers(&headers);
    init.set_signal(Some(&controller.signal()));

    let mut guard = AbortOnDrop::new(controller);

    let response = JsFuture::from(window.fetch_with_str_and_init(&url, &init))
        .await
        .map_err(network_error)?;
    let response: Response = response.dyn_into().map_err(network_error)?;
    if !response.ok() {
        guard.disarm();
        return Err(LoadError::Http {
            status: response.status(),
            status_text: response.status_text(),
        });
    }

    let body = response.text().map_err(network_error)?;
    let body = JsFuture::from(body).await.map_err(network_error)?;
    guard.disarm();

    let body = body
        .as_string()
        .ok_or_else(|| LoadError::Decode("response body is not text".to_string()))?;
    ApiPayload::from_json(&body)?.into_response()
}

fn network_error(err: JsValue) -> LoadError {
    LoadError::Network(js_error_message(err, "Request failed"))
}

/// Best-effort message out of a thrown JS value
pub fn js_error_message(err: JsValue, fallback: &str) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    if let Ok(error) = err.dyn_into::<js_sys::Error>() {
        return error.message().into();
    }
    fallback.to_string()
}
