//! Shared HTTP client construction for every backend.
//!
//! Provides [`reqwest::Client`]s with an explicit timeout and the proxy
//! chosen by [`crate::proxy`]. HTML scraping rotates browser User-Agents;
//! JSON APIs identify as [`API_USER_AGENT`]. The
//! client never picks up a system proxy on its own: no configured proxy
//! means a direct connection.

use crate::config::SearchConfig;
use crate::error::SearchError;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Realistic browser User-Agent strings, rotated per request.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// User-Agent sent to JSON APIs (Exa, GitHub), which ask clients to identify themselves.
pub const API_USER_AGENT: &str = concat!("meridian/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] for scraping an HTML search page.
///
/// The client has:
/// - Timeout from `config.timeout_seconds`
/// - Random browser User-Agent from the rotation list (or custom if configured)
/// - The proxy resolved from `config.proxy`, if any
/// - Cookie store, brotli and gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the proxy is rejected or the client
/// cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => random_user_agent().to_owned(),
    };
    finish(base_builder(config, ua)?.cookie_store(true))
}

/// Build a [`reqwest::Client`] for a JSON API backend.
///
/// Same timeout and proxy as [`build_client`], but identifies as
/// [`API_USER_AGENT`] (or the custom User-Agent) and keeps no cookies.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the proxy is rejected or the client
/// cannot be constructed.
pub fn build_api_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let ua = config
        .user_agent
        .clone()
        .unwrap_or_else(|| API_USER_AGENT.to_owned());
    finish(base_builder(config, ua)?)
}

fn base_builder(config: &SearchConfig, ua: String) -> Result<reqwest::ClientBuilder, SearchError> {
    let mut builder = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .no_proxy();

    if let Some(proxy_url) = config.proxy.resolve() {
        tracing::debug!(
            proxy = %proxy_url.host_str().unwrap_or_default(),
            "routing through proxy"
        );
        let proxy = reqwest::Proxy::all(proxy_url.as_str())
            .map_err(|e| SearchError::Http(format!("invalid proxy: {e}")))?;
        builder = builder.proxy(proxy);
    }
    Ok(builder)
}

fn finish(builder: reqwest::ClientBuilder) -> Result<reqwest::Client, SearchError> {
    builder
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Select a random User-Agent string from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        // USER_AGENTS is a non-empty const array; choose only returns None on empty slices
        .unwrap_or(USER_AGENTS[0])
}
