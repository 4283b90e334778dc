//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which engines are queried, timeouts, proxying,
//! and per-backend endpoints and credentials.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SearchError;
use crate::proxy::ProxySetting;
use crate::types::EngineId;

/// Default Exa API endpoint.
pub const DEFAULT_EXA_BASE_URL: &str = "https://api.exa.ai";
/// Default GitHub REST API endpoint.
pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";

/// A credential that never appears in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wrap a credential.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the credential, only for placing it in a request header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(\"[REDACTED]\")")
    }
}

// Config files store the credential as a plain string.
impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}

/// Exa backend settings.
#[derive(Debug, Clone)]
pub struct ExaConfig {
    /// API key sent as `x-api-key`. Searches fail (and yield nothing) without it.
    pub api_key: Option<Secret>,
    /// API root, without a trailing `/search`.
    pub base_url: String,
    /// Value of the `type` request flag (`auto`, `neural`, `keyword`, ...).
    pub search_type: String,
}

impl Default for ExaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_EXA_BASE_URL.into(),
            search_type: "auto".into(),
        }
    }
}

/// GitHub backend settings, shared by repository search and README fetch.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// Optional token; raises rate limits and grants access to private repos.
    pub token: Option<Secret>,
    /// REST API root.
    pub api_base: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: DEFAULT_GITHUB_API_BASE.into(),
        }
    }
}

/// Configuration for search and content operations.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Engines used by [`crate::aggregate`] when the caller names none.
    /// Queried concurrently; results are concatenated in this order.
    pub engines: Vec<EngineId>,
    /// Engine used by [`crate::search`].
    pub primary_engine: EngineId,
    /// Default per-engine result ceiling for callers that do not pass one.
    pub max_results: usize,
    /// Per-request HTTP timeout in seconds, applied to every backend call.
    pub timeout_seconds: u64,
    /// Whether to request safe search filtering from engines that support it.
    pub safe_search: bool,
    /// Custom User-Agent string. If `None`, HTML scraping rotates through a
    /// built-in browser list and API calls send [`crate::http::API_USER_AGENT`].
    pub user_agent: Option<String>,
    /// Proxy used for every outbound call.
    pub proxy: ProxySetting,
    /// Exa settings.
    pub exa: ExaConfig,
    /// GitHub settings.
    pub github: GitHubConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engines: vec![EngineId::Exa, EngineId::GitHub],
            primary_engine: EngineId::Exa,
            max_results: 10,
            timeout_seconds: 8,
            safe_search: true,
            user_agent: None,
            proxy: ProxySetting::Direct,
            exa: ExaConfig::default(),
            github: GitHubConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_results` must be greater than 0
    /// - `timeout_seconds` must be greater than 0
    /// - `engines` must not be empty
    /// - backend base URLs must be absolute URLs
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.engines.is_empty() {
            return Err(SearchError::Config(
                "at least one engine must be enabled".into(),
            ));
        }
        self.validate_readme()?;
        check_base_url("exa.base_url", &self.exa.base_url)
    }

    /// Validates only what a README fetch uses: `timeout_seconds` and
    /// `github.api_base`. Engine selection and limits are irrelevant there.
    pub fn validate_readme(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        check_base_url("github.api_base", &self.github.api_base)
    }
}

fn check_base_url(name: &str, base: &str) -> Result<(), SearchError> {
    match url::Url::parse(base) {
        Ok(_) => Ok(()),
        Err(_) => Err(SearchError::Config(format!(
            "{name} is not a valid URL: {base:?}"
        ))),
    }
}
