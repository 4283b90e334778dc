//! Proxy lookup for outbound requests.
//!
//! Resolution is a pure read of configuration (and, for
//! [`ProxySetting::Environment`], of process environment variables). It never
//! touches the network and never mutates shared state.

use url::Url;

/// Environment variables consulted by [`ProxySetting::Environment`], in order.
pub const PROXY_ENV_VARS: &[&str] = &[
    "HTTPS_PROXY",
    "https_proxy",
    "ALL_PROXY",
    "all_proxy",
    "HTTP_PROXY",
    "http_proxy",
];

/// Where the proxy endpoint for outbound calls comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProxySetting {
    /// Connect directly.
    #[default]
    Direct,
    /// Route every request through this proxy.
    Fixed(Url),
    /// Use the first valid proxy URL found in [`PROXY_ENV_VARS`].
    Environment,
}

impl ProxySetting {
    /// Parse a config value: `"none"`/`"direct"`/empty, `"env"`, or a proxy URL.
    ///
    /// Returns `None` if the value is neither a keyword nor a valid URL.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "" | "none" | "direct" => Some(Self::Direct),
            "env" | "environment" => Some(Self::Environment),
            other => Url::parse(other).ok().map(Self::Fixed),
        }
    }

    /// Resolve the proxy endpoint, or `None` for a direct connection.
    pub fn resolve(&self) -> Option<Url> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve using a custom variable lookup.
    pub fn resolve_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<Url> {
        match self {
            Self::Direct => None,
            Self::Fixed(url) => Some(url.clone()),
            Self::Environment => PROXY_ENV_VARS.iter().find_map(|name| {
                let value = lookup(name)?;
                let value = value.trim();
                if value.is_empty() {
                    return None;
                }
                match Url::parse(value) {
                    Ok(url) => Some(url),
                    Err(e) => {
                        tracing::debug!(variable = name, error = %e, "ignoring invalid proxy URL");
                        None
                    }
                }
            }),
        }
    }
}
