//! Core types: normalized search hits, engine identification, and queries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::SearchError;

/// Title used when a backend omits one.
pub const UNTITLED: &str = "Untitled";

/// A single search hit, independent of the engine that produced it.
///
/// Only constructed through [`NormalizedResult::new`], which guarantees
/// `url` is an absolute URL with a host and `source` is that host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedResult {
    /// Display title, [`UNTITLED`] when the backend had none.
    pub title: String,
    /// Absolute URL of the hit.
    pub url: String,
    /// Free-text summary; each engine decides how to build it.
    pub description: String,
    /// Hostname extracted from `url`.
    pub source: String,
    /// Name of the engine that produced this hit.
    pub engine: String,
}

impl NormalizedResult {
    /// Build a result, or `None` when `url` is not a usable absolute URL.
    ///
    /// A blank or missing title falls back to [`UNTITLED`].
    pub fn new(
        title: Option<&str>,
        url: &str,
        description: impl Into<String>,
        engine: &str,
    ) -> Option<Self> {
        let url = url.trim();
        let source = source_host(url)?;
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED)
            .to_owned();
        Some(Self {
            title,
            url: url.to_owned(),
            description: description.into(),
            source,
            engine: engine.to_owned(),
        })
    }
}

/// Extract the hostname of an absolute URL, `None` if there is none.
pub fn source_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_owned)
}

/// Built-in engines that meridian can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineId {
    /// Exa neural web search (JSON API, needs an API key).
    Exa,
    /// GitHub repository search.
    GitHub,
    /// DuckDuckGo HTML results, no key required.
    DuckDuckGo,
}

impl EngineId {
    /// Returns the human-readable name of this engine.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exa => "Exa",
            Self::GitHub => "GitHub",
            Self::DuckDuckGo => "DuckDuckGo",
        }
    }

    /// Returns the lowercase identifier used in config files and the CLI.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Exa => "exa",
            Self::GitHub => "github",
            Self::DuckDuckGo => "duckduckgo",
        }
    }

    /// Returns all available engine variants.
    pub fn all() -> &'static [EngineId] {
        &[Self::Exa, Self::GitHub, Self::DuckDuckGo]
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EngineId {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exa" => Ok(Self::Exa),
            "github" | "gh" => Ok(Self::GitHub),
            "duckduckgo" | "ddg" => Ok(Self::DuckDuckGo),
            other => Err(SearchError::Config(format!("unknown engine: {other:?}"))),
        }
    }
}

/// A validated query: non-empty text and a result ceiling of at least one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineQuery {
    query: String,
    limit: usize,
}

impl EngineQuery {
    /// Validate and build a query. The text is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the text is blank or `limit` is 0.
    pub fn new(query: impl Into<String>, limit: usize) -> Result<Self, SearchError> {
        let query = query.into().trim().to_owned();
        if query.is_empty() {
            return Err(SearchError::Config("query must not be empty".into()));
        }
        if limit == 0 {
            return Err(SearchError::Config("limit must be greater than 0".into()));
        }
        Ok(Self { query, limit })
    }

    /// The query text.
    pub fn text(&self) -> &str {
        &self.query
    }

    /// Maximum number of results any one engine may return.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_result_derives_source_from_url() {
        let result =
            NormalizedResult::new(Some("Hooks"), "https://react.dev/reference/react", "d", "Exa")
                .expect("valid url");
        assert_eq!(result.source, "react.dev");
        assert_eq!(result.engine, "Exa");
        assert_eq!(result.title, "Hooks");
    }

    #[test]
    fn normalized_result_placeholder_title() {
        let missing = NormalizedResult::new(None, "https://a.com/x", "", "Exa").expect("valid");
        assert_eq!(missing.title, UNTITLED);
        let blank =
            NormalizedResult::new(Some("   "), "https://a.com/x", "", "Exa").expect("valid");
        assert_eq!(blank.title, UNTITLED);
    }

    #[test]
    fn normalized_result_rejects_relative_and_hostless_urls() {
        assert!(NormalizedResult::new(Some("t"), "/relative/path", "", "Exa").is_none());
        assert!(NormalizedResult::new(Some("t"), "", "", "Exa").is_none());
        let mailto = NormalizedResult::new(Some("t"), "mailto:someone@example.com", "", "Exa");
        assert!(mailto.is_none());
        assert!(NormalizedResult::new(Some("t"), "not a url", "", "Exa").is_none());
    }

    #[test]
    fn normalized_result_keeps_backend_url_text() {
        let result =
            NormalizedResult::new(None, "  https://example.com  ", "", "Exa").expect("valid");
        assert_eq!(result.url, "https://example.com");
    }

    #[test]
    fn normalized_result_serde_round_trip() {
        let result = NormalizedResult::new(Some("T"), "https://test.com/a", "desc", "GitHub")
            .expect("valid");
        let json = serde_json::to_string(&result).expect("serialize");
        let decoded: NormalizedResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, result);
    }

    #[test]
    fn engine_id_display_and_slug() {
        assert_eq!(EngineId::Exa.to_string(), "Exa");
        assert_eq!(EngineId::GitHub.to_string(), "GitHub");
        assert_eq!(EngineId::DuckDuckGo.slug(), "duckduckgo");
    }

    #[test]
    fn engine_id_parses_case_insensitively() {
        assert_eq!("EXA".parse::<EngineId>().expect("exa"), EngineId::Exa);
        assert_eq!("GitHub".parse::<EngineId>().expect("github"), EngineId::GitHub);
        assert_eq!("ddg".parse::<EngineId>().expect("ddg"), EngineId::DuckDuckGo);
        assert!("bing".parse::<EngineId>().is_err());
    }

    #[test]
    fn engine_id_serde_uses_slugs() {
        for engine in EngineId::all() {
            let json = serde_json::to_string(engine).expect("serialize");
            assert_eq!(json, format!("\"{}\"", engine.slug()));
            let decoded: EngineId = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(decoded, *engine);
        }
    }

    #[test]
    fn engine_query_validation() {
        let q = EngineQuery::new("  react hooks ", 5).expect("valid");
        assert_eq!(q.text(), "react hooks");
        assert_eq!(q.limit(), 5);

        let err = EngineQuery::new("   ", 5).unwrap_err();
        assert!(err.to_string().contains("empty"));
        let err = EngineQuery::new("rust", 0).unwrap_err();
        assert!(err.to_string().contains("limit"));
    }
}
