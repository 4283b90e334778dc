//! GitHub repository search over the REST API.
//!
//! `GET {api_base}/search/repositories?q=..&per_page=..`. Works without a
//! token (at a low rate limit); a configured token is sent as a bearer.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{GitHubConfig, SearchConfig};
use crate::diagnostics::DiagnosticsSink;
use crate::engine::SearchEngineTrait;
use crate::error::SearchError;
use crate::http;
use crate::types::{EngineId, EngineQuery, NormalizedResult};

/// REST API version requested on every call.
pub const GITHUB_API_VERSION: &str = "2022-11-28";
/// Description used for repositories without one.
pub const NO_DESCRIPTION: &str = "No description";
/// GitHub never returns more than this many items per page.
const MAX_PER_PAGE: usize = 100;
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

#[derive(Debug, Deserialize)]
struct RepositorySearchResponse {
    #[serde(default)]
    items: Vec<RepositoryRecord>,
}

#[derive(Debug, Deserialize)]
struct RepositoryRecord {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    stargazers_count: Option<u64>,
    #[serde(default)]
    language: Option<String>,
}

/// Join `path` onto the API root.
pub(crate) fn api_url(github: &GitHubConfig, path: &str) -> String {
    format!("{}/{}", github.api_base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Attach the headers every GitHub API call carries.
pub(crate) fn with_github_headers(
    request: reqwest::RequestBuilder,
    github: &GitHubConfig,
    accept: &str,
) -> reqwest::RequestBuilder {
    let request = request
        .header("Accept", accept)
        .header("X-GitHub-Api-Version", GITHUB_API_VERSION);
    match github.token {
        Some(ref token) => request.bearer_auth(token.expose()),
        None => request,
    }
}

/// GitHub repository search adapter.
pub struct GitHubEngine {
    config: SearchConfig,
}

impl GitHubEngine {
    /// Create an adapter using the GitHub and network settings in `config`.
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl SearchEngineTrait for GitHubEngine {
    fn name(&self) -> &str {
        EngineId::GitHub.name()
    }

    async fn fetch(
        &self,
        query: &EngineQuery,
        sink: &dyn DiagnosticsSink,
    ) -> Result<Vec<NormalizedResult>, SearchError> {
        let client = http::build_api_client(&self.config)?;
        let per_page = query.limit().min(MAX_PER_PAGE).to_string();
        let request = client
            .get(api_url(&self.config.github, "search/repositories"))
            .query(&[("q", query.text()), ("per_page", per_page.as_str())]);

        let response = with_github_headers(request, &self.config.github, JSON_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| SearchError::http("GitHub", "request failed", e))?
            .error_for_status()
            .map_err(|e| SearchError::http("GitHub", "returned", e))?;

        let text = response
            .text()
            .await
            .map_err(|e| SearchError::http("GitHub", "response read failed", e))?;

        parse_repository_search(&text, sink)
    }
}

/// Parse a `/search/repositories` response body.
pub(crate) fn parse_repository_search(
    body: &str,
    sink: &dyn DiagnosticsSink,
) -> Result<Vec<NormalizedResult>, SearchError> {
    let response: RepositorySearchResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("invalid GitHub search response: {e}")))?;

    let engine = EngineId::GitHub.name();
    let mut results = Vec::with_capacity(response.items.len());
    for item in response.items {
        let description = describe(&item);
        let url = item.html_url.as_deref().unwrap_or_default();
        match NormalizedResult::new(item.full_name.as_deref(), url, description, engine) {
            Some(result) => results.push(result),
            None => sink.record_dropped(engine, "missing or invalid html_url"),
        }
    }

    tracing::debug!(count = results.len(), "GitHub results parsed");
    Ok(results)
}

fn describe(item: &RepositoryRecord) -> String {
    let mut description = item
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_DESCRIPTION)
        .to_owned();
    if let Some(stars) = item.stargazers_count {
        description.push_str(&format!(" | ★ {stars}"));
    }
    if let Some(language) = item.language.as_deref().filter(|l| !l.is_empty()) {
        description.push_str(&format!(" | {language}"));
    }
    description
}
