//! Exa search engine: JSON API over HTTPS, authenticated with an API key.
//!
//! `POST {base_url}/search` with `{"query", "numResults", "type"}` and an
//! `x-api-key` header. Records carry `title`, `url`, and optional `author`
//! and `publishedDate`, which are folded into the result description.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::diagnostics::DiagnosticsSink;
use crate::engine::SearchEngineTrait;
use crate::error::SearchError;
use crate::http;
use crate::types::{EngineId, EngineQuery, NormalizedResult};

/// Placeholder for a record without an author.
pub const UNKNOWN_AUTHOR: &str = "Unknown author";
/// Placeholder for a record without a publication date.
pub const UNKNOWN_DATE: &str = "Unknown date";

#[derive(Debug, Serialize)]
struct ExaRequest<'a> {
    query: &'a str,
    #[serde(rename = "numResults")]
    num_results: usize,
    #[serde(rename = "type")]
    search_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExaResponse {
    #[serde(default)]
    results: Vec<ExaRecord>,
}

#[derive(Debug, Deserialize)]
struct ExaRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default, rename = "publishedDate")]
    published_date: Option<String>,
}

/// Exa web search adapter.
pub struct ExaEngine {
    config: SearchConfig,
}

impl ExaEngine {
    /// Create an adapter using the Exa and network settings in `config`.
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/search", self.config.exa.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SearchEngineTrait for ExaEngine {
    fn name(&self) -> &str {
        EngineId::Exa.name()
    }

    async fn fetch(
        &self,
        query: &EngineQuery,
        sink: &dyn DiagnosticsSink,
    ) -> Result<Vec<NormalizedResult>, SearchError> {
        let api_key = self
            .config
            .exa
            .api_key
            .as_ref()
            .ok_or_else(|| SearchError::Config("Exa API key is not configured".into()))?;

        let client = http::build_api_client(&self.config)?;
        let body = ExaRequest {
            query: query.text(),
            num_results: query.limit(),
            search_type: &self.config.exa.search_type,
        };

        let response = client
            .post(self.endpoint())
            .header("x-api-key", api_key.expose())
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::http("Exa", "request failed", e))?
            .error_for_status()
            .map_err(|e| SearchError::http("Exa", "returned", e))?;

        let text = response
            .text()
            .await
            .map_err(|e| SearchError::http("Exa", "response read failed", e))?;

        tracing::trace!(bytes = text.len(), "Exa response received");

        parse_exa_response(&text, sink)
    }
}

/// Parse an Exa `/search` response body into normalized results.
///
/// Records without a usable URL are dropped and reported to `sink`.
pub(crate) fn parse_exa_response(
    body: &str,
    sink: &dyn DiagnosticsSink,
) -> Result<Vec<NormalizedResult>, SearchError> {
    let response: ExaResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("invalid Exa response: {e}")))?;

    let engine = EngineId::Exa.name();
    let mut results = Vec::with_capacity(response.results.len());
    for record in response.results {
        let description = describe(record.author.as_deref(), record.published_date.as_deref());
        let url = record.url.as_deref().unwrap_or_default();
        match NormalizedResult::new(record.title.as_deref(), url, description, engine) {
            Some(result) => results.push(result),
            None => sink.record_dropped(engine, "missing or invalid url"),
        }
    }

    tracing::debug!(count = results.len(), "Exa results parsed");
    Ok(results)
}

/// `Author: {author} | Published: {date}`, with placeholders for blanks.
fn describe(author: Option<&str>, published: Option<&str>) -> String {
    let author = author
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR);
    let published = published
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| d.split('T').next().unwrap_or(d))
        .unwrap_or(UNKNOWN_DATE);
    format!("Author: {author} | Published: {published}")
}
