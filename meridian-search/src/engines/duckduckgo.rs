//! DuckDuckGo search engine: keyless, scraped from the HTML-only endpoint.
//!
//! Uses `https://html.duckduckgo.com/html/`, which needs no JavaScript and
//! tolerates automated requests. Result links are wrapped in DDG redirects
//! and unwrapped before normalisation.

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::config::SearchConfig;
use crate::diagnostics::DiagnosticsSink;
use crate::engine::SearchEngineTrait;
use crate::error::SearchError;
use crate::http;
use crate::types::{EngineId, EngineQuery, NormalizedResult};

/// Default HTML endpoint.
pub const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// DuckDuckGo HTML adapter.
pub struct DuckDuckGoEngine {
    config: SearchConfig,
    endpoint: String,
}

impl DuckDuckGoEngine {
    /// Create an adapter against the public endpoint.
    pub fn new(config: &SearchConfig) -> Self {
        Self::with_endpoint(config, DUCKDUCKGO_HTML_URL)
    }

    /// Create an adapter against a custom endpoint (mirrors, tests).
    pub fn with_endpoint(config: &SearchConfig, endpoint: impl Into<String>) -> Self {
        Self {
            config: config.clone(),
            endpoint: endpoint.into(),
        }
    }

    /// Extract the actual URL from DuckDuckGo's redirect wrapper.
    ///
    /// DDG wraps URLs like: `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`
    fn extract_url(href: &str) -> Option<String> {
        let full_href = if href.starts_with("//") {
            format!("https:{href}")
        } else {
            href.to_string()
        };

        let parsed = Url::parse(&full_href).ok()?;

        if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned())
        } else {
            Some(full_href)
        }
    }
}

#[async_trait]
impl SearchEngineTrait for DuckDuckGoEngine {
    fn name(&self) -> &str {
        EngineId::DuckDuckGo.name()
    }

    async fn fetch(
        &self,
        query: &EngineQuery,
        sink: &dyn DiagnosticsSink,
    ) -> Result<Vec<NormalizedResult>, SearchError> {
        let client = http::build_client(&self.config)?;

        let mut params = vec![("q", query.text())];
        if self.config.safe_search {
            params.push(("kp", "1"));
        }

        let response = client
            .post(&self.endpoint)
            .form(&params)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| SearchError::http("DuckDuckGo", "request failed", e))?
            .error_for_status()
            .map_err(|e| SearchError::http("DuckDuckGo", "returned", e))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::http("DuckDuckGo", "response read failed", e))?;

        tracing::trace!(bytes = html.len(), "DuckDuckGo response received");

        parse_duckduckgo_html(&html, sink)
    }
}

/// Parse a DuckDuckGo HTML page into normalized results, skipping ads.
pub(crate) fn parse_duckduckgo_html(
    html: &str,
    sink: &dyn DiagnosticsSink,
) -> Result<Vec<NormalizedResult>, SearchError> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse(
        ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    )
    .map_err(|e| SearchError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse(".result__a")
        .map_err(|e| SearchError::Parse(format!("invalid title selector: {e:?}")))?;
    let snippet_sel = Selector::parse(".result__snippet")
        .map_err(|e| SearchError::Parse(format!("invalid snippet selector: {e:?}")))?;

    let engine = EngineId::DuckDuckGo.name();
    let mut results = Vec::new();

    for element in document.select(&result_sel) {
        let Some(title_el) = element.select(&title_sel).next() else {
            continue;
        };
        let title = title_el.text().collect::<String>();

        let Some(url) = title_el.value().attr("href").and_then(DuckDuckGoEngine::extract_url)
        else {
            sink.record_dropped(engine, "missing or unparseable result link");
            continue;
        };

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        match NormalizedResult::new(Some(&title), &url, snippet, engine) {
            Some(result) => results.push(result),
            None => sink.record_dropped(engine, "missing or invalid url"),
        }
    }

    tracing::debug!(count = results.len(), "DuckDuckGo results parsed");
    Ok(results)
}
