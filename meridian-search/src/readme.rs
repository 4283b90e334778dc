//! README retrieval for GitHub repositories.
//!
//! A repository reference is resolved with [`crate::repository::resolve`]
//! and the raw README (or the file named by a `blob` URL) is requested from
//! the GitHub contents API with `Accept: application/vnd.github.raw`.

use std::sync::Arc;

use crate::config::SearchConfig;
use crate::diagnostics::{DiagnosticsSink, TracingDiagnostics};
use crate::engines::github::{api_url, with_github_headers};
use crate::error::SearchError;
use crate::http;
use crate::repository::{self, PathKind, RepositoryIdentifier};

const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";
const DIAGNOSTICS_NAME: &str = "GitHub README";

/// Fetches raw README text for repository references.
pub struct GitHubReadme {
    config: SearchConfig,
    sink: Arc<dyn DiagnosticsSink>,
}

impl GitHubReadme {
    /// Create a fetcher that reports to `tracing`.
    pub fn new(config: &SearchConfig) -> Self {
        Self::with_diagnostics(config, Arc::new(TracingDiagnostics))
    }

    /// Create a fetcher that reports to `sink`.
    pub fn with_diagnostics(config: &SearchConfig, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            config: config.clone(),
            sink,
        }
    }

    /// Resolve `raw` and return the README text, or `None` on any failure.
    ///
    /// Never panics and never makes a request for an unresolvable reference.
    pub async fn fetch_readme(&self, raw: &str) -> Option<String> {
        let id = match repository::resolve(raw) {
            Ok(id) => id,
            Err(failure) => {
                tracing::debug!(reason = %failure, "repository reference not resolvable");
                return None;
            }
        };

        match self.fetch(&id).await {
            Ok(text) => {
                self.sink.engine_completed(DIAGNOSTICS_NAME, 1);
                Some(text)
            }
            Err(err) => {
                self.sink.engine_failed(DIAGNOSTICS_NAME, &err);
                None
            }
        }
    }

    /// Fetch the README (or file) an identifier points at.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] for transport failures and non-2xx
    /// responses (including a missing repository or README), and
    /// [`SearchError::Parse`] for an empty body, and [`SearchError::Config`]
    /// for an identifier whose owner, repo or path contains a `.`/`..`
    /// segment (no request is made).
    pub async fn fetch(&self, id: &RepositoryIdentifier) -> Result<String, SearchError> {
        let escapes = [id.owner.as_str(), id.repo.as_str()]
            .into_iter()
            .chain(id.path.iter().flat_map(|p| p.split(['/', '\\'])))
            .any(repository::is_dot_segment);
        if escapes {
            return Err(SearchError::Config(format!(
                "{id} leaves the repository; refusing to fetch"
            )));
        }

        let client = http::build_api_client(&self.config)?;
        let mut request = client.get(api_url(&self.config.github, &content_path(id)));
        if let Some(ref git_ref) = id.git_ref {
            request = request.query(&[("ref", git_ref.as_str())]);
        }

        tracing::trace!(repository = %id, "fetching README");

        let response = with_github_headers(request, &self.config.github, RAW_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| SearchError::http("GitHub", "README request failed", e))?
            .error_for_status()
            .map_err(|e| SearchError::http("GitHub", "README lookup returned", e))?;

        let text = response
            .text()
            .await
            .map_err(|e| SearchError::http("GitHub", "README read failed", e))?;

        if text.trim().is_empty() {
            return Err(SearchError::Parse(format!("README for {id} is empty")));
        }
        Ok(text)
    }
}

/// API path for the content an identifier points at.
///
/// - no path: `repos/{owner}/{repo}/readme`
/// - directory (`tree`): `repos/{owner}/{repo}/readme/{dir}`
/// - file (`blob`): `repos/{owner}/{repo}/contents/{file}`
fn content_path(id: &RepositoryIdentifier) -> String {
    let base = format!("repos/{}/{}", id.owner, id.repo);
    match (id.path.as_deref(), id.path_kind) {
        (Some(path), Some(PathKind::Blob)) => format!("{base}/contents/{path}"),
        (Some(path), _) => format!("{base}/readme/{path}"),
        (None, _) => format!("{base}/readme"),
    }
}
