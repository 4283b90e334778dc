//! Error types for the meridian-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. No API keys or tokens appear in error
//! messages.

/// Errors that can occur while talking to a search or content backend.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An HTTP request failed: connection, timeout, non-2xx status, or body read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A backend response could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid configuration or query (missing API key, zero limit, ...).
    #[error("config error: {0}")]
    Config(String),

    /// The call was cancelled before the backend answered.
    #[error("cancelled: {0}")]
    Cancelled(String),
}

impl SearchError {
    /// Map a transport error into [`SearchError::Http`], labelled with the
    /// backend and the step that failed.
    pub(crate) fn http(backend: &str, step: &str, err: impl std::fmt::Display) -> Self {
        Self::Http(format!("{backend} {step}: {err}"))
    }
}

/// Convenience type alias for meridian-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Why a string could not be resolved to a repository identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionFailure {
    /// The input was empty or whitespace.
    #[error("repository reference is empty")]
    Empty,

    /// No host was found, or the host is not a supported Git host.
    #[error("unsupported repository host: {0:?}")]
    UnsupportedHost(String),

    /// Fewer than two path segments (owner and repository) were present.
    #[error("repository reference needs an owner and a repository name")]
    MissingSegments,

    /// A `blob`/`tree` keyword was not followed by a ref.
    #[error("`{0}` must be followed by a branch or tag")]
    MissingRef(String),

    /// Owner or repository name contains characters a Git host never allows,
    /// or the reference contains a `.`/`..` segment or an encoded separator.
    #[error("invalid repository path segment: {0:?}")]
    InvalidSegment(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_http() {
        let err = SearchError::Http("connection refused".into());
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }

    #[test]
    fn display_parse() {
        let err = SearchError::Parse("unexpected JSON structure".into());
        assert_eq!(err.to_string(), "parse error: unexpected JSON structure");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("limit must be > 0".into());
        assert_eq!(err.to_string(), "config error: limit must be > 0");
    }

    #[test]
    fn display_cancelled() {
        let err = SearchError::Cancelled("Exa".into());
        assert_eq!(err.to_string(), "cancelled: Exa");
    }

    #[test]
    fn http_helper_labels_backend_and_step() {
        let err = SearchError::http("Exa", "request failed", "connection reset");
        assert_eq!(
            err.to_string(),
            "HTTP error: Exa request failed: connection reset"
        );
    }

    #[test]
    fn resolution_failure_messages() {
        assert_eq!(
            ResolutionFailure::Empty.to_string(),
            "repository reference is empty"
        );
        assert!(ResolutionFailure::UnsupportedHost("gitlab.com".into())
            .to_string()
            .contains("gitlab.com"));
        assert!(ResolutionFailure::MissingRef("blob".into())
            .to_string()
            .contains("blob"));
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
        assert_send_sync::<ResolutionFailure>();
    }
}
