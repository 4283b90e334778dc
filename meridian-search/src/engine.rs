//! Trait definition for pluggable search engine backends.
//!
//! Each backend (Exa, GitHub, DuckDuckGo, or one supplied by the caller)
//! implements [`SearchEngineTrait`]. Implementors only write the fallible
//! round trip ([`SearchEngineTrait::fetch`]); the provided
//! [`SearchEngineTrait::search`] turns that into an [`EngineOutcome`],
//! applies the result limit and reports to the diagnostics sink, so no
//! engine failure ever reaches the caller as an error.

use async_trait::async_trait;

use crate::diagnostics::DiagnosticsSink;
use crate::error::SearchError;
use crate::types::{EngineQuery, NormalizedResult};

/// What one engine produced for one query.
#[derive(Debug)]
pub enum EngineOutcome {
    /// At least one result, already truncated to the query limit.
    Hits(Vec<NormalizedResult>),
    /// The backend answered with zero usable records.
    EmptyUpstream,
    /// The call failed; the engine contributes nothing.
    Failed(SearchError),
}

impl EngineOutcome {
    /// Classify a raw fetch result, truncate it to `limit`, and report it.
    pub fn from_fetch(
        engine: &str,
        fetched: Result<Vec<NormalizedResult>, SearchError>,
        limit: usize,
        sink: &dyn DiagnosticsSink,
    ) -> Self {
        match fetched {
            Ok(results) if results.is_empty() => {
                sink.empty_upstream(engine);
                Self::EmptyUpstream
            }
            Ok(mut results) => {
                results.truncate(limit);
                sink.engine_completed(engine, results.len());
                Self::Hits(results)
            }
            Err(err) => {
                sink.engine_failed(engine, &err);
                Self::Failed(err)
            }
        }
    }

    /// The results this outcome contributes; empty unless [`EngineOutcome::Hits`].
    pub fn into_results(self) -> Vec<NormalizedResult> {
        match self {
            Self::Hits(results) => results,
            Self::EmptyUpstream | Self::Failed(_) => Vec::new(),
        }
    }

    /// Returns `true` if the engine call failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// A pluggable search backend.
///
/// Each implementation handles its own:
///
/// - request construction (URL, headers, payload, authentication)
/// - response parsing into [`NormalizedResult`] values
/// - dropping individual records that lack a usable URL (reported via
///   [`DiagnosticsSink::record_dropped`])
///
/// All implementations must be `Send + Sync` for concurrent engine queries.
#[async_trait]
pub trait SearchEngineTrait: Send + Sync {
    /// Name recorded in [`NormalizedResult::engine`] and in diagnostics.
    fn name(&self) -> &str;

    /// Perform the backend round trip.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails, the backend answers
    /// with a non-2xx status, or the response cannot be parsed.
    async fn fetch(
        &self,
        query: &EngineQuery,
        sink: &dyn DiagnosticsSink,
    ) -> Result<Vec<NormalizedResult>, SearchError>;

    /// Run the query and classify the result. Never fails.
    ///
    /// Returns at most `query.limit()` results, in backend order.
    async fn search(&self, query: &EngineQuery, sink: &dyn DiagnosticsSink) -> EngineOutcome {
        tracing::trace!(engine = self.name(), query = query.text(), "engine search");
        let fetched = self.fetch(query, sink).await;
        EngineOutcome::from_fetch(self.name(), fetched, query.limit(), sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticEvent, MemoryDiagnostics};

    /// A mock engine for testing trait bounds and async execution.
    struct MockEngine {
        results: Option<Vec<NormalizedResult>>,
    }

    impl MockEngine {
        fn returning(count: usize) -> Self {
            let results = (0..count)
                .filter_map(|i| {
                    NormalizedResult::new(
                        Some(&format!("Result {i}")),
                        &format!("https://example{i}.com/page"),
                        "mock",
                        "Mock",
                    )
                })
                .collect();
            Self {
                results: Some(results),
            }
        }

        fn failing() -> Self {
            Self { results: None }
        }
    }

    #[async_trait]
    impl SearchEngineTrait for MockEngine {
        fn name(&self) -> &str {
            "Mock"
        }

        async fn fetch(
            &self,
            _query: &EngineQuery,
            _sink: &dyn DiagnosticsSink,
        ) -> Result<Vec<NormalizedResult>, SearchError> {
            self.results
                .clone()
                .ok_or_else(|| SearchError::Http("mock engine failure".into()))
        }
    }

    fn query(limit: usize) -> EngineQuery {
        EngineQuery::new("test", limit).expect("valid query")
    }

    #[test]
    fn mock_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockEngine>();
    }

    #[tokio::test]
    async fn search_truncates_to_limit_preserving_order() {
        let sink = MemoryDiagnostics::new();
        let outcome = MockEngine::returning(10).search(&query(5), &sink).await;
        let results = outcome.into_results();
        assert_eq!(results.len(), 5);
        assert_eq!(results[0].title, "Result 0");
        assert_eq!(results[4].title, "Result 4");
        assert_eq!(
            sink.events(),
            vec![DiagnosticEvent::Completed {
                engine: "Mock".into(),
                count: 5
            }]
        );
    }

    #[tokio::test]
    async fn search_reports_empty_upstream() {
        let sink = MemoryDiagnostics::new();
        let outcome = MockEngine::returning(0).search(&query(5), &sink).await;
        assert!(matches!(outcome, EngineOutcome::EmptyUpstream));
        assert!(!outcome.is_failure());
        assert_eq!(
            sink.events(),
            vec![DiagnosticEvent::Empty {
                engine: "Mock".into()
            }]
        );
    }

    #[tokio::test]
    async fn search_swallows_failures_into_outcome() {
        let sink = MemoryDiagnostics::new();
        let outcome = MockEngine::failing().search(&query(5), &sink).await;
        assert!(outcome.is_failure());
        assert!(outcome.into_results().is_empty());
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            DiagnosticEvent::Failed { engine, error }
                if engine == "Mock" && error.contains("mock engine failure")
        ));
    }

    #[tokio::test]
    async fn fetch_still_exposes_the_error() {
        let sink = MemoryDiagnostics::new();
        let result = MockEngine::failing().fetch(&query(1), &sink).await;
        assert!(result.is_err());
    }
}
