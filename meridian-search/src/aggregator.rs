//! Multi-engine fan-out: concurrent queries, per-engine limits, concatenation.
//!
//! Every registered engine is queried concurrently on the current task
//! with [`futures::future::join_all`]; the aggregator waits for all of them
//! to settle. Results are concatenated in registration order, each engine's
//! list in backend order. There is no re-ranking and no deduplication. An
//! engine that fails or finds nothing contributes nothing and never affects
//! its siblings.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::diagnostics::{DiagnosticsSink, TracingDiagnostics};
use crate::engine::{EngineOutcome, SearchEngineTrait};
use crate::engines::build_engine;
use crate::error::SearchError;
use crate::types::{EngineId, EngineQuery, NormalizedResult};

/// A set of engines queried together.
pub struct Aggregator {
    engines: Vec<Arc<dyn SearchEngineTrait>>,
    sink: Arc<dyn DiagnosticsSink>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    /// An empty aggregator reporting to `tracing`.
    pub fn new() -> Self {
        Self::with_diagnostics(Arc::new(TracingDiagnostics))
    }

    /// An empty aggregator reporting to `sink`.
    pub fn with_diagnostics(sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            engines: Vec::new(),
            sink,
        }
    }

    /// An aggregator over built-in engines, in the given order.
    pub fn from_config(engines: &[EngineId], config: &SearchConfig) -> Self {
        let mut aggregator = Self::new();
        for engine in engines {
            aggregator.register(build_engine(*engine, config));
        }
        aggregator
    }

    /// Add an engine after those already registered.
    pub fn register(&mut self, engine: Arc<dyn SearchEngineTrait>) -> &mut Self {
        self.engines.push(engine);
        self
    }

    /// Builder-style [`Aggregator::register`].
    pub fn with_engine(mut self, engine: Arc<dyn SearchEngineTrait>) -> Self {
        self.register(engine);
        self
    }

    /// Names of the registered engines, in registration order.
    pub fn engine_names(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    /// Number of registered engines.
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Returns `true` if no engine is registered.
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Query every engine and concatenate their results.
    pub async fn aggregate(&self, query: &EngineQuery) -> Vec<NormalizedResult> {
        concat(self.run(query, None).await)
    }

    /// Like [`Aggregator::aggregate`], but engines still running when
    /// `cancel` fires contribute nothing and are reported as cancelled.
    pub async fn aggregate_with_cancel(
        &self,
        query: &EngineQuery,
        cancel: &CancellationToken,
    ) -> Vec<NormalizedResult> {
        concat(self.run(query, Some(cancel)).await)
    }

    /// Query every engine and return each engine's outcome, in registration order.
    pub async fn aggregate_outcomes(&self, query: &EngineQuery) -> Vec<(String, EngineOutcome)> {
        self.run(query, None).await
    }

    async fn run(
        &self,
        query: &EngineQuery,
        cancel: Option<&CancellationToken>,
    ) -> Vec<(String, EngineOutcome)> {
        let sink = self.sink.as_ref();
        let calls = self.engines.iter().map(|engine| async move {
            let name = engine.name().to_owned();
            let outcome = match cancel {
                Some(token) => tokio::select! {
                    biased;
                    () = token.cancelled() => {
                        let err = SearchError::Cancelled(format!("{name} did not finish"));
                        sink.engine_failed(&name, &err);
                        EngineOutcome::Failed(err)
                    }
                    outcome = engine.search(query, sink) => outcome,
                },
                None => engine.search(query, sink).await,
            };
            (name, outcome)
        });

        let outcomes = futures::future::join_all(calls).await;
        let failed = outcomes.iter().filter(|(_, o)| o.is_failure()).count();
        tracing::debug!(engines = outcomes.len(), failed, "aggregation settled");
        outcomes
    }
}

fn concat(outcomes: Vec<(String, EngineOutcome)>) -> Vec<NormalizedResult> {
    outcomes
        .into_iter()
        .flat_map(|(_, outcome)| outcome.into_results())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticEvent, MemoryDiagnostics};
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedEngine {
        name: &'static str,
        count: usize,
        delay: Duration,
    }

    struct BrokenEngine;

    fn hits(engine: &str, count: usize) -> Vec<NormalizedResult> {
        (0..count)
            .filter_map(|i| {
                NormalizedResult::new(
                    Some(&format!("{engine} {i}")),
                    &format!("https://{}.example/{i}", engine.to_lowercase()),
                    "",
                    engine,
                )
            })
            .collect()
    }

    #[async_trait]
    impl SearchEngineTrait for FixedEngine {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch(
            &self,
            _query: &EngineQuery,
            _sink: &dyn DiagnosticsSink,
        ) -> Result<Vec<NormalizedResult>, SearchError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(hits(self.name, self.count))
        }
    }

    #[async_trait]
    impl SearchEngineTrait for BrokenEngine {
        fn name(&self) -> &str {
            "Broken"
        }

        async fn fetch(
            &self,
            _query: &EngineQuery,
            _sink: &dyn DiagnosticsSink,
        ) -> Result<Vec<NormalizedResult>, SearchError> {
            Err(SearchError::Http("connection refused".into()))
        }
    }

    fn fixed(name: &'static str, count: usize) -> Arc<dyn SearchEngineTrait> {
        Arc::new(FixedEngine {
            name,
            count,
            delay: Duration::ZERO,
        })
    }

    fn query(limit: usize) -> EngineQuery {
        EngineQuery::new("react hooks", limit).expect("valid")
    }

    #[tokio::test]
    async fn concatenates_in_registration_order() {
        let aggregator = Aggregator::new()
            .with_engine(fixed("Alpha", 2))
            .with_engine(fixed("Beta", 3));

        let results = aggregator.aggregate(&query(10)).await;
        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Alpha 0", "Alpha 1", "Beta 0", "Beta 1", "Beta 2"]);
    }

    #[tokio::test]
    async fn limit_applies_per_engine() {
        let aggregator = Aggregator::new()
            .with_engine(fixed("Alpha", 10))
            .with_engine(fixed("Beta", 10));

        let results = aggregator.aggregate(&query(4)).await;
        assert_eq!(results.len(), 8);
        assert_eq!(results.iter().filter(|r| r.engine == "Alpha").count(), 4);
        assert_eq!(results.iter().filter(|r| r.engine == "Beta").count(), 4);
    }

    #[tokio::test]
    async fn failing_engine_does_not_affect_siblings() {
        let sink = Arc::new(MemoryDiagnostics::new());
        let aggregator = Aggregator::with_diagnostics(sink.clone())
            .with_engine(fixed("Alpha", 2))
            .with_engine(Arc::new(BrokenEngine))
            .with_engine(fixed("Gamma", 0))
            .with_engine(fixed("Delta", 1));

        let results = aggregator.aggregate(&query(5)).await;
        let engines: Vec<&str> = results.iter().map(|r| r.engine.as_str()).collect();
        assert_eq!(engines, ["Alpha", "Alpha", "Delta"]);

        let events = sink.events();
        assert!(events.contains(&DiagnosticEvent::Empty {
            engine: "Gamma".into()
        }));
        assert!(events
            .iter()
            .any(|e| matches!(e, DiagnosticEvent::Failed { engine, .. } if engine == "Broken")));
    }

    #[tokio::test]
    async fn outcomes_are_reported_per_engine() {
        let aggregator = Aggregator::new()
            .with_engine(Arc::new(BrokenEngine))
            .with_engine(fixed("Alpha", 1));

        let outcomes = aggregator.aggregate_outcomes(&query(3)).await;
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].0, "Broken");
        assert!(outcomes[0].1.is_failure());
        assert!(matches!(&outcomes[1].1, EngineOutcome::Hits(r) if r.len() == 1));
    }

    #[tokio::test]
    async fn empty_aggregator_returns_nothing() {
        let aggregator = Aggregator::new();
        assert!(aggregator.is_empty());
        assert!(aggregator.aggregate(&query(3)).await.is_empty());
    }

    #[tokio::test]
    async fn engines_run_concurrently() {
        let slow = |name: &'static str| -> Arc<dyn SearchEngineTrait> {
            Arc::new(FixedEngine {
                name,
                count: 1,
                delay: Duration::from_millis(200),
            })
        };
        let aggregator = Aggregator::new()
            .with_engine(slow("A"))
            .with_engine(slow("B"))
            .with_engine(slow("C"));

        let start = std::time::Instant::now();
        let results = aggregator.aggregate(&query(1)).await;
        assert_eq!(results.len(), 3);
        assert!(start.elapsed() < Duration::from_millis(550));
    }

    #[tokio::test]
    async fn cancellation_drops_unfinished_engines() {
        let sink = Arc::new(MemoryDiagnostics::new());
        let aggregator = Aggregator::with_diagnostics(sink.clone())
            .with_engine(fixed("Fast", 2))
            .with_engine(Arc::new(FixedEngine {
                name: "Slow",
                count: 2,
                delay: Duration::from_secs(30),
            }));

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let results = aggregator.aggregate_with_cancel(&query(5), &cancel).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.engine == "Fast"));
        assert!(sink.events().iter().any(|e| matches!(
            e,
            DiagnosticEvent::Failed { engine, error }
                if engine == "Slow" && error.contains("cancelled")
        )));
    }

    #[test]
    fn from_config_registers_in_order() {
        let config = SearchConfig::default();
        let aggregator = Aggregator::from_config(
            &[EngineId::GitHub, EngineId::DuckDuckGo, EngineId::Exa],
            &config,
        );
        assert_eq!(aggregator.len(), 3);
        assert_eq!(aggregator.engine_names(), ["GitHub", "DuckDuckGo", "Exa"]);
    }
}
