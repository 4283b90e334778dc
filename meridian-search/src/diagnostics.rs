//! Structured diagnostics for engine calls.
//!
//! Engines and the aggregator never fail outward; instead they report what
//! went wrong to a [`DiagnosticsSink`] handed to them by the caller. The
//! default [`TracingDiagnostics`] turns reports into `tracing` events;
//! [`MemoryDiagnostics`] keeps them for inspection.
//!
//! # Thread Safety
//!
//! All methods take `&self` so a single sink can be shared across
//! concurrently running engines.

use std::sync::Mutex;

use crate::error::SearchError;

/// Receiver of engine diagnostics.
pub trait DiagnosticsSink: Send + Sync {
    /// An engine call failed; its contribution is empty.
    fn engine_failed(&self, engine: &str, error: &SearchError);

    /// The backend answered but had nothing for the query.
    fn empty_upstream(&self, engine: &str);

    /// A single backend record was discarded, e.g. for lacking a URL.
    fn record_dropped(&self, engine: &str, reason: &str);

    /// An engine finished with `count` results after truncation.
    fn engine_completed(&self, engine: &str, count: usize);
}

/// Forwards diagnostics to `tracing`.
///
/// Failures and empty upstreams are `warn`, everything else `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn engine_failed(&self, engine: &str, error: &SearchError) {
        tracing::warn!(engine, error = %error, "engine query failed");
    }

    fn empty_upstream(&self, engine: &str) {
        tracing::warn!(engine, "engine returned no results");
    }

    fn record_dropped(&self, engine: &str, reason: &str) {
        tracing::debug!(engine, reason, "dropped result record");
    }

    fn engine_completed(&self, engine: &str, count: usize) {
        tracing::debug!(engine, count, "engine returned results");
    }
}

/// One recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// See [`DiagnosticsSink::engine_failed`]; carries the error message.
    Failed { engine: String, error: String },
    /// See [`DiagnosticsSink::empty_upstream`].
    Empty { engine: String },
    /// See [`DiagnosticsSink::record_dropped`].
    Dropped { engine: String, reason: String },
    /// See [`DiagnosticsSink::engine_completed`].
    Completed { engine: String, count: usize },
}

/// Collects diagnostics in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemoryDiagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn push(&self, event: DiagnosticEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl DiagnosticsSink for MemoryDiagnostics {
    fn engine_failed(&self, engine: &str, error: &SearchError) {
        self.push(DiagnosticEvent::Failed {
            engine: engine.to_owned(),
            error: error.to_string(),
        });
    }

    fn empty_upstream(&self, engine: &str) {
        self.push(DiagnosticEvent::Empty {
            engine: engine.to_owned(),
        });
    }

    fn record_dropped(&self, engine: &str, reason: &str) {
        self.push(DiagnosticEvent::Dropped {
            engine: engine.to_owned(),
            reason: reason.to_owned(),
        });
    }

    fn engine_completed(&self, engine: &str, count: usize) {
        self.push(DiagnosticEvent::Completed {
            engine: engine.to_owned(),
            count,
        });
    }
}
