//! # meridian-search
//!
//! One query interface over several heterogeneous search backends, plus
//! README lookup for GitHub repositories.
//!
//! ## Design
//!
//! - Each backend (Exa, GitHub repository search, DuckDuckGo) is an adapter
//!   implementing [`SearchEngineTrait`]; callers can register their own
//! - [`Aggregator`] queries all adapters concurrently and concatenates their
//!   normalized results in registration order, truncated per engine
//! - Engine failures never escape: each degrades to an empty contribution and
//!   is reported to an injected [`DiagnosticsSink`]
//! - [`repository::resolve`] turns HTTPS, `www`, `.git`, `blob`/`tree` and SSH
//!   references into one canonical identifier without touching the network
//!
//! ## Security
//!
//! - API keys and tokens are held in [`config::Secret`] and never logged
//! - Search queries are logged only at trace level
//! - No network listeners; this is a library, not a server

pub mod aggregator;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod engines;
pub mod error;
pub mod http;
pub mod proxy;
pub mod readme;
pub mod repository;
pub mod types;

pub use aggregator::Aggregator;
pub use config::{SearchConfig, Secret};
pub use diagnostics::{DiagnosticsSink, MemoryDiagnostics, TracingDiagnostics};
pub use engine::{EngineOutcome, SearchEngineTrait};
pub use engines::build_engine;
pub use error::{ResolutionFailure, Result, SearchError};
pub use proxy::ProxySetting;
pub use readme::GitHubReadme;
pub use repository::RepositoryIdentifier;
pub use types::{EngineId, EngineQuery, NormalizedResult};

/// Search with the configured primary engine.
///
/// Returns at most `limit` results. Engine failures (network, status,
/// parse, missing API key) yield `Ok` with an empty list and a logged
/// diagnostic.
///
/// # Errors
///
/// Returns [`SearchError::Config`] only if `config` is invalid, `query` is
/// blank, or `limit` is 0.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> meridian_search::Result<()> {
/// let config = meridian_search::SearchConfig::default();
/// let results = meridian_search::search("react hooks", 5, &config).await?;
/// for result in &results {
///     println!("{} ({}): {}", result.title, result.source, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    query: &str,
    limit: usize,
    config: &SearchConfig,
) -> Result<Vec<NormalizedResult>> {
    config.validate()?;
    let query = EngineQuery::new(query, limit)?;
    let engine = build_engine(config.primary_engine, config);
    Ok(engine.search(&query, &TracingDiagnostics).await.into_results())
}

/// Query several engines concurrently and concatenate their results.
///
/// Each engine contributes at most `limit` results; an empty `engines`
/// slice means `config.engines`. Failed engines contribute nothing.
///
/// # Errors
///
/// Same as [`search`].
///
/// # Examples
///
/// ```no_run
/// use meridian_search::EngineId;
///
/// # async fn example() -> meridian_search::Result<()> {
/// let config = meridian_search::SearchConfig::default();
/// let results = meridian_search::aggregate(
///     "async runtime",
///     5,
///     &[EngineId::Exa, EngineId::GitHub],
///     &config,
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn aggregate(
    query: &str,
    limit: usize,
    engines: &[EngineId],
    config: &SearchConfig,
) -> Result<Vec<NormalizedResult>> {
    config.validate()?;
    let query = EngineQuery::new(query, limit)?;
    let engines = if engines.is_empty() {
        config.engines.as_slice()
    } else {
        engines
    };
    Ok(Aggregator::from_config(engines, config).aggregate(&query).await)
}

/// Fetch the README a repository reference points at.
///
/// Returns `None` for unresolvable references (without any request),
/// missing repositories or READMEs, non-2xx responses, and network errors.
///
/// # Examples
///
/// ```no_run
/// # async fn example() {
/// let config = meridian_search::SearchConfig::default();
/// let reference = "git@github.com:tokio-rs/tokio.git";
/// if let Some(text) = meridian_search::fetch_readme(reference, &config).await {
///     println!("{text}");
/// }
/// # }
/// ```
pub async fn fetch_readme(url: &str, config: &SearchConfig) -> Option<String> {
    if let Err(err) = config.validate_readme() {
        tracing::warn!(error = %err, "README fetch skipped");
        return None;
    }
    GitHubReadme::new(config).fetch_readme(url).await
}

/// Resolve a repository reference to its canonical identifier.
///
/// Pure and synchronous; see [`repository::resolve`].
///
/// # Errors
///
/// Returns a [`ResolutionFailure`] describing why the reference is unusable.
pub fn resolve_repository(
    raw: &str,
) -> std::result::Result<RepositoryIdentifier, ResolutionFailure> {
    repository::resolve(raw)
}
