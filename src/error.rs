//! Error types for the meridian application layer.

/// Top-level error type for config loading and command execution.
#[derive(Debug, thiserror::Error)]
pub enum MeridianError {
    /// Config file could not be parsed or holds invalid values.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid search input or search configuration.
    #[error(transparent)]
    Search(#[from] meridian_search::SearchError),

    /// A repository reference could not be resolved.
    #[error("cannot resolve repository: {0}")]
    Resolution(#[from] meridian_search::ResolutionFailure),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, MeridianError>;
