//! Search engine implementations.
//!
//! Each module provides a struct implementing [`crate::engine::SearchEngineTrait`]
//! for one backend.

use std::sync::Arc;

use crate::config::SearchConfig;
use crate::engine::SearchEngineTrait;
use crate::types::EngineId;

pub mod duckduckgo;
pub mod exa;
pub mod github;

pub use duckduckgo::DuckDuckGoEngine;
pub use exa::ExaEngine;
pub use github::GitHubEngine;

/// Instantiate the adapter for a built-in engine.
pub fn build_engine(engine: EngineId, config: &SearchConfig) -> Arc<dyn SearchEngineTrait> {
    match engine {
        EngineId::Exa => Arc::new(ExaEngine::new(config)),
        EngineId::GitHub => Arc::new(GitHubEngine::new(config)),
        EngineId::DuckDuckGo => Arc::new(DuckDuckGoEngine::new(config)),
    }
}
