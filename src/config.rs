//! On-disk configuration for the meridian CLI.
//!
//! The TOML file mirrors [`SearchConfig`] in three sections:
//!
//! ```toml
//! [search]
//! engines = ["exa", "github"]
//! primary_engine = "exa"
//! limit = 10
//! timeout_seconds = 8
//! proxy = "env"
//!
//! [exa]
//! api_key = "..."
//!
//! [github]
//! token = "..."
//! ```
//!
//! `EXA_API_KEY` and `GITHUB_TOKEN` (or `GH_TOKEN`) override the file.

use std::path::{Path, PathBuf};

use meridian_search::config::{DEFAULT_GITHUB_API_BASE, ExaConfig, GitHubConfig};
use meridian_search::{EngineId, ProxySetting, SearchConfig, Secret};
use serde::{Deserialize, Serialize};

use crate::error::{MeridianError, Result};

/// Environment variable holding the Exa API key.
pub const EXA_API_KEY_ENV: &str = "EXA_API_KEY";
/// Environment variables holding a GitHub token, in lookup order.
pub const GITHUB_TOKEN_ENVS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeridianConfig {
    /// Engine selection, limits and transport.
    pub search: SearchSection,
    /// Exa backend.
    pub exa: ExaSection,
    /// GitHub backend.
    pub github: GitHubSection,
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Engines queried by `meridian search` when `-e` is not given.
    pub engines: Vec<EngineId>,
    /// Engine used for single-engine lookups.
    pub primary_engine: EngineId,
    /// Results per engine when `-n` is not given.
    pub limit: usize,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Request safe search where supported.
    pub safe_search: bool,
    /// Fixed User-Agent for every backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// `none`, `env`, or a proxy URL. Unset means a direct connection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

impl Default for SearchSection {
    fn default() -> Self {
        let defaults = SearchConfig::default();
        Self {
            engines: defaults.engines,
            primary_engine: defaults.primary_engine,
            limit: defaults.max_results,
            timeout_seconds: defaults.timeout_seconds,
            safe_search: defaults.safe_search,
            user_agent: None,
            proxy: None,
        }
    }
}

/// `[exa]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExaSection {
    /// Overridden by `EXA_API_KEY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<Secret>,
    /// API root.
    pub base_url: String,
    /// `auto`, `neural` or `keyword`.
    pub search_type: String,
}

impl Default for ExaSection {
    fn default() -> Self {
        let defaults = ExaConfig::default();
        Self {
            api_key: None,
            base_url: defaults.base_url,
            search_type: defaults.search_type,
        }
    }
}

/// `[github]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubSection {
    /// Overridden by `GITHUB_TOKEN` or `GH_TOKEN`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<Secret>,
    pub api_base: String,
}

impl Default for GitHubSection {
    fn default() -> Self {
        Self {
            token: None,
            api_base: DEFAULT_GITHUB_API_BASE.into(),
        }
    }
}

impl MeridianConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| MeridianError::Config(format!("{}: {e}", path.display())))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MeridianError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> PathBuf {
        crate::meridian_dirs::config_file()
    }

    /// Load from `explicit`, or from the default path when it exists.
    ///
    /// A missing default file yields defaults; a missing explicit file is
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a file that should be read cannot be parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::default_config_path();
                if path.is_file() {
                    tracing::debug!(path = %path.display(), "loading config");
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply credential overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Apply credential overrides from `lookup`. Blank values are ignored.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        if let Some(key) = read(EXA_API_KEY_ENV) {
            self.exa.api_key = Some(Secret::new(key));
        }
        if let Some(token) = GITHUB_TOKEN_ENVS.iter().find_map(|&name| read(name)) {
            self.github.token = Some(Secret::new(token));
        }
    }

    /// Convert to the library configuration and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`MeridianError::Config`] for an unparseable proxy or an
    /// invalid resulting configuration.
    pub fn to_search_config(&self) -> Result<SearchConfig> {
        let proxy = match self.search.proxy.as_deref() {
            None => ProxySetting::Direct,
            Some(raw) => ProxySetting::parse(raw).ok_or_else(|| {
                MeridianError::Config(format!("search.proxy is not a proxy URL: {raw:?}"))
            })?,
        };

        let config = SearchConfig {
            engines: self.search.engines.clone(),
            primary_engine: self.search.primary_engine,
            max_results: self.search.limit,
            timeout_seconds: self.search.timeout_seconds,
            safe_search: self.search.safe_search,
            user_agent: self.search.user_agent.clone(),
            proxy,
            exa: ExaConfig {
                api_key: self.exa.api_key.clone(),
                base_url: self.exa.base_url.clone(),
                search_type: self.exa.search_type.clone(),
            },
            github: GitHubConfig {
                token: self.github.token.clone(),
                api_base: self.github.api_base.clone(),
            },
        };
        config.validate().map_err(|e| MeridianError::Config(e.to_string()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use meridian_search::config::DEFAULT_EXA_BASE_URL;

    #[test]
    fn defaults_match_library_defaults() {
        let config = MeridianConfig::default().to_search_config().expect("valid");
        let library = SearchConfig::default();
        assert_eq!(config.engines, library.engines);
        assert_eq!(config.max_results, library.max_results);
        assert_eq!(config.timeout_seconds, library.timeout_seconds);
        assert_eq!(config.exa.base_url, DEFAULT_EXA_BASE_URL);
        assert_eq!(config.proxy, ProxySetting::Direct);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: MeridianConfig = toml::from_str(
            r#"
            [search]
            engines = ["github", "duckduckgo"]
            limit = 3
            "#,
        )
        .expect("parse");
        assert_eq!(config.search.engines, vec![EngineId::GitHub, EngineId::DuckDuckGo]);
        assert_eq!(config.search.limit, 3);
        assert_eq!(config.search.timeout_seconds, 8);
        assert_eq!(config.github.api_base, DEFAULT_GITHUB_API_BASE);
    }

    #[test]
    fn unknown_engine_is_a_parse_error() {
        let result: std::result::Result<MeridianConfig, _> =
            toml::from_str("[search]\nengines = [\"altavista\"]\n");
        assert!(result.is_err());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut config = MeridianConfig::default();
        config.search.limit = 4;
        config.search.proxy = Some("env".into());
        config.exa.api_key = Some(Secret::new("exa-key"));
        config.save_to_file(&path).expect("save");

        let loaded = MeridianConfig::load(Some(&path)).expect("load");
        assert_eq!(loaded.search.limit, 4);
        assert_eq!(loaded.search.proxy.as_deref(), Some("env"));
        assert_eq!(loaded.exa.api_key.as_ref().map(Secret::expose), Some("exa-key"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = MeridianConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(MeridianError::Io(_))));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write");
        let err = MeridianConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn env_overrides_credentials() {
        let mut config = MeridianConfig::default();
        config.github.token = Some(Secret::new("from-file"));
        config.apply_env_with(|name| match name {
            "EXA_API_KEY" => Some("exa-env".into()),
            "GH_TOKEN" => Some("gh-env".into()),
            _ => None,
        });
        assert_eq!(config.exa.api_key.as_ref().map(Secret::expose), Some("exa-env"));
        assert_eq!(config.github.token.as_ref().map(Secret::expose), Some("gh-env"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = MeridianConfig::default();
        config.exa.api_key = Some(Secret::new("from-file"));
        config.apply_env_with(|_| Some("   ".into()));
        assert_eq!(config.exa.api_key.as_ref().map(Secret::expose), Some("from-file"));
        assert!(config.github.token.is_none());
    }

    #[test]
    fn github_token_takes_precedence_over_gh_token() {
        let mut config = MeridianConfig::default();
        config.apply_env_with(|name| Some(format!("{name}-value")));
        assert_eq!(config.github.token.as_ref().map(Secret::expose), Some("GITHUB_TOKEN-value"));
    }

    #[test]
    fn proxy_setting_is_parsed() {
        let mut config = MeridianConfig::default();
        config.search.proxy = Some("http://127.0.0.1:8080".into());
        let search = config.to_search_config().expect("valid");
        assert!(matches!(search.proxy, ProxySetting::Fixed(_)));

        config.search.proxy = Some("not a proxy".into());
        assert!(matches!(config.to_search_config(), Err(MeridianError::Config(_))));
    }

    #[test]
    fn zero_limit_is_rejected() {
        let mut config = MeridianConfig::default();
        config.search.limit = 0;
        let err = config.to_search_config().unwrap_err();
        assert!(err.to_string().contains("max_results"));
    }

    #[test]
    fn secrets_are_redacted_in_debug() {
        let mut config = MeridianConfig::default();
        config.github.token = Some(Secret::new("ghp_secret"));
        assert!(!format!("{config:?}").contains("ghp_secret"));
    }
}
