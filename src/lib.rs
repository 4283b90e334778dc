//! Meridian: a command-line front end for `meridian-search`.
//!
//! - [`config`] loads `config.toml` and credential overrides from the environment
//! - [`commands`] runs `search`, `readme` and `resolve`
//! - [`format`] renders results for the terminal

pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod meridian_dirs;

pub use config::MeridianConfig;
pub use error::{MeridianError, Result};
