//! Application configuration module.
//!
//! Manages the TOML config file (backend URL, timeouts, notification
//! duration) and the location of the session file next to it.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::{resolve_config_path, resolve_session_path};
