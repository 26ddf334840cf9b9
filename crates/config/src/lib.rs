//! Configuration loading for the feegate CLI.
//!
//! Uses figment for YAML-based configuration with sensible defaults,
//! overridable by `FEEGATE_`-prefixed environment variables.

use feegate_types::GateError;
use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_base_url() -> String {
    "http://127.0.0.1:8000/".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_session_file() -> String {
    "~/.feegate/session.json".to_string()
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL (defaults to `http://127.0.0.1:8000/`).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// HTTP client timeout in seconds (defaults to 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Session file path; a leading `~/` is expanded by the CLI.
    #[serde(default = "default_session_file")]
    pub session_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            session_file: default_session_file(),
        }
    }
}

impl Config {
    /// Parses configuration from a YAML string, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the YAML is invalid or extraction fails.
    #[allow(clippy::result_large_err)]
    pub fn from_yaml(yaml: &str) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::string(yaml))
            .extract()
    }

    /// Loads configuration from a file path, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the file cannot be read or parsed.
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: &Path) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .extract()
    }

    /// Full precedence chain: defaults ← optional YAML file ←
    /// `FEEGATE_`-prefixed environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] on parse or extraction failure.
    pub fn load(path: Option<&Path>) -> Result<Self, GateError> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed("FEEGATE_"))
            .extract()
            .map_err(|e| GateError::Config(e.to_string()))
    }
}
