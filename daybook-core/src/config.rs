//! Daybook configuration.
//!
//! Layered: built-in defaults, then `~/.config/daybook/config.toml` (or an
//! explicit file), then `DAYBOOK_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};

use crate::error::{DaybookError, DaybookResult};
use crate::query::DEFAULT_UPCOMING_COUNT;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const ENV_PREFIX: &str = "DAYBOOK";

/// Where events are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-memory repository seeded with the sample events
    #[default]
    Sample,
    /// Remote event service over HTTP
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaybookConfig {
    pub backend: Backend,
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub upcoming_count: usize,
    pub server_port: u16,
    pub seed_sample_data: bool,
}

impl Default for DaybookConfig {
    fn default() -> Self {
        DaybookConfig {
            backend: Backend::default(),
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            upcoming_count: DEFAULT_UPCOMING_COUNT,
            server_port: DEFAULT_SERVER_PORT,
            seed_sample_data: true,
        }
    }
}

impl DaybookConfig {
    pub fn config_path() -> DaybookResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DaybookError::Config("Could not determine config directory".into()))?
            .join("daybook");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default config file (if present) and the environment.
    pub fn load() -> DaybookResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path` (if present) and the environment.
    pub fn load_from(path: &Path) -> DaybookResult<Self> {
        Self::load_layered(path, environment(None))
    }

    fn load_layered(path: &Path, env: Environment) -> DaybookResult<Self> {
        let config: DaybookConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        config.validated()
    }

    /// Load from `path` only, ignoring the environment.
    pub fn from_file(path: &Path) -> DaybookResult<Self> {
        let config: DaybookConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(true))
            .build()?
            .try_deserialize()?;

        config.validated()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validated(self) -> DaybookResult<Self> {
        if self.backend == Backend::Remote && self.api_url.trim().is_empty() {
            return Err(DaybookError::Config(
                "api_url must be set when backend = \"remote\"".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(DaybookError::Config(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(self)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> DaybookResult<()> {
        let contents = format!(
            "\
# daybook configuration

# Where events live: \"sample\" (in memory) or \"remote\" (event service)
# backend = \"sample\"

# Base URL of the event service:
# api_url = \"{DEFAULT_API_URL}\"

# Seconds before a request to the event service is abandoned:
# request_timeout_secs = {DEFAULT_TIMEOUT_SECS}

# How many events the upcoming list shows:
# upcoming_count = {DEFAULT_UPCOMING_COUNT}

# Port daybook-server listens on:
# server_port = {DEFAULT_SERVER_PORT}

# Whether daybook-server starts with the sample events:
# seed_sample_data = true
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DaybookError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| DaybookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Serialize the effective configuration as TOML.
    pub fn to_toml(&self) -> DaybookResult<String> {
        toml::to_string_pretty(self).map_err(|e| DaybookError::Config(e.to_string()))
    }
}

/// The `DAYBOOK_*` layer. `vars` replaces the process environment when given.
fn environment(vars: Option<Map<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .source(vars)
}
