//! Server configuration.
//!
//! Read from a YAML (or JSON) file when `--config` is given, otherwise from
//! `OSAGENT_*` environment variables via `envy`:
//!   - `OSAGENT_LISTEN_ADDR`  (default `0.0.0.0:3002`)
//!   - `OSAGENT_TOKEN`        (optional; generated at startup when unset)
//!   - `OSAGENT_<FIELD>`      for every `AgentConfig` field, e.g.
//!     `OSAGENT_SNAPSHOT_MOUNT_POINT`, `OSAGENT_SERVICE_STATUS_COMMAND`

use std::path::Path;

use anyhow::{Context, Result};
use osagent::AgentConfig;
use serde::Deserialize;

pub const ENV_PREFIX: &str = "OSAGENT_";

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind the HTTP server to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Shared secret callers pass as `?token=`.
    #[serde(default)]
    pub token: Option<String>,

    #[serde(flatten)]
    pub agent: AgentConfig,
}

fn default_listen_addr() -> String {
    "0.0.0.0:3002".to_string()
}

impl ServerConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_env(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn from_env() -> Result<Self> {
        envy::prefixed(ENV_PREFIX)
            .from_env()
            .with_context(|| format!("failed to load config from {ENV_PREFIX}* env vars"))
    }

    /// The configured token, ignoring an empty value.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}
