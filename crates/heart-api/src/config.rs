//! Server configuration

use anyhow::{Context, Result};
use predictor_lib::predictor::DEFAULT_SLOW_INFERENCE_MS;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Environment variable prefix, e.g. `HEART_API_PORT`
pub const ENV_PREFIX: &str = "HEART_API";

/// Name of the artifact directory next to the executable
pub const MODEL_DIR_NAME: &str = "models";

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the model artifacts
    #[serde(default)]
    pub model_dir: Option<PathBuf>,

    /// Inference latency in milliseconds above which a warning is logged
    #[serde(default = "default_slow_inference_ms")]
    pub slow_inference_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_slow_inference_ms() -> u64 {
    DEFAULT_SLOW_INFERENCE_MS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            model_dir: None,
            slow_inference_ms: default_slow_inference_ms(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load configuration from an explicit variable map
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn from_environment(env: config::Environment) -> Result<Self> {
        config::Config::builder()
            .add_source(env)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configured model directory, or `models/` next to the executable
    pub fn resolved_model_dir(&self) -> PathBuf {
        if let Some(dir) = &self.model_dir {
            return dir.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(MODEL_DIR_NAME)))
            .unwrap_or_else(|| PathBuf::from(MODEL_DIR_NAME))
    }
}
