// config/mod.rs — Server configuration.
//
// Precedence: CLI flag > environment variable > config.toml > default.
// Credentials are explicit configuration — nothing reads the environment
// lazily at call sites.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const DEFAULT_PORT: u16 = 4310;
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4.1";
/// Bounds generated output so a runaway reply cannot exhaust the budget.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_output_tokens() -> u32 {
    DEFAULT_MAX_OUTPUT_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

/// Runtime configuration for `atlasd serve`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AtlasConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Default: 127.0.0.1; use 0.0.0.0 to serve the LAN.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// OpenAI API key. Required to serve; no key, no startup.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: default_bind_address(),
            api_key: None,
            api_base_url: default_api_base_url(),
            model: default_model(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl AtlasConfig {
    /// Load from a TOML file, falling back to defaults when the file does
    /// not exist. A file that exists but fails to parse is an error — a typo
    /// should not silently serve defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply CLI/env overrides on top of file values.
    pub fn apply_overrides(
        &mut self,
        port: Option<u16>,
        bind_address: Option<String>,
        api_key: Option<String>,
        model: Option<String>,
    ) {
        if let Some(p) = port {
            self.port = p;
        }
        if let Some(b) = bind_address {
            self.bind_address = b;
        }
        if let Some(k) = api_key {
            self.api_key = Some(k);
        }
        if let Some(m) = model {
            self.model = m;
        }
    }
}
