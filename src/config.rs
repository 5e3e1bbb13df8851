//! Configuration loading.
//!
//! Resolution order for every setting: `config.toml` in the inkpilot home
//! directory, then `INKPILOT_*` environment variables (which win), then
//! built-in defaults. A missing config file is not an error.

use crate::wire::endpoints;
use crate::{InkpilotError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_MAX_TOKENS: u32 = 2048;
const DEFAULT_TEMPERATURE: f32 = 0.9;

/// Partial config.toml parsing. All fields optional; defaults fill the rest.
#[derive(Debug, Deserialize)]
struct ConfigToml {
    base_url: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

/// Resolved configuration for Inkpilot
#[derive(Debug, Clone)]
pub struct InkpilotConfig {
    /// Base URL of the upstream API
    pub base_url: String,

    /// Model requested in completion calls
    pub model: String,

    /// Bearer token for the upstream API (None for local providers)
    pub api_key: Option<String>,

    /// Completion length cap per call
    pub max_tokens: u32,

    /// Sampling temperature for prose generation
    pub temperature: f32,
}

impl Default for InkpilotConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl InkpilotConfig {
    /// The exact chat-completion URL the interceptor matches on.
    pub fn completion_endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            endpoints::CHAT_COMPLETIONS
        )
    }

    /// Default inkpilot home: `~/.config/inkpilot`.
    pub fn default_home() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join("inkpilot"))
            .ok_or_else(|| InkpilotError::Config("cannot resolve config directory".to_string()))
    }

    /// Load from `<home>/config.toml`, then apply environment overrides.
    pub async fn load(home: &Path) -> Result<Self> {
        let mut config = Self::default();

        let config_file = home.join("config.toml");
        if config_file.exists() {
            let content = tokio::fs::read_to_string(&config_file).await?;
            match toml::from_str::<ConfigToml>(&content) {
                Ok(file) => {
                    if let Some(base_url) = file.base_url {
                        config.base_url = base_url;
                    }
                    if let Some(model) = file.model {
                        config.model = model;
                    }
                    if let Some(api_key) = file.api_key {
                        config.api_key = Some(api_key);
                    }
                    if let Some(max_tokens) = file.max_tokens {
                        config.max_tokens = max_tokens;
                    }
                    if let Some(temperature) = file.temperature {
                        config.temperature = temperature;
                    }
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", config_file.display(), e);
                }
            }
        }

        config.apply_env();

        info!(
            "Config resolved: model='{}', base_url='{}', api_key={}",
            config.model,
            config.base_url,
            if config.api_key.is_some() { "set" } else { "unset" }
        );

        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(base_url) = std::env::var("INKPILOT_BASE_URL") {
            if !base_url.trim().is_empty() {
                self.base_url = base_url;
            }
        }
        if let Ok(model) = std::env::var("INKPILOT_MODEL") {
            if !model.trim().is_empty() {
                self.model = model;
            }
        }
        if let Ok(key) = std::env::var("INKPILOT_API_KEY") {
            if !key.trim().is_empty() {
                self.api_key = Some(key);
            }
        }
    }
}
