use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::prompt::PromptOptions;

const PLACEHOLDER_API_KEY: &str = "PLACEHOLDER_GEMINI_API_KEY";

/// Main configuration structure for pagesmith
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// When set, every route except /health requires this bearer token
    pub bearer_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".to_string(),
            bearer_token: None,
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: env::var("GEMINI_API_KEY")
                .or_else(|_| env::var("GOOGLE_API_KEY"))
                .unwrap_or_else(|_| {
                    tracing::warn!("GEMINI_API_KEY not set, using placeholder");
                    PLACEHOLDER_API_KEY.to_string()
                }),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            temperature: None,
            max_output_tokens: None,
            timeout_seconds: 120,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        let env_paths = ["../.env", ".env"];

        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }

        if !env_loaded {
            tracing::debug!("No .env file found - continuing with env vars only");
        }

        let config_path =
            env::var("PAGESMITH_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = Self::from_file(&config_path);
        config.apply_env_overrides();

        // Validate configuration - log warnings but don't fail
        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    fn from_file(config_path: &str) -> Self {
        if !Path::new(config_path).exists() {
            tracing::info!("Config file not found at {} - using defaults", config_path);
            return Self::default();
        }

        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_yaml::from_str::<Config>(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", config_path);
                    config
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to parse config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!(
                    "Failed to read config file {}: {} - using defaults",
                    config_path,
                    e
                );
                Self::default()
            }
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(bind) = var("PAGESMITH_BIND") {
            self.server.bind = bind;
        }
        if let Some(token) = var("PAGESMITH_BEARER_TOKEN") {
            self.server.bearer_token = if token.is_empty() { None } else { Some(token) };
        }

        // Gemini overrides
        if let Some(api_key) = var("GEMINI_API_KEY").or_else(|| var("GOOGLE_API_KEY")) {
            self.gemini.api_key = api_key;
        }
        if let Some(model) = var("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(base_url) = var("GEMINI_BASE_URL") {
            self.gemini.base_url = base_url;
        }
        if let Some(temperature) = var("GEMINI_TEMPERATURE") {
            if let Ok(value) = temperature.parse() {
                self.gemini.temperature = Some(value);
            }
        }
        if let Some(max_tokens) = var("GEMINI_MAX_OUTPUT_TOKENS") {
            if let Ok(value) = max_tokens.parse() {
                self.gemini.max_output_tokens = Some(value);
            }
        }
        if let Some(timeout) = var("GEMINI_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.gemini.timeout_seconds = value;
            }
        }

        // Upload overrides
        if let Some(max_bytes) = var("PAGESMITH_MAX_UPLOAD_BYTES") {
            if let Ok(value) = max_bytes.parse() {
                self.upload.max_bytes = value;
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.gemini.api_key == PLACEHOLDER_API_KEY || self.gemini.api_key.is_empty() {
            return Err("GEMINI_API_KEY environment variable must be set".into());
        }

        if let Some(temperature) = self.gemini.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err("Gemini temperature must be between 0.0 and 2.0".into());
            }
        }

        if self.gemini.timeout_seconds == 0 {
            return Err("Gemini timeout_seconds cannot be 0".into());
        }

        if self.upload.max_bytes == 0 {
            return Err("Upload max_bytes cannot be 0".into());
        }

        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        !self.gemini.api_key.is_empty() && self.gemini.api_key != PLACEHOLDER_API_KEY
    }

    /// Get request timeout as Duration
    pub fn get_request_timeout(&self) -> Duration {
        Duration::from_secs(self.gemini.timeout_seconds)
    }

    pub fn prompt_options(&self) -> PromptOptions {
        PromptOptions {
            temperature: self.gemini.temperature,
            max_output_tokens: self.gemini.max_output_tokens,
        }
    }
}
