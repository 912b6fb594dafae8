//! Configuration loading for Switchboard.
//!
//! Layered the usual way: built-in defaults, then an optional TOML
//! file, then `SWITCHBOARD_*` environment overrides, then a validation
//! pass at startup. Every field has a serde default so a partial file
//! (or none at all) still yields a working configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Unit budget for each session's conversation context.
    pub context_budget: u64,

    /// Handler invocation timeout in milliseconds.
    pub handler_timeout_ms: u64,

    /// How many collapsed-history snapshots a session retains.
    pub max_history_snapshots: usize,

    /// Handler that receives low-confidence fallback traffic.
    pub default_handler_id: String,

    pub gateway: GatewayConfig,

    pub classifier: ClassifierConfig,

    /// Declarative keyword/phrase overrides merged onto the built-in
    /// handler capabilities at startup.
    #[serde(rename = "capabilities")]
    pub capability_overrides: Vec<CapabilityOverride>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            context_budget: 8_000,
            handler_timeout_ms: 25_000,
            max_history_snapshots: 5,
            default_handler_id: "general".to_string(),
            gateway: GatewayConfig::default(),
            classifier: ClassifierConfig::default(),
            capability_overrides: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl GatewayConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Scoring weights for the intent classifier. Tunables, not
/// load-bearing constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    pub keyword_weight: u32,
    pub phrase_weight: u32,
    pub co_occurrence_bonus: u32,
    pub threshold_scale: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            keyword_weight: 2,
            phrase_weight: 3,
            co_occurrence_bonus: 2,
            threshold_scale: 4.0,
        }
    }
}

/// Per-handler capability override from the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CapabilityOverride {
    pub handler_id: String,
    pub keywords: Vec<String>,
    pub phrases: Vec<String>,
    pub priority: Option<i32>,
    pub confidence_threshold: Option<f64>,
}

impl AppConfig {
    /// Load from a TOML file and apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let mut config: Self = toml::from_str(&raw)?;
        debug!(path = %path.as_ref().display(), "Loaded config file");
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply `SWITCHBOARD_*` environment overrides. Unparseable values
    /// are ignored in favor of the current setting.
    pub fn apply_env(&mut self) {
        if let Some(v) = env_parse::<u64>("SWITCHBOARD_CONTEXT_BUDGET") {
            self.context_budget = v;
        }
        if let Some(v) = env_parse::<u64>("SWITCHBOARD_HANDLER_TIMEOUT_MS") {
            self.handler_timeout_ms = v;
        }
        if let Some(v) = env_parse::<usize>("SWITCHBOARD_MAX_HISTORY_SNAPSHOTS") {
            self.max_history_snapshots = v;
        }
        if let Ok(v) = std::env::var("SWITCHBOARD_DEFAULT_HANDLER_ID")
            && !v.is_empty()
        {
            self.default_handler_id = v;
        }
        if let Ok(v) = std::env::var("SWITCHBOARD_GATEWAY_HOST")
            && !v.is_empty()
        {
            self.gateway.host = v;
        }
        if let Some(v) = env_parse::<u16>("SWITCHBOARD_GATEWAY_PORT") {
            self.gateway.port = v;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.context_budget == 0 {
            return Err(ConfigError::Invalid("context_budget must be > 0".into()));
        }
        if self.handler_timeout_ms == 0 {
            return Err(ConfigError::Invalid("handler_timeout_ms must be > 0".into()));
        }
        if self.max_history_snapshots == 0 {
            return Err(ConfigError::Invalid(
                "max_history_snapshots must be > 0".into(),
            ));
        }
        if self.default_handler_id.is_empty() {
            return Err(ConfigError::Invalid(
                "default_handler_id must not be empty".into(),
            ));
        }
        if self.classifier.threshold_scale <= 0.0 {
            return Err(ConfigError::Invalid(
                "classifier.threshold_scale must be > 0".into(),
            ));
        }
        for cap in &self.capability_overrides {
            if cap.handler_id.is_empty() {
                return Err(ConfigError::Invalid(
                    "capability override missing handler_id".into(),
                ));
            }
            if let Some(threshold) = cap.confidence_threshold
                && !(0.0..=1.0).contains(&threshold)
            {
                return Err(ConfigError::Invalid(format!(
                    "capability {}: confidence_threshold must be in [0, 1]",
                    cap.handler_id
                )));
            }
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.parse().ok()
}
