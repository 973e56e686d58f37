//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::analysis::GeminiConfig as GeminiClientConfig;
use crate::journal::FirestoreConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_body_size() -> usize {
    2 * 1024 * 1024 // 2 MB
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            max_body_size: default_max_body_size(),
        }
    }
}

/// Which document store backs the journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process store, lost on restart
    #[default]
    Memory,
    /// Cloud Firestore (or its emulator)
    Firestore,
    /// No store; journal operations report storage unavailable
    None,
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "firestore" => Ok(StoreBackend::Firestore),
            "none" => Ok(StoreBackend::None),
            other => Err(ConfigError::Invalid(format!(
                "unknown store backend '{}', use memory, firestore, or none",
                other
            ))),
        }
    }
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default = "default_collection")]
    pub collection: String,

    /// Firestore project id
    #[serde(default)]
    pub project_id: String,

    #[serde(default = "default_firestore_url")]
    pub base_url: String,

    /// OAuth access token for Firestore (not needed for the emulator)
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_store_timeout")]
    pub request_timeout_ms: u64,
}

fn default_collection() -> String {
    crate::journal::DEFAULT_COLLECTION.to_string()
}

fn default_firestore_url() -> String {
    "https://firestore.googleapis.com".to_string()
}

fn default_store_timeout() -> u64 {
    10_000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            collection: default_collection(),
            project_id: String::new(),
            base_url: default_firestore_url(),
            access_token: None,
            request_timeout_ms: default_store_timeout(),
        }
    }
}

impl StoreConfig {
    /// Firestore client settings, `None` if no project is configured
    pub fn firestore_config(&self) -> Option<FirestoreConfig> {
        if self.project_id.is_empty() {
            return None;
        }

        Some(FirestoreConfig {
            base_url: self.base_url.clone(),
            project_id: self.project_id.clone(),
            access_token: self.access_token.clone().filter(|t| !t.is_empty()),
            request_timeout_ms: self.request_timeout_ms,
            ..Default::default()
        })
    }
}

/// Gemini API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    /// API key; empty disables AI features
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_gemini_model")]
    pub model: String,

    #[serde(default = "default_gemini_url")]
    pub base_url: String,

    #[serde(default = "default_gemini_timeout")]
    pub request_timeout_ms: u64,
}

fn default_gemini_model() -> String {
    "gemini-pro".to_string()
}

fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_timeout() -> u64 {
    30_000
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_gemini_model(),
            base_url: default_gemini_url(),
            request_timeout_ms: default_gemini_timeout(),
        }
    }
}

impl GeminiConfig {
    /// Gemini client settings, `None` if no API key is configured
    pub fn client_config(&self) -> Option<GeminiClientConfig> {
        if self.api_key.is_empty() {
            return None;
        }

        Some(GeminiClientConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            request_timeout_ms: self.request_timeout_ms,
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// True if logs should be emitted as JSON lines
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("freewrite").join("config.toml")),
            Some(PathBuf::from("/etc/freewrite/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable lookup
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // API overrides
        if let Some(host) = var("API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("API_PORT") {
            self.api.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("API_PORT is not a port: {}", port)))?;
        }

        // Store overrides
        if let Some(backend) = var("FREEWRITE_STORE") {
            self.store.backend = backend.parse()?;
        }
        if let Some(collection) = var("FREEWRITE_COLLECTION") {
            self.store.collection = collection;
        }
        if let Some(project_id) = var("FIREBASE_PROJECT_ID") {
            self.store.project_id = project_id;
        }
        if let Some(emulator) = var("FIRESTORE_EMULATOR_HOST") {
            self.store.base_url = format!("http://{}", emulator);
        }
        if let Some(token) = var("FIRESTORE_ACCESS_TOKEN") {
            self.store.access_token = Some(token);
        }

        // Gemini overrides
        if let Some(api_key) = var("GOOGLE_API_KEY") {
            self.gemini.api_key = api_key;
        }
        if let Some(model) = var("GEMINI_MODEL") {
            self.gemini.model = model;
        }

        // Logging overrides
        if let Some(level) = var("FREEWRITE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("FREEWRITE_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Freewrite Configuration
#
# Environment variables override these settings:
# - API_HOST, API_PORT
# - FREEWRITE_STORE, FREEWRITE_COLLECTION
# - FIREBASE_PROJECT_ID, FIRESTORE_EMULATOR_HOST, FIRESTORE_ACCESS_TOKEN
# - GOOGLE_API_KEY, GEMINI_MODEL
# - FREEWRITE_LOG_LEVEL, FREEWRITE_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8000

# Allowed CORS origins (empty allows any origin)
cors_origins = []

# Maximum request body size in bytes
max_body_size = 2097152

[store]
# Document store: memory, firestore, or none
backend = "memory"

# Collection holding journal entries
collection = "journals"

# Firestore project id (required for the firestore backend)
project_id = ""

# Firestore API root (set to http://localhost:8080 for the emulator)
base_url = "https://firestore.googleapis.com"

# OAuth access token for Firestore
# access_token = ""

# Request timeout (ms)
request_timeout_ms = 10000

[gemini]
# Google AI Studio API key (empty disables AI analysis)
api_key = ""

# Model used for analysis and prompts
model = "gemini-pro"

# Request timeout (ms)
request_timeout_ms = 30000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
