//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::analysis::AnalysisForwarder;
use crate::journal::JournalRepository;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway for journal entries
    pub journals: Arc<JournalRepository>,
    /// Forwards entries to the language model
    pub analysis: Arc<AnalysisForwarder>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        journals: Arc<JournalRepository>,
        analysis: Arc<AnalysisForwarder>,
        config: ApiConfig,
    ) -> Self {
        Self {
            journals,
            analysis,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Check if a document store is configured
    pub fn has_store(&self) -> bool {
        self.journals.is_configured()
    }

    /// Check if a text generator is configured
    pub fn has_generator(&self) -> bool {
        self.analysis.is_configured()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<&crate::config::ApiConfig> for ApiConfig {
    fn from(config: &crate::config::ApiConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            cors_origins: config.cors_origins.clone(),
            max_body_size: config.max_body_size,
        }
    }
}
