//! # Freewrite
//!
//! Journal backend with AI-assisted reflection. Entries live in a document
//! store; their content can be sent to a language model for commentary or
//! used as a springboard for writing prompts.
//!
//! ## Modules
//!
//! - [`journal`]: Entry model, document stores and the journal repository
//! - [`analysis`]: Gemini client and the analysis forwarder
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use freewrite::journal::{JournalRepository, MemoryStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let journals = JournalRepository::with_store(Arc::new(MemoryStore::new()));
//!
//!     let entry = journals.create("Morning pages.\nSlept well.").await?;
//!     println!("{} {}", entry.date, entry.preview_text);
//!
//!     let recent = journals.list(10, 0).await?;
//!     println!("Found {} entries", recent.len());
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod journal;

// Re-export top-level types for convenience
pub use journal::{
    DocumentStore, EntryUpdate, FirestoreStore, JournalEntry, JournalError, JournalRepository,
    JournalResult, MemoryStore, StoreError,
};

pub use analysis::{
    Analysis, AnalysisError, AnalysisForwarder, AnalysisType, GeminiClient, GenerationError,
    TextGenerator,
};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError};
