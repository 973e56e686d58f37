//! Freewrite API Server
//!
//! Run with: cargo run --bin freewrite
//!
//! # Configuration
//!
//! Settings come from a TOML file (`--config`, or the first of
//! `~/.config/freewrite/config.toml`, `/etc/freewrite/config.toml`,
//! `./config.toml`), then environment variables, then command-line flags.
//! A `.env` file in the working directory is loaded first.
//!
//! Environment variables:
//! - `API_HOST` / `API_PORT`: Bind address (default: 0.0.0.0:8000)
//! - `FREEWRITE_STORE`: `memory`, `firestore` or `none` (default: memory)
//! - `FIREBASE_PROJECT_ID`: Firestore project (required for `firestore`)
//! - `FIRESTORE_EMULATOR_HOST`: Use a local Firestore emulator
//! - `GOOGLE_API_KEY`: Gemini API key (optional, enables analysis)
//! - `RUST_LOG`: Log filter (overrides `FREEWRITE_LOG_LEVEL`)

use anyhow::Context;
use clap::Parser;
use freewrite::analysis::{AnalysisForwarder, GeminiClient, TextGenerator};
use freewrite::api::{serve, ApiConfig, AppState};
use freewrite::config::{generate_default_config, Config, LoggingConfig, StoreBackend, StoreConfig};
use freewrite::journal::{DocumentStore, FirestoreStore, JournalRepository, MemoryStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "freewrite")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Journal backend with AI-assisted reflection")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    if args.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default().context("loading config")?,
    };

    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }

    init_tracing(&config.logging);

    tracing::info!("Starting Freewrite API server v{}", env!("CARGO_PKG_VERSION"));

    // Initialize journal store
    let store = build_store(&config.store)?;
    let journals = Arc::new(JournalRepository::new(store, config.store.collection.clone()));

    match journals.backend_name() {
        Some(backend) => tracing::info!(
            backend,
            collection = journals.collection(),
            "Journal store initialized"
        ),
        None => tracing::warn!("No journal store configured, journal routes will return 503"),
    }

    // Initialize text generator
    let generator: Option<Arc<dyn TextGenerator>> = match config.gemini.client_config() {
        Some(client_config) => {
            let client = GeminiClient::new(client_config).context("creating Gemini client")?;
            tracing::info!(model = client.model(), "Gemini integration enabled");
            Some(Arc::new(client))
        }
        None => {
            tracing::info!("Gemini integration disabled (set GOOGLE_API_KEY to enable)");
            None
        }
    };

    let analysis = Arc::new(AnalysisForwarder::new(Arc::clone(&journals), generator));

    let api_config = ApiConfig::from(&config.api);
    let state = AppState::new(journals, analysis, api_config.clone());

    // Run server
    serve(state, &api_config).await?;

    tracing::info!("Freewrite API server stopped");
    Ok(())
}

/// Initialize the tracing subscriber
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("freewrite={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Build the configured document store, if any
fn build_store(config: &StoreConfig) -> anyhow::Result<Option<Arc<dyn DocumentStore>>> {
    match config.backend {
        StoreBackend::Memory => Ok(Some(Arc::new(MemoryStore::new()))),
        StoreBackend::Firestore => match config.firestore_config() {
            Some(firestore_config) => {
                let store =
                    FirestoreStore::new(firestore_config).context("creating Firestore client")?;
                Ok(Some(Arc::new(store)))
            }
            None => {
                tracing::warn!("Firestore selected but FIREBASE_PROJECT_ID is not set");
                Ok(None)
            }
        },
        StoreBackend::None => Ok(None),
    }
}
