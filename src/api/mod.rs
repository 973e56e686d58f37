//! Freewrite REST API
//!
//! HTTP API layer for Freewrite, built with Axum.
//!
//! # Endpoints
//!
//! ## Journals
//! - `POST /api/journals/` - Create an entry
//! - `GET /api/journals/?limit&offset` - List entries, newest first
//! - `GET /api/journals/:id` - Get an entry
//! - `PUT /api/journals/:id` - Partially update an entry
//! - `DELETE /api/journals/:id` - Delete an entry
//!
//! ## Analysis
//! - `POST /api/analysis/analyze` - AI commentary on an entry
//! - `GET /api/analysis/prompt` - Suggest a writing prompt
//!
//! ## Health
//! - `GET /` - Service banner
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use freewrite::api::{serve, ApiConfig, AppState};
//! use freewrite::analysis::AnalysisForwarder;
//! use freewrite::journal::{JournalRepository, MemoryStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let journals = Arc::new(JournalRepository::with_store(Arc::new(MemoryStore::new())));
//!     let analysis = Arc::new(AnalysisForwarder::new(Arc::clone(&journals), None));
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(journals, analysis, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let body_limit = DefaultBodyLimit::max(state.config.max_body_size);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        // Health routes
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::full_health))
        .route("/health/live", get(routes::health::liveness))
        .route("/health/ready", get(routes::health::readiness))
        // Journal routes, collection reachable with and without the trailing slash
        .route(
            "/api/journals",
            post(routes::journals::create_journal).get(routes::journals::list_journals),
        )
        .route(
            "/api/journals/",
            post(routes::journals::create_journal).get(routes::journals::list_journals),
        )
        .route(
            "/api/journals/:id",
            get(routes::journals::get_journal)
                .put(routes::journals::update_journal)
                .delete(routes::journals::delete_journal),
        )
        // Analysis routes
        .route("/api/analysis/analyze", post(routes::analysis::analyze_journal))
        .route("/api/analysis/prompt", get(routes::analysis::writing_prompt))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// CORS policy: permissive unless origins are listed
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Freewrite API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Freewrite API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisForwarder, GenerationError, TextGenerator};
    use crate::analysis::{FAILURE_FALLBACK_PROMPT, UNCONFIGURED_FALLBACK_PROMPT};
    use crate::journal::{JournalEntry, JournalRepository, MemoryStore};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        fn model(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            Ok(format!("echo: {}", prompt.lines().last().unwrap_or_default()))
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        fn model(&self) -> &str {
            "failing"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            Err(GenerationError::Api {
                status: 503,
                message: "overloaded".to_string(),
            })
        }
    }

    fn create_test_app_with(
        journals: JournalRepository,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Router {
        let journals = Arc::new(journals);
        let analysis = Arc::new(AnalysisForwarder::new(Arc::clone(&journals), generator));
        let state = AppState::new(journals, analysis, ApiConfig::default());
        build_router(state)
    }

    fn create_test_app() -> Router {
        create_test_app_with(
            JournalRepository::with_store(Arc::new(MemoryStore::new())),
            Some(Arc::new(EchoGenerator)),
        )
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        app.clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_entry(app: &Router, content: &str) -> JournalEntry {
        let body = serde_json::json!({ "content": content }).to_string();
        let response = send(app, "POST", "/api/journals/", Some(&body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        serde_json::from_value(json_body(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = create_test_app();

        for uri in ["/", "/health", "/health/live", "/health/ready"] {
            let response = send(&app, "GET", uri, None).await;
            assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
        }

        let health = json_body(send(&app, "GET", "/health", None).await).await;
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["store"], "memory");
    }

    #[tokio::test]
    async fn test_ready_without_store() {
        let app = create_test_app_with(JournalRepository::unconfigured(), None);

        let response = send(&app, "GET", "/health/ready", None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let banner = json_body(send(&app, "GET", "/", None).await).await;
        assert_eq!(banner["store_configured"], false);
        assert_eq!(banner["generator_configured"], false);
    }

    #[tokio::test]
    async fn test_create_and_get_journal() {
        let app = create_test_app();
        let created = create_entry(&app, "Hello\nworld").await;
        assert_eq!(created.preview_text, "Hello world");

        let response = send(&app, "GET", &format!("/api/journals/{}", created.id), None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let fetched: JournalEntry = serde_json::from_value(json_body(response).await).unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_without_trailing_slash() {
        let app = create_test_app();
        let response = send(&app, "POST", "/api/journals", Some("{}")).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let entry = json_body(response).await;
        assert_eq!(entry["preview_text"], "Empty entry");
    }

    #[tokio::test]
    async fn test_get_missing_journal() {
        let app = create_test_app();
        let uri = format!("/api/journals/{}", uuid::Uuid::new_v4());

        let response = send(&app, "GET", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_malformed_id() {
        let app = create_test_app();
        let response = send(&app, "GET", "/api/journals/not-a-uuid", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_journals() {
        let app = create_test_app();

        let response = send(&app, "GET", "/api/journals/?limit=1000&offset=0", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!([]));

        create_entry(&app, "first").await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        create_entry(&app, "second").await;

        let entries = json_body(send(&app, "GET", "/api/journals/", None).await).await;
        let contents: Vec<&str> = entries
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["content"].as_str().unwrap())
            .collect();
        assert_eq!(contents, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_limit() {
        let app = create_test_app();

        let response = send(&app, "GET", "/api/journals/?limit=0", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, "GET", "/api/journals/?limit=1001", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, "GET", "/api/journals/?offset=-1", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_journal() {
        let app = create_test_app();
        let created = create_entry(&app, "draft").await;
        let uri = format!("/api/journals/{}", created.id);

        let response = send(&app, "PUT", &uri, Some(r#"{"content": "final\nversion"}"#)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let updated: JournalEntry = serde_json::from_value(json_body(response).await).unwrap();
        assert_eq!(updated.content, "final\nversion");
        assert_eq!(updated.preview_text, "final version");
        assert_eq!(updated.date, created.date);
        assert_eq!(updated.filename, created.filename);
        assert_eq!(updated.timestamp, created.timestamp);

        let missing = format!("/api/journals/{}", uuid::Uuid::new_v4());
        let response = send(&app, "PUT", &missing, Some(r#"{"content": "x"}"#)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_journal() {
        let app = create_test_app();
        let created = create_entry(&app, "temporary").await;
        let uri = format!("/api/journals/{}", created.id);

        let response = send(&app, "DELETE", &uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await["message"],
            "Journal deleted successfully"
        );

        let response = send(&app, "GET", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, "DELETE", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_invalid_json() {
        let app = create_test_app();
        let response = send(&app, "POST", "/api/journals/", Some("not json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_journals_without_store() {
        let app = create_test_app_with(JournalRepository::unconfigured(), None);

        let response = send(&app, "GET", "/api/journals/", None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = send(&app, "POST", "/api/journals/", Some(r#"{"content": "x"}"#)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_analyze_journal() {
        let app = create_test_app();
        let created = create_entry(&app, "Walked by the river.").await;

        let body = serde_json::json!({
            "entry_id": created.id,
            "analysis_type": "does-not-exist",
        })
        .to_string();
        let response = send(&app, "POST", "/api/analysis/analyze", Some(&body)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let analysis = json_body(response).await;
        assert_eq!(analysis["entry_id"], created.id.to_string());
        assert_eq!(analysis["analysis_type"], "general");
        assert_eq!(analysis["analysis"], "echo: Walked by the river.");
        assert!(analysis["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_analyze_missing_entry() {
        let app = create_test_app();
        let body = serde_json::json!({ "entry_id": uuid::Uuid::new_v4() }).to_string();

        let response = send(&app, "POST", "/api/analysis/analyze", Some(&body)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_analyze_generation_errors() {
        let journals = JournalRepository::with_store(Arc::new(MemoryStore::new()));
        let entry = journals.create("x").await.unwrap();
        let app = create_test_app_with(journals, Some(Arc::new(FailingGenerator)));

        let body = serde_json::json!({ "entry_id": entry.id }).to_string();
        let response = send(&app, "POST", "/api/analysis/analyze", Some(&body)).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let journals = JournalRepository::with_store(Arc::new(MemoryStore::new()));
        let entry = journals.create("x").await.unwrap();
        let app = create_test_app_with(journals, None);

        let body = serde_json::json!({ "entry_id": entry.id }).to_string();
        let response = send(&app, "POST", "/api/analysis/analyze", Some(&body)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_writing_prompt_always_succeeds() {
        let app = create_test_app_with(JournalRepository::unconfigured(), None);
        let response = send(&app, "GET", "/api/analysis/prompt", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await["prompt"],
            UNCONFIGURED_FALLBACK_PROMPT
        );

        let app = create_test_app_with(
            JournalRepository::unconfigured(),
            Some(Arc::new(FailingGenerator)),
        );
        let response = send(&app, "GET", "/api/analysis/prompt", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["prompt"], FAILURE_FALLBACK_PROMPT);
    }

    async fn preflight(app: &Router, origin: &str) -> Response {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/journals/")
            .header("Origin", origin)
            .header("Access-Control-Request-Method", "POST")
            .body(Body::empty())
            .unwrap();

        app.clone().oneshot(request).await.unwrap()
    }

    fn allowed_origin(response: &Response) -> Option<&str> {
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok())
    }

    #[tokio::test]
    async fn test_cors_restricted_to_listed_origins() {
        let journals = Arc::new(JournalRepository::with_store(Arc::new(MemoryStore::new())));
        let analysis = Arc::new(AnalysisForwarder::new(Arc::clone(&journals), None));
        let config = ApiConfig {
            // The invalid origin is skipped, the valid one still applies
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "bad\norigin".to_string(),
            ],
            ..Default::default()
        };
        let app = build_router(AppState::new(journals, analysis, config));

        let response = preflight(&app, "http://localhost:3000").await;
        assert_eq!(allowed_origin(&response), Some("http://localhost:3000"));

        let response = preflight(&app, "http://evil.example").await;
        assert_eq!(allowed_origin(&response), None);
    }

    #[tokio::test]
    async fn test_cors_permissive_without_origins() {
        let app = create_test_app();

        let response = preflight(&app, "http://anywhere.example").await;
        assert_eq!(allowed_origin(&response), Some("*"));
    }
}
