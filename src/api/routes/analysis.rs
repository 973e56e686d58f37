//! Analysis Routes
//!
//! Endpoints for AI commentary on journal entries.
//!
//! - POST /api/analysis/analyze - Analyze an entry
//! - GET /api/analysis/prompt - Suggest a writing prompt

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::analysis::Analysis;
use crate::api::dto::{AnalyzeRequest, PromptResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// POST /api/analysis/analyze
///
/// Generate commentary on a stored entry.
pub async fn analyze_journal(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> ApiResult<Json<Analysis>> {
    let analysis = state
        .analysis
        .analyze(req.entry_id, req.analysis_type)
        .await?;

    Ok(Json(analysis))
}

/// GET /api/analysis/prompt
///
/// Suggest a writing prompt. Always succeeds, falling back to a static
/// prompt when the model is unavailable.
pub async fn writing_prompt(State(state): State<Arc<AppState>>) -> Json<PromptResponse> {
    Json(PromptResponse {
        prompt: state.analysis.suggest_prompt().await,
    })
}
