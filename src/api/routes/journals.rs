//! Journal Routes
//!
//! CRUD endpoints for journal entries.
//!
//! - POST /api/journals/ - Create an entry
//! - GET /api/journals/ - List entries, newest first
//! - GET /api/journals/:id - Get an entry
//! - PUT /api/journals/:id - Partially update an entry
//! - DELETE /api/journals/:id - Delete an entry

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::dto::{CreateJournalRequest, ListJournalsQuery, MessageResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::journal::{EntryUpdate, JournalEntry, MAX_PAGE_SIZE, MIN_PAGE_SIZE};

/// POST /api/journals/
///
/// Create a new journal entry.
pub async fn create_journal(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateJournalRequest>,
) -> ApiResult<(StatusCode, Json<JournalEntry>)> {
    let entry = state.journals.create(req.content).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/journals/?limit&offset
///
/// List journal entries, newest first.
pub async fn list_journals(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListJournalsQuery>,
) -> ApiResult<Json<Vec<JournalEntry>>> {
    validate_list_query(&query)?;

    let entries = state.journals.list(query.limit, query.offset).await?;
    Ok(Json(entries))
}

/// GET /api/journals/:id
///
/// Get a specific journal entry.
pub async fn get_journal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<JournalEntry>> {
    let entry = state
        .journals
        .get(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(entry))
}

/// PUT /api/journals/:id
///
/// Update the supplied fields of a journal entry.
pub async fn update_journal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(update): Json<EntryUpdate>,
) -> ApiResult<Json<JournalEntry>> {
    let entry = state
        .journals
        .update(id, update)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(entry))
}

/// DELETE /api/journals/:id
///
/// Delete a journal entry.
pub async fn delete_journal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.journals.delete(id).await? {
        return Err(not_found(id));
    }

    Ok(Json(MessageResponse {
        message: "Journal deleted successfully".to_string(),
    }))
}

/// Validate pagination parameters
fn validate_list_query(query: &ListJournalsQuery) -> ApiResult<()> {
    if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&query.limit) {
        return Err(ApiError::Validation(format!(
            "limit must be between {} and {}",
            MIN_PAGE_SIZE, MAX_PAGE_SIZE
        )));
    }

    Ok(())
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Journal {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_list_query() {
        let ok = ListJournalsQuery {
            limit: 1000,
            offset: 0,
        };
        assert!(validate_list_query(&ok).is_ok());

        let too_small = ListJournalsQuery {
            limit: 0,
            offset: 0,
        };
        assert!(validate_list_query(&too_small).is_err());

        let too_large = ListJournalsQuery {
            limit: 1001,
            offset: 5,
        };
        assert!(validate_list_query(&too_large).is_err());
    }
}
