//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! Journal entries and analyses serialize directly; only the envelopes
//! specific to HTTP live here.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::AnalysisType;

// ============================================
// JOURNAL DTOs
// ============================================

/// Create journal entry request
#[derive(Debug, Default, Deserialize)]
pub struct CreateJournalRequest {
    /// Entry text, empty if omitted
    #[serde(default)]
    pub content: String,
}

/// Pagination parameters for listing entries
#[derive(Debug, Deserialize)]
pub struct ListJournalsQuery {
    /// Page size, 1..=1000
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Entries to skip
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    100
}

impl Default for ListJournalsQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

/// Plain confirmation message
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================
// ANALYSIS DTOs
// ============================================

/// Analysis request
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Entry to analyze
    pub entry_id: Uuid,
    /// Template selector; unknown tags mean "general"
    #[serde(default)]
    pub analysis_type: AnalysisType,
}

/// Writing prompt response
#[derive(Debug, Serialize, Deserialize)]
pub struct PromptResponse {
    pub prompt: String,
}

// ============================================
// STATUS DTOs
// ============================================

/// Root endpoint response
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub status: String,
    pub store_configured: bool,
    pub generator_configured: bool,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// Store backend name or "disconnected"
    pub store: String,
    /// Generator model or "not configured"
    pub generator: String,
    pub uptime_seconds: u64,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_request_defaults_to_general() {
        let req: AnalyzeRequest = serde_json::from_str(
            r#"{"entry_id": "67e55044-10b1-426f-9247-bb680e5fe0c8"}"#,
        )
        .unwrap();
        assert_eq!(req.analysis_type, AnalysisType::General);

        let req: AnalyzeRequest = serde_json::from_str(
            r#"{"entry_id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "analysis_type": "Reflection"}"#,
        )
        .unwrap();
        assert_eq!(req.analysis_type, AnalysisType::Reflection);
    }

    #[test]
    fn test_create_request_content_optional() {
        let req: CreateJournalRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.content, "");
    }

    #[test]
    fn test_list_query_defaults() {
        let query = ListJournalsQuery::default();
        assert_eq!(query.limit, 100);
        assert_eq!(query.offset, 0);
    }
}
