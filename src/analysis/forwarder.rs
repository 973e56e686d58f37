//! Analysis Forwarder
//!
//! Builds a prompt from a stored entry and forwards it to the configured
//! text generator. Also produces writing prompts, which never fail: any
//! problem degrades to a static fallback prompt.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::gemini::{GenerationError, TextGenerator};
use super::prompt::{
    AnalysisType, FAILURE_FALLBACK_PROMPT, UNCONFIGURED_FALLBACK_PROMPT, WRITING_PROMPT_REQUEST,
};
use crate::journal::{JournalError, JournalRepository};

/// Generated commentary on a journal entry
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Analysis {
    pub entry_id: Uuid,
    pub analysis_type: AnalysisType,
    pub analysis: String,
    /// When the analysis was generated
    pub timestamp: DateTime<Utc>,
}

/// Forwards journal content to a text generator
pub struct AnalysisForwarder {
    journals: Arc<JournalRepository>,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl AnalysisForwarder {
    /// Create a new forwarder
    pub fn new(journals: Arc<JournalRepository>, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            journals,
            generator,
        }
    }

    /// Check if a text generator is configured
    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// Model name of the configured generator
    pub fn model(&self) -> Option<&str> {
        self.generator.as_deref().map(|generator| generator.model())
    }

    /// Generate commentary for a stored entry
    pub async fn analyze(
        &self,
        entry_id: Uuid,
        analysis_type: AnalysisType,
    ) -> Result<Analysis, AnalysisError> {
        let entry = self
            .journals
            .get(entry_id)
            .await?
            .ok_or(AnalysisError::NotFound(entry_id))?;

        let generator = self
            .generator
            .as_deref()
            .ok_or(AnalysisError::GenerationUnavailable)?;

        let prompt = analysis_type.prompt_for(&entry.content);
        let analysis = match generator.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => return Err(AnalysisError::GenerationFailed(GenerationError::Empty)),
            Err(e) => return Err(AnalysisError::GenerationFailed(e)),
        };

        tracing::info!(
            entry_id = %entry_id,
            analysis_type = %analysis_type,
            model = %generator.model(),
            "Generated journal analysis"
        );

        Ok(Analysis {
            entry_id,
            analysis_type,
            analysis,
            timestamp: Utc::now(),
        })
    }

    /// Suggest a writing prompt.
    ///
    /// Best effort: without a generator, or when generation fails, one of the
    /// static fallback prompts is returned instead.
    pub async fn suggest_prompt(&self) -> String {
        let Some(generator) = self.generator.as_deref() else {
            return UNCONFIGURED_FALLBACK_PROMPT.to_string();
        };

        match generator.generate(WRITING_PROMPT_REQUEST).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!("Writing prompt generation returned no text, using fallback");
                FAILURE_FALLBACK_PROMPT.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Writing prompt generation failed, using fallback");
                FAILURE_FALLBACK_PROMPT.to_string()
            }
        }
    }
}

/// Errors that can occur while analyzing an entry
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Journal entry not found: {0}")]
    NotFound(Uuid),

    #[error("Text generation is not configured")]
    GenerationUnavailable,

    #[error("Text generation failed: {0}")]
    GenerationFailed(GenerationError),

    #[error(transparent)]
    Storage(#[from] JournalError),
}
