//! AI Analysis
//!
//! Forwards journal content to a large language model for commentary.
//!
//! ## Architecture
//!
//! - **TextGenerator**: trait for anything that turns a prompt into text
//! - **GeminiClient**: Google Gemini implementation of `TextGenerator`
//! - **AnalysisType**: closed set of prompt templates
//! - **AnalysisForwarder**: looks up entries and calls the generator
//!
//! ## Data Flow
//!
//! 1. Forwarder reads the entry through the journal repository
//! 2. The analysis type selects a prompt template
//! 3. The generator's text is returned as-is, nothing is persisted

mod forwarder;
mod gemini;
mod prompt;

pub use forwarder::{Analysis, AnalysisError, AnalysisForwarder};
pub use gemini::{GeminiClient, GeminiConfig, GenerationError, TextGenerator};
pub use prompt::{
    AnalysisType, UnknownAnalysisType, FAILURE_FALLBACK_PROMPT, UNCONFIGURED_FALLBACK_PROMPT,
    WRITING_PROMPT_REQUEST,
};
