//! Prompt templates
//!
//! Each [`AnalysisType`] maps to one template. Unknown tags resolve to
//! [`AnalysisType::General`] so a typo never fails a request.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Fallback writing prompt when no generator is configured
pub const UNCONFIGURED_FALLBACK_PROMPT: &str =
    "What's on your mind today? Start writing about anything that comes to you.";

/// Fallback writing prompt when generation fails or returns nothing
pub const FAILURE_FALLBACK_PROMPT: &str = "What's flowing through your mind right now?";

/// Meta-prompt asking the model for a journaling prompt
pub const WRITING_PROMPT_REQUEST: &str = "\
Generate a thoughtful, creative writing prompt for someone doing freewriting/journaling.
Make it open-ended, inspiring, and suitable for stream-of-consciousness writing.
Keep it to 1-2 sentences. Don't make it too specific or constraining.
Examples of good prompts:
- \"Write about a moment today when you felt completely present\"
- \"If your thoughts had a color right now, what would it be and why?\"
- \"Describe the feeling of something ending and something beginning\"

Generate a new, unique prompt:";

/// Which kind of commentary to ask the model for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnalysisType {
    /// Conversational response, like an old friend
    #[default]
    General,
    /// Emotional tone of the entry
    Mood,
    /// Patterns and themes
    Insights,
    /// Questions worth exploring further
    Reflection,
}

impl AnalysisType {
    /// Get all analysis types for iteration
    pub fn all() -> &'static [AnalysisType] {
        &[
            AnalysisType::General,
            AnalysisType::Mood,
            AnalysisType::Insights,
            AnalysisType::Reflection,
        ]
    }

    /// Wire tag for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::General => "general",
            AnalysisType::Mood => "mood",
            AnalysisType::Insights => "insights",
            AnalysisType::Reflection => "reflection",
        }
    }

    /// Resolve a tag, falling back to `General` for anything unrecognized
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_else(|_| {
            tracing::debug!(tag = %tag, "Unknown analysis type, using general");
            AnalysisType::General
        })
    }

    /// Instructions placed before the entry
    fn instructions(&self) -> &'static str {
        match self {
            AnalysisType::General => "\
Below is my journal entry. Respond like an old friend - conversational, warm, and insightful.
Don't therapize me or give me a breakdown with headings. Just talk through it with me naturally.
Share thoughts, relate to what I'm saying, ask questions if relevant, and be genuinely supportive.",
            AnalysisType::Mood => "\
Analyze the mood and emotional tone of this journal entry.
Provide insights about the writer's emotional state in a friendly, supportive way.
Don't be clinical - be like a caring friend who notices how you're feeling.",
            AnalysisType::Insights => "\
Look for patterns, themes, or interesting insights in this journal entry.
What stands out? What might the writer learn about themselves?
Share your observations in a friendly, non-judgmental way.",
            AnalysisType::Reflection => "\
Help me reflect on this journal entry. What questions might be worth exploring?
What aspects deserve more thought? Guide me through reflection like a thoughtful friend.",
        }
    }

    /// Build the full prompt for an entry's content
    pub fn prompt_for(&self, content: &str) -> String {
        format!("{}\n\nJournal entry:\n{}", self.instructions(), content)
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for tags that name no analysis type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown analysis type: {0}")]
pub struct UnknownAnalysisType(pub String);

impl FromStr for AnalysisType {
    type Err = UnknownAnalysisType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(AnalysisType::General),
            "mood" => Ok(AnalysisType::Mood),
            "insights" => Ok(AnalysisType::Insights),
            "reflection" => Ok(AnalysisType::Reflection),
            _ => Err(UnknownAnalysisType(s.to_string())),
        }
    }
}

impl Serialize for AnalysisType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AnalysisType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(AnalysisType::from_tag(&tag))
    }
}
