//! Journal entry model
//!
//! Defines the persisted shape of a journal entry:
//! - `JournalEntry`: a single writing session
//! - `EntryUpdate`: explicit partial update (only supplied fields change)
//! - `preview_text_for`: the derived preview shown in list views

use chrono::{DateTime, Local, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Preview shown for entries with no visible content
pub const EMPTY_PREVIEW: &str = "Empty entry";

/// Number of characters kept before the preview is truncated
pub const PREVIEW_CHARS: usize = 50;

const PREVIEW_ELLIPSIS: &str = "...";

/// A single journal writing session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    /// Unique identifier, assigned at creation
    pub id: Uuid,
    /// Free text written by the user
    #[serde(default)]
    pub content: String,
    /// Derived summary of `content`, never set directly
    #[serde(default, deserialize_with = "null_as_empty")]
    pub preview_text: String,
    /// Human-readable creation date (e.g. "Mar 07")
    pub date: String,
    /// Synthetic file name derived from the creation time
    pub filename: String,
    /// Creation time (UTC)
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
}

impl JournalEntry {
    /// Create a new entry stamped with the current local time
    pub fn new(content: impl Into<String>) -> Self {
        Self::created_at(content, Local::now())
    }

    /// Create a new entry stamped with the given creation time
    pub fn created_at(content: impl Into<String>, now: DateTime<Local>) -> Self {
        let content = content.into();
        let preview_text = preview_text_for(&content);

        Self {
            id: Uuid::new_v4(),
            content,
            preview_text,
            date: now.format("%b %d").to_string(),
            filename: now.format("[%Y-%m-%d-%H-%M-%S].md").to_string(),
            // Stored timestamps carry microsecond precision
            timestamp: now.with_timezone(&Utc).trunc_subsecs(6),
        }
    }

    /// Recompute `preview_text` from the current content
    pub fn update_preview_text(&mut self) {
        self.preview_text = preview_text_for(&self.content);
    }

    /// Apply a partial update.
    ///
    /// Returns `true` if any field was supplied. The preview is recomputed
    /// whenever content is part of the update.
    pub fn apply(&mut self, update: EntryUpdate) -> bool {
        let mut changed = false;

        if let Some(content) = update.content {
            self.content = content;
            self.update_preview_text();
            changed = true;
        }

        changed
    }
}

impl Default for JournalEntry {
    fn default() -> Self {
        Self::new("")
    }
}

/// Partial update for a journal entry
///
/// Absent fields are left untouched. Identity and creation fields are not
/// updatable, and the preview is always derived from content.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl EntryUpdate {
    /// Update that replaces the content
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    /// True if no field is supplied
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }
}

/// Derive the preview text for a piece of content.
///
/// Newlines become spaces and the result is trimmed. Empty content yields
/// [`EMPTY_PREVIEW`]; content longer than [`PREVIEW_CHARS`] characters is cut
/// and suffixed with `"..."`.
pub fn preview_text_for(content: &str) -> String {
    let flattened = content.replace('\n', " ");
    let trimmed = flattened.trim();

    if trimmed.is_empty() {
        return EMPTY_PREVIEW.to_string();
    }

    match trimmed.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{}", &trimmed[..cut], PREVIEW_ELLIPSIS),
        None => trimmed.to_string(),
    }
}

/// Missing or null strings decode as empty
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC 3339 with fixed microsecond precision, so stored timestamps sort
/// lexicographically in creation order.
///
/// Reading also accepts ISO 8601 without an offset (`2024-03-07T09:05:30.123456`),
/// taken as UTC.
mod timestamp_format {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(timestamp.with_timezone(&Utc));
        }

        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {:?}: {}", raw, e)))
    }
}
