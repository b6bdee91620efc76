use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted document. Field names follow the on-disk collection format
/// (`id`, `title`, `content`, `lastModified`, `wordCount`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub last_modified: DateTime<Utc>,
    // Recomputed at every persist, not kept live during typing
    pub word_count: usize,
}

impl DocumentRecord {
    pub fn new(title: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            word_count: count_words(&content),
            content,
            last_modified: Utc::now(),
        }
    }
}

/// Count of whitespace-delimited non-empty tokens.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
