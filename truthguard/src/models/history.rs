use crate::models::{EntryId, Verdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A checked submission as kept by the history store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub content: String,
    #[serde(default)]
    pub source_url: Option<String>,
    pub verdict: Verdict,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(content: &str, source_url: Option<&str>, verdict: Verdict) -> Self {
        Self {
            id: EntryId::new(),
            content: content.to_string(),
            source_url: source_url.map(str::to_string),
            verdict,
            created_at: Utc::now(),
        }
    }
}
