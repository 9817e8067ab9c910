use crate::models::{EntryId, HistoryEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Receipt for one appended entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OpLog {
    pub op_id: Uuid,
    pub entry_id: EntryId,
    pub created_at: DateTime<Utc>,
}

impl OpLog {
    pub fn for_entry(entry: &HistoryEntry) -> Self {
        Self {
            op_id: Uuid::new_v4(),
            entry_id: entry.id,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct HistoryQuery {
    pub only_fake: Option<bool>,
    pub limit: Option<usize>,
}

impl HistoryQuery {
    pub fn latest(limit: usize) -> Self {
        Self {
            only_fake: None,
            limit: Some(limit),
        }
    }
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, entry: HistoryEntry) -> anyhow::Result<OpLog>;
    /// Entries newest first.
    async fn select(&self, query: HistoryQuery) -> anyhow::Result<Vec<HistoryEntry>>;
}
