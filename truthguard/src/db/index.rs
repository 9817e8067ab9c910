use crate::db::api::{HistoryQuery, HistoryStore, OpLog};
use crate::models::HistoryEntry;
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Default, Debug)]
pub struct HistoryIndex {
    entries: Vec<HistoryEntry>,
}

impl HistoryIndex {
    pub fn insert(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest first by `created_at`; among equal timestamps the later insert wins.
    pub fn select(&self, query: &HistoryQuery) -> Vec<HistoryEntry> {
        let mut results: Vec<HistoryEntry> = self
            .entries
            .iter()
            .rev()
            .filter(|e| query.only_fake.map_or(true, |fake| e.verdict.is_fake == fake))
            .cloned()
            .collect();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = query.limit {
            results.truncate(limit);
        }
        results
    }
}

/// History kept only for the lifetime of the process.
#[derive(Default)]
pub struct InMemoryHistory {
    index: Mutex<HistoryIndex>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    async fn append(&self, entry: HistoryEntry) -> anyhow::Result<OpLog> {
        let op = OpLog::for_entry(&entry);
        let mut index = self
            .index
            .lock()
            .map_err(|_| anyhow::anyhow!("history index lock poisoned"))?;
        index.insert(entry);
        Ok(op)
    }

    async fn select(&self, query: HistoryQuery) -> anyhow::Result<Vec<HistoryEntry>> {
        let index = self
            .index
            .lock()
            .map_err(|_| anyhow::anyhow!("history index lock poisoned"))?;
        Ok(index.select(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisDetails, Verdict, VerdictBasis};
    use chrono::{Duration, Utc};

    fn entry(content: &str, is_fake: bool, age_secs: i64) -> HistoryEntry {
        let verdict = Verdict {
            is_fake,
            confidence_score: 0.8,
            credibility_score: 0.5,
            matched_sources: Vec::new(),
            reasoning: String::new(),
            bias_score: 0.5,
            fact_check_summaries: Vec::new(),
            basis: VerdictBasis::ApiSignals,
            analysis: AnalysisDetails::default(),
        };
        let mut entry = HistoryEntry::new(content, None, verdict);
        entry.created_at = Utc::now() - Duration::seconds(age_secs);
        entry
    }

    #[test]
    fn select_orders_newest_first() {
        let mut index = HistoryIndex::default();
        index.insert(entry("old", false, 60));
        index.insert(entry("new", true, 0));
        index.insert(entry("middle", false, 30));

        let all = index.select(&HistoryQuery::default());
        let contents: Vec<_> = all.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, ["new", "middle", "old"]);
    }

    #[test]
    fn select_filters_and_limits() {
        let mut index = HistoryIndex::default();
        index.insert(entry("a", true, 30));
        index.insert(entry("b", false, 20));
        index.insert(entry("c", true, 10));

        let fakes = index.select(&HistoryQuery {
            only_fake: Some(true),
            limit: None,
        });
        assert_eq!(fakes.len(), 2);
        assert!(fakes.iter().all(|e| e.verdict.is_fake));

        let latest = index.select(&HistoryQuery::latest(1));
        assert_eq!(latest[0].content, "c");
    }

    #[tokio::test]
    async fn in_memory_store_round_trips() {
        let store = InMemoryHistory::new();
        let e = entry("stored", false, 0);
        let op = store.append(e.clone()).await.unwrap();
        assert_eq!(op.entry_id, e.id);
        assert_eq!(store.select(HistoryQuery::default()).await.unwrap(), vec![e]);
    }
}
