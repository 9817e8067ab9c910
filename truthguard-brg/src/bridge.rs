use crate::api::message::{AnalyzePayload, ClientMessage, ServerMessage, VerdictResultPayload};
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;
use truthguard::db::{HistoryQuery, HistoryStore};
use truthguard::models::HistoryEntry;
use truthguard::pipeline::LiveAnalyzer;

pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const DEFAULT_FACT_CHECK_QUERY: &str = "viral";

/// Shared by every connection task.
pub struct Bridge {
    pub analyzer: LiveAnalyzer,
    pub history: Arc<dyn HistoryStore>,
}

impl Bridge {
    pub fn new(analyzer: LiveAnalyzer, history: Arc<dyn HistoryStore>) -> Self {
        Self { analyzer, history }
    }

    /// Answers one decoded frame. Never fails; problems become `Error` frames.
    pub async fn handle(&self, message: ClientMessage) -> ServerMessage {
        let id = message.id().to_string();
        let result = match message {
            ClientMessage::Analyze { payload, .. } => self.analyze(&id, payload).await,
            ClientMessage::Headlines { .. } => Ok(ServerMessage::HeadlinesResult {
                id: id.clone(),
                ts: now(),
                headlines: self.analyzer.sources.top_headlines().await,
            }),
            ClientMessage::RecentFactChecks { query, .. } => {
                let query = query
                    .as_deref()
                    .map(str::trim)
                    .filter(|q| !q.is_empty())
                    .unwrap_or(DEFAULT_FACT_CHECK_QUERY);
                Ok(ServerMessage::FactChecksResult {
                    id: id.clone(),
                    ts: now(),
                    claims: self.analyzer.fact_check.recent(query).await,
                })
            }
            ClientMessage::History { limit, .. } => self
                .history
                .select(HistoryQuery::latest(limit.unwrap_or(DEFAULT_HISTORY_LIMIT)))
                .await
                .map(|entries| ServerMessage::HistoryResult {
                    id: id.clone(),
                    ts: now(),
                    entries,
                }),
        };
        result.unwrap_or_else(|err| {
            warn!(request = %id, error = %err, "request failed");
            error_message(&id, &err.to_string())
        })
    }

    async fn analyze(&self, id: &str, payload: AnalyzePayload) -> anyhow::Result<ServerMessage> {
        let source_url = payload
            .source_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());
        if payload.content.trim().is_empty() && source_url.is_none() {
            return Ok(error_message(id, "Content is required"));
        }

        let verdict = self.analyzer.analyze(&payload.content, source_url).await;
        let entry = HistoryEntry::new(&payload.content, source_url, verdict.clone());
        let entry_id = entry.id.to_string();
        if let Err(err) = self.history.append(entry).await {
            warn!(request = %id, error = %err, "verdict not recorded");
        }

        Ok(ServerMessage::VerdictResult {
            id: id.to_string(),
            ts: now(),
            payload: VerdictResultPayload { entry_id, verdict },
        })
    }
}

pub fn error_message(id: &str, detail: &str) -> ServerMessage {
    ServerMessage::Error {
        id: id.to_string(),
        ts: now(),
        detail: detail.to_string(),
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}
