use serde::{Deserialize, Serialize};
use truthguard::models::{FactClaim, Headline, HistoryEntry, Verdict};

/// Frames sent by the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Analyze { id: String, payload: AnalyzePayload },
    Headlines { id: String },
    RecentFactChecks {
        id: String,
        #[serde(default)]
        query: Option<String>,
    },
    History {
        id: String,
        #[serde(default)]
        limit: Option<usize>,
    },
}

impl ClientMessage {
    pub fn id(&self) -> &str {
        match self {
            ClientMessage::Analyze { id, .. }
            | ClientMessage::Headlines { id }
            | ClientMessage::RecentFactChecks { id, .. }
            | ClientMessage::History { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzePayload {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source_url: Option<String>,
}

/// Frames sent back to the browser. `id` echoes the request id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    VerdictResult {
        id: String,
        ts: String,
        payload: VerdictResultPayload,
    },
    HeadlinesResult {
        id: String,
        ts: String,
        headlines: Vec<Headline>,
    },
    FactChecksResult {
        id: String,
        ts: String,
        claims: Vec<FactClaim>,
    },
    HistoryResult {
        id: String,
        ts: String,
        entries: Vec<HistoryEntry>,
    },
    Error {
        id: String,
        ts: String,
        detail: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictResultPayload {
    pub entry_id: String,
    pub verdict: Verdict,
}
