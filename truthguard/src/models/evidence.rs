use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    AiJudgment,
    FactCheck,
    SourceMatch,
}

/// One provider's contribution to a verdict.
///
/// `payload` is `None` whenever the provider was unconfigured or failed;
/// the aggregator never sees the difference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSignal<T> {
    pub kind: SignalKind,
    pub payload: Option<T>,
}

impl<T> EvidenceSignal<T> {
    pub fn available(kind: SignalKind, payload: T) -> Self {
        Self {
            kind,
            payload: Some(payload),
        }
    }

    pub fn unavailable(kind: SignalKind) -> Self {
        Self {
            kind,
            payload: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.payload.is_some()
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AiJudgment {
    pub is_fake: bool,
    pub confidence: f32,
    pub reasoning: String,
    /// 0 = neutral, 1 = highly biased. Absent when the model omitted it.
    #[serde(default)]
    pub bias_score: Option<f32>,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub credibility_indicators: Vec<String>,
    /// Outlet names or URLs the model expects to carry the story.
    #[serde(default)]
    pub suggested_sources: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FactClaim {
    pub claim_text: String,
    /// Free-form rating, e.g. "False", "Pants on Fire", "Mostly True".
    pub verdict_text: String,
    pub publisher_name: String,
    pub source_url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FactCheckPayload {
    pub claims: Vec<FactClaim>,
}

/// Where a [`MatchedSource`] came from. Only `Retrieved` entries are real
/// search hits; the others are placeholders synthesized in degraded mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceProvenance {
    Retrieved,
    AiSuggested,
    KnowledgeBase,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchedSource {
    pub name: String,
    pub url: String,
    pub similarity_score: f32,
    pub credibility_rating: f32,
    pub provenance: SourceProvenance,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SourceMatchPayload {
    pub matches: Vec<MatchedSource>,
}
