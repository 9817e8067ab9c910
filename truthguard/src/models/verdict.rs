use crate::models::MatchedSource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which path of the aggregator produced a verdict.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerdictBasis {
    ApiSignals,
    KnowledgeBase,
    Inconclusive,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FactCheckSummary {
    pub claim: String,
    pub verdict: String,
    pub source: String,
    pub confidence: f32,
}

/// Supporting detail shown next to a verdict. Never feeds back into scoring.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisDetails {
    pub keyword_matches: Vec<String>,
    pub sensational_phrases: Vec<String>,
    pub source_verified: bool,
    pub red_flags: Vec<String>,
    pub credibility_indicators: Vec<String>,
}

/// Final fake/genuine decision for one submission.
///
/// `confidence_score`, `credibility_score` and `bias_score` are always in
/// `[0, 1]`; `matched_sources` holds at most one entry per URL.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Verdict {
    pub is_fake: bool,
    pub confidence_score: f32,
    pub credibility_score: f32,
    pub matched_sources: Vec<MatchedSource>,
    pub reasoning: String,
    pub bias_score: f32,
    pub fact_check_summaries: Vec<FactCheckSummary>,
    pub basis: VerdictBasis,
    pub analysis: AnalysisDetails,
}

impl Verdict {
    pub fn is_inconclusive(&self) -> bool {
        self.basis == VerdictBasis::Inconclusive
    }
}
