use serde::{Deserialize, Serialize};

/// Entry of the static fallback table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnownFact {
    pub keywords: Vec<String>,
    pub is_fake: bool,
    pub confidence: f32,
    pub reasoning: String,
    /// Trusted-source names expected to carry the story.
    #[serde(default)]
    pub named_source_hints: Vec<String>,
}
