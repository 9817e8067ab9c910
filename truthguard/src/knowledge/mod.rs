pub mod base;
pub mod heuristics;
pub mod sources;

pub use base::{normalize_keyword, KnowledgeBase};
pub use heuristics::sensational_phrases;
pub use sources::{similarity_for, TrustedSource, TrustedSources};
