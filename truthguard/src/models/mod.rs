pub mod evidence;
pub mod fact;
pub mod headline;
pub mod history;
pub mod ids;
pub mod verdict;

pub use evidence::{
    AiJudgment, EvidenceSignal, FactCheckPayload, FactClaim, MatchedSource, SignalKind,
    SourceMatchPayload, SourceProvenance,
};
pub use fact::KnownFact;
pub use headline::Headline;
pub use history::HistoryEntry;
pub use ids::EntryId;
pub use verdict::{AnalysisDetails, FactCheckSummary, Verdict, VerdictBasis};
