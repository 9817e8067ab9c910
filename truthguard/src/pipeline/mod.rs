pub mod aggregate;
pub mod ai_judge;
pub mod analyzer;
pub mod error;
pub mod fact_check;
pub mod mock;
pub mod news;
pub mod traits;

pub use aggregate::{Aggregator, AggregatorConfig, InconclusivePolicy, WeightTable};
pub use ai_judge::AiJudge;
pub use analyzer::{Analyzer, LiveAnalyzer};
pub use error::ProviderError;
pub use fact_check::FactCheckProvider;
pub use mock::{StaticProvider, UnavailableProvider};
pub use news::NewsSearch;
pub use traits::EvidenceProvider;
