use crate::config::ProviderConfiguration;
use crate::knowledge::KnowledgeBase;
use crate::models::{AiJudgment, FactCheckPayload, SourceMatchPayload, Verdict};
use crate::pipeline::aggregate::Aggregator;
use crate::pipeline::ai_judge::AiJudge;
use crate::pipeline::fact_check::FactCheckProvider;
use crate::pipeline::news::NewsSearch;
use crate::pipeline::traits::EvidenceProvider;
use tracing::info;

/// Fans a submission out to the three providers and aggregates the answers.
pub struct Analyzer<A, F, S>
where
    A: EvidenceProvider<Payload = AiJudgment>,
    F: EvidenceProvider<Payload = FactCheckPayload>,
    S: EvidenceProvider<Payload = SourceMatchPayload>,
{
    pub ai: A,
    pub fact_check: F,
    pub sources: S,
    pub knowledge: KnowledgeBase,
    pub aggregator: Aggregator,
}

pub type LiveAnalyzer = Analyzer<AiJudge, FactCheckProvider, NewsSearch>;

impl<A, F, S> Analyzer<A, F, S>
where
    A: EvidenceProvider<Payload = AiJudgment>,
    F: EvidenceProvider<Payload = FactCheckPayload>,
    S: EvidenceProvider<Payload = SourceMatchPayload>,
{
    pub fn new(
        ai: A,
        fact_check: F,
        sources: S,
        knowledge: KnowledgeBase,
        aggregator: Aggregator,
    ) -> Self {
        Self {
            ai,
            fact_check,
            sources,
            knowledge,
            aggregator,
        }
    }

    /// Always returns a verdict. The three lookups run concurrently and are
    /// all awaited; dropping the returned future abandons them.
    pub async fn analyze(&self, content: &str, source_url: Option<&str>) -> Verdict {
        let source_url = source_url.map(str::trim).filter(|u| !u.is_empty());

        let (ai, fact_check, sources) = tokio::join!(
            self.ai.fetch(content, source_url),
            self.fact_check.fetch(content, source_url),
            self.sources.fetch(content, source_url),
        );
        let known = self.knowledge.match_content(content);

        let verdict = self.aggregator.aggregate(
            ai.payload(),
            fact_check.payload(),
            sources.payload(),
            known,
            content,
        );

        info!(
            ai = ai.is_available(),
            fact_check = fact_check.is_available(),
            source_match = sources.is_available(),
            knowledge_base = known.is_some(),
            basis = ?verdict.basis,
            is_fake = verdict.is_fake,
            confidence = verdict.confidence_score,
            "analysis complete"
        );
        verdict
    }
}

impl LiveAnalyzer {
    /// Builds the live adapters. Fails only when a configured knowledge-base
    /// file cannot be loaded.
    pub fn from_config(config: &ProviderConfiguration) -> anyhow::Result<Self> {
        let mut knowledge = KnowledgeBase::builtin();
        if let Some(path) = &config.knowledge_base_path {
            knowledge.extend(KnowledgeBase::from_path(path)?);
        }
        info!(
            live_providers = config.live_provider_count(),
            known_facts = knowledge.len(),
            "analyzer configured"
        );
        Ok(Self::new(
            AiJudge::new(config.ai.as_ref(), config.provider_timeout),
            FactCheckProvider::new(config.fact_check_key.clone(), config.provider_timeout),
            NewsSearch::new(config.news.clone(), config.provider_timeout),
            knowledge,
            Aggregator::new(config.aggregator.clone()),
        ))
    }
}
