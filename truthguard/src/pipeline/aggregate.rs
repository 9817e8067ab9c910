//! Reduces the provider signals to a single [`Verdict`].
//!
//! Pure and infallible: identical inputs give identical verdicts, and every
//! combination of missing signals still produces one.

use crate::knowledge::{sensational_phrases, similarity_for, KnowledgeBase, TrustedSources};
use crate::models::{
    AiJudgment, AnalysisDetails, FactCheckPayload, FactCheckSummary, KnownFact, MatchedSource,
    SignalKind, SourceMatchPayload, SourceProvenance, Verdict, VerdictBasis,
};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

const BASE_CONFIDENCE: f32 = 0.6;
const CONFIDENCE_PER_WEIGHT: f32 = 0.3;
pub const MAX_API_CONFIDENCE: f32 = 0.95;
pub const INCONCLUSIVE_CONFIDENCE: f32 = 0.4;

const UNVERIFIED_FAKE_CREDIBILITY: f32 = 0.1;
const UNVERIFIED_GENUINE_CREDIBILITY: f32 = 0.4;
const DEFAULT_FAKE_BIAS: f32 = 0.8;
const DEFAULT_GENUINE_BIAS: f32 = 0.2;

const SUGGESTED_SIMILARITY: f32 = 0.9;
const SUGGESTED_CREDIBILITY: f32 = 0.85;
const MAX_SUMMARIES: usize = 3;

pub const INCONCLUSIVE_REASONING: &str = "Unable to verify content; insufficient data.";
const FAKE_REASONING: &str = "AI analysis detected patterns consistent with misinformation. Limited verification from trusted sources.";
const GENUINE_REASONING: &str = "Content verified through multiple trusted sources and AI analysis shows credibility indicators.";

static REFUTING_RATING: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)false|fake|incorrect|misleading").ok());

/// Per-provider weight. Only providers that answered count toward the
/// denominator of the fake ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightTable {
    pub ai: f32,
    pub fact_check: f32,
    pub source_match: f32,
}

impl WeightTable {
    pub fn weight(&self, kind: SignalKind) -> f32 {
        match kind {
            SignalKind::AiJudgment => self.ai,
            SignalKind::FactCheck => self.fact_check,
            SignalKind::SourceMatch => self.source_match,
        }
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            ai: 0.40,
            fact_check: 0.35,
            source_match: 0.25,
        }
    }
}

/// Verdict direction when nothing answered and the knowledge base has no entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InconclusivePolicy {
    #[default]
    Fake,
    Genuine,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatorConfig {
    pub weights: WeightTable,
    pub inconclusive: InconclusivePolicy,
}

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: AggregatorConfig,
    sources: TrustedSources,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self {
            config,
            sources: TrustedSources::builtin(),
        }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn aggregate(
        &self,
        ai: Option<&AiJudgment>,
        fact_check: Option<&FactCheckPayload>,
        source_match: Option<&SourceMatchPayload>,
        known: Option<&KnownFact>,
        content: &str,
    ) -> Verdict {
        // An empty claim list is no answer.
        let fact_check = fact_check.filter(|fc| !fc.claims.is_empty());
        let has_api_signal = self.answered_weight(ai, fact_check, source_match) > 0.0;

        let (basis, is_fake, confidence, reasoning, matched_sources) = if has_api_signal {
            self.from_signals(ai, fact_check, source_match)
        } else if let Some(fact) = known {
            (
                VerdictBasis::KnowledgeBase,
                fact.is_fake,
                fact.confidence,
                fact.reasoning.clone(),
                self.sources_from_hints(&fact.named_source_hints, content),
            )
        } else {
            (
                VerdictBasis::Inconclusive,
                self.config.inconclusive == InconclusivePolicy::Fake,
                INCONCLUSIVE_CONFIDENCE,
                INCONCLUSIVE_REASONING.to_string(),
                Vec::new(),
            )
        };

        let matched_sources = dedup_by_url(matched_sources);
        let confidence = unit(confidence);

        let credibility_score = weighted_credibility(&matched_sources).unwrap_or(if is_fake {
            UNVERIFIED_FAKE_CREDIBILITY
        } else {
            UNVERIFIED_GENUINE_CREDIBILITY
        });

        let bias_score = ai
            .and_then(|a| a.bias_score)
            .unwrap_or(if is_fake {
                DEFAULT_FAKE_BIAS
            } else {
                DEFAULT_GENUINE_BIAS
            });

        let fact_check_summaries =
            summarize_claims(fact_check, content, is_fake, confidence, basis);

        let analysis = AnalysisDetails {
            keyword_matches: known
                .map(|fact| KnowledgeBase::matched_keywords(fact, content))
                .unwrap_or_default(),
            sensational_phrases: sensational_phrases(content),
            source_verified: matched_sources
                .iter()
                .any(|s| s.provenance == SourceProvenance::Retrieved),
            red_flags: ai.map(|a| a.red_flags.clone()).unwrap_or_default(),
            credibility_indicators: ai
                .map(|a| a.credibility_indicators.clone())
                .unwrap_or_default(),
        };

        Verdict {
            is_fake,
            confidence_score: confidence,
            credibility_score: unit(credibility_score),
            matched_sources,
            reasoning,
            bias_score: unit(bias_score),
            fact_check_summaries,
            basis,
            analysis,
        }
    }

    /// Summed weight of the providers that answered. Zero sends the verdict
    /// down the knowledge-base or inconclusive path.
    fn answered_weight(
        &self,
        ai: Option<&AiJudgment>,
        fact_check: Option<&FactCheckPayload>,
        source_match: Option<&SourceMatchPayload>,
    ) -> f32 {
        let weights = &self.config.weights;
        [
            ai.map(|_| weights.ai),
            fact_check.map(|_| weights.fact_check),
            source_match.map(|_| weights.source_match),
        ]
        .into_iter()
        .flatten()
        .filter(|w| w.is_finite() && *w > 0.0)
        .sum()
    }

    fn from_signals(
        &self,
        ai: Option<&AiJudgment>,
        fact_check: Option<&FactCheckPayload>,
        source_match: Option<&SourceMatchPayload>,
    ) -> (VerdictBasis, bool, f32, String, Vec<MatchedSource>) {
        let weights = &self.config.weights;
        let mut fake_score = 0.0_f32;
        let mut total_weight = 0.0_f32;
        let mut reasoning: Option<String> = None;

        if let Some(ai) = ai {
            if ai.is_fake {
                fake_score += weights.ai;
            }
            total_weight += weights.ai;
            if !ai.reasoning.trim().is_empty() {
                reasoning = Some(ai.reasoning.clone());
            }
        }

        if let Some(fc) = fact_check.filter(|fc| !fc.claims.is_empty()) {
            let refuted = fc
                .claims
                .iter()
                .filter(|c| is_refuting(&c.verdict_text))
                .count();
            fake_score += weights.fact_check * refuted as f32 / fc.claims.len() as f32;
            total_weight += weights.fact_check;
            if reasoning.is_none() {
                let first = &fc.claims[0];
                reasoning = Some(format!(
                    "Fact-checked by {}: {}",
                    first.publisher_name, first.verdict_text
                ));
            }
        }

        if let Some(sm) = source_match {
            // An answered search with no hits is itself suspicious.
            let suspicion = if sm.matches.is_empty() {
                1.0
            } else {
                let mean = sm
                    .matches
                    .iter()
                    .map(|s| unit(s.credibility_rating))
                    .sum::<f32>()
                    / sm.matches.len() as f32;
                1.0 - mean
            };
            fake_score += weights.source_match * suspicion;
            total_weight += weights.source_match;
        }

        // Exactly 0.5 is genuine.
        let is_fake = total_weight > 0.0 && fake_score / total_weight > 0.5;

        let mut confidence =
            (BASE_CONFIDENCE + total_weight * CONFIDENCE_PER_WEIGHT).min(MAX_API_CONFIDENCE);
        if let Some(ai) = ai {
            confidence = confidence.max(unit(ai.confidence));
        }

        let reasoning = reasoning.unwrap_or_else(|| {
            if is_fake {
                FAKE_REASONING.to_string()
            } else {
                GENUINE_REASONING.to_string()
            }
        });

        let matched_sources = match source_match {
            Some(sm) if !sm.matches.is_empty() => sm.matches.clone(),
            _ => ai
                .map(|a| self.sources_from_suggestions(&a.suggested_sources))
                .unwrap_or_default(),
        };

        (
            VerdictBasis::ApiSignals,
            is_fake,
            confidence,
            reasoning,
            matched_sources,
        )
    }

    /// Degraded mode: the model's own source suggestions stand in for
    /// retrieved matches, with fixed placeholder scores.
    fn sources_from_suggestions(&self, suggestions: &[String]) -> Vec<MatchedSource> {
        suggestions
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter_map(|suggestion| {
                let (name, url) = match Url::parse(suggestion) {
                    Ok(url) if matches!(url.scheme(), "http" | "https") => {
                        let host = url.host_str().unwrap_or(suggestion).to_string();
                        let name = self
                            .sources
                            .by_host(&host)
                            .map(|t| t.name.clone())
                            .unwrap_or(host);
                        (name, url.to_string())
                    }
                    _ => match self.sources.by_name(suggestion) {
                        Some(t) => (t.name.clone(), format!("https://{}", t.domain)),
                        None => (suggestion.to_string(), news_search_url(suggestion)?),
                    },
                };
                Some(MatchedSource {
                    name,
                    url,
                    similarity_score: SUGGESTED_SIMILARITY,
                    credibility_rating: SUGGESTED_CREDIBILITY,
                    provenance: SourceProvenance::AiSuggested,
                })
            })
            .collect()
    }

    fn sources_from_hints(&self, hints: &[String], content: &str) -> Vec<MatchedSource> {
        let query: String = content.chars().take(20).collect();
        hints
            .iter()
            .enumerate()
            .filter_map(|(rank, hint)| {
                let (name, url, credibility) = match self.sources.by_name(hint) {
                    Some(t) => {
                        let url = Url::parse_with_params(
                            &format!("https://{}/search", t.domain),
                            &[("q", query.as_str())],
                        )
                        .ok()?;
                        (t.name.clone(), url.to_string(), t.credibility)
                    }
                    None => (
                        hint.clone(),
                        news_search_url(hint)?,
                        crate::knowledge::sources::UNKNOWN_SOURCE_CREDIBILITY,
                    ),
                };
                Some(MatchedSource {
                    name,
                    url,
                    similarity_score: similarity_for(rank, credibility),
                    credibility_rating: credibility,
                    provenance: SourceProvenance::KnowledgeBase,
                })
            })
            .collect()
    }
}

pub fn is_refuting(rating: &str) -> bool {
    match REFUTING_RATING.as_ref() {
        Some(re) => re.is_match(rating),
        None => false,
    }
}

/// Clamps to `[0, 1]`; NaN collapses to 0.
pub fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn dedup_by_url(sources: Vec<MatchedSource>) -> Vec<MatchedSource> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|s| seen.insert(s.url.clone()))
        .map(|mut s| {
            s.similarity_score = unit(s.similarity_score);
            s.credibility_rating = unit(s.credibility_rating);
            s
        })
        .collect()
}

/// Similarity-weighted mean credibility; plain mean when all similarities are 0.
fn weighted_credibility(sources: &[MatchedSource]) -> Option<f32> {
    if sources.is_empty() {
        return None;
    }
    let total_similarity: f32 = sources.iter().map(|s| s.similarity_score).sum();
    if total_similarity > 0.0 {
        Some(
            sources
                .iter()
                .map(|s| s.credibility_rating * s.similarity_score)
                .sum::<f32>()
                / total_similarity,
        )
    } else {
        Some(sources.iter().map(|s| s.credibility_rating).sum::<f32>() / sources.len() as f32)
    }
}

fn summarize_claims(
    fact_check: Option<&FactCheckPayload>,
    content: &str,
    is_fake: bool,
    confidence: f32,
    basis: VerdictBasis,
) -> Vec<FactCheckSummary> {
    match fact_check.filter(|fc| !fc.claims.is_empty()) {
        Some(fc) => fc
            .claims
            .iter()
            .take(MAX_SUMMARIES)
            .map(|c| FactCheckSummary {
                claim: if c.claim_text.trim().is_empty() {
                    content_prefix(content)
                } else {
                    c.claim_text.clone()
                },
                verdict: c.verdict_text.clone(),
                source: c.publisher_name.clone(),
                confidence,
            })
            .collect(),
        None => vec![FactCheckSummary {
            claim: content_prefix(content),
            verdict: if is_fake { "Likely False" } else { "Likely True" }.to_string(),
            source: match basis {
                VerdictBasis::ApiSignals => "AI Analysis",
                VerdictBasis::KnowledgeBase => "Knowledge Base",
                VerdictBasis::Inconclusive => "Unverified",
            }
            .to_string(),
            confidence,
        }],
    }
}

fn content_prefix(content: &str) -> String {
    let trimmed = content.trim();
    let mut out: String = trimmed.chars().take(50).collect();
    if trimmed.chars().count() > 50 {
        out.push_str("...");
    }
    out
}

fn news_search_url(query: &str) -> Option<String> {
    Url::parse_with_params("https://news.google.com/search", &[("q", query)])
        .ok()
        .map(|u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FactClaim;

    fn claim(verdict: &str) -> FactClaim {
        FactClaim {
            claim_text: "claim".to_string(),
            verdict_text: verdict.to_string(),
            publisher_name: "PolitiFact".to_string(),
            source_url: "https://www.politifact.com/x".to_string(),
        }
    }

    fn source(url: &str, credibility: f32) -> MatchedSource {
        MatchedSource {
            name: "Outlet".to_string(),
            url: url.to_string(),
            similarity_score: 0.8,
            credibility_rating: credibility,
            provenance: SourceProvenance::Retrieved,
        }
    }

    #[test]
    fn refuting_ratings() {
        for rating in ["False", "Pants on Fire! (false)", "FAKE", "Incorrect", "Misleading"] {
            assert!(is_refuting(rating), "{rating}");
        }
        for rating in ["True", "Mostly True", "Unknown", ""] {
            assert!(!is_refuting(rating), "{rating}");
        }
    }

    #[test]
    fn unit_clamps_and_rejects_nan() {
        assert_eq!(unit(1.7), 1.0);
        assert_eq!(unit(-0.2), 0.0);
        assert_eq!(unit(f32::NAN), 0.0);
        assert_eq!(unit(0.25), 0.25);
    }

    #[test]
    fn tie_resolves_to_genuine() {
        // ai fake (0.5) vs fact check true (0.5) => ratio exactly 0.5
        let agg = Aggregator::new(AggregatorConfig {
            weights: WeightTable {
                ai: 0.5,
                fact_check: 0.5,
                source_match: 0.0,
            },
            ..Default::default()
        });
        let ai = AiJudgment {
            is_fake: true,
            confidence: 0.5,
            reasoning: String::new(),
            bias_score: None,
            red_flags: Vec::new(),
            credibility_indicators: Vec::new(),
            suggested_sources: Vec::new(),
        };
        let fc = FactCheckPayload {
            claims: vec![claim("True")],
        };
        let v = agg.aggregate(Some(&ai), Some(&fc), None, None, "text");
        assert!(!v.is_fake);
        assert_eq!(v.reasoning, "Fact-checked by PolitiFact: True");
    }

    #[test]
    fn fact_check_fraction_scales_contribution() {
        let agg = Aggregator::default();
        let one_of_three = FactCheckPayload {
            claims: vec![claim("False"), claim("True"), claim("Mostly true")],
        };
        assert!(!agg.aggregate(None, Some(&one_of_three), None, None, "x").is_fake);
        let two_of_three = FactCheckPayload {
            claims: vec![claim("False"), claim("Misleading"), claim("True")],
        };
        assert!(agg.aggregate(None, Some(&two_of_three), None, None, "x").is_fake);
    }

    #[test]
    fn answered_search_without_hits_is_suspicious() {
        let agg = Aggregator::default();
        let v = agg.aggregate(None, None, Some(&SourceMatchPayload::default()), None, "x");
        assert!(v.is_fake);
        assert_eq!(v.basis, VerdictBasis::ApiSignals);
        assert_eq!(v.credibility_score, UNVERIFIED_FAKE_CREDIBILITY);
        assert!(v.reasoning.starts_with("AI analysis detected patterns"));
    }

    #[test]
    fn matched_sources_are_deduplicated_by_url() {
        let agg = Aggregator::default();
        let sm = SourceMatchPayload {
            matches: vec![
                source("https://ndtv.com/a", 0.9),
                source("https://ndtv.com/a", 0.9),
                source("https://thehindu.com/b", 0.95),
            ],
        };
        let v = agg.aggregate(None, None, Some(&sm), None, "x");
        assert_eq!(v.matched_sources.len(), 2);
        assert!(v.analysis.source_verified);
    }

    #[test]
    fn suggestions_fill_in_when_search_is_empty() {
        let agg = Aggregator::default();
        let ai = AiJudgment {
            is_fake: false,
            confidence: 0.8,
            reasoning: "Consistent with official statements.".to_string(),
            bias_score: Some(0.1),
            red_flags: Vec::new(),
            credibility_indicators: vec!["named officials".to_string()],
            suggested_sources: vec![
                "NDTV".to_string(),
                "https://www.reuters.com/world/".to_string(),
                "Local Gazette".to_string(),
                "  ".to_string(),
            ],
        };
        let v = agg.aggregate(Some(&ai), None, None, None, "x");
        assert_eq!(v.matched_sources.len(), 3);
        assert!(v
            .matched_sources
            .iter()
            .all(|s| s.provenance == SourceProvenance::AiSuggested));
        assert_eq!(v.matched_sources[0].url, "https://ndtv.com");
        assert_eq!(v.matched_sources[1].name, "Reuters");
        assert!(v.matched_sources[2].url.starts_with("https://news.google.com/search?q=Local"));
        assert!(!v.analysis.source_verified);
        assert_eq!(v.bias_score, 0.1);
        assert_eq!(v.analysis.credibility_indicators, vec!["named officials"]);
    }

    #[test]
    fn summaries_cap_at_three_claims() {
        let agg = Aggregator::default();
        let fc = FactCheckPayload {
            claims: vec![claim("False"); 5],
        };
        let v = agg.aggregate(None, Some(&fc), None, None, "x");
        assert_eq!(v.fact_check_summaries.len(), 3);
        assert_eq!(v.fact_check_summaries[0].source, "PolitiFact");
    }

    #[test]
    fn synthesized_summary_names_its_basis() {
        let agg = Aggregator::default();
        let v = agg.aggregate(None, None, None, None, "an unverifiable rumour");
        assert_eq!(v.fact_check_summaries.len(), 1);
        assert_eq!(v.fact_check_summaries[0].source, "Unverified");
        assert_eq!(v.fact_check_summaries[0].claim, "an unverifiable rumour");
    }

    #[test]
    fn genuine_inconclusive_policy() {
        let agg = Aggregator::new(AggregatorConfig {
            inconclusive: InconclusivePolicy::Genuine,
            ..Default::default()
        });
        let v = agg.aggregate(None, None, None, None, "x");
        assert!(!v.is_fake);
        assert_eq!(v.credibility_score, UNVERIFIED_GENUINE_CREDIBILITY);
        assert_eq!(v.bias_score, DEFAULT_GENUINE_BIAS);
        assert!(v.is_inconclusive());
    }

    #[test]
    fn empty_claim_list_defers_to_knowledge_base() {
        let agg = Aggregator::default();
        let known = KnownFact {
            keywords: vec!["times square".to_string()],
            is_fake: true,
            confidence: 0.95,
            reasoning: "No official reports found.".to_string(),
            named_source_hints: Vec::new(),
        };
        let empty = FactCheckPayload::default();
        let v = agg.aggregate(
            None,
            Some(&empty),
            None,
            Some(&known),
            "Aliens have landed in Times Square",
        );
        assert_eq!(v.basis, VerdictBasis::KnowledgeBase);
        assert!(v.is_fake);
        assert_eq!(v.confidence_score, 0.95);
        assert_eq!(v.fact_check_summaries[0].source, "Knowledge Base");

        let v = agg.aggregate(None, Some(&empty), None, None, "x");
        assert!(v.is_inconclusive());
    }

    #[test]
    fn zero_weighted_answers_fall_through() {
        let agg = Aggregator::new(AggregatorConfig {
            weights: WeightTable {
                ai: 0.4,
                fact_check: 0.0,
                source_match: 0.25,
            },
            ..Default::default()
        });
        let fc = FactCheckPayload {
            claims: vec![claim("True")],
        };
        let v = agg.aggregate(None, Some(&fc), None, None, "x");
        assert!(v.is_inconclusive());
        assert_eq!(v.confidence_score, INCONCLUSIVE_CONFIDENCE);
        // Claims are still reported even though they carried no weight.
        assert_eq!(v.fact_check_summaries[0].source, "PolitiFact");
    }

    #[test]
    fn content_prefix_truncates_on_chars() {
        let long = "é".repeat(80);
        let prefix = content_prefix(&long);
        assert_eq!(prefix.chars().count(), 53);
        assert!(prefix.ends_with("..."));
    }
}
