use crate::config::AiConfig;
use crate::models::{AiJudgment, EvidenceSignal, SignalKind};
use crate::pipeline::aggregate::unit;
use crate::pipeline::error::ProviderError;
use crate::pipeline::traits::{settle, subject, EvidenceProvider};
use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

/// Longest content excerpt sent to the model.
const MAX_CONTENT_CHARS: usize = 6000;

static FENCED_JSON: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(\{.*?\})\s*```").ok());

const SYSTEM_PROMPT: &str = "You are a professional fact-checker and misinformation detection expert. \
Decide whether the NEWS CONTENT is likely fake news or misinformation. \
Output JSON only, with keys: is_fake (boolean), confidence (number 0-1), reasoning (string), \
red_flags (array of strings), credibility_indicators (array of strings), \
bias_score (number 0-1, 1 = highly biased), suggested_sources (array of outlet names or URLs \
that would carry this story if it were true).";

pub struct AiJudge {
    client: Option<Client<OpenAIConfig>>,
    model: String,
    timeout: Duration,
}

impl AiJudge {
    pub fn new(config: Option<&AiConfig>, timeout: Duration) -> Self {
        let client = config.map(|cfg| {
            let mut openai = OpenAIConfig::new().with_api_key(&cfg.api_key);
            if let Some(base) = &cfg.api_base {
                openai = openai.with_api_base(base);
            }
            Client::with_config(openai)
        });
        Self {
            client,
            model: config
                .map(|cfg| cfg.model.clone())
                .unwrap_or_else(|| crate::config::DEFAULT_MODEL.to_string()),
            timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn lookup(&self, subject: Option<&str>) -> Result<AiJudgment, ProviderError> {
        let client = self.client.as_ref().ok_or(ProviderError::NotConfigured)?;
        let subject = subject.ok_or(ProviderError::EmptyQuery)?;
        let excerpt: String = subject.chars().take(MAX_CONTENT_CHARS).collect();

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(0.2_f32)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(format!("NEWS CONTENT:\n{}", excerpt))
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = client.chat().create(request).await?;
        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| ProviderError::Malformed("completion has no content".to_string()))?;

        parse_judgment(&content)
    }
}

#[async_trait]
impl EvidenceProvider for AiJudge {
    type Payload = AiJudgment;

    fn kind(&self) -> SignalKind {
        SignalKind::AiJudgment
    }

    async fn fetch(&self, content: &str, source_url: Option<&str>) -> EvidenceSignal<AiJudgment> {
        settle(
            self.kind(),
            self.timeout,
            self.lookup(subject(content, source_url)),
        )
        .await
    }
}

#[derive(Deserialize)]
struct LlmJudgment {
    is_fake: bool,
    confidence: f32,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    red_flags: Vec<String>,
    #[serde(default)]
    credibility_indicators: Vec<String>,
    #[serde(default)]
    bias_score: Option<f32>,
    #[serde(default)]
    suggested_sources: Vec<String>,
}

/// Pulls the JSON object out of a completion: a fenced block if present,
/// otherwise the span from the first `{` to the last `}`.
pub fn extract_json(text: &str) -> Option<&str> {
    if let Some(re) = FENCED_JSON.as_ref() {
        if let Some(m) = re.captures(text).and_then(|c| c.get(1)) {
            return Some(m.as_str());
        }
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

pub fn parse_judgment(text: &str) -> Result<AiJudgment, ProviderError> {
    let json = extract_json(text).ok_or_else(|| {
        ProviderError::Malformed(format!(
            "no JSON object in completion: {}",
            text.chars().take(80).collect::<String>()
        ))
    })?;
    let raw: LlmJudgment =
        serde_json::from_str(json).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    Ok(AiJudgment {
        is_fake: raw.is_fake,
        confidence: unit(raw.confidence),
        reasoning: collapse_whitespace(&raw.reasoning),
        bias_score: raw.bias_score.map(unit),
        red_flags: raw.red_flags,
        credibility_indicators: raw.credibility_indicators,
        suggested_sources: raw.suggested_sources,
    })
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
