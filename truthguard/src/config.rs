//! Explicit provider configuration, read once at start-up.

use crate::pipeline::aggregate::{AggregatorConfig, InconclusivePolicy, WeightTable};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_HISTORY_PATH: &str = "_truthguard/history.log";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid weight entry `{entry}` (expected `ai|fact_check|source_match=<positive number>`)")]
    InvalidWeight { entry: String },

    #[error("unknown inconclusive policy `{0}` (expected `fake` or `genuine`)")]
    InvalidPolicy(String),

    #[error("invalid provider timeout `{0}` (expected milliseconds)")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsVendor {
    NewsApi,
    GNews,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsConfig {
    pub vendor: NewsVendor,
    pub api_key: String,
}

/// Which providers are live and how the aggregator is tuned.
///
/// A provider whose key is absent stays in the pipeline and simply reports
/// itself unavailable.
#[derive(Debug, Clone)]
pub struct ProviderConfiguration {
    pub ai: Option<AiConfig>,
    pub fact_check_key: Option<String>,
    pub news: Option<NewsConfig>,
    pub provider_timeout: Duration,
    pub aggregator: AggregatorConfig,
    pub knowledge_base_path: Option<PathBuf>,
    pub history_path: PathBuf,
}

impl Default for ProviderConfiguration {
    fn default() -> Self {
        Self {
            ai: None,
            fact_check_key: None,
            news: None,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            aggregator: AggregatorConfig::default(),
            knowledge_base_path: None,
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
        }
    }
}

impl ProviderConfiguration {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = |name: &str| {
            lookup(name)
                .filter(|v| valid_api_key(v))
                .map(|v| v.trim().to_string())
        };

        let ai = key("OPENAI_API_KEY").map(|api_key| AiConfig {
            api_key,
            model: lookup("OPENAI_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: lookup("OPENAI_API_BASE").filter(|b| !b.trim().is_empty()),
        });

        let news = match (key("NEWS_API_KEY"), key("GNEWS_API_KEY")) {
            (Some(api_key), _) => Some(NewsConfig {
                vendor: NewsVendor::NewsApi,
                api_key,
            }),
            (None, Some(api_key)) => Some(NewsConfig {
                vendor: NewsVendor::GNews,
                api_key,
            }),
            (None, None) => None,
        };

        let provider_timeout = match lookup("TRUTHGUARD_PROVIDER_TIMEOUT_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
            None => DEFAULT_PROVIDER_TIMEOUT,
        };

        let weights = match lookup("TRUTHGUARD_WEIGHTS") {
            Some(raw) => parse_weights(&raw)?,
            None => WeightTable::default(),
        };

        let inconclusive = match lookup("TRUTHGUARD_INCONCLUSIVE") {
            Some(raw) => parse_policy(&raw)?,
            None => InconclusivePolicy::default(),
        };

        Ok(Self {
            ai,
            fact_check_key: key("FACT_CHECK_API_KEY"),
            news,
            provider_timeout,
            aggregator: AggregatorConfig {
                weights,
                inconclusive,
            },
            knowledge_base_path: lookup("TRUTHGUARD_KNOWLEDGE_BASE")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            history_path: lookup("TRUTHGUARD_HISTORY_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_PATH)),
        })
    }

    pub fn live_provider_count(&self) -> usize {
        [
            self.ai.is_some(),
            self.fact_check_key.is_some(),
            self.news.is_some(),
        ]
        .iter()
        .filter(|live| **live)
        .count()
    }
}

/// Rejects blanks and the placeholders shipped in `.env.example`.
pub fn valid_api_key(key: &str) -> bool {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return false;
    }
    if trimmed.contains("...") || trimmed.contains("your_") {
        return false;
    }
    true
}

/// `ai=0.4;fact_check=0.35;source_match=0.25`. Omitted kinds keep their default;
/// weights must be positive.
fn parse_weights(raw: &str) -> Result<WeightTable, ConfigError> {
    let mut table = WeightTable::default();
    for item in raw.split(';') {
        if item.trim().is_empty() {
            continue;
        }
        let invalid = || ConfigError::InvalidWeight {
            entry: item.trim().to_string(),
        };
        let (name, value) = item.split_once('=').ok_or_else(invalid)?;
        let value: f32 = value.trim().parse().map_err(|_| invalid())?;
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid());
        }
        match name.trim() {
            "ai" => table.ai = value,
            "fact_check" => table.fact_check = value,
            "source_match" => table.source_match = value,
            _ => return Err(invalid()),
        }
    }
    Ok(table)
}

fn parse_policy(raw: &str) -> Result<InconclusivePolicy, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "fake" => Ok(InconclusivePolicy::Fake),
        "genuine" => Ok(InconclusivePolicy::Genuine),
        _ => Err(ConfigError::InvalidPolicy(raw.to_string())),
    }
}
