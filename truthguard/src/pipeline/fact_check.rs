use crate::models::{EvidenceSignal, FactCheckPayload, FactClaim, SignalKind};
use crate::pipeline::error::ProviderError;
use crate::pipeline::traits::{http_client, settle, EvidenceProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const FACT_CHECK_API_BASE: &str = "https://factchecktools.googleapis.com";
const MAX_QUERY_CHARS: usize = 200;
pub const RECENT_QUERY: &str = "viral";

/// Google Fact Check Tools claim search.
pub struct FactCheckProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl FactCheckProvider {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(),
            api_key,
            base_url: FACT_CHECK_API_BASE.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Recent published fact checks for the browse feed. Empty when
    /// unconfigured or failing.
    pub async fn recent(&self, query: &str) -> Vec<FactClaim> {
        let Some(key) = self.api_key.as_deref() else {
            return Vec::new();
        };
        match tokio::time::timeout(self.timeout, self.search(key, query)).await {
            Ok(Ok(claims)) => claims,
            Ok(Err(err)) => {
                warn!(error = %err, "recent fact checks unavailable");
                Vec::new()
            }
            Err(_) => {
                warn!("recent fact checks timed out");
                Vec::new()
            }
        }
    }

    async fn search(&self, key: &str, query: &str) -> Result<Vec<FactClaim>, ProviderError> {
        let response = self
            .client
            .get(format!("{}/v1alpha1/claims:search", self.base_url))
            .query(&[("query", query), ("key", key)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }
        let body = response.text().await?;
        parse_claims(&body)
    }

    async fn lookup(
        &self,
        content: &str,
        source_url: Option<&str>,
    ) -> Result<FactCheckPayload, ProviderError> {
        let key = self.api_key.as_deref().ok_or(ProviderError::NotConfigured)?;
        let queries = query_variants(content, source_url);
        if queries.is_empty() {
            return Err(ProviderError::EmptyQuery);
        }

        let mut last_error = None;
        for query in &queries {
            match self.search(key, query).await {
                Ok(claims) if !claims.is_empty() => {
                    debug!(query = %query, claims = claims.len(), "fact checks found");
                    return Ok(FactCheckPayload { claims });
                }
                Ok(_) => {}
                Err(err) => {
                    debug!(query = %query, error = %err, "fact check query failed");
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or(ProviderError::NoResults))
    }
}

#[async_trait]
impl EvidenceProvider for FactCheckProvider {
    type Payload = FactCheckPayload;

    fn kind(&self) -> SignalKind {
        SignalKind::FactCheck
    }

    async fn fetch(
        &self,
        content: &str,
        source_url: Option<&str>,
    ) -> EvidenceSignal<FactCheckPayload> {
        settle(self.kind(), self.timeout, self.lookup(content, source_url)).await
    }
}

/// Queries in the order they are tried: the source URL, then a sanitized
/// prefix of the content.
pub fn query_variants(content: &str, source_url: Option<&str>) -> Vec<String> {
    let mut queries = Vec::new();
    if let Some(url) = source_url.map(str::trim).filter(|u| !u.is_empty()) {
        queries.push(url.to_string());
    }
    let cleaned: String = content
        .chars()
        .take(MAX_QUERY_CHARS)
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if !cleaned.is_empty() {
        queries.push(cleaned);
    }
    queries
}

#[derive(Deserialize)]
struct ClaimSearchResponse {
    #[serde(default)]
    claims: Vec<WireClaim>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireClaim {
    #[serde(default)]
    text: String,
    #[serde(default)]
    claim_review: Vec<WireReview>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReview {
    #[serde(default)]
    publisher: Option<WirePublisher>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    textual_rating: Option<String>,
}

#[derive(Deserialize)]
struct WirePublisher {
    #[serde(default)]
    name: Option<String>,
}

/// Maps a `claims:search` body onto typed claims. Only the first review of
/// each claim is used.
pub fn parse_claims(body: &str) -> Result<Vec<FactClaim>, ProviderError> {
    let response: ClaimSearchResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    Ok(response
        .claims
        .into_iter()
        .map(|claim| {
            let review = claim.claim_review.into_iter().next();
            let (verdict_text, publisher_name, source_url) = match review {
                Some(r) => (
                    r.textual_rating,
                    r.publisher.and_then(|p| p.name),
                    r.url,
                ),
                None => (None, None, None),
            };
            FactClaim {
                claim_text: claim.text,
                verdict_text: verdict_text
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or_else(|| "Unknown".to_string()),
                publisher_name: publisher_name
                    .filter(|p| !p.trim().is_empty())
                    .unwrap_or_else(|| "Fact Checker".to_string()),
                source_url: source_url.unwrap_or_default(),
            }
        })
        .collect())
}
