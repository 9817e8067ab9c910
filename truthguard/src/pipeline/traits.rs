use crate::models::{EvidenceSignal, SignalKind};
use crate::pipeline::error::ProviderError;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

#[async_trait]
pub trait EvidenceProvider: Send + Sync {
    type Payload: Send;

    fn kind(&self) -> SignalKind;

    /// Looks up evidence for `content`. Never fails and never hangs past the
    /// provider's own timeout: every problem becomes an unavailable signal.
    async fn fetch(&self, content: &str, source_url: Option<&str>)
        -> EvidenceSignal<Self::Payload>;
}

/// Text to send to providers that take a single query: the content, or the
/// source URL when the content is blank.
pub fn subject<'a>(content: &'a str, source_url: Option<&'a str>) -> Option<&'a str> {
    let content = content.trim();
    if !content.is_empty() {
        return Some(content);
    }
    source_url.map(str::trim).filter(|u| !u.is_empty())
}

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("TruthGuard/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}

/// Runs a fallible lookup under `limit` and folds every failure into an
/// unavailable signal.
pub(crate) async fn settle<T, F>(kind: SignalKind, limit: Duration, lookup: F) -> EvidenceSignal<T>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    let outcome = match tokio::time::timeout(limit, lookup).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(limit)),
    };
    match outcome {
        Ok(payload) => EvidenceSignal::available(kind, payload),
        Err(ProviderError::NotConfigured) => {
            debug!(?kind, "provider not configured, skipping");
            EvidenceSignal::unavailable(kind)
        }
        Err(err) => {
            warn!(?kind, error = %err, "provider unavailable");
            EvidenceSignal::unavailable(kind)
        }
    }
}
