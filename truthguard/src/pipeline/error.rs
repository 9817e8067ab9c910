use std::time::Duration;

/// Why a provider produced no signal. Never escapes the adapter.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider not configured")]
    NotConfigured,

    #[error("nothing to look up")]
    EmptyQuery,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("completion error: {0}")]
    Completion(#[from] async_openai::error::OpenAIError),

    #[error("no results")]
    NoResults,
}
