use crate::config::{NewsConfig, NewsVendor};
use crate::knowledge::{similarity_for, TrustedSources};
use crate::models::{
    EvidenceSignal, Headline, MatchedSource, SignalKind, SourceMatchPayload, SourceProvenance,
};
use crate::pipeline::error::ProviderError;
use crate::pipeline::traits::{http_client, settle, subject, EvidenceProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;
use url::Url;

pub const NEWS_API_BASE: &str = "https://newsapi.org";
pub const GNEWS_API_BASE: &str = "https://gnews.io";
const MAX_QUERY_CHARS: usize = 50;
const SEARCH_PAGE_SIZE: &str = "5";
const HEADLINE_PAGE_SIZE: &str = "12";

/// Article search against NewsAPI or GNews, used to corroborate content.
pub struct NewsSearch {
    client: Client,
    config: Option<NewsConfig>,
    base_url: String,
    timeout: Duration,
    sources: TrustedSources,
}

impl NewsSearch {
    pub fn new(config: Option<NewsConfig>, timeout: Duration) -> Self {
        let base_url = match config.as_ref().map(|c| c.vendor) {
            Some(NewsVendor::GNews) => GNEWS_API_BASE,
            _ => NEWS_API_BASE,
        };
        Self {
            client: http_client(),
            config,
            base_url: base_url.to_string(),
            timeout,
            sources: TrustedSources::builtin(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Worldwide headlines for the browse feed. Placeholder stories when no
    /// vendor is configured; empty on failure.
    pub async fn top_headlines(&self) -> Vec<Headline> {
        let Some(config) = self.config.as_ref() else {
            return placeholder_headlines();
        };
        let request = match config.vendor {
            NewsVendor::NewsApi => self
                .client
                .get(format!("{}/v2/top-headlines", self.base_url))
                .query(&[
                    ("language", "en"),
                    ("category", "general"),
                    ("pageSize", HEADLINE_PAGE_SIZE),
                    ("apiKey", config.api_key.as_str()),
                ]),
            NewsVendor::GNews => self
                .client
                .get(format!("{}/api/v4/top-headlines", self.base_url))
                .query(&[
                    ("category", "general"),
                    ("lang", "en"),
                    ("max", HEADLINE_PAGE_SIZE),
                    ("apikey", config.api_key.as_str()),
                ]),
        };
        let articles = match tokio::time::timeout(self.timeout, fetch_articles(request)).await {
            Ok(Ok(articles)) => articles,
            Ok(Err(err)) => {
                warn!(error = %err, "headlines unavailable");
                return Vec::new();
            }
            Err(_) => {
                warn!("headlines timed out");
                return Vec::new();
            }
        };
        articles.into_iter().filter_map(WireArticle::into_headline).collect()
    }

    async fn lookup(&self, subject: Option<&str>) -> Result<SourceMatchPayload, ProviderError> {
        let config = self.config.as_ref().ok_or(ProviderError::NotConfigured)?;
        let subject = subject.ok_or(ProviderError::EmptyQuery)?;
        let query: String = subject.chars().take(MAX_QUERY_CHARS).collect();

        let request = match config.vendor {
            NewsVendor::NewsApi => self
                .client
                .get(format!("{}/v2/everything", self.base_url))
                .query(&[
                    ("q", query.as_str()),
                    ("language", "en"),
                    ("sortBy", "relevancy"),
                    ("pageSize", SEARCH_PAGE_SIZE),
                    ("apiKey", config.api_key.as_str()),
                ]),
            NewsVendor::GNews => self
                .client
                .get(format!("{}/api/v4/search", self.base_url))
                .query(&[
                    ("q", query.as_str()),
                    ("lang", "en"),
                    ("max", SEARCH_PAGE_SIZE),
                    ("apikey", config.api_key.as_str()),
                ]),
        };
        let articles = fetch_articles(request).await?;
        Ok(SourceMatchPayload {
            matches: match_articles(&self.sources, articles),
        })
    }
}

#[async_trait]
impl EvidenceProvider for NewsSearch {
    type Payload = SourceMatchPayload;

    fn kind(&self) -> SignalKind {
        SignalKind::SourceMatch
    }

    async fn fetch(
        &self,
        content: &str,
        source_url: Option<&str>,
    ) -> EvidenceSignal<SourceMatchPayload> {
        settle(
            self.kind(),
            self.timeout,
            self.lookup(subject(content, source_url)),
        )
        .await
    }
}

async fn fetch_articles(
    request: reqwest::RequestBuilder,
) -> Result<Vec<WireArticle>, ProviderError> {
    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(ProviderError::Status(response.status().as_u16()));
    }
    let body = response.text().await?;
    parse_articles(&body)
}

/// NewsAPI and GNews share this shape closely enough for one decoder:
/// GNews calls the image `image`, NewsAPI calls it `urlToImage`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, alias = "image")]
    url_to_image: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    source: Option<WireSource>,
}

#[derive(Deserialize)]
struct WireSource {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct ArticleResponse {
    #[serde(default)]
    articles: Vec<WireArticle>,
}

impl WireArticle {
    fn source_name(&self) -> Option<String> {
        self.source
            .as_ref()
            .and_then(|s| s.name.clone())
            .filter(|n| !n.trim().is_empty())
    }

    fn into_headline(self) -> Option<Headline> {
        let source_name = self.source_name().unwrap_or_else(|| "Unknown".to_string());
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let description = self.description.filter(|d| !d.trim().is_empty())?;
        let image_url = self.url_to_image.filter(|i| !i.trim().is_empty())?;
        Some(Headline {
            title,
            description,
            url: self.url.unwrap_or_default(),
            image_url: Some(image_url),
            source_name,
            published_at: self.published_at,
        })
    }
}

fn parse_articles(body: &str) -> Result<Vec<WireArticle>, ProviderError> {
    let response: ArticleResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    Ok(response.articles)
}

/// Ranks are positions in the vendor's relevance order.
fn match_articles(sources: &TrustedSources, articles: Vec<WireArticle>) -> Vec<MatchedSource> {
    articles
        .into_iter()
        .enumerate()
        .filter_map(|(rank, article)| {
            let raw_url = article.url.as_deref()?;
            let url = Url::parse(raw_url).ok()?;
            let host = url.host_str()?.to_string();
            let credibility = sources.credibility_for_url(raw_url);
            Some(MatchedSource {
                name: article.source_name().unwrap_or(host),
                url: url.to_string(),
                similarity_score: similarity_for(rank, credibility),
                credibility_rating: credibility,
                provenance: SourceProvenance::Retrieved,
            })
        })
        .collect()
}

pub fn placeholder_headlines() -> Vec<Headline> {
    let stories = [
        (
            "Global Summit on Climate Change Reaches Historic Agreement",
            "World leaders have agreed to a new set of binding targets to reduce carbon emissions by 2030...",
            "Global News Network",
        ),
        (
            "Tech Giant Unveils Revolutionary AI Assistant",
            "The new AI model promises to transform how we interact with digital devices and the internet...",
            "Tech Weekly",
        ),
        (
            "SpaceX Successfully Launches New Satellite Constellation",
            "The mission marks another milestone in the company's ambitious plan to provide global internet coverage...",
            "Space Daily",
        ),
    ];
    stories
        .iter()
        .map(|(title, description, source)| Headline {
            title: title.to_string(),
            description: description.to_string(),
            url: "#".to_string(),
            image_url: None,
            source_name: source.to_string(),
            published_at: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEWSAPI_BODY: &str = r#"{
        "status": "ok",
        "totalResults": 3,
        "articles": [
            {"source": {"id": null, "name": "NDTV"}, "title": "Lander touches down",
             "description": "d", "url": "https://www.ndtv.com/science/lander",
             "urlToImage": "https://img.example/a.jpg", "publishedAt": "2023-08-23T12:00:00Z"},
            {"source": {"name": ""}, "title": "Blog take", "url": "https://randomblog.example/post"},
            {"source": {"name": "Broken"}, "title": "No url"}
        ]
    }"#;

    #[test]
    fn maps_newsapi_articles_to_matches() {
        let articles = parse_articles(NEWSAPI_BODY).unwrap();
        let matches = match_articles(&TrustedSources::builtin(), articles);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].name, "NDTV");
        assert_eq!(matches[0].credibility_rating, 0.90);
        assert_eq!(matches[1].name, "randomblog.example");
        assert_eq!(matches[1].credibility_rating, 0.6);
        assert!(matches[0].similarity_score > matches[1].similarity_score);
        assert!(matches.iter().all(|m| m.provenance == SourceProvenance::Retrieved));
    }

    #[test]
    fn matching_is_deterministic() {
        let table = TrustedSources::builtin();
        let first = match_articles(&table, parse_articles(NEWSAPI_BODY).unwrap());
        let second = match_articles(&table, parse_articles(NEWSAPI_BODY).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn gnews_image_field_is_accepted() {
        let body = r#"{"totalArticles": 1, "articles": [
            {"title": "T", "description": "D", "url": "https://www.thehindu.com/x",
             "image": "https://img.example/b.jpg", "publishedAt": "2024-01-01T00:00:00Z",
             "source": {"name": "The Hindu", "url": "https://www.thehindu.com"}}
        ]}"#;
        let headlines: Vec<Headline> = parse_articles(body)
            .unwrap()
            .into_iter()
            .filter_map(WireArticle::into_headline)
            .collect();
        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].image_url.as_deref(), Some("https://img.example/b.jpg"));
        assert_eq!(headlines[0].source_name, "The Hindu");
    }

    #[test]
    fn headlines_without_image_are_dropped() {
        let headlines: Vec<Headline> = parse_articles(NEWSAPI_BODY)
            .unwrap()
            .into_iter()
            .filter_map(WireArticle::into_headline)
            .collect();
        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].title, "Lander touches down");
    }

    #[test]
    fn empty_article_list_is_an_answer() {
        let articles = parse_articles(r#"{"status":"ok","articles":[]}"#).unwrap();
        assert!(match_articles(&TrustedSources::builtin(), articles).is_empty());
    }

    #[tokio::test]
    async fn unconfigured_search_is_unavailable_and_serves_placeholders() {
        let search = NewsSearch::new(None, Duration::from_secs(1));
        assert!(!search.fetch("story", None).await.is_available());
        assert_eq!(search.top_headlines().await.len(), 3);
    }

    #[tokio::test]
    async fn unreachable_vendor_is_unavailable() {
        let search = NewsSearch::new(
            Some(NewsConfig {
                vendor: NewsVendor::GNews,
                api_key: "key".to_string(),
            }),
            Duration::from_secs(2),
        )
        .with_base_url("http://127.0.0.1:9");
        assert!(!search.fetch("story", None).await.is_available());
        assert!(search.top_headlines().await.is_empty());
    }
}
