use url::Url;

/// Credibility assigned to articles from outlets not in the table.
pub const UNKNOWN_SOURCE_CREDIBILITY: f32 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct TrustedSource {
    pub name: String,
    pub domain: String,
    pub credibility: f32,
}

#[derive(Debug, Clone)]
pub struct TrustedSources {
    sources: Vec<TrustedSource>,
}

impl TrustedSources {
    pub fn builtin() -> Self {
        let table = [
            ("Google News", "news.google.com", 0.99),
            ("Times of India", "timesofindia.indiatimes.com", 0.95),
            ("Hindustan Times", "hindustantimes.com", 0.95),
            ("NDTV", "ndtv.com", 0.90),
            ("The Hindu", "thehindu.com", 0.95),
            ("BBC", "bbc.com", 0.92),
            ("BBC", "bbc.co.uk", 0.92),
            ("Reuters", "reuters.com", 0.95),
            ("Indian Express", "indianexpress.com", 0.90),
        ];
        Self {
            sources: table
                .iter()
                .map(|(name, domain, credibility)| TrustedSource {
                    name: name.to_string(),
                    domain: domain.to_string(),
                    credibility: *credibility,
                })
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrustedSource> {
        self.sources.iter()
    }

    pub fn by_name(&self, name: &str) -> Option<&TrustedSource> {
        let name = name.trim();
        self.sources.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Resolves a host name against the table: the listed domain itself or
    /// one of its subdomains. Outlets with regional domains list each one.
    pub fn by_host(&self, host: &str) -> Option<&TrustedSource> {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.sources.iter().find(|s| {
            host == s.domain
                || host
                    .strip_suffix(s.domain.as_str())
                    .is_some_and(|rest| rest.ends_with('.'))
        })
    }

    pub fn credibility_for_url(&self, url: &str) -> f32 {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .and_then(|host| self.by_host(&host).map(|s| s.credibility))
            .unwrap_or(UNKNOWN_SOURCE_CREDIBILITY)
    }
}

impl Default for TrustedSources {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Placeholder similarity for a ranked hit: better-ranked and more credible
/// outlets score higher. Deterministic so verdicts are reproducible.
pub fn similarity_for(rank: usize, credibility: f32) -> f32 {
    (0.7 + 0.2 * credibility - 0.03 * rank as f32).clamp(0.5, 0.95)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_subdomain_hosts_resolve() {
        let table = TrustedSources::builtin();
        assert_eq!(table.by_host("www.ndtv.com").unwrap().name, "NDTV");
        assert_eq!(table.by_host("feeds.reuters.com").unwrap().name, "Reuters");
    }

    #[test]
    fn regional_domains_are_listed() {
        let table = TrustedSources::builtin();
        assert_eq!(table.by_host("www.bbc.co.uk").unwrap().name, "BBC");
        assert_eq!(table.by_name("bbc").unwrap().domain, "bbc.com");
    }

    #[test]
    fn lookalike_hosts_are_unknown() {
        let table = TrustedSources::builtin();
        for url in [
            "https://bbc.fake-news.example/x",
            "https://reuters.evil.io/x",
            "https://google.evil.io/x",
            "https://sites.google.com/x",
            "https://notbbc.com/x",
            "https://reuters.com.evil.io/x",
        ] {
            assert_eq!(table.credibility_for_url(url), UNKNOWN_SOURCE_CREDIBILITY, "{url}");
        }
        assert!(table.by_host("sites.google.com").is_none());
        assert!(table.by_host("news.example.org").is_none());
    }

    #[test]
    fn unknown_url_gets_moderate_credibility() {
        let table = TrustedSources::builtin();
        assert_eq!(
            table.credibility_for_url("https://some-blog.example/post"),
            UNKNOWN_SOURCE_CREDIBILITY
        );
        assert_eq!(table.credibility_for_url("not a url"), UNKNOWN_SOURCE_CREDIBILITY);
        assert_eq!(table.credibility_for_url("https://www.thehindu.com/news/x"), 0.95);
    }

    #[test]
    fn similarity_is_rank_monotonic_and_bounded() {
        let first = similarity_for(0, 0.9);
        let fifth = similarity_for(4, 0.9);
        assert!(first > fifth);
        assert!(similarity_for(100, 0.0) >= 0.5);
        assert!(similarity_for(0, 1.0) <= 0.95);
    }
}
