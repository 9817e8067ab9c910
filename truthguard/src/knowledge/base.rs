use crate::models::KnownFact;
use anyhow::Context;
use std::fs;
use std::path::Path;

/// Lowercases, trims and collapses inner whitespace. `None` for blanks.
pub fn normalize_keyword(input: &str) -> Option<String> {
    let normalized = input
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Static fallback table. Table order is the match priority.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    facts: Vec<KnownFact>,
}

impl KnowledgeBase {
    pub fn new(facts: Vec<KnownFact>) -> Self {
        let facts = facts
            .into_iter()
            .map(|mut fact| {
                fact.keywords = fact
                    .keywords
                    .iter()
                    .filter_map(|k| normalize_keyword(k))
                    .collect();
                fact
            })
            .filter(|fact| !fact.keywords.is_empty())
            .collect();
        Self { facts }
    }

    pub fn empty() -> Self {
        Self { facts: Vec::new() }
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            KnownFact {
                keywords: words(&["chandrayaan", "moon", "isro", "space", "landing", "vikram"]),
                is_fake: false,
                confidence: 0.98,
                reasoning: "Confirmed by official ISRO statements and widespread coverage from verified major news outlets.".to_string(),
                named_source_hints: words(&["Times of India", "Hindustan Times", "Google News"]),
            },
            KnownFact {
                keywords: words(&[
                    "alien",
                    "ufo",
                    "times square",
                    "extraterrestrial",
                    "invasion",
                    "nasa confirms",
                ]),
                is_fake: true,
                confidence: 0.95,
                reasoning: "No official reports found. Major space agencies (NASA, ESA) have not confirmed any such event. Likely clickbait or satire.".to_string(),
                named_source_hints: Vec::new(),
            },
            KnownFact {
                keywords: words(&["chip", "2000", "note", "gps", "nano"]),
                is_fake: true,
                confidence: 0.99,
                reasoning: "Debunked by RBI officials. No such technology exists in current currency notes.".to_string(),
                named_source_hints: Vec::new(),
            },
            KnownFact {
                keywords: words(&["election", "vote", "democracy", "poll", "campaign"]),
                is_fake: false,
                confidence: 0.85,
                reasoning: "Consistent with ongoing election schedules and official government notifications.".to_string(),
                named_source_hints: words(&["Google News", "NDTV"]),
            },
        ])
    }

    /// Reads a JSON array of [`KnownFact`].
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading knowledge base {}", path.display()))?;
        let facts: Vec<KnownFact> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing knowledge base {}", path.display()))?;
        Ok(Self::new(facts))
    }

    /// Appends `other` after the current entries, so existing entries keep priority.
    pub fn extend(&mut self, other: KnowledgeBase) {
        self.facts.extend(other.facts);
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// First entry with any keyword contained in `content`, case-insensitively.
    pub fn match_content(&self, content: &str) -> Option<&KnownFact> {
        let haystack = normalize_keyword(content)?;
        self.facts
            .iter()
            .find(|fact| fact.keywords.iter().any(|k| haystack.contains(k.as_str())))
    }

    pub fn matched_keywords(fact: &KnownFact, content: &str) -> Vec<String> {
        let Some(haystack) = normalize_keyword(content) else {
            return Vec::new();
        };
        fact.keywords
            .iter()
            .filter(|k| haystack.contains(k.as_str()))
            .cloned()
            .collect()
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keyword_collapses_whitespace() {
        assert_eq!(normalize_keyword("  Times   SQUARE "), Some("times square".to_string()));
        assert_eq!(normalize_keyword(" \t "), None);
    }

    #[test]
    fn match_is_case_insensitive() {
        let kb = KnowledgeBase::builtin();
        let fact = kb.match_content("CHANDRAYAAN-3 touches down").unwrap();
        assert!(!fact.is_fake);
        assert!(fact.reasoning.contains("ISRO"));
    }

    #[test]
    fn earlier_entries_win() {
        // "moon" (entry 0) and "alien" (entry 1) both present
        let kb = KnowledgeBase::builtin();
        let fact = kb.match_content("alien seen on the moon").unwrap();
        assert!(!fact.is_fake);
    }

    #[test]
    fn no_match_returns_none() {
        let kb = KnowledgeBase::builtin();
        assert!(kb.match_content("the stock market closed flat today").is_none());
        assert!(kb.match_content("").is_none());
    }

    #[test]
    fn blank_keywords_are_dropped() {
        let kb = KnowledgeBase::new(vec![KnownFact {
            keywords: vec!["  ".to_string()],
            is_fake: true,
            confidence: 0.5,
            reasoning: "x".to_string(),
            named_source_hints: Vec::new(),
        }]);
        assert!(kb.is_empty());
    }

    #[test]
    fn matched_keywords_lists_hits() {
        let kb = KnowledgeBase::builtin();
        let fact = kb.match_content("UFO invasion over Times Square").unwrap();
        let hits = KnowledgeBase::matched_keywords(fact, "UFO invasion over Times Square");
        assert_eq!(hits, vec!["ufo", "times square", "invasion"]);
    }

    #[test]
    fn from_path_loads_json_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        std::fs::write(
            &path,
            r#"[{"keywords":["Flat Earth"],"is_fake":true,"confidence":0.9,"reasoning":"Debunked."}]"#,
        )
        .unwrap();
        let kb = KnowledgeBase::from_path(&path).unwrap();
        assert_eq!(kb.len(), 1);
        assert!(kb.match_content("proof of a flat earth").unwrap().is_fake);
    }
}
