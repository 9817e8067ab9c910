/// Clickbait and sensational phrasing commonly seen in fabricated stories.
const SENSATIONAL_PHRASES: &[&str] = &[
    "shocking",
    "exclusive",
    "breaking",
    "viral",
    "must read",
    "you wont believe",
    "you won't believe",
    "doctors hate this",
    "scientists baffled",
    "government hiding",
    "secret revealed",
    "miracle cure",
    "instant results",
    "guaranteed",
    "absolutely free",
    "limited time",
    "act now",
    "urgent",
    "exposed",
];

/// Sensational phrases present in `content`, in table order.
pub fn sensational_phrases(content: &str) -> Vec<String> {
    let lower = content.to_lowercase();
    SENSATIONAL_PHRASES
        .iter()
        .filter(|p| lower.contains(*p))
        .map(|p| p.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_phrases_case_insensitively() {
        let hits = sensational_phrases("SHOCKING: miracle cure EXPOSED");
        assert_eq!(hits, vec!["shocking", "miracle cure", "exposed"]);
    }

    #[test]
    fn plain_reporting_has_no_hits() {
        assert!(sensational_phrases("The council approved the budget on Tuesday.").is_empty());
    }
}
