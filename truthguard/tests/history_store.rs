use std::fs::OpenOptions;
use std::io::Write;
use truthguard::db::{HistoryEngine, HistoryQuery, HistoryStore};
use truthguard::history::compile;
use truthguard::models::{AnalysisDetails, HistoryEntry, Verdict, VerdictBasis};

fn verdict(is_fake: bool) -> Verdict {
    Verdict {
        is_fake,
        confidence_score: 0.8,
        credibility_score: if is_fake { 0.1 } else { 0.9 },
        matched_sources: Vec::new(),
        reasoning: "test".to_string(),
        bias_score: 0.3,
        fact_check_summaries: Vec::new(),
        basis: VerdictBasis::ApiSignals,
        analysis: AnalysisDetails::default(),
    }
}

#[tokio::test]
async fn entries_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("history.log");

    {
        let engine = HistoryEngine::open(&path).unwrap();
        engine
            .append(HistoryEntry::new("first", None, verdict(true)))
            .await
            .unwrap();
        engine
            .append(HistoryEntry::new("second", Some("https://x.example"), verdict(false)))
            .await
            .unwrap();
    }

    let engine = HistoryEngine::open(&path).unwrap();
    let all = engine.select(HistoryQuery::default()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].content, "second");
    assert_eq!(all[0].source_url.as_deref(), Some("https://x.example"));

    let fakes = engine
        .select(HistoryQuery {
            only_fake: Some(true),
            limit: None,
        })
        .await
        .unwrap();
    assert_eq!(fakes.len(), 1);
    assert_eq!(fakes[0].content, "first");
}

#[tokio::test]
async fn torn_tail_is_skipped_and_log_stays_appendable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.log");

    {
        let engine = HistoryEngine::open(&path).unwrap();
        engine
            .append(HistoryEntry::new("kept", None, verdict(false)))
            .await
            .unwrap();
    }
    {
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"{\"id\":\"truncated").unwrap();
    }

    let engine = HistoryEngine::open(&path).unwrap();
    engine
        .append(HistoryEntry::new("after", None, verdict(true)))
        .await
        .unwrap();
    drop(engine);

    let engine = HistoryEngine::open(&path).unwrap();
    let contents: Vec<String> = engine
        .select(HistoryQuery::default())
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.content)
        .collect();
    assert_eq!(contents, ["after", "kept"]);
}

#[tokio::test]
async fn compile_writes_dashboard_files() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("history.log");
    let out = dir.path().join("out");

    let engine = HistoryEngine::open(&log).unwrap();
    for (content, fake) in [("a", true), ("b", false), ("c", true)] {
        engine
            .append(HistoryEntry::new(content, None, verdict(fake)))
            .await
            .unwrap();
    }
    drop(engine);

    let stats = compile(&log, &out).unwrap();
    assert_eq!(stats.total_checks, 3);
    assert_eq!(stats.fake_count, 2);

    let timeline: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("timeline.json")).unwrap()).unwrap();
    assert_eq!(timeline.as_array().map(Vec::len), Some(3));
    assert!(out.join("stats.json").exists());
}
