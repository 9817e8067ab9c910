use crate::db::read_log;
use crate::models::{HistoryEntry, VerdictBasis};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

const TOP_SOURCES: usize = 5;
const PREVIEW_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStats {
    pub last_updated: String,
    pub total_checks: usize,
    pub fake_count: usize,
    pub genuine_count: usize,
    pub inconclusive_count: usize,
    pub mean_confidence: f32,
    pub mean_credibility: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_check_at: Option<DateTime<Utc>>,
    pub top_sources: Vec<SourceCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineItem {
    pub entry_id: String,
    pub timestamp: String,
    pub preview: String,
    pub is_fake: bool,
    pub confidence: f32,
    pub basis: VerdictBasis,
}

impl HistoryStats {
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        let total_checks = entries.len();
        let fake_count = entries.iter().filter(|e| e.verdict.is_fake).count();
        let inconclusive_count = entries
            .iter()
            .filter(|e| e.verdict.is_inconclusive())
            .count();

        let mean = |f: fn(&HistoryEntry) -> f32| {
            if entries.is_empty() {
                0.0
            } else {
                entries.iter().map(f).sum::<f32>() / entries.len() as f32
            }
        };

        let mut by_name: HashMap<&str, usize> = HashMap::new();
        for source in entries.iter().flat_map(|e| &e.verdict.matched_sources) {
            *by_name.entry(source.name.as_str()).or_default() += 1;
        }
        let mut top_sources: Vec<SourceCount> = by_name
            .into_iter()
            .map(|(name, count)| SourceCount {
                name: name.to_string(),
                count,
            })
            .collect();
        top_sources.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        top_sources.truncate(TOP_SOURCES);

        Self {
            last_updated: Utc::now().to_rfc3339(),
            total_checks,
            fake_count,
            genuine_count: total_checks - fake_count,
            inconclusive_count,
            mean_confidence: mean(|e| e.verdict.confidence_score),
            mean_credibility: mean(|e| e.verdict.credibility_score),
            last_check_at: entries.iter().map(|e| e.created_at).max(),
            top_sources,
        }
    }
}

impl TimelineItem {
    fn from_entry(entry: &HistoryEntry) -> Self {
        Self {
            entry_id: entry.id.to_string(),
            timestamp: entry.created_at.to_rfc3339(),
            preview: preview(&entry.content),
            is_fake: entry.verdict.is_fake,
            confidence: entry.verdict.confidence_score,
            basis: entry.verdict.basis,
        }
    }
}

/// Compiles a history log into `stats.json` and `timeline.json` under `out_dir`.
pub fn compile(
    log_path: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
) -> anyhow::Result<HistoryStats> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;

    let mut entries = read_log(log_path)?;
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let stats = HistoryStats::from_entries(&entries);
    let timeline: Vec<TimelineItem> = entries.iter().map(TimelineItem::from_entry).collect();

    write_json(out_dir.join("stats.json"), &stats)?;
    write_json(out_dir.join("timeline.json"), &timeline)?;
    Ok(stats)
}

fn preview(content: &str) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= PREVIEW_CHARS {
        return collapsed;
    }
    let mut out: String = collapsed.chars().take(PREVIEW_CHARS).collect();
    out.push_str("...");
    out
}

fn write_json(path: PathBuf, value: &impl Serialize) -> anyhow::Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}
