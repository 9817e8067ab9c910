use crate::db::api::{HistoryQuery, HistoryStore, OpLog};
use crate::db::index::HistoryIndex;
use crate::models::HistoryEntry;
use anyhow::Context;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Append-only verdict log. Each line is `<entry json>\t<sha256 hex of json>`.
pub struct HistoryEngine {
    path: PathBuf,
    index: Mutex<HistoryIndex>,
    log: Mutex<BufWriter<File>>,
}

impl HistoryEngine {
    /// Opens (or creates) the log and replays it into memory.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening history log {}", path.display()))?;

        // A torn final write leaves no newline; start the next record on a fresh line.
        if ends_mid_line(&mut file)? {
            file.write_all(b"\n")?;
        }

        let mut index = HistoryIndex::default();
        for entry in read_log(&path)? {
            index.insert(entry);
        }
        debug!(path = %path.display(), entries = index.len(), "history log replayed");

        Ok(Self {
            path,
            index: Mutex::new(index),
            log: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_log(&self, entry: &HistoryEntry) -> anyhow::Result<()> {
        let line = encode_line(entry)?;
        let mut guard = self
            .log
            .lock()
            .map_err(|_| anyhow::anyhow!("history log lock poisoned"))?;
        guard.write_all(line.as_bytes())?;
        guard.flush()?;
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for HistoryEngine {
    async fn append(&self, entry: HistoryEntry) -> anyhow::Result<OpLog> {
        let op = OpLog::for_entry(&entry);
        self.write_log(&entry)?;

        let mut index = self
            .index
            .lock()
            .map_err(|_| anyhow::anyhow!("history index lock poisoned"))?;
        index.insert(entry);
        Ok(op)
    }

    async fn select(&self, query: HistoryQuery) -> anyhow::Result<Vec<HistoryEntry>> {
        let index = self
            .index
            .lock()
            .map_err(|_| anyhow::anyhow!("history index lock poisoned"))?;
        Ok(index.select(&query))
    }
}

/// Reads every intact entry from a history log, in file order.
///
/// Lines that fail the checksum or do not decode are skipped.
pub fn read_log(path: impl AsRef<Path>) -> anyhow::Result<Vec<HistoryEntry>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("reading {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut entries = Vec::new();
    let mut skipped = 0usize;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match decode_line(&line) {
            Some(entry) => entries.push(entry),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(path = %path.display(), skipped, "skipped corrupt history lines");
    }
    Ok(entries)
}

fn encode_line(entry: &HistoryEntry) -> anyhow::Result<String> {
    let json = serde_json::to_string(entry)?;
    let checksum = sha256_hex(&json);
    Ok(format!("{json}\t{checksum}\n"))
}

fn decode_line(line: &str) -> Option<HistoryEntry> {
    let (json, checksum) = line.trim_end().rsplit_once('\t')?;
    if sha256_hex(json) != checksum {
        return None;
    }
    serde_json::from_str(json).ok()
}

fn ends_mid_line(file: &mut File) -> anyhow::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisDetails, Verdict, VerdictBasis};

    fn entry(content: &str) -> HistoryEntry {
        let verdict = Verdict {
            is_fake: false,
            confidence_score: 0.7,
            credibility_score: 0.9,
            matched_sources: Vec::new(),
            reasoning: "ok".to_string(),
            bias_score: 0.2,
            fact_check_summaries: Vec::new(),
            basis: VerdictBasis::ApiSignals,
            analysis: AnalysisDetails::default(),
        };
        HistoryEntry::new(content, None, verdict)
    }

    #[test]
    fn line_carries_checksum_of_json() {
        let line = encode_line(&entry("tab\there")).unwrap();
        let (json, checksum) = line.trim_end().rsplit_once('\t').unwrap();
        assert!(!json.contains('\t'));
        assert_eq!(checksum, sha256_hex(json));
        assert_eq!(decode_line(&line).unwrap().content, "tab\there");
    }

    #[test]
    fn tampered_line_is_rejected() {
        let line = encode_line(&entry("original")).unwrap();
        let tampered = line.replace("original", "modified");
        assert!(decode_line(&tampered).is_none());
        assert!(decode_line("no checksum at all").is_none());
    }
}
