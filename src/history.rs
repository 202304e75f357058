use crate::pipeline::Verdict;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// One append-only audit record per classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub url: String,
    pub label: String,
    pub probability: f64,
    pub requester: String,
    pub timestamp: DateTime<Utc>,
}

impl ClassificationRecord {
    pub fn new(url: &str, verdict: &Verdict, requester: &str) -> ClassificationRecord {
        ClassificationRecord {
            url: url.to_string(),
            label: verdict.label.to_string(),
            probability: verdict.probability,
            requester: requester.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// JSONL writer; one line per record, creating the file on first use.
pub struct HistoryWriter {
    path: PathBuf,
}

impl HistoryWriter {
    pub fn new(path: &str) -> HistoryWriter {
        HistoryWriter {
            path: PathBuf::from(path),
        }
    }

    pub fn append(&self, record: &ClassificationRecord) -> anyhow::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(record)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}
