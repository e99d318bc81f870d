// Filesystem batch store - Durable raw + tabular file pairs
use crate::error::PipelineError;
use crate::infrastructure::csv_codec;
use crate::infrastructure::payload::RawBatch;
use chrono::Local;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Paths of one persisted batch. The stamp is shared with the map artifact
/// generated for the same ingestion.
#[derive(Debug, Clone)]
pub struct StoredBatch {
    pub raw_path: PathBuf,
    pub csv_path: PathBuf,
    pub stamp: String,
}

/// Writes incoming batches under a dedicated received-data directory as a
/// `data_<stamp>.json` / `data_<stamp>.csv` pair.
#[derive(Debug, Clone)]
pub struct FsBatchStore {
    received_dir: PathBuf,
}

impl FsBatchStore {
    pub fn new(received_dir: impl Into<PathBuf>) -> Self {
        Self {
            received_dir: received_dir.into(),
        }
    }

    /// Persist the raw payload verbatim and its tabular form side by side.
    /// Partially written files are not rolled back; the caller only learns
    /// that persisting failed.
    pub fn persist(&self, raw: &[u8], payload: &RawBatch) -> Result<StoredBatch, PipelineError> {
        fs::create_dir_all(&self.received_dir)?;
        let stamp = Local::now().format("%Y-%m-%d_%H_%M_%S").to_string();

        let raw_path = self.received_dir.join(format!("data_{stamp}.json"));
        fs::write(&raw_path, raw)?;

        let csv_path = self.received_dir.join(format!("data_{stamp}.csv"));
        csv_codec::encode_payload(payload, File::create(&csv_path)?)?;

        Ok(StoredBatch {
            raw_path,
            csv_path,
            stamp,
        })
    }
}

/// Derive a CSV path next to an external source file without clobbering an
/// existing file: `<stem>.csv`, then `<stem>_000.csv`, `<stem>_001.csv`, …
///
/// Each candidate is rebuilt from the original stem, so a previously
/// applied suffix is replaced rather than accumulated. The existence scan
/// is best-effort under concurrency.
pub fn unique_sibling_csv(source: &Path) -> PathBuf {
    let base = source.with_extension("csv");
    if !base.exists() {
        return base;
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = base.parent().unwrap_or(Path::new(""));
    let mut suffix = 0usize;
    loop {
        let candidate = parent.join(format!("{stem}_{suffix:03}.csv"));
        if !candidate.exists() {
            return candidate;
        }
        suffix += 1;
    }
}
