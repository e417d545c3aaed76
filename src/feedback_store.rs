use anyhow::{Context, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::data_models::{Feedback, FeedbackEntry, Metrics, SearchResult};

/// JSON-file log of user feedback on search results.
///
/// Every public operation swallows I/O and serialization errors: they are
/// logged and turned into `false`, an empty history or zero metrics.
#[derive(Debug)]
pub struct FeedbackStore {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FeedbackStore {
    /// Open the log at `path`, creating it as an empty array if it doesn't exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let store = Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        };
        store.initialize();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the backing file exists. Safe to call repeatedly.
    pub fn initialize(&self) -> bool {
        match self.ensure_exists() {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error initializing feedback log {}: {:#}", self.path.display(), e);
                false
            }
        }
    }

    pub fn add_feedback(
        &self,
        query: &str,
        result: &SearchResult,
        feedback: Feedback,
        ai_score: Option<f64>,
    ) -> bool {
        // JSON has no NaN or infinity; serde_json would write them as null and
        // the log would no longer parse
        if !result.score.is_finite() || ai_score.is_some_and(|s| !s.is_finite()) {
            log::error!(
                "Error saving feedback: non-finite score (result {}, ai {:?}) for {}",
                result.score,
                ai_score,
                result.url
            );
            return false;
        }

        let entry = FeedbackEntry::new(query.to_string(), result.clone(), feedback, ai_score);

        let Ok(_guard) = self.write_lock.lock() else {
            log::error!("Error saving feedback: feedback log lock poisoned");
            return false;
        };

        match self.append(entry) {
            Ok(total) => {
                log::info!("Saved '{}' feedback for query '{}' ({} entries)", feedback, query, total);
                true
            }
            Err(e) => {
                log::error!("Error saving feedback: {:#}", e);
                false
            }
        }
    }

    pub fn get_feedback_history(&self) -> Vec<FeedbackEntry> {
        match self.load() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Error reading feedback log: {:#}", e);
                Vec::new()
            }
        }
    }

    pub fn get_metrics(&self) -> Metrics {
        Metrics::from_entries(&self.get_feedback_history())
    }

    fn ensure_exists(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        self.persist(&[])
    }

    fn append(&self, entry: FeedbackEntry) -> Result<usize> {
        let mut entries = match self.load() {
            Ok(entries) => entries,
            Err(e) if is_not_found(&e) => Vec::new(),
            Err(e) => return Err(e),
        };
        entries.push(entry);
        self.persist(&entries)?;
        Ok(entries.len())
    }

    fn load(&self) -> Result<Vec<FeedbackEntry>> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    /// Write the whole log to a sibling temp file, then rename it into place so
    /// readers never observe a half-written log.
    fn persist(&self, entries: &[FeedbackEntry]) -> Result<()> {
        let json = serde_json::to_string_pretty(entries).context("Failed to serialize feedback log")?;
        let tmp_path = self.tmp_path();

        let write_tmp = || -> Result<()> {
            let mut file = fs::File::create(&tmp_path)
                .with_context(|| format!("Failed to create {}", tmp_path.display()))?;
            file.write_all(json.as_bytes())
                .context("Failed to write feedback log")?;
            file.sync_all().context("Failed to flush feedback log")?;
            Ok(())
        };

        if let Err(e) = write_tmp() {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e).with_context(|| format!("Failed to replace {}", self.path.display()));
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "feedback_log.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == ErrorKind::NotFound)
}
