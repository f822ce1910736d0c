//! Wrong-question review files.
//!
//! Each session writes one timestamped JSON array next to the configured
//! base path, e.g. `review_note/wrong_questions_20250101_093000.json`.
//! The files are valid question banks and can be replayed with
//! `quizrun run --review-file` or `--review-latest`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use quizrun_core::model::WrongQuestion;
use quizrun_core::traits::{ReviewReceipt, ReviewSink};

/// Timestamp format appended to review file names.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Writes wrong questions as pretty-printed JSON files.
#[derive(Debug, Clone)]
pub struct JsonReviewSink {
    base_path: PathBuf,
    clock: fn() -> DateTime<Local>,
}

impl JsonReviewSink {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            clock: Local::now,
        }
    }

    /// Override the clock used for file names (for tests).
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    /// The path a save at `now` would write to.
    pub fn output_path(&self, now: DateTime<Local>) -> PathBuf {
        timestamped_path(&self.base_path, &now.format(TIMESTAMP_FORMAT).to_string())
    }
}

impl ReviewSink for JsonReviewSink {
    fn save(&mut self, wrong: &[WrongQuestion]) -> Result<ReviewReceipt> {
        let path = self.output_path((self.clock)());
        write_review_file(wrong, &path)?;
        tracing::info!(count = wrong.len(), path = %path.display(), "wrote review file");
        Ok(ReviewReceipt {
            count: wrong.len(),
            location: path.display().to_string(),
        })
    }
}

/// Insert `_<timestamp>` before the extension, or append `_<timestamp>.json`
/// when the base path has none.
pub fn timestamped_path(base: &Path, timestamp: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match base.extension() {
        Some(ext) => format!("{stem}_{timestamp}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{timestamp}.json"),
    };
    base.with_file_name(name)
}

/// Write wrong questions to `path`, creating parent directories.
pub fn write_review_file(wrong: &[WrongQuestion], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(wrong).context("failed to serialize wrong questions")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write review file {}", path.display()))?;
    Ok(())
}

/// Most recently modified `<prefix>*.json` file in `dir`, if any.
pub fn find_latest_review_file(dir: &Path, prefix: &str) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut latest: Option<(std::time::SystemTime, PathBuf)> = None;
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.to_lowercase().ends_with(".json") || !name.starts_with(prefix) || !path.is_file() {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        if latest.as_ref().map_or(true, |(t, _)| modified > *t) {
            latest = Some((modified, path));
        }
    }

    Ok(latest.map(|(_, path)| path))
}
