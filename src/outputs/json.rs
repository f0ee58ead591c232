//! Per-speaker JSON archive writer.
//!
//! One file per speaker under the output directory, named by the speaker's
//! slug. Every append loads the existing archive, checks the record's URL
//! against the speeches already present, and rewrites the whole file. The
//! rewrite is not incremental and there is no locking; a single sequential
//! writer is the supported model.
//!
//! # Output Structure
//!
//! ```text
//! fed_speeches_json/
//! ├── governor_lisa_d._cook.json
//! ├── chair_jerome_h._powell.json
//! └── vice_chair_philip_n._jefferson.json
//! ```

use crate::error::ArchiverError;
use crate::models::{ArchivedSpeech, SpeakerArchive, SpeechRecord};
use crate::utils::speaker_slug;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};

/// What an append did with the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The record was new and is now persisted.
    Appended,
    /// A speech with the same URL was already archived; nothing changed.
    SkippedDuplicate,
}

/// Append a record to its speaker's archive, deduplicating by URL.
///
/// The archive file is created on the speaker's first speech and fully
/// rewritten on every subsequent append.
///
/// # Arguments
///
/// * `record` - The extracted (and possibly summarized) speech to archive
/// * `base_dir` - Base directory holding the per-speaker archive files
///
/// # Returns
///
/// [`AppendOutcome::Appended`] when the record was persisted, or
/// [`AppendOutcome::SkippedDuplicate`] when a speech with the same URL was
/// already archived and nothing changed.
///
/// # Errors
///
/// [`ArchiverError::MissingSpeaker`] when the record has no speaker to key
/// the archive by, [`ArchiverError::Storage`] on filesystem failure, and
/// [`ArchiverError::ArchiveFormat`] when an existing file is corrupt.
#[instrument(level = "info", skip_all, fields(url = %record.url))]
pub async fn append_speech(
    record: &SpeechRecord,
    base_dir: &str,
) -> Result<AppendOutcome, ArchiverError> {
    let speaker = record
        .speaker
        .as_deref()
        .ok_or_else(|| ArchiverError::MissingSpeaker {
            url: record.url.clone(),
        })?;

    fs::create_dir_all(base_dir)
        .await
        .map_err(|e| storage_err(base_dir, e))?;

    let path = Path::new(base_dir).join(format!("{}.json", speaker_slug(speaker)));
    let mut archive = load_archive(&path, speaker).await?;

    if archive.contains_url(&record.url) {
        warn!(path = %path.display(), "Speech already archived; skipping");
        return Ok(AppendOutcome::SkippedDuplicate);
    }

    archive.speeches.push(ArchivedSpeech::from(record));

    let json = serde_json::to_string_pretty(&archive).map_err(|e| ArchiverError::ArchiveFormat {
        path: path.clone(),
        source: e,
    })?;
    fs::write(&path, json)
        .await
        .map_err(|e| storage_err(&path, e))?;

    info!(
        path = %path.display(),
        total = archive.speeches.len(),
        "Appended new speech to archive"
    );
    Ok(AppendOutcome::Appended)
}

/// Load a speaker's archive file, or start an empty one if none exists.
async fn load_archive(path: &Path, speaker: &str) -> Result<SpeakerArchive, ArchiverError> {
    match fs::read_to_string(path).await {
        Ok(contents) => {
            serde_json::from_str(&contents).map_err(|e| ArchiverError::ArchiveFormat {
                path: path.to_path_buf(),
                source: e,
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SpeakerArchive::new(speaker)),
        Err(e) => Err(storage_err(path, e)),
    }
}

fn storage_err(path: impl Into<PathBuf>, source: std::io::Error) -> ArchiverError {
    ArchiverError::Storage {
        path: path.into(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn record(url: &str) -> SpeechRecord {
        SpeechRecord {
            title: "The Economic Outlook".to_string(),
            speaker: Some("Governor Lisa D. Cook".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_hms_opt(0, 0, 0),
            location: Some("Washington, D.C.".to_string()),
            url: url.to_string(),
            content: "Thank you.".to_string(),
            summary: Some("A brief summary.".to_string()),
        }
    }

    #[tokio::test]
    async fn test_append_creates_archive_file() {
        let dir = tempdir().unwrap();
        let base = dir.path().to_str().unwrap();

        let outcome = append_speech(&record("https://example.gov/a.htm"), base)
            .await
            .unwrap();
        assert_eq!(outcome, AppendOutcome::Appended);

        let path = dir.path().join("governor_lisa_d._cook.json");
        let archive: SpeakerArchive =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(archive.speaker, "Governor Lisa D. Cook");
        assert_eq!(archive.speeches.len(), 1);
        assert_eq!(archive.speeches[0].url, "https://example.gov/a.htm");
    }

    #[tokio::test]
    async fn test_duplicate_url_is_skipped_and_count_unchanged() {
        let dir = tempdir().unwrap();
        let base = dir.path().to_str().unwrap();
        let rec = record("https://example.gov/a.htm");

        assert_eq!(
            append_speech(&rec, base).await.unwrap(),
            AppendOutcome::Appended
        );
        assert_eq!(
            append_speech(&rec, base).await.unwrap(),
            AppendOutcome::SkippedDuplicate
        );

        let path = dir.path().join("governor_lisa_d._cook.json");
        let archive: SpeakerArchive =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(archive.speeches.len(), 1);
    }

    #[tokio::test]
    async fn test_appends_accumulate_in_order() {
        let dir = tempdir().unwrap();
        let base = dir.path().to_str().unwrap();

        append_speech(&record("https://example.gov/a.htm"), base)
            .await
            .unwrap();
        append_speech(&record("https://example.gov/b.htm"), base)
            .await
            .unwrap();

        let path = dir.path().join("governor_lisa_d._cook.json");
        let archive: SpeakerArchive =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(archive.speeches.len(), 2);
        assert_eq!(archive.speeches[0].url, "https://example.gov/a.htm");
        assert_eq!(archive.speeches[1].url, "https://example.gov/b.htm");
    }

    #[tokio::test]
    async fn test_record_without_summary_still_archived() {
        let dir = tempdir().unwrap();
        let base = dir.path().to_str().unwrap();
        let mut rec = record("https://example.gov/a.htm");
        rec.summary = None;

        assert_eq!(
            append_speech(&rec, base).await.unwrap(),
            AppendOutcome::Appended
        );

        let path = dir.path().join("governor_lisa_d._cook.json");
        let contents = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert!(value["speeches"][0]["summary"].is_null());
    }

    #[tokio::test]
    async fn test_missing_speaker_fails_append() {
        let dir = tempdir().unwrap();
        let base = dir.path().to_str().unwrap();
        let mut rec = record("https://example.gov/a.htm");
        rec.speaker = None;

        let err = append_speech(&rec, base).await.unwrap_err();
        assert!(matches!(err, ArchiverError::MissingSpeaker { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed_with_literal_unicode() {
        let dir = tempdir().unwrap();
        let base = dir.path().to_str().unwrap();
        let mut rec = record("https://example.gov/a.htm");
        rec.title = "Política monetaria — 金融政策".to_string();

        append_speech(&rec, base).await.unwrap();

        let path = dir.path().join("governor_lisa_d._cook.json");
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("  \"speaker\""));
        assert!(contents.contains("金融政策"));
        assert!(!contents.contains("\\u"));
    }

    #[tokio::test]
    async fn test_corrupt_archive_reports_format_error() {
        let dir = tempdir().unwrap();
        let base = dir.path().to_str().unwrap();
        let path = dir.path().join("governor_lisa_d._cook.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = append_speech(&record("https://example.gov/a.htm"), base)
            .await
            .unwrap_err();
        assert!(matches!(err, ArchiverError::ArchiveFormat { .. }));
    }
}
