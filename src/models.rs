//! Data models for extracted speeches and per-speaker archives.
//!
//! Three shapes flow through the pipeline:
//! - [`SpeechRecord`]: one speech as extracted from its page, enriched with
//!   a summary before archiving
//! - [`ArchivedSpeech`]: the persisted per-speech shape (the speaker is not
//!   repeated on every entry; it lives at the archive root)
//! - [`SpeakerArchive`]: everything archived for one speaker, in append order
//!
//! Absent optional fields serialize as JSON `null` so existing archive files
//! keep a uniform set of keys per speech.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A speech or testimony as extracted from a Federal Reserve page.
///
/// `summary` is populated by the summarizer client after extraction; every
/// other field comes straight from the page. A field the page template no
/// longer exposes degrades to `None` (or an empty string for `title` and
/// `content`) rather than failing extraction.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeechRecord {
    /// Speech title from the article heading.
    pub title: String,
    /// Speaker name, e.g. "Governor Christopher J. Waller".
    pub speaker: Option<String>,
    /// Delivery date at midnight, parsed from the page's long-form date.
    pub date: Option<NaiveDateTime>,
    /// Venue line, e.g. a conference name and city.
    pub location: Option<String>,
    /// Canonical page URL; the archive's deduplication key.
    pub url: String,
    /// Full body text, paragraphs joined with newlines.
    pub content: String,
    /// AI-generated summary; `None` when summarization failed or was skipped.
    pub summary: Option<String>,
}

/// One speech as persisted inside a [`SpeakerArchive`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArchivedSpeech {
    pub title: String,
    pub date: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub url: String,
    pub summary: Option<String>,
    pub content: String,
}

impl From<&SpeechRecord> for ArchivedSpeech {
    fn from(record: &SpeechRecord) -> Self {
        ArchivedSpeech {
            title: record.title.clone(),
            date: record.date,
            location: record.location.clone(),
            url: record.url.clone(),
            summary: record.summary.clone(),
            content: record.content.clone(),
        }
    }
}

/// The full archive for one speaker, backed by `{base_dir}/{slug}.json`.
///
/// Invariant: no two speeches share a `url`. The writer enforces this on
/// every append; `speeches` keeps insertion order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpeakerArchive {
    /// Display name of the speaker as it appeared on the page.
    pub speaker: String,
    /// Archived speeches, oldest append first.
    pub speeches: Vec<ArchivedSpeech>,
}

impl SpeakerArchive {
    /// An empty archive for a speaker seen for the first time.
    pub fn new(speaker: &str) -> Self {
        SpeakerArchive {
            speaker: speaker.to_string(),
            speeches: Vec::new(),
        }
    }

    /// Whether a speech with this URL is already archived.
    pub fn contains_url(&self, url: &str) -> bool {
        self.speeches.iter().any(|s| s.url == url)
    }
}
