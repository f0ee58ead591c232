//! Federal Reserve speech page extractor.
//!
//! Speech and testimony pages at federalreserve.gov share one template, so
//! extraction is keyed to that template's structure: the heading, a
//! `p.speaker` byline, a `p.article__time` date line, a `p.location` venue
//! line, and body paragraphs inside the main content column. When the
//! template drifts, individual fields degrade to absent rather than failing
//! the extraction; only a transport failure is fatal for an entry.

use crate::error::ArchiverError;
use crate::models::SpeechRecord;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use reqwest::get;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").unwrap());
static SPEAKER: Lazy<Selector> = Lazy::new(|| Selector::parse("p.speaker").unwrap());
static DATE: Lazy<Selector> = Lazy::new(|| Selector::parse("p.article__time").unwrap());
static LOCATION: Lazy<Selector> = Lazy::new(|| Selector::parse("p.location").unwrap());
static CONTENT_DIV: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.col-xs-12.col-sm-8.col-md-8").unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Fetch a single speech page and extract its fields.
///
/// The returned record has no summary; the summarizer client fills that in.
///
/// # Arguments
///
/// * `url` - Absolute URL of the speech page
///
/// # Returns
///
/// The extracted [`SpeechRecord`], or [`ArchiverError::Fetch`] when the
/// page could not be retrieved (including non-success status codes).
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_speech(url: &str) -> Result<SpeechRecord, ArchiverError> {
    let body = get(url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ArchiverError::Fetch {
            url: url.to_string(),
            source: e,
        })?
        .text()
        .await
        .map_err(|e| ArchiverError::Fetch {
            url: url.to_string(),
            source: e,
        })?;

    let record = parse_speech_page(url, &body);
    info!(
        title = %record.title,
        speaker = record.speaker.as_deref().unwrap_or("<none>"),
        bytes = record.content.len(),
        "Parsed speech page"
    );
    Ok(record)
}

/// Extract speech fields from a page's markup.
///
/// Pure with respect to I/O, so the template queries are testable against
/// fixture HTML.
///
/// # Arguments
///
/// * `url` - The page URL, carried into the record as its dedup key
/// * `html` - The raw page markup
///
/// # Returns
///
/// A [`SpeechRecord`] with summary unset; fields the template no longer
/// exposes come back absent (or empty for `title` and `content`).
pub fn parse_speech_page(url: &str, html: &str) -> SpeechRecord {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default();

    let speaker = document.select(&SPEAKER).next().map(|el| element_text(&el));
    let location = document.select(&LOCATION).next().map(|el| element_text(&el));

    let date = document
        .select(&DATE)
        .next()
        .map(|el| element_text(&el))
        .and_then(|raw| parse_long_date(&raw));

    let content = match document.select(&CONTENT_DIV).next() {
        Some(container) => container
            .select(&PARAGRAPH)
            .map(|p| element_text(&p))
            .collect::<Vec<_>>()
            .join("\n"),
        None => {
            debug!(%url, "Content container not found on page");
            String::new()
        }
    };

    SpeechRecord {
        title,
        speaker,
        date,
        location,
        url: url.to_string(),
        content,
        summary: None,
    }
}

/// Parse a long-form date like "January 5, 2024" into a midnight timestamp.
///
/// Unparseable or missing text yields `None`; a bad date line is a template
/// mismatch, not a fatal error.
fn parse_long_date(raw: &str) -> Option<chrono::NaiveDateTime> {
    NaiveDate::parse_from_str(raw.trim(), "%B %d, %Y")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn element_text(element: &scraper::ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
