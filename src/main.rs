//! # Fed Speech Archiver
//!
//! Archives speeches and testimony by Federal Reserve Board members. The
//! pipeline reads the Board's RSS feed, scrapes each linked speech page for
//! structured fields, asks an OpenAI-compatible endpoint for a summary, and
//! appends the result to a per-speaker JSON archive, deduplicated by URL.
//!
//! ## Usage
//!
//! ```sh
//! XAI_API_KEY=... fed_speech_archiver -o ./fed_speeches_json
//! ```
//!
//! ## Architecture
//!
//! A strictly sequential pipeline; each feed entry is fully processed
//! before the next begins:
//! 1. **Resolve**: look up the feed URL in the registry
//! 2. **Read**: fetch and parse the feed into entry links
//! 3. **Extract**: scrape each speech page into a [`models::SpeechRecord`]
//! 4. **Summarize**: request an AI summary (failures degrade to no summary)
//! 5. **Archive**: append to the speaker's JSON file, skipping known URLs
//!
//! ## Failure policy
//!
//! Feed resolution, fetch, or parse failures abort the run. Everything
//! after that is per-entry: a failed entry is logged and the loop moves on
//! to the next link, so one broken page never loses the rest of the feed.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod error;
mod feeds;
mod models;
mod outputs;
mod scrapers;
mod utils;

use api::SummarizerClient;
use cli::Cli;
use error::ArchiverError;
use feeds::FeedRegistry;
use outputs::json::AppendOutcome;
use utils::{ensure_writable_dir, truncate_for_log};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("fed_speech_archiver starting up");

    let args = Cli::parse();
    debug!(?args.output_dir, ?args.feed, ?args.model, "Parsed CLI arguments");

    // Early check: surface permission problems before any network work.
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Resolve and read the feed ----
    let registry = FeedRegistry::federal_reserve();
    let feed_url = registry.resolve(&args.feed)?;
    info!(feed = %args.feed, url = %feed_url, "Resolved feed");

    let links = feeds::read_entry_links(&feed_url).await?;
    info!(count = links.len(), "Feed entries to process");

    let summarizer = SummarizerClient::new(&args.api_base_url, args.xai_api_key.clone(), &args.model);

    // ---- Process entries sequentially ----
    let mut appended = 0usize;
    let mut duplicates = 0usize;
    let mut failed = 0usize;

    for (i, link) in links.iter().enumerate() {
        match process_entry(&summarizer, link, &args.output_dir).await {
            Ok(AppendOutcome::Appended) => {
                info!(index = i, %link, "Archived new speech");
                appended += 1;
            }
            Ok(AppendOutcome::SkippedDuplicate) => {
                debug!(index = i, %link, "Speech already archived");
                duplicates += 1;
            }
            Err(ArchiverError::MissingSpeaker { ref url }) => {
                warn!(index = i, %url, "No speaker on page; skipping entry");
                failed += 1;
            }
            Err(e) => {
                error!(index = i, %link, error = %e, "Entry failed; continuing with next");
                failed += 1;
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        total = links.len(),
        appended,
        duplicates,
        failed,
        secs = elapsed.as_secs(),
        "Run complete"
    );

    Ok(())
}

/// Process one feed entry end to end: extract, summarize, archive.
///
/// Summarization failures are absorbed inside the client; any error
/// returned here aborts only this entry.
#[instrument(level = "info", skip_all, fields(%link))]
async fn process_entry(
    summarizer: &SummarizerClient,
    link: &str,
    output_dir: &str,
) -> Result<AppendOutcome, ArchiverError> {
    let mut record = scrapers::federal_reserve::fetch_speech(link).await?;
    debug!(content_preview = %truncate_for_log(&record.content, 200), "Extracted speech");

    // Archive keying needs a speaker; bail before spending an API call.
    let speaker = record
        .speaker
        .clone()
        .ok_or_else(|| ArchiverError::MissingSpeaker {
            url: record.url.clone(),
        })?;

    record.summary = summarizer.summarize(&speaker, &record.content).await;
    if record.summary.is_none() {
        warn!(%link, "Archiving without summary");
    }

    outputs::json::append_speech(&record, output_dir).await
}
