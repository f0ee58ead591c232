//! Error taxonomy for the archiving pipeline.
//!
//! The variants split along the pipeline's fault lines: feed resolution and
//! feed parsing abort the whole run, transport and storage failures abort a
//! single entry, and a missing speaker makes a record unarchivable because
//! the archive file is keyed by speaker.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiverError {
    /// No feed with the requested name exists in the registry.
    #[error("no feed named \"{0}\" is registered")]
    FeedNotFound(String),

    /// Network or transport failure fetching the feed or a speech page.
    #[error("fetch failed for {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The feed document came back but could not be parsed as RSS/Atom.
    #[error("feed at {url} is not a parseable syndication document")]
    FeedParse {
        url: String,
        #[source]
        source: feed_rs::parser::ParseFeedError,
    },

    /// The extracted record carries no speaker, so no archive key can be
    /// derived for it.
    #[error("record for {url} has no speaker to key an archive by")]
    MissingSpeaker { url: String },

    /// Filesystem failure reading or writing an archive file.
    #[error("archive I/O failed at {path}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An existing archive file is present but not valid JSON.
    #[error("archive at {path} is not valid JSON")]
    ArchiveFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
