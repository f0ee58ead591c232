//! Feed registry and feed reader for Federal Reserve RSS sources.
//!
//! The registry is a static list of named feeds; resolution turns a feed
//! name into a fully-qualified URL with its optional query parameters
//! encoded. The reader performs the single network fetch for a feed and
//! returns the entry links in feed order. Deduplication happens downstream
//! in the archive writer, never here.

use crate::error::ArchiverError;
use feed_rs::parser;
use tracing::{debug, info, instrument};

/// One named RSS source.
///
/// The Federal Reserve feed endpoints accept optional `Site`, `ContentType`
/// and `Max` query parameters; only parameters that are set are included in
/// the resolved URL.
#[derive(Debug, Clone)]
pub struct Feed {
    pub name: String,
    pub base_url: String,
    pub description: String,
    pub site: Option<String>,
    pub content_type: Option<String>,
    pub max: Option<u32>,
}

impl Feed {
    pub fn new(name: &str, base_url: &str, description: &str) -> Self {
        Feed {
            name: name.to_string(),
            base_url: base_url.to_string(),
            description: description.to_string(),
            site: None,
            content_type: None,
            max: None,
        }
    }

    /// The fully-qualified feed URL with set parameters encoded.
    pub fn url(&self) -> String {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(site) = &self.site {
            params.push(("Site", site.clone()));
        }
        if let Some(content_type) = &self.content_type {
            params.push(("ContentType", content_type.clone()));
        }
        if let Some(max) = self.max {
            params.push(("Max", max.to_string()));
        }

        if params.is_empty() {
            return self.base_url.clone();
        }

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.base_url, query)
    }
}

/// The static set of known feeds, looked up by name.
#[derive(Debug)]
pub struct FeedRegistry {
    feeds: Vec<Feed>,
}

impl FeedRegistry {
    /// Registry of Federal Reserve Board feeds.
    pub fn federal_reserve() -> Self {
        FeedRegistry {
            feeds: vec![
                Feed::new(
                    "All Speeches and Testimony",
                    "https://www.federalreserve.gov/feeds/speeches_and_testimony.xml",
                    "All speeches and testimony by members of the Federal Reserve Board.",
                ),
                Feed::new(
                    "Press Releases",
                    "https://www.federalreserve.gov/feeds/press_all.xml",
                    "All press releases from the Federal Reserve Board.",
                ),
            ],
        }
    }

    /// Resolve a feed name to its URL.
    ///
    /// # Arguments
    ///
    /// * `name` - The feed's registered name, e.g. "All Speeches and Testimony"
    ///
    /// # Returns
    ///
    /// The fully-qualified feed URL, or [`ArchiverError::FeedNotFound`]
    /// when no feed with that name is registered.
    pub fn resolve(&self, name: &str) -> Result<String, ArchiverError> {
        let feed = self
            .feeds
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| ArchiverError::FeedNotFound(name.to_string()))?;
        debug!(name = %feed.name, description = %feed.description, "Resolved feed source");
        Ok(feed.url())
    }
}

/// Fetch a feed and return its entry links in feed order.
///
/// No deduplication or filtering happens here; a duplicate or unfetchable
/// link is the downstream stages' problem, where it fails or is skipped
/// per entry.
///
/// # Arguments
///
/// * `feed_url` - Resolved URL of the syndication feed to fetch
///
/// # Returns
///
/// Entry links in feed order, or [`ArchiverError::Fetch`] on transport
/// failure and [`ArchiverError::FeedParse`] on a malformed document.
#[instrument(level = "info", skip_all, fields(%feed_url))]
pub async fn read_entry_links(feed_url: &str) -> Result<Vec<String>, ArchiverError> {
    let body = reqwest::get(feed_url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ArchiverError::Fetch {
            url: feed_url.to_string(),
            source: e,
        })?
        .bytes()
        .await
        .map_err(|e| ArchiverError::Fetch {
            url: feed_url.to_string(),
            source: e,
        })?;

    let feed = parser::parse(body.as_ref()).map_err(|e| ArchiverError::FeedParse {
        url: feed_url.to_string(),
        source: e,
    })?;

    let links: Vec<String> = feed
        .entries
        .iter()
        .filter_map(|entry| entry.links.first().map(|l| l.href.clone()))
        .collect();

    info!(count = links.len(), "Read feed entry links");
    debug!(?links, "Feed entry links");
    Ok(links)
}
