//! Page scrapers for the sources whose feeds the registry knows about.
//!
//! Each scraper is keyed to one site's page template and exports an async
//! `fetch_speech(url)` plus a pure parse function over the raw markup, so
//! the template queries stay testable without network access. Field misses
//! degrade to absent values; only transport failures are fatal per entry.

pub mod federal_reserve;
