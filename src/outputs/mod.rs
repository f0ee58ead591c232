//! Output writers for archived speeches.
//!
//! One submodule per persistence format. Only JSON archives exist today:
//!
//! - [`json`]: per-speaker archive files with URL-based deduplication

pub mod json;
