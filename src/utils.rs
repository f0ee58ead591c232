//! Helpers for archive keying, logging, and file system checks.

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Derive a speaker's archive key: lowercase, spaces replaced by
/// underscores.
///
/// The slug only normalizes case and spacing; punctuation in names like
/// "Governor Lisa D. Cook" is kept so existing archive filenames stay
/// stable.
///
/// # Arguments
///
/// * `speaker` - The speaker's display name as extracted from the page
///
/// # Returns
///
/// A lowercase, underscore-separated archive key.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(speaker_slug("Governor Lisa D. Cook"), "governor_lisa_d._cook");
/// ```
pub fn speaker_slug(speaker: &str) -> String {
    speaker.to_lowercase().replace(' ', "_")
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes with an ellipsis and
/// byte count indicator appended. The cut is clamped to a character
/// boundary, so multi-byte text never panics the caller.
///
/// # Arguments
///
/// * `s` - The string to potentially truncate
/// * `max` - Maximum number of bytes to keep
///
/// # Returns
///
/// The original string if it fits in `max` bytes, otherwise a truncated
/// version with `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if missing, then probes it with a throwaway file.
/// Run before any network work so permission problems surface immediately.
///
/// # Arguments
///
/// * `path` - The directory path to validate
///
/// # Returns
///
/// `Ok(())` if the directory exists and is writable.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Small sync write; simpler error surface than the async API.
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_slug() {
        assert_eq!(speaker_slug("Governor Lisa D. Cook"), "governor_lisa_d._cook");
        assert_eq!(speaker_slug("Chair Jerome H. Powell"), "chair_jerome_h._powell");
        assert_eq!(speaker_slug("POWELL"), "powell");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_clamps_to_char_boundary() {
        // 'é' is two bytes and straddles the 200-byte limit.
        let s = format!("{}é{}", "a".repeat(199), "b".repeat(100));
        let result = truncate_for_log(&s, 200);
        assert!(result.starts_with(&"a".repeat(199)));
        // The cut backs off to byte 199, leaving 102 bytes behind.
        assert!(result.contains("…(+102 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_all_multibyte() {
        let s = "é".repeat(50);
        let result = truncate_for_log(&s, 5);
        assert!(result.starts_with("éé"));
        assert!(result.contains("…(+96 bytes)"));
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("archives");
        let nested = nested.to_str().unwrap();

        ensure_writable_dir(nested).await.unwrap();
        assert!(std::path::Path::new(nested).is_dir());
    }
}
