//! Command-line interface definitions for the speech archiver.
//!
//! All options have defaults matching the Federal Reserve pipeline; the
//! summarization credential comes from the environment so it never appears
//! in shell history.

use clap::Parser;

/// Command-line arguments for the speech archiver.
///
/// # Examples
///
/// ```sh
/// # Archive the default feed into ./fed_speeches_json
/// fed_speech_archiver
///
/// # Custom output directory and feed
/// fed_speech_archiver -o ./archives --feed "Press Releases"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Base directory for per-speaker archive files
    #[arg(short, long, default_value = "fed_speeches_json")]
    pub output_dir: String,

    /// Name of the registered feed to process
    #[arg(long, default_value = "All Speeches and Testimony")]
    pub feed: String,

    /// Model identifier for the summarization endpoint
    #[arg(long, default_value = "grok-3-mini")]
    pub model: String,

    /// Base URL of the OpenAI-compatible summarization API
    #[arg(long, default_value = "https://api.x.ai/v1")]
    pub api_base_url: String,

    /// Summarization API key; without it records are archived unsummarized
    #[arg(long, env = "XAI_API_KEY", hide_env_values = true)]
    pub xai_api_key: Option<String>,
}
