//! Summarization client for an OpenAI-compatible completion endpoint.
//!
//! Speeches are summarized with a two-message exchange: a system
//! instruction naming the speaker, and the speech body as the user message.
//! Generation can be slow, so the HTTP client carries an hour-long timeout.
//!
//! Summarization is enrichment, not a load-bearing step: any failure here
//! is logged and surfaced as `None` so the record is archived without a
//! summary instead of being dropped. A small exponential backoff with
//! jitter runs before giving up on transient failures.

use rand::{rng, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(3600);
const MAX_ATTEMPTS: usize = 3;
const BASE_DELAY: Duration = Duration::from_secs(1);
const MAX_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
enum CompletionError {
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("completion response contained no choices")]
    EmptyResponse,
    #[error("no API key configured")]
    MissingKey,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client for the remote summarization endpoint.
pub struct SummarizerClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl fmt::Debug for SummarizerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizerClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SummarizerClient {
    /// Build a client against an OpenAI-compatible base URL.
    ///
    /// A missing API key is tolerated here: every summarization attempt
    /// will fail fast and the pipeline archives records without summaries.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API base, e.g. `https://api.x.ai/v1`; trailing
    ///   slashes are stripped
    /// * `api_key` - Bearer credential, usually from `XAI_API_KEY`
    /// * `model` - Model identifier sent with every request
    pub fn new(base_url: &str, api_key: Option<String>, model: &str) -> Self {
        if api_key.is_none() {
            warn!("No summarization API key configured; records will be archived without summaries");
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        SummarizerClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        }
    }

    fn build_messages(speaker: &str, content: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: "system",
                content: format!(
                    "Please summarize the following speech/testimony given by Federal Reserve Board {speaker}"
                ),
            },
            ChatMessage {
                role: "user",
                content: content.to_string(),
            },
        ]
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or(CompletionError::MissingKey)?;
        let request = ChatRequest {
            model: &self.model,
            messages,
        };

        let response: ChatResponse = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(CompletionError::EmptyResponse)
    }

    /// Summarize a speech, degrading to `None` on failure.
    ///
    /// Transient failures are retried with exponential backoff and jitter;
    /// once attempts are exhausted the failure is logged and swallowed so
    /// the caller can archive the record without a summary.
    ///
    /// # Arguments
    ///
    /// * `speaker` - Speaker name, woven into the system instruction
    /// * `content` - Full speech body to summarize
    ///
    /// # Returns
    ///
    /// The generated summary, or `None` when no API key is configured or
    /// every attempt failed.
    #[instrument(level = "info", skip_all, fields(%speaker, bytes = content.len()))]
    pub async fn summarize(&self, speaker: &str, content: &str) -> Option<String> {
        if self.api_key.is_none() {
            warn!("Skipping summarization: no API key");
            return None;
        }

        let messages = Self::build_messages(speaker, content);
        let total_t0 = Instant::now();

        for attempt in 1..=MAX_ATTEMPTS {
            match self.complete(&messages).await {
                Ok(summary) => {
                    info!(
                        attempt,
                        elapsed_ms = total_t0.elapsed().as_millis() as u64,
                        "Summarization succeeded"
                    );
                    return Some(summary);
                }
                Err(e) if attempt < MAX_ATTEMPTS => {
                    let mut delay = BASE_DELAY.saturating_mul(1 << (attempt - 1));
                    if delay > MAX_DELAY {
                        delay = MAX_DELAY;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);
                    warn!(attempt, max = MAX_ATTEMPTS, ?delay, error = %e, "Summarization attempt failed; backing off");
                    sleep(delay).await;
                }
                Err(e) => {
                    warn!(
                        attempt,
                        elapsed_ms = total_t0.elapsed().as_millis() as u64,
                        error = %e,
                        "Summarization exhausted retries; archiving without summary"
                    );
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_reference_speaker_and_carry_body() {
        let messages =
            SummarizerClient::build_messages("Governor Lisa D. Cook", "Thank you. Inflation...");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("Governor Lisa D. Cook"));
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "Thank you. Inflation...");
    }

    #[test]
    fn test_request_serializes_to_expected_shape() {
        let messages = SummarizerClient::build_messages("Chair Jerome H. Powell", "Good morning.");
        let request = ChatRequest {
            model: "grok-3-mini",
            messages: &messages,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "grok-3-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Good morning.");
    }

    #[test]
    fn test_response_parses_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"A short summary."}}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.choices[0].message.content, "A short summary.");
    }

    #[tokio::test]
    async fn test_summarize_without_key_degrades_to_none() {
        let client = SummarizerClient::new("https://api.x.ai/v1", None, "grok-3-mini");
        let summary = client.summarize("Governor Lisa D. Cook", "Body text").await;
        assert!(summary.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_normalized() {
        let client = SummarizerClient::new("https://api.x.ai/v1/", None, "grok-3-mini");
        assert_eq!(client.base_url, "https://api.x.ai/v1");
    }
}
