//! OpenAI-compatible summarizer implementation.
//!
//! Works against any endpoint speaking the chat-completions protocol
//! (OpenAI, Azure OpenAI, local inference servers).

use crate::{prompt, Result, SummarizeOptions, Summarizer, SummarizerError};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default OpenAI API base URL.
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default request timeout. A hung summarization call must abort the
/// caller's compaction attempt rather than stall the write forever.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Summarizer backed by an OpenAI-compatible chat-completions endpoint.
#[derive(Debug)]
pub struct OpenAiSummarizer {
    /// HTTP client.
    client: reqwest::Client,

    /// API key.
    api_key: SecretString,

    /// API base URL.
    api_base: String,

    /// Model to use.
    model: String,

    /// Request timeout in seconds.
    timeout_secs: u64,
}

impl OpenAiSummarizer {
    /// Create a new summarizer with an API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new summarizer with an explicit request timeout.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(SummarizerError::Config("API key is required".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                SummarizerError::Config(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_key: SecretString::new(api_key),
            api_base: DEFAULT_API_BASE.to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: timeout.as_secs(),
        })
    }

    /// Create a summarizer from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            SummarizerError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    /// Set the API base URL (for Azure OpenAI or compatible APIs).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, transcript: &str, options: &SummarizeOptions) -> Result<String> {
        // The contract requires empty input to succeed; there is nothing to
        // condense, so skip the round-trip entirely.
        if transcript.trim().is_empty() {
            return Ok(String::new());
        }

        let mut messages = vec![ChatMessage {
            role: "system",
            content: prompt::build_instructions(options),
        }];
        if let Some(topics) = &options.focus {
            messages.push(ChatMessage {
                role: "system",
                content: prompt::build_focus(topics),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: transcript.to_string(),
        });

        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: 0.2,
        };

        debug!(model = %self.model, max_words = options.max_words, "requesting summary");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SummarizerError::Timeout(self.timeout_secs)
                } else {
                    SummarizerError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            let message = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => SummarizerError::Authentication(message),
                429 => SummarizerError::RateLimited {
                    message,
                    retry_after,
                },
                code => SummarizerError::Server {
                    status: code,
                    message,
                },
            });
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                SummarizerError::InvalidResponse("no choices in completion".to_string())
            })?;

        Ok(content)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
