//! Remote inference client (OpenRouter chat completions)
//!
//! One blocking POST per analysis request. This layer only classifies
//! transport-level failure; the reply text is handed back verbatim and the
//! caller decides whether it contains a usable report.

use crate::error::{truncate_diagnostic, Error, Result};
use crate::vision::AnalyzerConfig;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Default inference endpoint
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default vision model
pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";

/// Environment variable consulted when no explicit API key is given
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Resolve the API credential. An explicit key takes precedence over the
/// environment variable.
pub fn resolve_api_key(explicit: Option<&str>) -> Result<String> {
    if let Some(key) = explicit {
        if !key.trim().is_empty() {
            return Ok(key.to_string());
        }
    }
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(Error::MissingApiKey),
    }
}

/// Chat-completions response envelope
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Client for the remote vision model
pub struct ModelClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl ModelClient {
    pub fn new(api_key: &str, config: &AnalyzerConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Send one analysis request and return the assistant reply text
    /// unmodified (no trimming, no shape assumptions).
    ///
    /// A set cancel flag aborts before dispatch or discards an already
    /// received reply; a cancelled call never yields a partial result.
    pub fn request_analysis(
        &self,
        prompt: &str,
        image_b64: &str,
        cancel: Option<&AtomicBool>,
    ) -> Result<String> {
        if is_cancelled(cancel) {
            return Err(Error::Cancelled);
        }

        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        {"type": "text", "text": prompt},
                        {
                            "type": "image_url",
                            "image_url": {
                                "url": format!("data:image/jpeg;base64,{}", image_b64)
                            }
                        }
                    ]
                }
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature
        });

        let response = self
            .http
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| Error::Transport(format!("failed to read response body: {}", e)))?;

        if is_cancelled(cancel) {
            return Err(Error::Cancelled);
        }

        parse_reply_envelope(status, &text)
    }
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.map_or(false, |flag| flag.load(Ordering::SeqCst))
}

/// Classify one HTTP exchange and extract the assistant message text.
///
/// Pure function of (status, body) so transport classification is testable
/// without a network.
pub fn parse_reply_envelope(status: u16, body: &str) -> Result<String> {
    if !(200..300).contains(&status) {
        return Err(Error::Transport(format!(
            "HTTP {}: {}",
            status,
            truncate_diagnostic(body)
        )));
    }

    if body.trim().is_empty() {
        return Err(Error::EmptyReply);
    }

    let envelope: ChatResponse = serde_json::from_str(body)
        .map_err(|_| Error::MalformedEnvelope(truncate_diagnostic(body)))?;

    envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| Error::MalformedEnvelope(truncate_diagnostic(body)))
}
