//! Vision module - AI-powered rooftop analysis for solar feasibility
//!
//! This module provides:
//! - Image normalization and transport encoding (JPEG + base64)
//! - Prompt construction for the vision model
//! - The remote inference call and reply-envelope handling
//! - JSON extraction from the free-form reply and schema validation
//!
//! The pipeline is a pure function of (image, location, budget, credential):
//! it holds no state between invocations and either returns a fully validated
//! report or a typed error, never a partial result.

pub mod ai;
pub mod client;
pub mod encode;
pub mod schema;

// Re-export main types for convenience
pub use ai::prompts::build_analysis_prompt;
pub use client::{resolve_api_key, ModelClient, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use encode::encode_image_base64;

use crate::error::{truncate_diagnostic, Error, Result};
use crate::types::{AnalysisRequest, SolarReport};
use std::sync::atomic::{AtomicBool, Ordering};

/// Analyzer configuration
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Inference endpoint URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Request timeout for the remote call
    pub timeout_secs: u64,
    /// Output-length bound passed to the model
    pub max_tokens: u32,
    /// Sampling temperature (kept low for stable JSON)
    pub temperature: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 120,
            max_tokens: 2000,
            temperature: 0.1,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Analyze a rooftop image and return a validated feasibility report.
pub fn analyze_rooftop(
    request: &AnalysisRequest,
    api_key: &str,
    config: &AnalyzerConfig,
) -> Result<SolarReport> {
    run_pipeline(request, api_key, config, None)
}

/// Analyze a rooftop image with a cancellation flag.
///
/// The flag is checked at each stage boundary; once set, the pipeline stops
/// with `Error::Cancelled` and no report is produced. A request already in
/// flight ends at the transport timeout at the latest.
pub fn analyze_rooftop_with_cancel(
    request: &AnalysisRequest,
    api_key: &str,
    config: &AnalyzerConfig,
    cancel: &AtomicBool,
) -> Result<SolarReport> {
    run_pipeline(request, api_key, config, Some(cancel))
}

fn run_pipeline(
    request: &AnalysisRequest,
    api_key: &str,
    config: &AnalyzerConfig,
    cancel: Option<&AtomicBool>,
) -> Result<SolarReport> {
    if is_cancelled(cancel) {
        return Err(Error::Cancelled);
    }

    let image_b64 = encode::encode_image_base64(request.image())?;
    let prompt = ai::prompts::build_analysis_prompt(request.location(), request.budget());

    let client = ModelClient::new(api_key, config)?;
    let reply = client.request_analysis(&prompt, &image_b64, cancel)?;

    parse_reply(&reply)
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.map_or(false, |flag| flag.load(Ordering::SeqCst))
}

/// Parse a raw model reply into a validated report.
pub fn parse_reply(reply: &str) -> Result<SolarReport> {
    let json_str = extract_json_from_reply(reply)?;

    let candidate: serde_json::Value = serde_json::from_str(json_str).map_err(|e| Error::JsonParse {
        message: e.to_string(),
        snippet: truncate_diagnostic(json_str),
    })?;

    schema::validate(&candidate)
}

/// Extract the JSON payload from a reply that may contain explanatory prose
/// or markdown fences around the answer.
///
/// Policy: the inclusive substring between the first `{` and the last `}`.
/// A stray `{` in prose before the real payload widens the substring, and a
/// last `}` that precedes the first `{` yields an empty one; both surface as
/// a parse failure downstream rather than a silent mis-extraction.
pub fn extract_json_from_reply(reply: &str) -> Result<&str> {
    let start = reply.find('{');
    let end = reply.rfind('}');

    match (start, end) {
        (Some(start), Some(end)) if start <= end => Ok(&reply[start..=end]),
        (Some(_), Some(_)) => Ok(""),
        _ => Err(Error::NoJsonFound {
            reply: reply.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_between_prose() {
        let json = extract_json_from_reply("Sure! {\"a\":1} Hope that helps.").unwrap();
        assert_eq!(json, "{\"a\":1}");
    }

    #[test]
    fn test_extract_json_from_markdown_fence() {
        let reply = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json_from_reply(reply).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_no_braces() {
        match extract_json_from_reply("no braces here") {
            Err(Error::NoJsonFound { reply }) => assert_eq!(reply, "no braces here"),
            other => panic!("expected NoJsonFound, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_json_only_opening_brace() {
        assert!(matches!(
            extract_json_from_reply("prefix { and nothing closes"),
            Err(Error::NoJsonFound { .. })
        ));
    }

    #[test]
    fn test_extract_json_reversed_braces_yields_empty() {
        assert_eq!(extract_json_from_reply("} then {").unwrap(), "");
    }

    #[test]
    fn test_stray_brace_before_payload_widens_substring() {
        // Known limitation of the single-pass policy: the substring starts at
        // the prose brace and fails to parse downstream.
        let reply = "set {a} first, then {\"b\": 2}";
        assert_eq!(extract_json_from_reply(reply).unwrap(), "{a} first, then {\"b\": 2}");
        assert!(matches!(parse_reply(reply), Err(Error::JsonParse { .. })));
    }

    #[test]
    fn test_parse_reply_invalid_json_carries_snippet() {
        match parse_reply("{not valid json}") {
            Err(Error::JsonParse { snippet, .. }) => assert_eq!(snippet, "{not valid json}"),
            other => panic!("expected JsonParse, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_reply_valid_json_wrong_schema() {
        assert!(matches!(
            parse_reply("{\"a\": 1}"),
            Err(Error::SchemaValidation { .. })
        ));
    }

    #[test]
    fn test_analyzer_config_builders() {
        let config = AnalyzerConfig::default()
            .with_model("anthropic/claude-3-haiku")
            .with_base_url("http://localhost:8080/v1/chat/completions")
            .with_timeout_secs(30);
        assert_eq!(config.model, "anthropic/claude-3-haiku");
        assert_eq!(config.base_url, "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_tokens, 2000);
    }

    #[test]
    fn test_pre_set_cancel_flag_aborts_without_io() {
        let image = image::DynamicImage::ImageRgb8(image::RgbImage::new(2, 2));
        let request = crate::types::AnalysisRequest::new(image, "Reno, NV", 15_000.0).unwrap();
        let cancel = AtomicBool::new(true);
        let result = analyze_rooftop_with_cancel(
            &request,
            "sk-test",
            &AnalyzerConfig::default(),
            &cancel,
        );
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
