//! Error types for solar-checker

use thiserror::Error;

/// Upper bound (in characters) for raw model text embedded in error messages.
pub const MAX_DIAGNOSTIC_LEN: usize = 500;

/// Clip untrusted text to the diagnostic bound, at a char boundary.
pub fn truncate_diagnostic(text: &str) -> String {
    if text.chars().count() <= MAX_DIAGNOSTIC_LEN {
        return text.to_string();
    }
    let truncated: String = text.chars().take(MAX_DIAGNOSTIC_LEN).collect();
    format!("{}...", truncated)
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid image format: {0}")]
    InvalidImageFormat(String),

    #[error("Invalid analysis request: {0}")]
    InvalidRequest(String),

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("No API key provided (pass --api-key or set OPENROUTER_API_KEY)")]
    MissingApiKey,

    #[error("API request failed: {0}")]
    Transport(String),

    #[error("Empty reply from API")]
    EmptyReply,

    #[error("Unexpected API response structure: {0}")]
    MalformedEnvelope(String),

    #[error("No JSON found in AI reply: {}", truncate_diagnostic(.reply))]
    NoJsonFound {
        /// Full raw reply text, clipped only at display time.
        reply: String,
    },

    #[error("Failed to parse AI reply JSON: {message} | extracted: {snippet}")]
    JsonParse {
        /// Parse error description (includes line/column position).
        message: String,
        /// Attempted substring, already clipped to the diagnostic bound.
        snippet: String,
    },

    #[error("AI reply does not match the report schema:\n  {}", .violations.join("\n  "))]
    SchemaValidation {
        /// Every missing or mistyped field path, e.g. `financial_analysis.roi_percentage`.
        violations: Vec<String>,
    },

    #[error("Analysis cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
