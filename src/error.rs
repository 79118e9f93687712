//! Error types for Stride.

use thiserror::Error;

/// Library-level error type for Stride operations.
///
/// Almost nothing in the content pipeline surfaces one of these to a caller:
/// agents and tools turn provider failures into degraded payloads. The
/// exceptions are configuration loading and [`StrideError::TemplateNotFound`],
/// which fails agent construction.
#[derive(Error, Debug)]
pub enum StrideError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt template not found: {0}")]
    TemplateNotFound(String),

    #[error("Completion failed: {0}")]
    Completion(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Web search failed: {0}")]
    Search(String),

    #[error("Similarity search failed: {0}")]
    Similarity(String),

    #[error("Analytics unavailable: {0}")]
    Analytics(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Stride operations.
pub type Result<T> = std::result::Result<T, StrideError>;
