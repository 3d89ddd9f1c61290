use thiserror::Error;

/// Failure to turn AI text into structured data.
///
/// Never escapes the public extractors: they log it and fall back to an
/// empty or default value.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no {0} found in text")]
    NotFound(&'static str),

    #[error("unexpected shape: {0}")]
    Shape(String),
}
