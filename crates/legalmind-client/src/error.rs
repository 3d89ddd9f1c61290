use thiserror::Error;

/// Failure of one analysis upload. Fatal for that upload; never retried.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response has no body")]
    MissingBody,

    #[error("stream read error: {0}")]
    Read(String),

    #[error("stream ended before the analysis completed")]
    Incomplete,
}

#[cfg(feature = "http")]
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Stream(#[from] StreamError),
}
