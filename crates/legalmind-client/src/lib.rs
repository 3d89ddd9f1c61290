//! Client side of the LegalMind analysis API: the progress stream reader,
//! and the HTTP client behind the `http` feature.

pub mod error;
pub mod progress;

#[cfg(feature = "http")]
pub mod http;

pub use error::StreamError;
pub use progress::{ProgressEvent, ProgressStream, progress_stream, wait_for_record};

#[cfg(feature = "http")]
pub use error::ClientError;
#[cfg(feature = "http")]
pub use http::{AnalyzeOptions, ApiClient, ClientConfig};
