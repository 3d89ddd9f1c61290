//! Progress stream reader for `POST /analyze-stream`.
//!
//! The backend reports progress as server-sent-event style frames separated
//! by a blank line:
//!
//! ```text
//! data: {"percentage": 40, "message": "Extracting clauses"}
//!
//! data: {"percentage": 100, "message": "Done", "data": {"doc_id": "..."}}
//!
//! ```
//!
//! Frames are reassembled across chunk boundaries. Bytes are decoded per
//! complete frame, so multi-byte characters split between chunks survive.
//! Frames that are not `data:` lines or do not parse as JSON are skipped.

use std::collections::VecDeque;
use std::fmt::Display;
use std::pin::Pin;

use futures::{Stream, StreamExt};
use legalmind_core::AnalysisRecord;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::StreamError;

const FRAME_DELIMITER: &[u8] = b"\n\n";

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Percentage in 0..=100, never lower than an earlier event of the same stream.
    Progress { percentage: f64, message: String },
    /// The finished record. Always the last event.
    Complete(Box<AnalysisRecord>),
}

pub type ProgressStream = Pin<Box<dyn Stream<Item = Result<ProgressEvent, StreamError>> + Send>>;

/// Turn a response byte stream into progress events.
///
/// The stream ends after [`ProgressEvent::Complete`] without reading further.
/// A read error or end of input before completion yields one error and ends
/// the stream.
pub fn progress_stream<S, B, E>(
    byte_stream: S,
) -> impl Stream<Item = Result<ProgressEvent, StreamError>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let state = ReaderState {
        inner: Box::pin(byte_stream),
        buffer: Vec::new(),
        pending: VecDeque::new(),
        percentage: 0.0,
        finished: false,
    };

    futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.pending.pop_front() {
                return Some((event, state));
            }
            if state.finished {
                return None;
            }

            match state.inner.next().await {
                Some(Ok(chunk)) => {
                    state.buffer.extend_from_slice(chunk.as_ref());
                    state.drain_frames();
                }
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(StreamError::Read(e.to_string())), state));
                }
                None => {
                    state.finished = true;
                    let rest = std::mem::take(&mut state.buffer);
                    if state.handle_frame(&String::from_utf8_lossy(&rest)) {
                        continue;
                    }
                    state.pending.push_back(Err(StreamError::Incomplete));
                }
            }
        }
    })
}

/// Drive a progress stream to completion.
///
/// `on_progress` is called for every progress event; the finished record is
/// returned.
pub async fn wait_for_record<S>(
    events: S,
    mut on_progress: impl FnMut(f64, &str),
) -> Result<AnalysisRecord, StreamError>
where
    S: Stream<Item = Result<ProgressEvent, StreamError>>,
{
    let mut events = std::pin::pin!(events);
    while let Some(event) = events.next().await {
        match event? {
            ProgressEvent::Progress {
                percentage,
                message,
            } => on_progress(percentage, &message),
            ProgressEvent::Complete(record) => return Ok(*record),
        }
    }
    Err(StreamError::Incomplete)
}

// ── Reader state ──

struct ReaderState<S> {
    inner: Pin<Box<S>>,
    buffer: Vec<u8>,
    pending: VecDeque<Result<ProgressEvent, StreamError>>,
    /// Highest percentage reported so far.
    percentage: f64,
    finished: bool,
}

impl<S> ReaderState<S> {
    /// Handle every complete frame in the buffer; the incomplete tail stays.
    fn drain_frames(&mut self) {
        while !self.finished
            && let Some(pos) = find_delimiter(&self.buffer)
        {
            let frame: Vec<u8> = self.buffer.drain(..pos + FRAME_DELIMITER.len()).collect();
            self.handle_frame(&String::from_utf8_lossy(&frame[..pos]));
        }
    }

    /// Queue the events for one frame. Returns true if the frame completed the analysis.
    fn handle_frame(&mut self, frame: &str) -> bool {
        let Some(payload) = parse_frame(frame) else {
            return false;
        };
        let (Some(percentage), Some(message)) = (
            payload.get("percentage").and_then(Value::as_f64),
            payload
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty()),
        ) else {
            debug!("skipping frame without percentage and message");
            return false;
        };

        self.percentage = percentage.clamp(0.0, 100.0).max(self.percentage);
        self.pending.push_back(Ok(ProgressEvent::Progress {
            percentage: self.percentage,
            message: message.to_string(),
        }));

        if percentage != 100.0 {
            return false;
        }
        let Some(data) = payload.get("data").filter(|d| !d.is_null()) else {
            return false;
        };
        match AnalysisRecord::from_stream_payload(data) {
            Ok(record) => {
                self.pending.push_back(Ok(ProgressEvent::Complete(Box::new(record))));
                self.finished = true;
                true
            }
            Err(e) => {
                warn!(error = %e, "final frame carries an unusable record");
                false
            }
        }
    }
}

fn find_delimiter(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(FRAME_DELIMITER.len())
        .position(|w| w == FRAME_DELIMITER)
}

/// Parse one frame's `data:` payload as JSON.
fn parse_frame(frame: &str) -> Option<Value> {
    let data = frame.trim().strip_prefix("data:")?.trim_start();
    match serde_json::from_str(data) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(error = %e, "skipping malformed progress frame");
            None
        }
    }
}
