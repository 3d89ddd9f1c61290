//! HTTP client for the LegalMind analysis API (`<origin>/api/v1`).

use legalmind_core::{AnalysisRecord, HistoryPage, TIMELINE_PROMPT, TimelineEntry, extract_timeline};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ClientError, StreamError};
use crate::progress::{ProgressStream, progress_stream};

pub const DEFAULT_ORIGIN: &str = "http://localhost:8000";
pub const DEFAULT_QA_QUESTION: &str = "Summarize the key points of this document.";
pub const DEFAULT_HIGHLIGHT_CRITERIA: &str =
    "Identify all clauses related to termination and liability.";

/// Where the API lives and who is calling it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host, e.g. `http://localhost:8000`.
    pub origin: String,
    /// Bearer token; `None` sends unauthenticated requests.
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            token: None,
        }
    }
}

/// Prompts sent alongside an uploaded document.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub qa_question: String,
    pub highlight_criteria: String,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            qa_question: DEFAULT_QA_QUESTION.to_string(),
            highlight_criteria: DEFAULT_HIGHLIGHT_CRITERIA.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct AskResponse {
    #[serde(default)]
    answer: Option<String>,
}

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!("{}/api/v1", config.origin.trim_end_matches('/')),
            token: config.token.filter(|t| !t.is_empty()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// All analysis records of the calling user.
    pub async fn fetch_history(&self) -> Result<Vec<AnalysisRecord>, ClientError> {
        let request = self.history_request();
        info!(url = %self.url("/history"), "fetching analysis history");
        let resp = check_status(request.send().await?).await?;

        let page: HistoryPage = serde_json::from_slice(&resp.bytes().await?)?;
        info!(count = page.history.len(), "fetched history");
        Ok(page.history)
    }

    /// Upload a document and stream the analysis progress.
    ///
    /// Fails before streaming if the server rejects the upload or sends no body.
    pub async fn analyze_stream(
        &self,
        file_name: &str,
        contents: Vec<u8>,
        options: &AnalyzeOptions,
    ) -> Result<ProgressStream, ClientError> {
        let request = self.analyze_request(file_name, contents, options);
        info!(url = %self.url("/analyze-stream"), file = %file_name, "uploading document for analysis");
        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StreamError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }
        if resp.content_length() == Some(0) {
            return Err(StreamError::MissingBody.into());
        }

        Ok(Box::pin(progress_stream(resp.bytes_stream())))
    }

    /// Ask a free-form question about an analysed document.
    pub async fn ask(&self, doc_id: &str, question: &str) -> Result<String, ClientError> {
        let request = self.ask_request(doc_id, question);
        info!(url = %self.url("/ask"), doc_id = %doc_id, "asking question");
        let resp = check_status(request.send().await?).await?;

        let body: AskResponse = serde_json::from_slice(&resp.bytes().await?)?;
        let answer = body.answer.unwrap_or_default();
        debug!(len = answer.len(), "received answer");
        Ok(answer)
    }

    /// Ask for the document's key dates and parse them.
    pub async fn fetch_timeline(&self, doc_id: &str) -> Result<Vec<TimelineEntry>, ClientError> {
        let answer = self.ask(doc_id, TIMELINE_PROMPT).await?;
        let entries = extract_timeline(&answer);
        info!(doc_id = %doc_id, count = entries.len(), "extracted timeline");
        Ok(entries)
    }

    // ── Request construction ──

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn history_request(&self) -> reqwest::RequestBuilder {
        self.authorize(self.client.get(self.url("/history")))
    }

    fn analyze_request(
        &self,
        file_name: &str,
        contents: Vec<u8>,
        options: &AnalyzeOptions,
    ) -> reqwest::RequestBuilder {
        let form = Form::new()
            .part("file", Part::bytes(contents).file_name(file_name.to_string()))
            .text("qa_question", options.qa_question.clone())
            .text("highlight_criteria", options.highlight_criteria.clone());
        self.authorize(self.client.post(self.url("/analyze-stream")))
            .multipart(form)
    }

    fn ask_request(&self, doc_id: &str, question: &str) -> reqwest::RequestBuilder {
        let form = Form::new()
            .text("doc_id", doc_id.to_string())
            .text("question", question.to_string());
        self.authorize(self.client.post(self.url("/ask")))
            .multipart(form)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Server {
        status: status.as_u16(),
        body,
    })
}
