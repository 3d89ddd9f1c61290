//! Upload pipeline: reads a local document, streams the analysis, returns the record.

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use legalmind_client::{AnalyzeOptions, ApiClient, wait_for_record};
use legalmind_core::AnalysisRecord;

pub struct AnalyzeStats {
    pub bytes: usize,
    pub elapsed_secs: f64,
}

/// Run the full analysis: read file → upload → follow progress to the final record.
pub async fn run_analysis(
    client: &ApiClient,
    path: &Path,
    options: &AnalyzeOptions,
) -> anyhow::Result<(AnalysisRecord, AnalyzeStats)> {
    let start = Instant::now();

    let contents = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let bytes = contents.len();
    let file_name = upload_name(path);
    eprintln!("  Uploading {file_name} ({bytes} bytes)");

    let events = client
        .analyze_stream(&file_name, contents, options)
        .await
        .context("starting analysis")?;

    let record = wait_for_record(events, |percentage, message| {
        eprint!("\r\x1b[2K  [{percentage:>5.1}%] {message}");
    })
    .await;
    eprintln!();
    let record = record.context("analysis stream failed")?;

    Ok((
        record,
        AnalyzeStats {
            bytes,
            elapsed_secs: start.elapsed().as_secs_f64(),
        },
    ))
}

/// File name sent with the upload; the server uses it for display.
fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_name_is_the_file_name() {
        assert_eq!(upload_name(Path::new("/tmp/contracts/nda.pdf")), "nda.pdf");
        assert_eq!(upload_name(Path::new("/")), "document");
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let client = ApiClient::new(Default::default());
        let err = run_analysis(
            &client,
            Path::new("/nonexistent/legalmind/nda.pdf"),
            &AnalyzeOptions::default(),
        )
        .await
        .err()
        .unwrap();
        assert!(err.to_string().contains("reading /nonexistent/legalmind/nda.pdf"));
    }
}
