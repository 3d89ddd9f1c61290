//! LegalMind CLI: analyse legal documents and browse the results from the terminal.

mod analyze;
mod chat;
mod display;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use legalmind_client::http::{DEFAULT_HIGHLIGHT_CRITERIA, DEFAULT_ORIGIN, DEFAULT_QA_QUESTION};
use legalmind_client::{AnalyzeOptions, ApiClient, ClientConfig};
use legalmind_core::{AnalysisRecord, DocumentInsights, HistoryPage, find_record, format_response};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// LegalMind: AI analysis of contracts and other legal documents
#[derive(Parser, Debug)]
#[command(name = "legalmind", version, about, long_about = None)]
struct Cli {
    /// API origin; requests go to `<origin>/api/v1`
    #[arg(long, env = "LEGALMIND_API_BASE", default_value = DEFAULT_ORIGIN, global = true)]
    api_base: String,

    /// Bearer token for the API
    #[arg(long, env = "LEGALMIND_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Print JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List analysed documents
    History,
    /// Show the insights of one analysed document
    Show { doc_id: String },
    /// Show the insights of a record saved as JSON (a record or a history page)
    Inspect { path: PathBuf },
    /// Upload a document and follow its analysis
    Analyze {
        path: PathBuf,
        /// Question answered during analysis
        #[arg(long, default_value = DEFAULT_QA_QUESTION)]
        question: String,
        /// What the highlighter should look for
        #[arg(long, default_value = DEFAULT_HIGHLIGHT_CRITERIA)]
        criteria: String,
    },
    /// Ask one question about an analysed document
    Ask { doc_id: String, question: String },
    /// Ask questions interactively
    Chat { doc_id: String },
    /// Extract key dates and events
    Timeline { doc_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    info!("legalmind v{}", env!("CARGO_PKG_VERSION"));

    let client = ApiClient::new(ClientConfig {
        origin: cli.api_base.clone(),
        token: cli.token.clone(),
    });

    match cli.command {
        Commands::History => {
            let history = client.fetch_history().await.context("fetching history")?;
            if cli.json {
                print_json(&history)?;
            } else {
                display::print_history(&history);
            }
        }
        Commands::Show { doc_id } => {
            let history = client.fetch_history().await.context("fetching history")?;
            let Some(record) = find_record(&history, &doc_id) else {
                bail!("no analysed document with id {doc_id}");
            };
            show_record(record, cli.json)?;
        }
        Commands::Inspect { path } => {
            for record in read_records(&path)? {
                show_record(&record, cli.json)?;
            }
        }
        Commands::Analyze {
            path,
            question,
            criteria,
        } => {
            let options = AnalyzeOptions {
                qa_question: question,
                highlight_criteria: criteria,
            };
            let (record, stats) = analyze::run_analysis(&client, &path, &options).await?;
            eprintln!(
                "  Analysed {} bytes in {:.1}s",
                stats.bytes, stats.elapsed_secs
            );
            show_record(&record, cli.json)?;
        }
        Commands::Ask { doc_id, question } => {
            let answer = client
                .ask(&doc_id, &question)
                .await
                .context("asking question")?;
            if cli.json {
                print_json(&serde_json::json!({ "answer": answer }))?;
            } else {
                display::print_response(&format_response(&answer));
            }
        }
        Commands::Chat { doc_id } => {
            let transcript = chat::run_chat(&client, &doc_id).await?;
            if cli.json {
                print_json(&transcript)?;
            }
        }
        Commands::Timeline { doc_id } => {
            let entries = client
                .fetch_timeline(&doc_id)
                .await
                .context("fetching timeline")?;
            if cli.json {
                print_json(&entries)?;
            } else {
                display::print_timeline(&entries);
            }
        }
    }

    Ok(())
}

fn show_record(record: &AnalysisRecord, json: bool) -> anyhow::Result<()> {
    let insights = DocumentInsights::from_record(record);
    if json {
        print_json(&insights)
    } else {
        display::print_insights_card(record, &insights);
        Ok(())
    }
}

/// Load a saved record, or every record of a saved history page.
fn read_records(path: &Path) -> anyhow::Result<Vec<AnalysisRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

    if value.get("history").is_some() {
        let page: HistoryPage = serde_json::from_value(value)?;
        return Ok(page.history);
    }
    Ok(vec![serde_json::from_value(value)?])
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
