//! Terminal rendering for analysis records.
//!
//! A record prints as a vertical card grouped into the dashboard's panels;
//! empty panels are skipped.

use chrono::{DateTime, Local, NaiveDateTime};
use legalmind_core::{
    AnalysisRecord, DocumentInsights, ResponseBlock, TimelineEntry, display_score,
};

const LABEL_WIDTH: usize = 16;
const MAX_LIST_ITEMS: usize = 10;

// ── Public API ──

/// Print one record as a card: identity, summary, parties, risks, clauses, Q&A.
pub fn print_insights_card(record: &AnalysisRecord, insights: &DocumentInsights) {
    println!("=== {} ===", insights.name);
    if let Some(classification) = &insights.classification {
        println!("{classification}");
    }
    println!();

    println!("Document");
    print_field("doc_id", &insights.doc_id);
    if let Some(status) = record.status.as_deref() {
        print_field("status", status);
    }
    if let Some(ts) = record.timestamp.as_deref() {
        print_field("uploaded", &format_timestamp(ts));
    }
    let band = insights
        .risk_score
        .map(|s| format!(" ({})", s.band().as_str()))
        .unwrap_or_default();
    print_field("risk score", &format!("{}{band}", display_score(insights.risk_score)));
    if let Some(url) = record.highlighted_doc_url.as_deref() {
        print_field("highlighted", url);
    }
    println!();

    if let Some(summary) = &insights.summary {
        println!("Summary");
        print_wrapped(summary);
        println!();
    }

    if !insights.entities.is_empty() {
        println!("Parties");
        print_list(&insights.entities);
        println!();
    }

    println!("Risks");
    for (category, risk) in insights.risks.iter() {
        println!("  {:<LABEL_WIDTH$} {}", category.as_str(), risk.level.as_str());
        for line in risk.description.lines().filter(|l| !l.trim().is_empty()) {
            println!("  {:<LABEL_WIDTH$}   {}", "", line.trim());
        }
    }
    println!();

    if !insights.clauses.is_empty() {
        println!("Clauses");
        for clause in &insights.clauses {
            println!("  {}", clause.clause);
            print_wrapped(&clause.explanation);
        }
        println!();
    }

    if !insights.qa.is_empty() {
        println!("Common Questions");
        for pair in &insights.qa {
            println!("  Q: {}", pair.question);
            println!("  A: {}", pair.answer);
        }
        println!();
    }
}

/// One line per record, newest first as returned by the server.
pub fn print_history(history: &[AnalysisRecord]) {
    if history.is_empty() {
        println!("No documents analysed yet.");
        return;
    }
    println!(
        "{:<38} {:<16} {:>5}  {:<32} {}",
        "DOC ID", "UPLOADED", "RISK", "TYPE", "FILE"
    );
    for record in history {
        println!(
            "{:<38} {:<16} {:>5}  {:<32} {}",
            record.doc_id,
            record.timestamp.as_deref().map(format_timestamp).unwrap_or_default(),
            display_score(record.risk_score()),
            truncate(record.classification().unwrap_or("-"), 32),
            record.display_name(),
        );
    }
}

pub fn print_timeline(entries: &[TimelineEntry]) {
    if entries.is_empty() {
        println!("No timeline events found.");
        return;
    }
    for entry in entries {
        let marker = if entry.is_risk { "!" } else { "-" };
        println!("{marker} {:<12} {}", entry.date, entry.title);
        if !entry.description.is_empty() {
            print_wrapped(&entry.description);
        }
    }
}

/// Print a formatted AI answer.
pub fn print_response(blocks: &[ResponseBlock]) {
    for block in blocks {
        match block {
            ResponseBlock::Heading(text) => {
                println!();
                println!("{text}");
            }
            ResponseBlock::Bullets(items) => {
                for item in items {
                    println!("  • {item}");
                }
            }
            ResponseBlock::Paragraph(text) => println!("{text}"),
        }
    }
}

// ── Helpers ──

fn print_field(label: &str, value: &str) {
    println!("  {:<LABEL_WIDTH$} {}", label, value);
}

fn print_list(items: &[String]) {
    for item in items.iter().take(MAX_LIST_ITEMS) {
        println!("  - {item}");
    }
    if items.len() > MAX_LIST_ITEMS {
        println!("  ... and {} more", items.len() - MAX_LIST_ITEMS);
    }
}

fn print_wrapped(text: &str) {
    for line in text.lines() {
        println!("    {}", line.trim_end());
    }
}

/// Local `YYYY-MM-DD HH:MM` for RFC 3339 or naive ISO timestamps; anything
/// else is shown as sent.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
