//! Light markdown structure for free-form AI answers.
//!
//! Only two constructs are recognised: `**bold**` runs become headings, and
//! a segment holding more than one `*`-separated item becomes a bullet list.
//! Everything else is a paragraph.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Non-greedy `**...**` on a single line.
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*.*?\*\*").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum ResponseBlock {
    Heading(String),
    Bullets(Vec<String>),
    Paragraph(String),
}

/// Split an answer into display blocks, in order. Blank paragraphs are dropped.
pub fn format_response(text: &str) -> Vec<ResponseBlock> {
    split_keeping_bold(text)
        .into_iter()
        .filter_map(block)
        .collect()
}

/// Split around bold runs, keeping the runs themselves as segments.
fn split_keeping_bold(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut last = 0;
    for m in BOLD.find_iter(text) {
        segments.push(&text[last..m.start()]);
        segments.push(m.as_str());
        last = m.end();
    }
    segments.push(&text[last..]);
    segments.retain(|s| !s.is_empty());
    segments
}

fn block(section: &str) -> Option<ResponseBlock> {
    if section.starts_with("**") && section.ends_with("**") {
        let inner = section.get(2..section.len().saturating_sub(2)).unwrap_or("");
        return Some(ResponseBlock::Heading(inner.to_string()));
    }

    let items: Vec<&str> = section.split('*').filter(|i| !i.trim().is_empty()).collect();
    if items.len() > 1 {
        return Some(ResponseBlock::Bullets(
            items.into_iter().map(|i| i.trim().to_string()).collect(),
        ));
    }

    let paragraph = section.trim();
    (!paragraph.is_empty()).then(|| ResponseBlock::Paragraph(paragraph.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ResponseBlock::*;

    #[test]
    fn plain_text_is_one_paragraph() {
        assert_eq!(
            format_response("  The contract is a standard NDA. "),
            vec![Paragraph("The contract is a standard NDA.".into())]
        );
    }

    #[test]
    fn headings_and_bullets() {
        let text = "**Key Points**\n* Term is 12 months\n* Either party may terminate\n**Risks**\nLiability is uncapped.";
        assert_eq!(
            format_response(text),
            vec![
                Heading("Key Points".into()),
                Bullets(vec![
                    "Term is 12 months".into(),
                    "Either party may terminate".into()
                ]),
                Heading("Risks".into()),
                Paragraph("Liability is uncapped.".into()),
            ]
        );
    }

    #[test]
    fn single_star_item_stays_a_paragraph() {
        assert_eq!(
            format_response("* only one item"),
            vec![Paragraph("* only one item".into())]
        );
    }

    #[test]
    fn bold_does_not_span_lines() {
        assert_eq!(
            format_response("**not\nbold**"),
            vec![Paragraph("**not\nbold**".into())]
        );
    }

    #[test]
    fn blank_gaps_between_headings_are_dropped() {
        assert_eq!(
            format_response("**A**\n\n**B**"),
            vec![Heading("A".into()), Heading("B".into())]
        );
    }

    #[test]
    fn inline_bold_splits_the_sentence() {
        assert_eq!(
            format_response("Payment is due in **30 days** after invoice."),
            vec![
                Paragraph("Payment is due in".into()),
                Heading("30 days".into()),
                Paragraph("after invoice.".into()),
            ]
        );
    }

    #[test]
    fn empty_input() {
        assert!(format_response("").is_empty());
    }
}
