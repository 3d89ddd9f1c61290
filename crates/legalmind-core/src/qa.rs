//! Common questions generated during analysis.

use serde::Serialize;

use crate::record::QaEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// Normalize question entries into pairs, preserving order.
///
/// Strings are split at the first colon; the colon and any whitespace after
/// it are dropped. Strings without a colon and entries of any other shape
/// are skipped.
pub fn extract_qa(entries: &[QaEntry]) -> Vec<QaPair> {
    entries.iter().filter_map(qa_pair).collect()
}

fn qa_pair(entry: &QaEntry) -> Option<QaPair> {
    match entry {
        QaEntry::Pair { question, answer } => Some(QaPair {
            question: question.clone(),
            answer: answer.clone(),
        }),
        QaEntry::Text(text) => {
            let (question, answer) = text.split_once(':')?;
            Some(QaPair {
                question: question.to_string(),
                answer: answer.trim_start().to_string(),
            })
        }
        QaEntry::Other(_) => None,
    }
}
