//! Interactive question loop against one analysed document.

use std::io::Write;

use legalmind_client::ApiClient;
use legalmind_core::format_response;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;

use crate::display::print_response;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Conversation so far. A failed question keeps its user turn and gets no answer.
#[derive(Debug, Default, Serialize)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Record a question. Blank input is ignored and returns `None`.
    pub fn push_question<'a>(&mut self, input: &'a str) -> Option<&'a str> {
        let question = input.trim();
        if question.is_empty() {
            return None;
        }
        self.turns.push(ChatTurn {
            role: ChatRole::User,
            content: question.to_string(),
        });
        Some(question)
    }

    pub fn push_answer(&mut self, answer: String) {
        self.turns.push(ChatTurn {
            role: ChatRole::Assistant,
            content: answer,
        });
    }
}

/// Read questions from stdin until EOF or `exit`, printing each answer.
pub async fn run_chat(client: &ApiClient, doc_id: &str) -> anyhow::Result<Transcript> {
    let mut transcript = Transcript::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("Ask about {doc_id}. Type `exit` or press Ctrl-D to finish.");
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }
        let Some(question) = transcript.push_question(&line).map(str::to_string) else {
            continue;
        };

        eprintln!("  Thinking...");
        match client.ask(doc_id, &question).await {
            Ok(answer) => {
                print_response(&format_response(&answer));
                println!();
                transcript.push_answer(answer);
            }
            Err(e) => {
                error!(error = %e, doc_id = %doc_id, "question failed");
                eprintln!("  Failed to get an answer: {e}");
            }
        }
    }

    Ok(transcript)
}
