//! Interactive chat loop.

use crate::client::QuippyClient;
use crate::display;
use anyhow::Result;
use quippy_common::chat::{GREETING, SCANNING_NOTICE};
use quippy_common::ChatMessage;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Words that end the session
const EXIT_WORDS: &[&str] = &["exit", "quit"];

pub fn is_exit(line: &str) -> bool {
    let line = line.trim();
    EXIT_WORDS.iter().any(|w| line.eq_ignore_ascii_case(w))
}

/// Run the chat loop over `input` until EOF or an exit word.
///
/// Blank lines are ignored. A failed request is printed and the loop
/// continues. Returns the session transcript (greeting excluded).
pub async fn run_chat<R>(client: &QuippyClient, mut input: R) -> Result<Vec<ChatMessage>>
where
    R: AsyncBufRead + Unpin,
{
    display::print_system(GREETING);

    let mut transcript = Vec::new();
    let mut line = String::new();
    loop {
        display::print_prompt();
        std::io::stdout().flush()?;

        line.clear();
        if input.read_line(&mut line).await? == 0 {
            println!();
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if is_exit(message) {
            break;
        }

        display::print_system(SCANNING_NOTICE);
        match client.chat(message).await {
            Ok(reply) => {
                display::print_system(&reply.reply.content);
                transcript.push(ChatMessage::user(message));
                transcript.push(reply.reply);
            }
            Err(e) => display::print_error(&e.to_string()),
        }
    }

    Ok(transcript)
}
