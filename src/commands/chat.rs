//! Interactive assistant chat

use crate::api::{ChatMessage, HttpNewsApi, Role};
use crate::config::Config;
use crate::error::Result;
use crate::session::{AssistantSession, PlaybackStatus};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::Arc;

/// Run an interactive assistant session for a fetch
pub async fn run_chat(config: Config, fetch_id: String) -> Result<()> {
    let api = Arc::new(HttpNewsApi::new(&config.api)?);
    let store = Arc::new(super::open_store(&config)?);
    let mut session = AssistantSession::open(fetch_id, api, store, config.assistant);

    if !session.messages().is_empty() {
        println!(
            "{}",
            format!("Resuming conversation ({} messages)", session.messages().len()).dimmed()
        );
        for message in session.messages() {
            print_turn(message);
        }
    }
    println!(
        "{}",
        "Ask about this fetch. /quit exits and saves the conversation.".dimmed()
    );

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                if line == "/quit" || line == "/exit" {
                    break;
                }
                let _ = rl.add_history_entry(&line);

                match session.send(&line, PlaybackStatus::idle()).await {
                    Ok(turn) => print_turn(&turn),
                    Err(e) => eprintln!("{} {}", "error:".red().bold(), e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                session.close();
                return Err(e.into());
            }
        }
    }

    session.close();
    println!("{}", "Conversation saved.".dimmed());
    Ok(())
}

fn print_turn(message: &ChatMessage) {
    match message.role {
        Role::User => println!("{} {}", "you>".bold(), message.content),
        Role::Assistant => println!("{} {}", "assistant>".cyan().bold(), message.content),
    }
}
