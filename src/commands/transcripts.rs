//! Transcript management commands

use crate::cli::TranscriptCommand;
use crate::config::Config;
use crate::error::Result;
use colored::Colorize;
use prettytable::{format, Table};

/// Handle transcript commands
pub fn run_transcripts(config: Config, command: TranscriptCommand) -> Result<()> {
    let store = super::open_store(&config)?;

    match command {
        TranscriptCommand::List => {
            let mut transcripts = store.list()?;

            if transcripts.is_empty() {
                println!("{}", "No stored conversations found.".yellow());
                return Ok(());
            }

            transcripts.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
            table.add_row(prettytable::row![
                "Fetch".bold(),
                "Messages".bold(),
                "Last Activity".bold()
            ]);

            for transcript in transcripts {
                let last = transcript
                    .last_activity
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string());
                table.add_row(prettytable::row![
                    transcript.fetch_id.cyan(),
                    transcript.message_count,
                    last
                ]);
            }

            println!("\nStored conversations:");
            table.printstd();
            println!();
            println!(
                "Use {} to resume one.",
                "dailyfetch chat <fetch-id>".cyan()
            );
            println!();
        }
        TranscriptCommand::Delete { fetch_id } => {
            store.delete(&fetch_id)?;
            println!("{}", format!("Deleted transcript for {}", fetch_id).green());
        }
    }

    Ok(())
}
