//! Command-line interface definition for DailyFetch
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for schedule management, assistant chat, and
//! transcript management.

use clap::{Parser, Subcommand};

/// DailyFetch - scheduled news digest client
///
/// Manage the daily summary schedule and chat with the assistant about
/// a generated fetch.
#[derive(Parser, Debug, Clone)]
#[command(name = "dailyfetch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the transcript database path
    #[arg(long)]
    pub transcripts_db: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for DailyFetch
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Inspect and edit the daily summary schedule
    Schedule {
        /// Schedule subcommand
        #[command(subcommand)]
        command: ScheduleCommand,
    },

    /// Chat with the assistant about a fetch
    Chat {
        /// Identifier of the fetch to discuss
        fetch_id: String,
    },

    /// Manage stored conversation transcripts
    Transcripts {
        /// Transcript subcommand
        #[command(subcommand)]
        command: TranscriptCommand,
    },
}

/// Schedule management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ScheduleCommand {
    /// Show the current schedule
    Show,

    /// Set the delivery time (HH:MM, rounded to the nearest 10 minutes)
    SetTime {
        /// Time of day, e.g. "08:30"
        time: String,
    },

    /// Turn the schedule on
    Enable,

    /// Turn the schedule off
    Disable,

    /// Replace the topic selection
    Topics {
        /// Canonical topics, comma separated (e.g. "technology,science")
        #[arg(long, value_delimiter = ',')]
        set: Option<Vec<String>>,

        /// Custom topics, comma separated
        #[arg(long, value_delimiter = ',')]
        custom: Option<Vec<String>>,
    },

    /// Delete the schedule record entirely
    Delete,
}

/// Transcript management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TranscriptCommand {
    /// List stored transcripts
    List,

    /// Delete the transcript for a fetch
    Delete {
        /// Identifier of the fetch
        fetch_id: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
