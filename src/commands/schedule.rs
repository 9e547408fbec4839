//! Schedule management commands

use crate::api::{HttpNewsApi, NewsApi};
use crate::cli::ScheduleCommand;
use crate::config::{Config, ScheduleConfig};
use crate::error::Result;
use crate::schedule::{parse_schedule_time, ScheduleService, ScheduleSnapshot};
use colored::Colorize;
use prettytable::{format, Table};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Handle schedule commands
pub async fn run_schedule(config: Config, command: ScheduleCommand) -> Result<()> {
    let api = Arc::new(HttpNewsApi::new(&config.api)?);

    // One-shot invocations save inline; debouncing only matters for
    // long-lived embedders coalescing rapid edits.
    let schedule_config = ScheduleConfig {
        debounce_ms: 0,
        ..config.schedule
    };
    let service = ScheduleService::new(api.clone(), schedule_config);
    service.load().await?;

    match command {
        ScheduleCommand::Show => {
            print_snapshot(&service.snapshot());
        }
        ScheduleCommand::SetTime { time } => {
            let time = parse_schedule_time(&time)?;
            service.set_time(time).await?;
            let snapshot = service.snapshot();
            println!(
                "{}",
                format!("Delivery time set to {}", snapshot.time.format("%H:%M")).green()
            );
        }
        ScheduleCommand::Enable => {
            service.set_enabled(true).await?;
            println!("{}", "Schedule enabled".green());
        }
        ScheduleCommand::Disable => {
            service.set_enabled(false).await?;
            println!("{}", "Schedule disabled".yellow());
        }
        ScheduleCommand::Topics { set, custom } => {
            if set.is_none() && custom.is_none() {
                println!("{}", "Nothing to change; pass --set and/or --custom.".yellow());
                print_snapshot(&service.snapshot());
                return Ok(());
            }
            if let Some(topics) = set {
                let topics: BTreeSet<String> =
                    topics.into_iter().map(|t| t.trim().to_string()).collect();
                service.set_topics(topics).await?;
            }
            if let Some(custom) = custom {
                let custom: BTreeSet<String> =
                    custom.into_iter().map(|t| t.trim().to_string()).collect();
                service.set_custom_topics(custom).await?;
            }
            println!("{}", "Topics updated".green());
            print_snapshot(&service.snapshot());
        }
        ScheduleCommand::Delete => {
            let snapshot = service.snapshot();
            match snapshot.record_id {
                Some(id) => {
                    api.delete_scheduled_summary(&id).await?;
                    println!("{}", "Schedule deleted".green());
                }
                None => println!("{}", "No schedule exists.".yellow()),
            }
        }
    }

    Ok(())
}

fn print_snapshot(snapshot: &ScheduleSnapshot) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    let status = if snapshot.enabled {
        "enabled".green().to_string()
    } else {
        "disabled".yellow().to_string()
    };
    let topics = if snapshot.topics.is_empty() {
        "-".to_string()
    } else {
        snapshot.topics.iter().cloned().collect::<Vec<_>>().join(", ")
    };
    let custom = if snapshot.custom_topics.is_empty() {
        "-".to_string()
    } else {
        snapshot
            .custom_topics
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };
    let record = snapshot
        .record_id
        .clone()
        .unwrap_or_else(|| "not yet created".to_string());

    table.add_row(prettytable::row!["Time".bold(), snapshot.time.format("%H:%M")]);
    table.add_row(prettytable::row!["Status".bold(), status]);
    table.add_row(prettytable::row!["Topics".bold(), topics]);
    table.add_row(prettytable::row!["Custom topics".bold(), custom]);
    table.add_row(prettytable::row!["Record".bold(), record.cyan()]);

    println!("\nDaily Fetch schedule:");
    table.printstd();
    println!();
}
