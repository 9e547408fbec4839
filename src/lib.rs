//! DailyFetch - scheduled news digest client library
//!
//! This library provides the client core of the DailyFetch news-digest
//! application: schedule reconciliation, assistant conversation sessions,
//! transcript persistence, and the remote API client.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `schedule`: The schedule reconciler owning the single "Daily Fetch"
//!   record, with debounced saves and echo-verified state reconciliation
//! - `session`: Assistant conversation sessions with per-fetch transcript
//!   persistence and request cancellation
//! - `api`: Remote API trait and reqwest-backed client
//! - `storage`: sled-backed transcript store
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use dailyfetch::{Config, HttpNewsApi, ScheduleService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let api = Arc::new(HttpNewsApi::new(&config.api)?);
//!     let schedule = ScheduleService::new(api, config.schedule);
//!     schedule.load().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod schedule;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use api::{HttpNewsApi, NewsApi};
pub use config::Config;
pub use error::{DailyFetchError, Result};
pub use schedule::{ScheduleService, ScheduleSnapshot};
pub use session::{AssistantSession, PlaybackStatus, SessionState};
pub use storage::TranscriptStore;
