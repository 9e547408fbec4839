//! Command handlers for the DailyFetch CLI

pub mod chat;
pub mod schedule;
pub mod transcripts;

use crate::config::Config;
use crate::error::Result;
use crate::storage::TranscriptStore;

/// Open the transcript store, honoring a configured path override
pub(crate) fn open_store(config: &Config) -> Result<TranscriptStore> {
    match &config.storage.path {
        Some(path) => TranscriptStore::new_with_path(path),
        None => TranscriptStore::new(),
    }
}
