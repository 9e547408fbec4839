//! Conversation transcript persistence
//!
//! Transcripts are stored in an embedded `sled` database, one record per
//! fetch, keyed `"AIConversation_<fetchId>"`. A missing key is the normal
//! "no history yet" state; a corrupt or unrecognized value degrades to an
//! empty history with a logged warning, never an error.

use crate::api::ChatMessage;
use crate::error::{DailyFetchError, Result};
use directories::ProjectDirs;
use sled::Db;
use std::path::{Path, PathBuf};

pub mod types;
pub use types::{TranscriptEnvelope, TranscriptSummary};

/// Key prefix for transcript records
const KEY_PREFIX: &str = "AIConversation_";

/// Current envelope schema version
const TRANSCRIPT_VERSION: u32 = 1;

/// Storage backend for conversation transcripts
pub struct TranscriptStore {
    db: Db,
}

impl TranscriptStore {
    /// Open the store at its default location
    ///
    /// The database lives in the user's data directory. The
    /// `DAILYFETCH_TRANSCRIPTS_DB` environment variable overrides the
    /// path, which makes it easy to point the binary at a test database.
    ///
    /// # Errors
    ///
    /// Returns `DailyFetchError::Storage` if the data directory cannot be
    /// determined or the database cannot be opened
    pub fn new() -> Result<Self> {
        if let Ok(override_path) = std::env::var("DAILYFETCH_TRANSCRIPTS_DB") {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("app", "dailyfetch", "dailyfetch")
            .ok_or_else(|| DailyFetchError::Storage("Could not determine data directory".into()))?;

        let db_path = proj_dirs.data_dir().join("transcripts.db");
        Self::new_with_path(db_path)
    }

    /// Open the store at an explicit path
    ///
    /// Primarily useful for tests where the default application data
    /// directory is not desirable (for example, a temporary directory).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dailyfetch::storage::TranscriptStore;
    ///
    /// let store = TranscriptStore::new_with_path("/tmp/test_transcripts.db").unwrap();
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path: PathBuf = db_path.into();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DailyFetchError::Storage(format!(
                        "Failed to create parent directory for database: {}",
                        e
                    ))
                })?;
            }
        }

        let db = Self::open_db(&db_path)?;
        Ok(Self { db })
    }

    fn open_db(path: &Path) -> Result<Db> {
        sled::open(path)
            .map_err(|e| DailyFetchError::Storage(format!("Failed to open database: {}", e)).into())
    }

    fn transcript_key(fetch_id: &str) -> String {
        format!("{}{}", KEY_PREFIX, fetch_id)
    }

    /// Load the transcript for a fetch
    ///
    /// A missing key, a corrupt value, or an unknown envelope version all
    /// yield an empty history; only database-level failures are errors.
    pub fn load(&self, fetch_id: &str) -> Result<Vec<ChatMessage>> {
        let key = Self::transcript_key(fetch_id);
        let bytes = match self
            .db
            .get(key.as_bytes())
            .map_err(|e| DailyFetchError::Storage(format!("Get failed: {}", e)))?
        {
            Some(bytes) => bytes,
            None => return Ok(Vec::new()),
        };

        match serde_json::from_slice::<TranscriptEnvelope>(&bytes) {
            Ok(envelope) if envelope.version == TRANSCRIPT_VERSION => Ok(envelope.messages),
            Ok(envelope) => {
                tracing::warn!(
                    "Transcript for {} has unknown version {}, starting fresh",
                    fetch_id,
                    envelope.version
                );
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::warn!("Corrupt transcript for {}, starting fresh: {}", fetch_id, e);
                Ok(Vec::new())
            }
        }
    }

    /// Save the transcript for a fetch, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns `DailyFetchError::Storage` if serialization or the write fails
    pub fn save(&self, fetch_id: &str, messages: &[ChatMessage]) -> Result<()> {
        let envelope = TranscriptEnvelope {
            version: TRANSCRIPT_VERSION,
            messages: messages.to_vec(),
        };
        let value = serde_json::to_vec(&envelope)
            .map_err(|e| DailyFetchError::Storage(format!("Serialization failed: {}", e)))?;

        self.db
            .insert(Self::transcript_key(fetch_id).as_bytes(), value)
            .map_err(|e| DailyFetchError::Storage(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| DailyFetchError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    /// List all stored transcripts
    ///
    /// Corrupt records are skipped with a warning rather than failing the
    /// whole listing.
    pub fn list(&self) -> Result<Vec<TranscriptSummary>> {
        let mut summaries = Vec::new();
        for entry in self.db.scan_prefix(KEY_PREFIX.as_bytes()) {
            let (key, value) =
                entry.map_err(|e| DailyFetchError::Storage(format!("Iteration failed: {}", e)))?;

            let fetch_id = String::from_utf8_lossy(&key)
                .trim_start_matches(KEY_PREFIX)
                .to_string();

            match serde_json::from_slice::<TranscriptEnvelope>(&value) {
                Ok(envelope) => summaries.push(TranscriptSummary {
                    fetch_id,
                    message_count: envelope.messages.len(),
                    last_activity: envelope.messages.last().map(|m| m.timestamp),
                }),
                Err(e) => {
                    tracing::warn!("Skipping corrupt transcript for {}: {}", fetch_id, e);
                }
            }
        }
        Ok(summaries)
    }

    /// Delete the transcript for a fetch (idempotent)
    ///
    /// # Errors
    ///
    /// Returns `DailyFetchError::Storage` if the removal fails
    pub fn delete(&self, fetch_id: &str) -> Result<()> {
        self.db
            .remove(Self::transcript_key(fetch_id).as_bytes())
            .map_err(|e| DailyFetchError::Storage(format!("Remove failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| DailyFetchError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    /// Write raw bytes under a fetch's transcript key
    ///
    /// Test hook for exercising the corrupt-record path.
    #[doc(hidden)]
    pub fn insert_raw(&self, fetch_id: &str, bytes: &[u8]) -> Result<()> {
        self.db
            .insert(Self::transcript_key(fetch_id).as_bytes(), bytes)
            .map_err(|e| DailyFetchError::Storage(format!("Insert failed: {}", e)))?;
        Ok(())
    }
}
