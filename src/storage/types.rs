use crate::api::ChatMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Versioned on-disk envelope for a conversation transcript
///
/// The version tag lets the store treat future format changes as "no
/// history" instead of failing to deserialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEnvelope {
    /// Envelope schema version
    pub version: u32,
    /// Ordered message sequence, oldest first
    pub messages: Vec<ChatMessage>,
}

/// Metadata for a stored transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSummary {
    /// The fetch this transcript belongs to
    pub fetch_id: String,
    /// Number of messages in the transcript
    pub message_count: usize,
    /// Timestamp of the most recent message
    pub last_activity: Option<DateTime<Utc>>,
}
