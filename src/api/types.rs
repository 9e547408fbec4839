//! Wire and domain types shared between the remote client, the schedule
//! reconciler, and the assistant session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Fixed label of the single schedule record
pub const SCHEDULE_NAME: &str = "Daily Fetch";

/// Weekday names written with every schedule save. Day-of-week selection is
/// not exposed by this client, the schedule always runs daily.
pub const ALL_DAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Canonical topic identifiers accepted by the backend
pub const CANONICAL_TOPICS: [&str; 10] = [
    "general",
    "technology",
    "business",
    "science",
    "health",
    "sports",
    "entertainment",
    "world",
    "politics",
    "finance",
];

/// A scheduled-summary record as exchanged with the backend
///
/// Exactly one logical record exists per user. An empty `id` means the
/// record has not been created server-side yet. `created_at` and `last_run`
/// are server-stamped and only ever echoed back, never set locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledSummary {
    /// Opaque server-assigned identifier; empty when not yet created
    #[serde(default)]
    pub id: String,
    /// Display name, always "Daily Fetch"
    pub name: String,
    /// Delivery time of day, "HH:MM", rounded to a 10-minute boundary
    pub time: String,
    /// Canonical topic identifiers (lowercase)
    #[serde(default)]
    pub topics: Vec<String>,
    /// User-defined topic strings (case-preserving)
    #[serde(default)]
    pub custom_topics: Vec<String>,
    /// Weekday names; this client always writes all seven
    #[serde(default)]
    pub days: Vec<String>,
    /// Whether the schedule is active
    pub is_enabled: bool,
    /// Server-stamped creation time, echoed through unchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Server-stamped last execution time, echoed through unchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<String>,
}

/// Role of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A turn written by the user
    User,
    /// A turn returned by the remote assistant
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn of an assistant conversation
///
/// The `id` is generated locally (ULID) and is stable for the message's
/// lifetime; it anchors rendering and carries no server-side meaning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Locally generated unique identifier
    pub id: String,
    /// Who wrote the turn
    pub role: Role,
    /// Free text content
    pub content: String,
    /// Creation time, local clock
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a new user turn stamped with the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use dailyfetch::api::{ChatMessage, Role};
    ///
    /// let msg = ChatMessage::user("What happened in tech today?");
    /// assert_eq!(msg.role, Role::User);
    /// assert!(!msg.id.is_empty());
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates a new assistant turn stamped with the current time
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A single history turn as sent to the assistant endpoint
///
/// The endpoint only needs role and content; local ids and timestamps
/// stay client-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryTurn {
    /// Who wrote the turn
    pub role: Role,
    /// Turn text
    pub content: String,
}

impl From<&ChatMessage> for HistoryTurn {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role,
            content: msg.content.clone(),
        }
    }
}

/// Request payload for the assistant endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantQuery {
    /// The fetch (summary instance) being discussed
    pub fetch_id: String,
    /// The new user message
    pub message: String,
    /// Trailing window of prior turns, oldest first
    pub conversation_history: Vec<HistoryTurn>,
    /// Playback progress through the summary audio, 0-100
    pub audio_progress_percent: u32,
    /// Current playback position, "M:SS"
    pub current_time_label: String,
    /// Total audio duration, "M:SS"
    pub total_duration_label: String,
}

/// Response payload from the assistant endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    /// The assistant's answer text
    pub response_text: String,
}
