//! Assistant conversation sessions
//!
//! One session runs one assistant conversation scoped to a fetch id, with
//! turn-by-turn persistence and a playback-context payload. The user turn
//! is appended optimistically; the sequence is only persisted after a
//! successful exchange and unconditionally on close, so a failed request
//! leaves the transcript on disk untouched.

use crate::api::{AssistantQuery, ChatMessage, HistoryTurn, NewsApi};
use crate::config::AssistantConfig;
use crate::error::{DailyFetchError, Result};
use crate::storage::TranscriptStore;
use metrics::increment_counter;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub mod playback;
pub use playback::{format_timestamp, PlaybackStatus};

/// Where the session sits in its turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready for the next user message
    AwaitingInput,
    /// A request is in flight
    Processing,
}

/// An assistant conversation bound to one fetch
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use dailyfetch::api::HttpNewsApi;
/// use dailyfetch::config::Config;
/// use dailyfetch::session::{AssistantSession, PlaybackStatus};
/// use dailyfetch::storage::TranscriptStore;
///
/// # async fn example() -> dailyfetch::error::Result<()> {
/// let config = Config::default();
/// let api = Arc::new(HttpNewsApi::new(&config.api)?);
/// let store = Arc::new(TranscriptStore::new()?);
/// let mut session = AssistantSession::open("fetch-42", api, store, config.assistant);
/// let reply = session.send("What happened in tech today?", PlaybackStatus::idle()).await?;
/// println!("{}", reply.content);
/// session.close();
/// # Ok(())
/// # }
/// ```
pub struct AssistantSession {
    fetch_id: String,
    api: Arc<dyn NewsApi>,
    store: Arc<TranscriptStore>,
    config: AssistantConfig,
    messages: Vec<ChatMessage>,
    state: SessionState,
    cancel: CancellationToken,
    closed: bool,
}

impl AssistantSession {
    /// Open a session, restoring any previously persisted transcript
    ///
    /// A missing or unreadable transcript starts the session empty; storage
    /// trouble is logged, never surfaced.
    pub fn open(
        fetch_id: impl Into<String>,
        api: Arc<dyn NewsApi>,
        store: Arc<TranscriptStore>,
        config: AssistantConfig,
    ) -> Self {
        let fetch_id = fetch_id.into();
        let messages = store.load(&fetch_id).unwrap_or_else(|e| {
            tracing::warn!("Failed to load transcript for {}: {}", fetch_id, e);
            Vec::new()
        });

        tracing::debug!(
            "Opened assistant session for {} with {} prior messages",
            fetch_id,
            messages.len()
        );

        Self {
            fetch_id,
            api,
            store,
            config,
            messages,
            state: SessionState::AwaitingInput,
            cancel: CancellationToken::new(),
            closed: false,
        }
    }

    /// The fetch this session is scoped to
    pub fn fetch_id(&self) -> &str {
        &self.fetch_id
    }

    /// The full message sequence, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Current turn-cycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Token cancelled when the session closes
    ///
    /// Embedders can link this to a parent scope to tear the session down
    /// from outside.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Send a user message and wait for the assistant's reply
    ///
    /// The user turn is appended before the request goes out. On success
    /// the assistant turn is appended and the transcript persisted; on
    /// failure no assistant turn is appended and nothing is persisted (the
    /// optimistic user turn stays in memory and is written on the next
    /// successful save or on close).
    ///
    /// # Errors
    ///
    /// - `DailyFetchError::Validation` for empty/whitespace input or a
    ///   send while another request is in flight
    /// - `DailyFetchError::Cancelled` when the session closes mid-request
    /// - the underlying API error otherwise
    pub async fn send(
        &mut self,
        message: &str,
        playback: PlaybackStatus,
    ) -> Result<ChatMessage> {
        let message = message.trim();
        if message.is_empty() {
            return Err(DailyFetchError::Validation("Message is empty".to_string()).into());
        }
        if self.state == SessionState::Processing {
            return Err(DailyFetchError::Validation(
                "A request is already in flight".to_string(),
            )
            .into());
        }

        // History is the sequence before this turn, trailing window only.
        let history: Vec<HistoryTurn> = self
            .messages
            .iter()
            .rev()
            .take(self.config.history_window)
            .map(HistoryTurn::from)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();

        self.messages.push(ChatMessage::user(message));
        self.state = SessionState::Processing;

        let query = AssistantQuery {
            fetch_id: self.fetch_id.clone(),
            message: message.to_string(),
            conversation_history: history,
            audio_progress_percent: playback.progress_percent(),
            current_time_label: playback.current_label(),
            total_duration_label: playback.duration_label(),
        };

        increment_counter!("assistant_requests_total");
        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                Err(DailyFetchError::Cancelled("Session closed".to_string()).into())
            }
            reply = self.api.ask_assistant(&query) => reply,
        };
        self.state = SessionState::AwaitingInput;

        match outcome {
            Ok(reply) => {
                let turn = ChatMessage::assistant(reply.response_text);
                self.messages.push(turn.clone());
                self.persist();
                Ok(turn)
            }
            Err(e) => {
                increment_counter!("assistant_request_failures_total");
                Err(e)
            }
        }
    }

    /// Close the session: persist the transcript and release resources
    ///
    /// Idempotent; also runs on drop for abnormal teardown.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.cancel.cancel();
        self.persist();
        tracing::debug!("Closed assistant session for {}", self.fetch_id);
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.fetch_id, &self.messages) {
            tracing::warn!("Failed to persist transcript for {}: {}", self.fetch_id, e);
        }
    }
}

impl Drop for AssistantSession {
    fn drop(&mut self) {
        self.close();
    }
}
