//! Remote news-digest API client
//!
//! This module defines the `NewsApi` trait covering the backend operations
//! the client core depends on, along with the reqwest-backed `HttpNewsApi`
//! implementation. All shapes are JSON over HTTPS with camelCase fields.

use crate::config::ApiConfig;
use crate::error::{DailyFetchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

pub mod types;
pub use types::{
    AssistantQuery, AssistantReply, ChatMessage, HistoryTurn, Role, ScheduledSummary, ALL_DAYS,
    CANONICAL_TOPICS, SCHEDULE_NAME,
};

/// Remote operations used by the schedule reconciler and assistant session
///
/// The backend enforces at most one scheduled-summary record per user;
/// the client defensively re-checks that invariant (see the schedule
/// module) rather than trusting it blindly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsApi: Send + Sync {
    /// Fetch the user's scheduled summaries (0 or 1 element expected)
    async fn get_scheduled_summaries(&self) -> Result<Vec<ScheduledSummary>>;

    /// Create a new scheduled summary; the server assigns id and createdAt
    async fn create_scheduled_summary(&self, record: &ScheduledSummary)
        -> Result<ScheduledSummary>;

    /// Replace an existing scheduled summary in full
    ///
    /// The server may normalize the record and echo back a different topic
    /// set; callers must compare the echo against what was sent.
    async fn update_scheduled_summary(
        &self,
        record: &ScheduledSummary,
        timezone: &str,
    ) -> Result<ScheduledSummary>;

    /// Delete a scheduled summary by id
    async fn delete_scheduled_summary(&self, id: &str) -> Result<()>;

    /// Ask the assistant a question about a fetch
    async fn ask_assistant(&self, query: &AssistantQuery) -> Result<AssistantReply>;
}

/// Full-replace update request; the record plus the caller's timezone
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateScheduledSummaryRequest<'a> {
    #[serde(flatten)]
    record: &'a ScheduledSummary,
    timezone: &'a str,
}

/// HTTP client for the news-digest backend
///
/// # Examples
///
/// ```no_run
/// use dailyfetch::api::{HttpNewsApi, NewsApi};
/// use dailyfetch::config::ApiConfig;
///
/// # async fn example() -> dailyfetch::error::Result<()> {
/// let api = HttpNewsApi::new(&ApiConfig::default())?;
/// let schedules = api.get_scheduled_summaries().await?;
/// # Ok(())
/// # }
/// ```
pub struct HttpNewsApi {
    client: Client,
    base_url: String,
}

impl HttpNewsApi {
    /// Create a new API client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("dailyfetch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DailyFetchError::Http)?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        tracing::info!("Initialized news API client: base_url={}", base_url);

        Ok(Self { client, base_url })
    }

    /// The configured base URL, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn schedules_url(&self) -> String {
        format!("{}/v1/scheduled-summaries", self.base_url)
    }

    fn schedule_url(&self, id: &str) -> String {
        format!("{}/v1/scheduled-summaries/{}", self.base_url, id)
    }

    fn assistant_url(&self) -> String {
        format!("{}/v1/assistant/ask", self.base_url)
    }

    /// Map a non-success response to an API error carrying status and body
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(DailyFetchError::Api {
            status: status.as_u16(),
            message,
        }
        .into())
    }
}

#[async_trait]
impl NewsApi for HttpNewsApi {
    async fn get_scheduled_summaries(&self) -> Result<Vec<ScheduledSummary>> {
        tracing::debug!("GET {}", self.schedules_url());
        let response = self.client.get(self.schedules_url()).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn create_scheduled_summary(
        &self,
        record: &ScheduledSummary,
    ) -> Result<ScheduledSummary> {
        tracing::debug!("POST {}", self.schedules_url());
        let response = self
            .client
            .post(self.schedules_url())
            .json(record)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn update_scheduled_summary(
        &self,
        record: &ScheduledSummary,
        timezone: &str,
    ) -> Result<ScheduledSummary> {
        tracing::debug!("PUT {}", self.schedule_url(&record.id));
        let body = UpdateScheduledSummaryRequest { record, timezone };
        let response = self
            .client
            .put(self.schedule_url(&record.id))
            .json(&body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn delete_scheduled_summary(&self, id: &str) -> Result<()> {
        tracing::debug!("DELETE {}", self.schedule_url(id));
        let response = self.client.delete(self.schedule_url(id)).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn ask_assistant(&self, query: &AssistantQuery) -> Result<AssistantReply> {
        tracing::debug!("POST {} fetch_id={}", self.assistant_url(), query.fetch_id);
        let response = self
            .client
            .post(self.assistant_url())
            .json(query)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }
}
