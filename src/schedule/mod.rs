//! Scheduled-summary reconciliation
//!
//! This module owns the single "Daily Fetch" schedule record: loading it,
//! mutating it in response to edits, coalescing rapid edits behind a
//! debounce window, and reconciling locally-held state against the
//! server's echo after every write. The server is the source of truth,
//! but local edits are never clobbered by a stale or divergent echo.

use crate::api::{NewsApi, ScheduledSummary, ALL_DAYS, SCHEDULE_NAME};
use crate::config::ScheduleConfig;
use crate::error::{DailyFetchError, Result};
use chrono::NaiveTime;
use metrics::increment_counter;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub mod time;
pub mod topics;

pub use time::{format_schedule_time, parse_schedule_time, round_to_ten_minutes};
pub use topics::{is_canonical_topic, validate_canonical_topic, validate_custom_topic};

/// Observable snapshot of the reconciler state
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSnapshot {
    /// Delivery time, rounded to a 10-minute boundary
    pub time: NaiveTime,
    /// Whether the schedule is active
    pub enabled: bool,
    /// Selected canonical topics
    pub topics: BTreeSet<String>,
    /// Selected custom topics
    pub custom_topics: BTreeSet<String>,
    /// Server-assigned id of the cached record, if one exists
    pub record_id: Option<String>,
    /// Whether a load operation is in flight
    pub loading: bool,
}

/// Mutable reconciler state, guarded by a mutex
///
/// `record` is the last known server state (conceptually zero-or-one
/// element). The lock is never held across a suspension point.
#[derive(Debug)]
struct ScheduleState {
    time: NaiveTime,
    enabled: bool,
    topics: BTreeSet<String>,
    custom_topics: BTreeSet<String>,
    record: Option<ScheduledSummary>,
    loading: bool,
}

/// Reconciler for the user's single scheduled summary
///
/// Cloneable; clones share state, so the debounce task can outlive the
/// gesture that scheduled it.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use dailyfetch::api::HttpNewsApi;
/// use dailyfetch::config::Config;
/// use dailyfetch::schedule::ScheduleService;
///
/// # async fn example() -> dailyfetch::error::Result<()> {
/// let config = Config::default();
/// let api = Arc::new(HttpNewsApi::new(&config.api)?);
/// let service = ScheduleService::new(api, config.schedule);
/// service.load().await?;
/// service.set_enabled(true).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ScheduleService {
    api: Arc<dyn NewsApi>,
    state: Arc<Mutex<ScheduleState>>,
    config: ScheduleConfig,
    save_generation: Arc<AtomicU64>,
}

impl ScheduleService {
    /// Create a new reconciler over the given API client
    pub fn new(api: Arc<dyn NewsApi>, config: ScheduleConfig) -> Self {
        let default_time = Self::parse_default_time(&config);
        Self {
            api,
            state: Arc::new(Mutex::new(ScheduleState {
                time: default_time,
                enabled: false,
                topics: BTreeSet::new(),
                custom_topics: BTreeSet::new(),
                record: None,
                loading: false,
            })),
            config,
            save_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    fn parse_default_time(config: &ScheduleConfig) -> NaiveTime {
        parse_schedule_time(&config.default_time)
            .map(round_to_ten_minutes)
            .unwrap_or_else(|_| {
                NaiveTime::from_hms_opt(8, 0, 0).expect("08:00 is a valid time")
            })
    }

    fn lock(&self) -> MutexGuard<'_, ScheduleState> {
        self.state.lock().expect("schedule state lock poisoned")
    }

    /// Current state snapshot
    pub fn snapshot(&self) -> ScheduleSnapshot {
        let st = self.lock();
        ScheduleSnapshot {
            time: st.time,
            enabled: st.enabled,
            topics: st.topics.clone(),
            custom_topics: st.custom_topics.clone(),
            record_id: st.record.as_ref().map(|r| r.id.clone()),
            loading: st.loading,
        }
    }

    /// Load the schedule from the server, seeding defaults when none exists
    ///
    /// Raises the loading guard for the duration so reactive topic edits do
    /// not trigger saves mid-load. Transport errors are logged and leave
    /// local state unchanged. A second concurrent load is a no-op.
    pub async fn load(&self) -> Result<()> {
        {
            let mut st = self.lock();
            if st.loading {
                return Ok(());
            }
            st.loading = true;
        }

        let fetched = self.api.get_scheduled_summaries().await;

        let mut st = self.lock();
        match fetched {
            Ok(list) => {
                if list.len() > 1 {
                    tracing::warn!(
                        "Server returned {} schedule records, expected at most one; adopting the first",
                        list.len()
                    );
                }
                if let Some(record) = list.into_iter().next() {
                    match parse_schedule_time(&record.time) {
                        Ok(t) => st.time = round_to_ten_minutes(t),
                        Err(e) => {
                            tracing::warn!("Ignoring unparseable schedule time '{}': {}", record.time, e)
                        }
                    }
                    st.enabled = record.is_enabled;

                    // Adopt the server's topic sets unless the server side is
                    // empty while a local selection exists (an in-flight edit
                    // must not be clobbered by a stale read).
                    let server_topics: BTreeSet<String> = record.topics.iter().cloned().collect();
                    if !(server_topics.is_empty() && !st.topics.is_empty()) {
                        st.topics = server_topics;
                    }
                    let server_custom: BTreeSet<String> =
                        record.custom_topics.iter().cloned().collect();
                    if !(server_custom.is_empty() && !st.custom_topics.is_empty()) {
                        st.custom_topics = server_custom;
                    }

                    st.record = Some(record);
                } else {
                    st.time = Self::parse_default_time(&self.config);
                    st.enabled = false;
                    if st.topics.is_empty() && st.custom_topics.is_empty() {
                        st.topics.insert(self.config.default_topic.clone());
                    }
                    st.record = None;
                }
            }
            Err(e) => {
                tracing::warn!("Failed to load scheduled summary: {}", e);
            }
        }
        st.loading = false;
        Ok(())
    }

    /// Set the delivery time (rounded to the nearest 10 minutes) and save
    pub async fn set_time(&self, time: NaiveTime) -> Result<()> {
        self.ensure_loaded().await;
        {
            let mut st = self.lock();
            st.time = round_to_ten_minutes(time);
        }
        self.queue_save().await
    }

    /// Toggle the schedule on or off and save
    pub async fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.ensure_loaded().await;
        {
            let mut st = self.lock();
            st.enabled = enabled;
        }
        self.queue_save().await
    }

    /// Replace the canonical topic selection
    ///
    /// The save is skipped while a load is in flight, and when the edit is
    /// an empty-to-empty transition (a full clear never propagates).
    ///
    /// # Errors
    ///
    /// Returns `DailyFetchError::Validation` for identifiers outside the
    /// canonical set, before any state change or network call
    pub async fn set_topics(&self, topics: BTreeSet<String>) -> Result<()> {
        for topic in &topics {
            validate_canonical_topic(topic)?;
        }
        let skip_save = self.apply_topic_edit(|st| st.topics = topics);
        if skip_save {
            return Ok(());
        }
        self.ensure_loaded().await;
        self.queue_save().await
    }

    /// Replace the custom topic selection
    ///
    /// Same reaction policy as `set_topics`.
    ///
    /// # Errors
    ///
    /// Returns `DailyFetchError::Validation` for malformed names, before
    /// any state change or network call
    pub async fn set_custom_topics(&self, custom_topics: BTreeSet<String>) -> Result<()> {
        for name in &custom_topics {
            validate_custom_topic(name)?;
        }
        let skip_save = self.apply_topic_edit(|st| st.custom_topics = custom_topics);
        if skip_save {
            return Ok(());
        }
        self.ensure_loaded().await;
        self.queue_save().await
    }

    /// Apply a topic mutation and report whether the reactive save must be
    /// skipped (load in flight, or empty-to-empty transition).
    fn apply_topic_edit(&self, mutate: impl FnOnce(&mut ScheduleState)) -> bool {
        let mut st = self.lock();
        let was_empty = st.topics.is_empty() && st.custom_topics.is_empty();
        mutate(&mut st);
        let is_empty = st.topics.is_empty() && st.custom_topics.is_empty();
        st.loading || (was_empty && is_empty)
    }

    async fn ensure_loaded(&self) {
        let needs_load = self.lock().record.is_none();
        if needs_load {
            if let Err(e) = self.load().await {
                tracing::warn!("Schedule load before save failed: {}", e);
            }
        }
    }

    /// Schedule a save behind the configured debounce window
    ///
    /// A newer edit supersedes a pending save. A zero window saves inline.
    async fn queue_save(&self) -> Result<()> {
        let debounce = Duration::from_millis(self.config.debounce_ms);
        if debounce.is_zero() {
            return self.save_now().await;
        }

        let generation = self.save_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let service = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if service.save_generation.load(Ordering::SeqCst) != generation {
                return; // superseded by a newer edit
            }
            if let Err(e) = service.save_now().await {
                tracing::warn!("Debounced schedule save failed: {}", e);
            }
        });
        Ok(())
    }

    /// Persist the current state as a full-record replacement
    ///
    /// Carries out the reconciliation protocol: invariant check, target
    /// resolution (re-fetch or explicit create), full replace with the
    /// configured timezone, and echo verification. Transport failures are
    /// logged and fail soft; a singleton violation on the creation path
    /// fails loudly.
    pub async fn save_now(&self) -> Result<()> {
        let (time_str, enabled, topics, custom_topics, cached) = {
            let mut st = self.lock();
            st.time = round_to_ten_minutes(st.time);
            (
                format_schedule_time(st.time),
                st.enabled,
                st.topics.clone(),
                st.custom_topics.clone(),
                st.record.clone(),
            )
        };

        // A schedule with no topics at all is never persisted; the previous
        // record stays untouched. Deliberate no-op, not a failure.
        if topics.is_empty() && custom_topics.is_empty() {
            tracing::debug!("Skipping schedule save: no topics selected");
            return Ok(());
        }

        let target = match cached {
            Some(record) => Some(record),
            None => match self.api.get_scheduled_summaries().await {
                Ok(list) => {
                    if list.len() > 1 {
                        return Err(DailyFetchError::ScheduleConflict(format!(
                            "{} schedule records exist, expected at most one",
                            list.len()
                        ))
                        .into());
                    }
                    let first = list.into_iter().next();
                    self.lock().record = first.clone();
                    first
                }
                Err(e) => {
                    tracing::warn!("Failed to resolve schedule before save: {}", e);
                    return Ok(());
                }
            },
        };

        let record = ScheduledSummary {
            id: target.as_ref().map(|r| r.id.clone()).unwrap_or_default(),
            name: SCHEDULE_NAME.to_string(),
            time: time_str,
            topics: topics.iter().cloned().collect(),
            custom_topics: custom_topics.iter().cloned().collect(),
            days: ALL_DAYS.iter().map(|d| d.to_string()).collect(),
            is_enabled: enabled,
            created_at: target.as_ref().and_then(|r| r.created_at.clone()),
            last_run: target.as_ref().and_then(|r| r.last_run.clone()),
        };

        let outcome = match &target {
            Some(existing) if !existing.id.is_empty() => {
                self.api
                    .update_scheduled_summary(&record, &self.config.timezone)
                    .await
            }
            _ => self.api.create_scheduled_summary(&record).await,
        };

        match outcome {
            Ok(echo) => {
                increment_counter!("schedule_saves_total");
                let mut st = self.lock();

                // Trust the echo only when it matches what was sent; a
                // divergent echo means a racing write and the local
                // selection wins.
                let echoed_topics: BTreeSet<String> = echo.topics.iter().cloned().collect();
                if echoed_topics == topics {
                    st.topics = echoed_topics;
                } else {
                    tracing::warn!("Server echoed a different topic set; keeping local selection");
                }
                let echoed_custom: BTreeSet<String> =
                    echo.custom_topics.iter().cloned().collect();
                if echoed_custom == custom_topics {
                    st.custom_topics = echoed_custom;
                } else {
                    tracing::warn!(
                        "Server echoed a different custom topic set; keeping local selection"
                    );
                }

                st.record = Some(echo);
                Ok(())
            }
            Err(e) => {
                increment_counter!("schedule_save_failures_total");
                tracing::warn!("Schedule save failed: {}", e);

                // Best-effort resync; if this also fails, local state stands.
                match self.api.get_scheduled_summaries().await {
                    Ok(list) => {
                        self.lock().record = list.into_iter().next();
                    }
                    Err(e) => {
                        tracing::warn!("Schedule resync after failed save also failed: {}", e)
                    }
                }
                Ok(())
            }
        }
    }
}
