//! Topic validation
//!
//! Canonical topics come from a fixed lowercase set; custom topics are
//! free-form but constrained in length and charset. Both checks run before
//! any network call.

use crate::api::CANONICAL_TOPICS;
use crate::error::{DailyFetchError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Custom topic names: 2-40 chars, leading alphanumeric, then letters,
/// digits, spaces, hyphens or ampersands.
fn custom_topic_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 &\-]{1,39}$").expect("custom topic pattern compiles")
    })
}

/// Check whether an identifier is one of the canonical topics
pub fn is_canonical_topic(topic: &str) -> bool {
    CANONICAL_TOPICS.contains(&topic)
}

/// Validate a canonical topic identifier
///
/// # Errors
///
/// Returns `DailyFetchError::Validation` for identifiers outside the
/// canonical set. Matching is case-sensitive; canonical identifiers are
/// lowercase by contract.
pub fn validate_canonical_topic(topic: &str) -> Result<()> {
    if is_canonical_topic(topic) {
        Ok(())
    } else {
        Err(DailyFetchError::Validation(format!("Unknown topic '{}'", topic)).into())
    }
}

/// Validate a user-defined topic name
///
/// # Errors
///
/// Returns `DailyFetchError::Validation` with a user-facing message when
/// the name is too short, too long, or contains disallowed characters
///
/// # Examples
///
/// ```
/// use dailyfetch::schedule::validate_custom_topic;
///
/// assert!(validate_custom_topic("AI policy").is_ok());
/// assert!(validate_custom_topic("").is_err());
/// ```
pub fn validate_custom_topic(name: &str) -> Result<()> {
    if custom_topic_pattern().is_match(name) {
        Ok(())
    } else {
        Err(DailyFetchError::Validation(format!(
            "Custom topic '{}' must be 2-40 characters: letters, digits, spaces, hyphens or ampersands, starting with a letter or digit",
            name
        ))
        .into())
    }
}
