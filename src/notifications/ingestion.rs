//! Parsing of pushed notification payloads.
//!
//! Payloads are JSON objects `{id, severity, title, message, timestamp}`.
//! Anything malformed is rejected as a whole; there is no partial record.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;

use super::models::{Notification, ParseSeverityError, Severity};

/// Errors that can occur while turning a pushed payload into a notification.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Invalid payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    UnknownSeverity(#[from] ParseSeverityError),

    #[error("Notification id must not be empty")]
    EmptyId,

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PayloadId {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PayloadTimestamp {
    EpochMillis(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct NotificationPayload {
    id: PayloadId,
    severity: String,
    title: String,
    message: String,
    timestamp: PayloadTimestamp,
}

/// Parse a raw event payload into a [`Notification`].
pub fn parse_payload(raw: &str) -> Result<Notification, PayloadError> {
    let payload: NotificationPayload = serde_json::from_str(raw)?;

    let id = match payload.id {
        PayloadId::Text(id) => id,
        PayloadId::Number(n) => n.to_string(),
    };
    if id.is_empty() {
        return Err(PayloadError::EmptyId);
    }

    let severity: Severity = payload.severity.parse()?;
    let timestamp = parse_timestamp(payload.timestamp)?;

    Ok(Notification {
        id,
        severity,
        title: payload.title,
        message: payload.message,
        timestamp,
    })
}

fn parse_timestamp(timestamp: PayloadTimestamp) -> Result<DateTime<Utc>, PayloadError> {
    match timestamp {
        PayloadTimestamp::EpochMillis(ms) => Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| PayloadError::InvalidTimestamp(ms.to_string())),
        PayloadTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| PayloadError::InvalidTimestamp(text)),
    }
}
