//! Notification data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Urgency of a notification. Closed set; anything else is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Info,
        Severity::Success,
        Severity::Warning,
        Severity::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown severity: {0:?}")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "success" => Ok(Severity::Success),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            other => Err(ParseSeverityError(other.to_string())),
        }
    }
}

/// A notification as stored in the log. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Producer-assigned identifier, the only key used for dismissal.
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    /// Creation instant as reported by the producer. Display only.
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        id: impl Into<String>,
        severity: Severity,
        title: impl Into<String>,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            title: title.into(),
            message: message.into(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_severity_serialization() {
        let serialized = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(serialized, "\"warning\"");

        let deserialized: Severity = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(deserialized, Severity::Success);
    }

    #[test]
    fn test_severity_from_str() {
        for severity in Severity::ALL {
            assert_eq!(severity.as_str().parse::<Severity>(), Ok(severity));
        }
        assert_eq!(
            "critical".parse::<Severity>(),
            Err(ParseSeverityError("critical".to_string()))
        );
        assert!("Error".parse::<Severity>().is_err());
    }

    #[test]
    fn test_notification_serialization() {
        let notification = Notification::new(
            "notif-123",
            Severity::Error,
            "Build failed",
            "Step 3 exited with code 1",
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        );

        let serialized = serde_json::to_value(&notification).unwrap();
        assert_eq!(serialized["id"], "notif-123");
        assert_eq!(serialized["severity"], "error");
        assert_eq!(serialized["timestamp"], "2024-03-01T12:30:00Z");

        let deserialized: Notification = serde_json::from_value(serialized).unwrap();
        assert_eq!(deserialized, notification);
    }
}
