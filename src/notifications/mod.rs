//! Notification log, severity policy and push ingestion.

mod attention;
mod ingestion;
mod log;
mod models;
mod severity;

pub use attention::{should_attend, AttentionTimer, DEFAULT_ATTENTION_DURATION};
pub use ingestion::{parse_payload, PayloadError};
pub use log::NotificationLog;
pub use models::{Notification, ParseSeverityError, Severity};
pub use severity::{clear_action, highest_severity, priority, ClearAction, ClearTier};
