//! Builders for notifications, payloads and running engines.

use chrono::{TimeZone, Utc};
use notification_center::{
    Engine, EngineHandle, KeyValueStore, Notification, RenderSink, Severity,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const ATTENTION: Duration = Duration::from_millis(500);

/// Fixed creation instant used by every fixture.
pub const FIXTURE_TIMESTAMP_MS: i64 = 1_700_000_000_000;

#[allow(dead_code)]
pub fn notification(id: &str, severity: Severity) -> Notification {
    Notification::new(
        id,
        severity,
        format!("{} title", id),
        format!("{} message", id),
        Utc.timestamp_millis_opt(FIXTURE_TIMESTAMP_MS).unwrap(),
    )
}

/// JSON payload as it arrives on the push channel.
#[allow(dead_code)]
pub fn payload(id: &str, severity: Severity) -> String {
    serde_json::json!({
        "id": id,
        "severity": severity.as_str(),
        "title": format!("{} title", id),
        "message": format!("{} message", id),
        "timestamp": FIXTURE_TIMESTAMP_MS,
    })
    .to_string()
}

/// A spawned engine together with the sender of its ambient signal.
#[allow(dead_code)]
pub struct RunningEngine {
    pub handle: EngineHandle,
    pub ambient: watch::Sender<bool>,
    pub task: JoinHandle<()>,
}

#[allow(dead_code)]
impl RunningEngine {
    pub fn spawn(
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn RenderSink>,
        prefers_dark: bool,
    ) -> Self {
        let (ambient, ambient_rx) = watch::channel(prefers_dark);
        let engine = Engine::new(store, sink, prefers_dark, ATTENTION);
        let (handle, task) = engine.spawn(ambient_rx);
        Self {
            handle,
            ambient,
            task,
        }
    }

    /// Drop the handle and wait for every queued event to be applied.
    pub async fn shutdown(self) {
        drop(self.handle);
        self.task.await.unwrap();
    }
}
