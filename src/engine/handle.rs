use anyhow::{anyhow, Result};
use tokio::sync::mpsc;

use super::EngineEvent;

/// Cloneable sender side of a running [`super::Engine`].
///
/// Events are applied strictly in the order they are accepted here.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineEvent>,
}

impl EngineHandle {
    pub(super) fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }

    pub async fn send(&self, event: EngineEvent) -> Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| anyhow!("Notification engine has stopped"))
    }

    /// Forward the raw payload of a pushed notification event.
    pub async fn push_payload(&self, raw: impl Into<String>) -> Result<()> {
        self.send(EngineEvent::Payload(raw.into())).await
    }

    pub async fn dismiss(&self, id: impl Into<String>) -> Result<()> {
        self.send(EngineEvent::Dismiss(id.into())).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.send(EngineEvent::Clear).await
    }

    pub async fn toggle_theme(&self) -> Result<()> {
        self.send(EngineEvent::ToggleTheme).await
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
