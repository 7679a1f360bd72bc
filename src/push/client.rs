//! Notification stream client.
//!
//! Connects to a Server-Sent Events endpoint and forwards every
//! `notification` event into the engine. Reconnection lives here; the engine
//! only ever sees payloads.

use std::time::Duration;

use anyhow::{Context, Result};
use futures::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::sse::{SseDecoder, SseFrame};
use crate::engine::EngineHandle;

/// Event name carrying notification payloads.
pub const NOTIFICATION_EVENT: &str = "notification";

const LAST_EVENT_ID_HEADER: &str = "Last-Event-ID";

pub struct PushClient {
    http_client: Client,
    url: String,
    reconnect_delay: Duration,
    last_event_id: Option<String>,
}

impl PushClient {
    pub fn new(url: impl Into<String>, reconnect_delay: Duration) -> Self {
        Self {
            http_client: Client::new(),
            url: url.into(),
            reconnect_delay,
            last_event_id: None,
        }
    }

    /// Stream notifications into `engine` until the engine stops, reconnecting
    /// whenever the stream ends or fails.
    pub async fn run(mut self, engine: EngineHandle) {
        loop {
            match self.stream_once(&engine).await {
                Ok(()) => info!("Notification stream closed by server"),
                Err(e) => warn!("Notification stream error: {:#}", e),
            }

            if engine.is_closed() {
                debug!("Engine stopped, no reconnect");
                break;
            }

            debug!("Reconnecting in {:?}", self.reconnect_delay);
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    async fn stream_once(&mut self, engine: &EngineHandle) -> Result<()> {
        let mut request = self
            .http_client
            .get(&self.url)
            .header(ACCEPT, "text/event-stream");
        if let Some(id) = &self.last_event_id {
            request = request.header(LAST_EVENT_ID_HEADER, id);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to connect to {}", self.url))?
            .error_for_status()?;
        info!("Connected to notification stream {}", self.url);

        let mut decoder = SseDecoder::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Notification stream read failed")?;
            for frame in decoder.feed(&chunk)? {
                forward_frame(engine, frame).await?;
            }
            if let Some(id) = decoder.last_event_id() {
                self.last_event_id = Some(id.to_string());
            }
            if let Some(retry) = decoder.retry() {
                self.reconnect_delay = retry;
            }
        }
        Ok(())
    }
}

/// Forward a decoded frame if it carries a notification. Returns whether it did.
pub async fn forward_frame(engine: &EngineHandle, frame: SseFrame) -> Result<bool> {
    if frame.event != NOTIFICATION_EVENT {
        debug!("Ignoring stream event {:?}", frame.event);
        return Ok(false);
    }
    engine.push_payload(frame.data).await?;
    Ok(true)
}
