//! Incremental Server-Sent Events decoder.
//!
//! Bytes may arrive split at arbitrary points, including inside a UTF-8
//! sequence; only complete lines are interpreted. An `id:` field takes effect
//! only once its frame is dispatched.

use std::time::Duration;

use thiserror::Error;

/// Event name used when a frame carries no `event:` field.
pub const DEFAULT_EVENT: &str = "message";

/// Longest line accepted before the stream is considered broken.
pub const MAX_LINE_LEN: usize = 64 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SseError {
    #[error("Event stream line exceeds {limit} bytes")]
    LineTooLong { limit: usize },
}

/// One dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
    /// Last event id seen on the stream when this frame was dispatched.
    pub id: Option<String>,
}

#[derive(Debug)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
    pending_id: Option<String>,
    last_event_id: Option<String>,
    retry: Option<Duration>,
    max_line_len: usize,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::with_max_line_len(MAX_LINE_LEN)
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line_len(max_line_len: usize) -> Self {
        Self {
            buffer: Vec::new(),
            event: None,
            data: Vec::new(),
            pending_id: None,
            last_event_id: None,
            retry: None,
            max_line_len,
        }
    }

    /// Feed the next chunk of the stream, returning every frame it completes.
    ///
    /// Fails when a line grows past the limit without a terminator; the
    /// decoder should then be discarded along with its connection.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<SseFrame>, SseError> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line);
            if let Some(frame) = self.process_line(&line) {
                frames.push(frame);
            }
        }
        if self.buffer.len() > self.max_line_len {
            self.buffer.clear();
            return Err(SseError::LineTooLong {
                limit: self.max_line_len,
            });
        }
        Ok(frames)
    }

    /// Id of the last dispatched frame, suitable for `Last-Event-ID`.
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    /// Reconnection delay requested by the server, if any.
    pub fn retry(&self) -> Option<Duration> {
        self.retry
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            "id" if !value.contains('\0') => self.pending_id = Some(value.to_string()),
            "retry" => {
                if let Ok(ms) = value.parse::<u64>() {
                    self.retry = Some(Duration::from_millis(ms));
                }
            }
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        if let Some(id) = self.pending_id.take() {
            self.last_event_id = Some(id);
        }
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseFrame {
            event: event.unwrap_or_else(|| DEFAULT_EVENT.to_string()),
            data,
            id: self.last_event_id.clone(),
        })
    }
}
