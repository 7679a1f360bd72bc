//! Inbound push channel: Server-Sent Events decoding and the stream client.

mod client;
mod sse;

pub use client::{forward_frame, PushClient, NOTIFICATION_EVENT};
pub use sse::{SseDecoder, SseError, SseFrame, DEFAULT_EVENT, MAX_LINE_LEN};
