//! Notification Center Library
//!
//! Client-side state engine for a page's notification center and theme
//! preference control. Exposes the internal modules for the binary and tests.

pub mod commands;
pub mod config;
pub mod drawers;
pub mod engine;
pub mod notifications;
pub mod push;
pub mod render;
pub mod sqlite_persistence;
pub mod store;
pub mod theme;

// Re-export commonly used types for convenience
pub use engine::{Engine, EngineEvent, EngineHandle};
pub use notifications::{Notification, NotificationLog, Severity};
pub use render::{RenderSink, TracingRenderSink};
pub use store::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use theme::{EffectiveTheme, ThemePreference};
