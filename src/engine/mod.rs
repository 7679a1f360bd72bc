//! The notification center engine.
//!
//! Holds the store-backed log, the theme engine, the drawer state, the
//! attention timer and the render sink, and applies [`EngineEvent`]s one at a
//! time. Each event runs to completion (persist, then render) before the next
//! one is taken.

mod handle;

pub use handle::EngineHandle;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::drawers::{DrawerEvent, DrawerState};
use crate::notifications::{
    clear_action, highest_severity, parse_payload, should_attend, AttentionTimer, Notification,
    NotificationLog,
};
use crate::render::RenderSink;
use crate::store::KeyValueStore;
use crate::theme::ThemeEngine;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Inputs the engine reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Raw payload of a pushed `notification` event.
    Payload(String),
    /// An already-parsed notification.
    Ingest(Notification),
    /// The user dismissed one notification.
    Dismiss(String),
    /// The user pressed the clear button.
    Clear,
    ToggleTheme,
    AmbientChanged { prefers_dark: bool },
    ToggleNotifications,
    TogglePreferences,
    ClickOutside,
}

pub struct Engine {
    log: NotificationLog,
    theme: ThemeEngine,
    drawers: DrawerState,
    attention: AttentionTimer,
    sink: Arc<dyn RenderSink>,
}

impl Engine {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn RenderSink>,
        prefers_dark: bool,
        attention_duration: Duration,
    ) -> Self {
        Self {
            log: NotificationLog::load(store.clone()),
            theme: ThemeEngine::load(store, prefers_dark),
            drawers: DrawerState::default(),
            attention: AttentionTimer::new(attention_duration),
            sink,
        }
    }

    pub fn log(&self) -> &NotificationLog {
        &self.log
    }

    pub fn theme(&self) -> &ThemeEngine {
        &self.theme
    }

    pub fn drawers(&self) -> DrawerState {
        self.drawers
    }

    pub fn attention_pending(&self) -> bool {
        self.attention.is_pending()
    }

    /// Push the complete current state to the sink.
    pub fn render_all(&self) {
        self.render_log();
        let theme = self.theme.current();
        self.sink.render_theme(theme.preference, theme.effective);
        self.sink.render_drawers(&self.drawers);
    }

    pub fn handle(&mut self, event: EngineEvent) {
        debug!("Handling {:?}", event);
        match event {
            EngineEvent::Payload(raw) => match parse_payload(&raw) {
                Ok(notification) => self.ingest(notification),
                Err(e) => warn!("Dropping notification event: {}", e),
            },
            EngineEvent::Ingest(notification) => self.ingest(notification),
            EngineEvent::Dismiss(id) => self.dismiss(&id),
            EngineEvent::Clear => self.clear(),
            EngineEvent::ToggleTheme => self.toggle_theme(),
            EngineEvent::AmbientChanged { prefers_dark } => {
                if let Some(change) = self.theme.set_ambient(prefers_dark) {
                    self.sink.render_theme(change.preference, change.effective);
                }
            }
            EngineEvent::ToggleNotifications => self.apply_drawer(DrawerEvent::ToggleNotifications),
            EngineEvent::TogglePreferences => self.apply_drawer(DrawerEvent::TogglePreferences),
            EngineEvent::ClickOutside => self.apply_drawer(DrawerEvent::ClickOutside {
                log_is_empty: self.log.is_empty(),
            }),
        }
    }

    fn ingest(&mut self, notification: Notification) {
        let previous_highest = highest_severity(self.log.records());
        let severity = notification.severity;
        let id = notification.id.clone();

        if let Err(e) = self.log.append(notification) {
            error!("Failed to store notification {}: {:#}", id, e);
            return;
        }
        info!("Notification {} ({}) received", id, severity);

        self.render_log();
        self.apply_drawer(DrawerEvent::Ingested);

        if should_attend(previous_highest, severity) {
            self.attention.start(self.sink.clone());
        }
    }

    fn dismiss(&mut self, id: &str) {
        match self.log.remove_by_id(id) {
            Ok(0) => debug!("Dismiss of unknown notification {}", id),
            Ok(removed) => {
                debug!("Dismissed {} notification(s) with id {}", removed, id);
                self.render_log();
            }
            Err(e) => error!("Failed to dismiss notification {}: {:#}", id, e),
        }
    }

    fn clear(&mut self) {
        let Some(action) = clear_action(self.log.records()) else {
            debug!("Clear requested on an empty log");
            return;
        };

        match self.log.remove_where(|n| !action.retains(n)) {
            Ok(removed) => {
                info!("{}: removed {} notification(s)", action.label(), removed);
                self.render_log();
                if action.clears_all() {
                    self.apply_drawer(DrawerEvent::ClearedAll);
                }
            }
            Err(e) => error!("Failed to clear notifications: {:#}", e),
        }
    }

    fn toggle_theme(&mut self) {
        match self.theme.toggle() {
            Ok(change) => self.sink.render_theme(change.preference, change.effective),
            Err(e) => error!("Failed to toggle theme: {:#}", e),
        }
    }

    fn apply_drawer(&mut self, event: DrawerEvent) {
        let next = self.drawers.apply(event);
        if next != self.drawers {
            self.drawers = next;
            self.sink.render_drawers(&self.drawers);
        }
    }

    fn render_log(&self) {
        let records = self.log.records();
        let action = clear_action(records);
        self.sink.render(records, action.as_ref());
        self.sink.render_indicator(highest_severity(records));
    }

    /// Process events until every [`EngineHandle`] is dropped, following the
    /// ambient color-scheme signal along the way.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<EngineEvent>,
        mut ambient: watch::Receiver<bool>,
    ) {
        let prefers_dark = *ambient.borrow_and_update();
        self.theme.set_ambient(prefers_dark);
        self.render_all();

        let mut ambient_open = true;
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
                changed = ambient.changed(), if ambient_open => match changed {
                    Ok(()) => {
                        let prefers_dark = *ambient.borrow_and_update();
                        self.handle(EngineEvent::AmbientChanged { prefers_dark });
                    }
                    Err(_) => {
                        debug!("Ambient signal source dropped");
                        ambient_open = false;
                    }
                },
            }
        }

        self.attention.cancel();
        info!("Notification engine stopped");
    }

    /// Run the engine on its own task.
    pub fn spawn(self, ambient: watch::Receiver<bool>) -> (EngineHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let task = tokio::spawn(self.run(rx, ambient));
        (EngineHandle::new(tx), task)
    }
}
