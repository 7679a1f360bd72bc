//! Open/closed state of the notifications and preferences drawers.
//!
//! The two drawers are mutually exclusive: opening one closes the other.

use serde::Serialize;

/// Events that move the drawer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerEvent {
    /// The notifications button was pressed.
    ToggleNotifications,
    /// The preferences button was pressed.
    TogglePreferences,
    /// A click landed outside both drawers and their buttons.
    ClickOutside { log_is_empty: bool },
    /// A clear action removed every notification.
    ClearedAll,
    /// A notification was ingested.
    Ingested,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrawerState {
    pub notifications_open: bool,
    pub preferences_open: bool,
    /// Something arrived while the notifications drawer was closed.
    pub unread: bool,
}

impl DrawerState {
    /// Transition table.
    pub fn apply(self, event: DrawerEvent) -> DrawerState {
        match event {
            DrawerEvent::ToggleNotifications => {
                let notifications_open = !self.notifications_open;
                DrawerState {
                    notifications_open,
                    preferences_open: self.preferences_open && !notifications_open,
                    unread: false,
                }
            }
            DrawerEvent::TogglePreferences => DrawerState {
                notifications_open: false,
                preferences_open: !self.preferences_open,
                ..self
            },
            DrawerEvent::ClickOutside { log_is_empty } => DrawerState {
                // A non-empty notifications drawer stays open on outside clicks.
                notifications_open: self.notifications_open && !log_is_empty,
                preferences_open: false,
                ..self
            },
            DrawerEvent::ClearedAll => DrawerState {
                notifications_open: false,
                ..self
            },
            DrawerEvent::Ingested => DrawerState {
                unread: self.unread || !self.notifications_open,
                ..self
            },
        }
    }
}
