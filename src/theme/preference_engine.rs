use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::{EffectiveTheme, ThemePreference};
use crate::store::{KeyValueStore, THEME_KEY};

/// Result of a theme transition, ready to hand to the render sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeChange {
    pub preference: ThemePreference,
    pub effective: EffectiveTheme,
}

/// Holds the persisted preference and the last known ambient signal.
pub struct ThemeEngine {
    store: Arc<dyn KeyValueStore>,
    preference: ThemePreference,
    prefers_dark: bool,
}

impl ThemeEngine {
    /// Load the stored preference, defaulting to `auto` when it is missing or
    /// unrecognized.
    pub fn load(store: Arc<dyn KeyValueStore>, prefers_dark: bool) -> Self {
        let preference = match store.get(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                warn!("{}, falling back to auto", e);
                ThemePreference::Auto
            }),
            Ok(None) => ThemePreference::Auto,
            Err(e) => {
                warn!("Failed to read theme preference: {:#}", e);
                ThemePreference::Auto
            }
        };
        debug!("Theme preference loaded: {}", preference);

        Self {
            store,
            preference,
            prefers_dark,
        }
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }

    pub fn effective(&self) -> EffectiveTheme {
        self.preference.resolve(self.prefers_dark)
    }

    pub fn current(&self) -> ThemeChange {
        ThemeChange {
            preference: self.preference,
            effective: self.effective(),
        }
    }

    /// Advance to the next preference in the ambient-dependent cycle and
    /// persist it.
    pub fn toggle(&mut self) -> Result<ThemeChange> {
        let next = self.preference.next(self.prefers_dark);
        self.store
            .set(THEME_KEY, next.as_str())
            .context("Failed to persist theme preference")?;
        info!("Theme preference {} -> {}", self.preference, next);
        self.preference = next;
        Ok(self.current())
    }

    /// Record a new ambient signal. Returns the change to render when the
    /// effective theme follows the signal, i.e. the preference is `auto`.
    pub fn set_ambient(&mut self, prefers_dark: bool) -> Option<ThemeChange> {
        if self.prefers_dark == prefers_dark {
            return None;
        }
        self.prefers_dark = prefers_dark;
        if self.preference != ThemePreference::Auto {
            debug!("Ambient scheme changed under explicit {} preference", self.preference);
            return None;
        }
        Some(self.current())
    }
}
