//! Appearance preference: a persisted `auto`/`light`/`dark` choice reconciled
//! with the environment's ambient color-scheme signal.

mod preference_engine;

pub use preference_engine::{ThemeChange, ThemeEngine};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The stored user choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Auto,
    Light,
    Dark,
}

/// The rendering mode after resolving `auto` against the ambient signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveTheme {
    Light,
    Dark,
}

impl EffectiveTheme {
    pub fn from_ambient(prefers_dark: bool) -> Self {
        if prefers_dark {
            EffectiveTheme::Dark
        } else {
            EffectiveTheme::Light
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectiveTheme::Light => "light",
            EffectiveTheme::Dark => "dark",
        }
    }
}

impl fmt::Display for EffectiveTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown theme preference: {0:?}")]
pub struct ParseThemeError(pub String);

impl ThemePreference {
    /// Cycle used under a dark ambient scheme.
    const DARK_CYCLE: [ThemePreference; 3] = [
        ThemePreference::Auto,
        ThemePreference::Light,
        ThemePreference::Dark,
    ];
    /// Cycle used under a light ambient scheme.
    const LIGHT_CYCLE: [ThemePreference; 3] = [
        ThemePreference::Auto,
        ThemePreference::Dark,
        ThemePreference::Light,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Auto => "auto",
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    pub fn resolve(&self, prefers_dark: bool) -> EffectiveTheme {
        match self {
            ThemePreference::Dark => EffectiveTheme::Dark,
            ThemePreference::Light => EffectiveTheme::Light,
            ThemePreference::Auto => EffectiveTheme::from_ambient(prefers_dark),
        }
    }

    /// The preference a toggle moves to. The cycle direction follows the
    /// ambient scheme, so a visibly different theme is at most two toggles away.
    pub fn next(&self, prefers_dark: bool) -> ThemePreference {
        let cycle = match EffectiveTheme::from_ambient(prefers_dark) {
            EffectiveTheme::Dark => &Self::DARK_CYCLE,
            EffectiveTheme::Light => &Self::LIGHT_CYCLE,
        };
        let index = cycle.iter().position(|p| p == self).unwrap_or(0);
        cycle[(index + 1) % cycle.len()]
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ThemePreference::Auto),
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}
