//! Render sink contract.
//!
//! The engine pushes derived UI state here after every change; it never reads
//! anything back.

use tracing::{debug, info};

use crate::drawers::DrawerState;
use crate::notifications::{ClearAction, Notification, Severity};
use crate::theme::{EffectiveTheme, ThemePreference};

pub trait RenderSink: Send + Sync {
    /// Redraw the notification list and the clear button.
    fn render(&self, log: &[Notification], clear_action: Option<&ClearAction>);

    /// Redraw the unread indicator; `None` hides it.
    fn render_indicator(&self, severity: Option<Severity>);

    /// Start the one-shot attention animation.
    fn trigger_attention(&self);

    /// Stop the attention animation.
    fn clear_attention(&self);

    fn render_theme(&self, preference: ThemePreference, effective: EffectiveTheme);

    fn render_drawers(&self, drawers: &DrawerState);
}

/// Sink that reports every render call through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRenderSink;

impl RenderSink for TracingRenderSink {
    fn render(&self, log: &[Notification], clear_action: Option<&ClearAction>) {
        info!(
            "Notifications: {} (clear button: {})",
            log.len(),
            clear_action.map(|a| a.label()).unwrap_or("hidden")
        );
        for n in log {
            debug!(
                "  [{}] {} - {}: {} ({})",
                n.severity,
                n.id,
                n.title,
                n.message,
                n.timestamp.to_rfc3339()
            );
        }
    }

    fn render_indicator(&self, severity: Option<Severity>) {
        match severity {
            Some(severity) => info!("Indicator: {}", severity),
            None => info!("Indicator: none"),
        }
    }

    fn trigger_attention(&self) {
        info!("Attention animation on");
    }

    fn clear_attention(&self) {
        debug!("Attention animation off");
    }

    fn render_theme(&self, preference: ThemePreference, effective: EffectiveTheme) {
        info!("Theme: {} (effective {})", preference, effective);
    }

    fn render_drawers(&self, drawers: &DrawerState) {
        debug!(
            "Drawers: notifications={} preferences={} unread={}",
            drawers.notifications_open, drawers.preferences_open, drawers.unread
        );
    }
}
