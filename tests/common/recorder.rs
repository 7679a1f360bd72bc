//! Render sink that records every call for later assertions.

use notification_center::drawers::DrawerState;
use notification_center::notifications::{ClearAction, ClearTier};
use notification_center::{EffectiveTheme, Notification, RenderSink, Severity, ThemePreference};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Log {
        ids: Vec<String>,
        clear_tier: Option<ClearTier>,
    },
    Indicator(Option<Severity>),
    TriggerAttention,
    ClearAttention,
    Theme(ThemePreference, EffectiveTheme),
    Drawers(DrawerState),
}

#[derive(Default)]
pub struct RecordingRenderSink {
    calls: Mutex<Vec<RenderCall>>,
}

#[allow(dead_code)]
impl RecordingRenderSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Drop everything recorded so far.
    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn trigger_count(&self) -> usize {
        self.count(|c| matches!(c, RenderCall::TriggerAttention))
    }

    pub fn clear_attention_count(&self) -> usize {
        self.count(|c| matches!(c, RenderCall::ClearAttention))
    }

    /// Ids of the most recently rendered log.
    pub fn last_log(&self) -> Option<Vec<String>> {
        self.calls().into_iter().rev().find_map(|c| match c {
            RenderCall::Log { ids, .. } => Some(ids),
            _ => None,
        })
    }

    pub fn last_clear_tier(&self) -> Option<ClearTier> {
        self.calls().into_iter().rev().find_map(|c| match c {
            RenderCall::Log { clear_tier, .. } => Some(clear_tier),
            _ => None,
        })?
    }

    pub fn last_indicator(&self) -> Option<Option<Severity>> {
        self.calls().into_iter().rev().find_map(|c| match c {
            RenderCall::Indicator(severity) => Some(severity),
            _ => None,
        })
    }

    pub fn last_theme(&self) -> Option<(ThemePreference, EffectiveTheme)> {
        self.calls().into_iter().rev().find_map(|c| match c {
            RenderCall::Theme(preference, effective) => Some((preference, effective)),
            _ => None,
        })
    }

    pub fn last_drawers(&self) -> Option<DrawerState> {
        self.calls().into_iter().rev().find_map(|c| match c {
            RenderCall::Drawers(state) => Some(state),
            _ => None,
        })
    }

    fn count(&self, predicate: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    fn push(&self, call: RenderCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl RenderSink for RecordingRenderSink {
    fn render(&self, log: &[Notification], clear_action: Option<&ClearAction>) {
        self.push(RenderCall::Log {
            ids: log.iter().map(|n| n.id.clone()).collect(),
            clear_tier: clear_action.map(|a| a.tier),
        });
    }

    fn render_indicator(&self, severity: Option<Severity>) {
        self.push(RenderCall::Indicator(severity));
    }

    fn trigger_attention(&self) {
        self.push(RenderCall::TriggerAttention);
    }

    fn clear_attention(&self) {
        self.push(RenderCall::ClearAttention);
    }

    fn render_theme(&self, preference: ThemePreference, effective: EffectiveTheme) {
        self.push(RenderCall::Theme(preference, effective));
    }

    fn render_drawers(&self, drawers: &DrawerState) {
        self.push(RenderCall::Drawers(*drawers));
    }
}
