//! Indicator and attention policy.
//!
//! The indicator always shows the highest severity in the log. The attention
//! animation is an escalation signal: it fires on ingestion only, and only
//! when the incoming record is strictly more severe than anything already
//! present (or the log was empty).

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use super::models::Severity;
use super::severity::priority;
use crate::render::RenderSink;

pub const DEFAULT_ATTENTION_DURATION: Duration = Duration::from_millis(500);

/// Whether ingesting `incoming` should fire the attention animation, given
/// the highest severity present before the ingestion.
pub fn should_attend(previous_highest: Option<Severity>, incoming: Severity) -> bool {
    match previous_highest {
        None => true,
        Some(previous) => priority(incoming) > priority(previous),
    }
}

/// One-shot attention animation with a cancellable deferred clear.
///
/// Starting a new animation while one is pending aborts the pending clear, so
/// an older timer can never cut a newer animation short.
pub struct AttentionTimer {
    duration: Duration,
    pending: Option<JoinHandle<()>>,
}

impl AttentionTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            pending: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Trigger the animation and schedule its clear. Must be called from
    /// within a tokio runtime.
    pub fn start(&mut self, sink: Arc<dyn RenderSink>) {
        if self.cancel() {
            // Restart the animation from its first frame.
            sink.clear_attention();
        }
        sink.trigger_attention();

        let duration = self.duration;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            sink.clear_attention();
        }));
        debug!("Attention animation started for {:?}", duration);
    }

    /// Abort the pending clear, if any. Returns true when one was still pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Default for AttentionTimer {
    fn default() -> Self {
        Self::new(DEFAULT_ATTENTION_DURATION)
    }
}

impl Drop for AttentionTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawers::DrawerState;
    use crate::notifications::{ClearAction, Notification};
    use crate::theme::{EffectiveTheme, ThemePreference};
    use std::sync::Mutex;

    #[derive(Default)]
    struct AttentionRecorder {
        calls: Mutex<Vec<&'static str>>,
    }

    impl AttentionRecorder {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl RenderSink for AttentionRecorder {
        fn render(&self, _log: &[Notification], _clear_action: Option<&ClearAction>) {}
        fn render_indicator(&self, _severity: Option<Severity>) {}
        fn trigger_attention(&self) {
            self.calls.lock().unwrap().push("trigger");
        }
        fn clear_attention(&self) {
            self.calls.lock().unwrap().push("clear");
        }
        fn render_theme(&self, _preference: ThemePreference, _effective: EffectiveTheme) {}
        fn render_drawers(&self, _drawers: &DrawerState) {}
    }

    #[test]
    fn test_should_attend_on_empty_log() {
        for severity in Severity::ALL {
            assert!(should_attend(None, severity));
        }
    }

    #[test]
    fn test_should_attend_only_on_escalation() {
        assert!(!should_attend(Some(Severity::Warning), Severity::Info));
        assert!(!should_attend(Some(Severity::Warning), Severity::Warning));
        assert!(should_attend(Some(Severity::Warning), Severity::Error));
        assert!(should_attend(Some(Severity::Info), Severity::Success));
        assert!(!should_attend(Some(Severity::Error), Severity::Error));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_clears_after_duration() {
        let recorder = Arc::new(AttentionRecorder::default());
        let mut timer = AttentionTimer::new(Duration::from_millis(500));

        timer.start(recorder.clone());
        assert_eq!(recorder.calls(), vec!["trigger"]);
        assert!(timer.is_pending());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(recorder.calls(), vec!["trigger"]);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(recorder.calls(), vec!["trigger", "clear"]);
        assert!(!timer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_cancels_pending_clear() {
        let recorder = Arc::new(AttentionRecorder::default());
        let mut timer = AttentionTimer::new(Duration::from_millis(500));

        timer.start(recorder.clone());
        tokio::time::sleep(Duration::from_millis(300)).await;
        timer.start(recorder.clone());
        assert_eq!(recorder.calls(), vec!["trigger", "clear", "trigger"]);

        // The first timer would have fired at 500ms; it must not.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(recorder.calls(), vec!["trigger", "clear", "trigger"]);

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(
            recorder.calls(),
            vec!["trigger", "clear", "trigger", "clear"]
        );
    }
}
