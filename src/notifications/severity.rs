//! Severity policy: priority ordering, highest severity and the progressive
//! clear action. Everything here is a pure function of a log snapshot.

use super::models::{Notification, Severity};

/// Fixed total order: error(3) > warning(2) > success(1) > info(0).
pub fn priority(severity: Severity) -> u8 {
    match severity {
        Severity::Info => 0,
        Severity::Success => 1,
        Severity::Warning => 2,
        Severity::Error => 3,
    }
}

/// Highest-priority severity present, or `None` for an empty log.
pub fn highest_severity(log: &[Notification]) -> Option<Severity> {
    log.iter().map(|n| n.severity).max_by_key(|s| priority(*s))
}

/// Which tier a clear action peels off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearTier {
    /// Drops info and success, keeps warnings and errors.
    Informational,
    /// Drops warnings, keeps errors.
    Warnings,
    /// Drops everything.
    All,
}

/// The bulk-removal action currently offered for the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearAction {
    pub tier: ClearTier,
}

impl ClearAction {
    pub fn label(&self) -> &'static str {
        match self.tier {
            ClearTier::Informational => "Clear informational",
            ClearTier::Warnings => "Clear warnings",
            ClearTier::All => "Clear all",
        }
    }

    /// Whether `notification` survives this action.
    pub fn retains(&self, notification: &Notification) -> bool {
        match self.tier {
            ClearTier::Informational => {
                matches!(notification.severity, Severity::Error | Severity::Warning)
            }
            ClearTier::Warnings => notification.severity == Severity::Error,
            ClearTier::All => false,
        }
    }

    pub fn clears_all(&self) -> bool {
        self.tier == ClearTier::All
    }
}

#[derive(Debug, Default)]
struct SeverityCounts {
    info: usize,
    success: usize,
    warning: usize,
    error: usize,
}

impl SeverityCounts {
    fn of(log: &[Notification]) -> Self {
        log.iter().fold(Self::default(), |mut acc, n| {
            match n.severity {
                Severity::Info => acc.info += 1,
                Severity::Success => acc.success += 1,
                Severity::Warning => acc.warning += 1,
                Severity::Error => acc.error += 1,
            }
            acc
        })
    }
}

/// Decide the clear action for the current log, least-severe tier first.
pub fn clear_action(log: &[Notification]) -> Option<ClearAction> {
    let counts = SeverityCounts::of(log);

    let tier = if counts.info > 0 || counts.success > 0 {
        ClearTier::Informational
    } else if counts.warning > 0 {
        ClearTier::Warnings
    } else if counts.error > 0 {
        ClearTier::All
    } else {
        return None;
    };

    Some(ClearAction { tier })
}
