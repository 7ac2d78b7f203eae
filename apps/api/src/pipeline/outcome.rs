//! Per-stage result wrapper.
//!
//! Degradation is a first-class value here, not an error: a stage that falls
//! back still yields a usable value, and the disposition travels with it so
//! the orchestrator can record what actually happened.

use crate::models::report::{StageReport, StageStatus};

#[derive(Debug, Clone)]
pub struct StageOutcome<T> {
    value: T,
    status: StageStatus,
}

impl<T> StageOutcome<T> {
    pub fn completed(value: T) -> Self {
        Self {
            value,
            status: StageStatus::Completed,
        }
    }

    pub fn fallback(value: T, reason: impl Into<String>) -> Self {
        Self {
            value,
            status: StageStatus::Fallback {
                reason: reason.into(),
            },
        }
    }

    /// Partial success: the stage finished but skipped the named units.
    /// An empty skip list collapses to `Completed`.
    pub fn partial(value: T, skipped: Vec<String>) -> Self {
        if skipped.is_empty() {
            Self::completed(value)
        } else {
            Self {
                value,
                status: StageStatus::Partial { skipped },
            }
        }
    }

    pub fn report(&self, stage: &'static str) -> StageReport {
        StageReport {
            stage,
            status: self.status.clone(),
        }
    }

    pub fn status(&self) -> &StageStatus {
        &self.status
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}
