//! Repair lifecycle transitions.
//!
//! A defect moves along a fixed chain with exactly one outgoing edge per
//! non-terminal stage:
//!
//! ```text
//! reported -> inspected -> scheduled -> in-progress -> completed
//! ```
//!
//! Entering `scheduled` stamps a repair date `lead` in the future; entering
//! `completed` stamps the completion date. Reverting or skipping stages is
//! rejected.

use chrono::Duration;
use serde::Serialize;

use crate::defect::{Defect, DefectStatus};
use crate::error::CoreError;
use crate::types::Timestamp;

/// Days between scheduling a repair and the planned repair date.
pub const DEFAULT_REPAIR_LEAD_DAYS: i64 = 7;

impl DefectStatus {
    /// The single permitted successor, or `None` for the terminal stage.
    pub fn next(&self) -> Option<DefectStatus> {
        match self {
            Self::Reported => Some(Self::Inspected),
            Self::Inspected => Some(Self::Scheduled),
            Self::Scheduled => Some(Self::InProgress),
            Self::InProgress => Some(Self::Completed),
            Self::Completed => None,
        }
    }
}

/// A computed status move together with the dates it stamps.
///
/// Stamp fields are `None` when the move leaves that date untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub from: DefectStatus,
    pub to: DefectStatus,
    pub scheduled_repair_date: Option<Timestamp>,
    pub completion_date: Option<Timestamp>,
}

/// Validate that moving from `current` to `next` follows the chain.
pub fn validate_transition(current: DefectStatus, next: DefectStatus) -> Result<(), CoreError> {
    match current.next() {
        Some(allowed) if allowed == next => Ok(()),
        Some(allowed) => Err(CoreError::Validation(format!(
            "Cannot transition defect from '{current}' to '{next}'. \
             Next allowed status: '{allowed}'"
        ))),
        None => Err(CoreError::Validation(format!(
            "Cannot transition defect from '{current}' to '{next}': '{current}' is final"
        ))),
    }
}

/// Compute the transition that advances a defect out of `current`.
///
/// Returns [`CoreError::Conflict`] when `current` is terminal.
pub fn advance(
    current: DefectStatus,
    now: Timestamp,
    lead: Duration,
) -> Result<Transition, CoreError> {
    let to = current.next().ok_or_else(|| {
        CoreError::Conflict(format!("Defect is already '{current}' and cannot advance"))
    })?;
    Ok(transition_to(current, to, now, lead))
}

/// Compute the transition to an explicitly requested status.
pub fn transition(
    current: DefectStatus,
    requested: DefectStatus,
    now: Timestamp,
    lead: Duration,
) -> Result<Transition, CoreError> {
    validate_transition(current, requested)?;
    Ok(transition_to(current, requested, now, lead))
}

fn transition_to(
    from: DefectStatus,
    to: DefectStatus,
    now: Timestamp,
    lead: Duration,
) -> Transition {
    Transition {
        from,
        to,
        scheduled_repair_date: (to == DefectStatus::Scheduled).then(|| now + lead),
        completion_date: (to == DefectStatus::Completed).then_some(now),
    }
}

impl Defect {
    /// Patch this record in place the same way the store is patched.
    pub fn apply_transition(&mut self, t: &Transition) {
        self.status = t.to;
        if let Some(date) = t.scheduled_repair_date {
            self.scheduled_repair_date = Some(date);
        }
        if let Some(date) = t.completion_date {
            self.completion_date = Some(date);
        }
    }
}
