//! Plan status workflow.
//!
//! ```text
//! todo -> in_progress -> review -> completed
//!          ^    |          |          |
//!          |    v          |          |
//!         todo  in_progress<+         |
//! todo <------------------------------+
//! ```
//!
//! A transition from a status to itself is always accepted as a no-op.

use crate::{
    error::{PlanError, Result},
    models::PlanStatus,
};

/// Statuses reachable from `status` in one step, excluding `status` itself.
pub fn allowed_transitions(status: PlanStatus) -> &'static [PlanStatus] {
    match status {
        PlanStatus::Todo => &[PlanStatus::InProgress],
        PlanStatus::InProgress => &[PlanStatus::Todo, PlanStatus::Review],
        PlanStatus::Review => &[PlanStatus::InProgress, PlanStatus::Completed],
        PlanStatus::Completed => &[PlanStatus::Todo],
    }
}

/// Whether `from -> to` is permitted.
pub fn is_valid_transition(from: PlanStatus, to: PlanStatus) -> bool {
    from == to || allowed_transitions(from).contains(&to)
}

/// Like [`is_valid_transition`] but returns [`PlanError::InvalidTransition`].
pub fn check_transition(from: PlanStatus, to: PlanStatus) -> Result<()> {
    if is_valid_transition(from, to) {
        Ok(())
    } else {
        Err(PlanError::InvalidTransition { from, to })
    }
}
