//! Status and confirmation message types for operation feedback.

use std::fmt;

use crate::{error::PlanError, transitions::allowed_transitions};

/// Wrapper type for displaying operation confirmation messages.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
    /// Suggested next step shown under a failure
    pub hint: Option<String>,
}

impl OperationStatus {
    /// Create a new success status.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
            hint: None,
        }
    }

    /// Create a new failure status.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
            hint: None,
        }
    }

    /// Failure status for an engine error, with a hint where one helps.
    pub fn from_error(error: &PlanError) -> Self {
        let hint = match error {
            PlanError::Conflict { filename, .. } => Some(format!(
                "Re-read '{filename}' to pick up the external change, then retry."
            )),
            PlanError::InvalidTransition { from, .. } => Some(format!(
                "Allowed from {from}: {}",
                allowed_transitions(*from)
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            PlanError::HistoryExists { filename } => Some(format!(
                "'{filename}' still has the history of a deleted plan; pick another name."
            )),
            _ => None,
        };
        Self {
            message: error.to_string(),
            success: false,
            hint,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {}",
            if self.success { "Success:" } else { "Error:" },
            self.message
        )?;
        if let Some(hint) = &self.hint {
            writeln!(f, "Hint: {hint}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlanStatus;

    #[test]
    fn test_operation_status_display() {
        let success = OperationStatus::success("Plan deleted");
        assert!(format!("{success}").contains("Success:"));

        let failure = OperationStatus::failure("Plan not found");
        assert!(format!("{failure}").contains("Error:"));
    }

    #[test]
    fn test_transition_error_lists_allowed_targets() {
        let status = OperationStatus::from_error(&PlanError::InvalidTransition {
            from: PlanStatus::Todo,
            to: PlanStatus::Completed,
        });
        assert!(!status.success);
        assert!(status.to_string().contains("Hint: Allowed from todo: in_progress"));
    }
}
