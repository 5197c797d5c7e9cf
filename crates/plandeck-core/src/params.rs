//! Parameter structures for plan operations.
//!
//! These structures carry no framework-specific derives beyond serde, so the
//! CLI (or any other front end) wraps them with its own argument types and
//! converts via `From`:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │
//! └─────────────────┘    └─────────────────┘
//! ```
//!
//! Values destined for the frontmatter block are validated here: the block
//! format is line-oriented, so a value containing a line break could not be
//! read back.

use serde::{Deserialize, Serialize};

use crate::{
    error::{PlanError, Result},
    models::{PlanStatus, Priority, SubtaskStatus},
};

/// Reject values the line-oriented block format cannot hold.
pub(crate) fn check_single_line(field: &str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(PlanError::invalid_input(field).with_reason("value must be a single line"));
    }
    Ok(())
}

fn check_optional(field: &str, value: Option<&String>) -> Result<()> {
    value.map_or(Ok(()), |v| check_single_line(field, v))
}

fn check_items(field: &str, items: &[String]) -> Result<()> {
    items.iter().try_for_each(|item| check_single_line(field, item))
}

/// Parameters for creating a new plan.
///
/// `content` is written byte for byte; it is not decoded or normalized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlan {
    /// Full file content, metadata block included
    pub content: String,
    /// Target filename; generated as `plan-<timestamp>.md` when absent
    pub filename: Option<String>,
}

/// A single frontmatter field change.
///
/// `None` or an empty list clears the field. Status is changed through
/// [`crate::PlanRepository::update_status`] so that the workflow is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldUpdate {
    Priority(Option<Priority>),
    DueDate(Option<String>),
    Tags(Vec<String>),
    Estimate(Option<String>),
    BlockedBy(Vec<String>),
    Assignee(Option<String>),
    ProjectPath(Option<String>),
    SessionId(Option<String>),
    ArchivedAt(Option<String>),
}

impl FieldUpdate {
    /// The on-disk key this update touches.
    pub fn key(&self) -> &'static str {
        match self {
            FieldUpdate::Priority(_) => "priority",
            FieldUpdate::DueDate(_) => "dueDate",
            FieldUpdate::Tags(_) => "tags",
            FieldUpdate::Estimate(_) => "estimate",
            FieldUpdate::BlockedBy(_) => "blockedBy",
            FieldUpdate::Assignee(_) => "assignee",
            FieldUpdate::ProjectPath(_) => "project_path",
            FieldUpdate::SessionId(_) => "session_id",
            FieldUpdate::ArchivedAt(_) => "archivedAt",
        }
    }

    /// Ensure every value survives an encode/decode cycle.
    ///
    /// # Errors
    ///
    /// * `PlanError::InvalidInput` - When a value contains a line break
    pub fn validate(&self) -> Result<()> {
        let key = self.key();
        match self {
            FieldUpdate::Priority(_) => Ok(()),
            FieldUpdate::Tags(items) | FieldUpdate::BlockedBy(items) => check_items(key, items),
            FieldUpdate::DueDate(value)
            | FieldUpdate::Estimate(value)
            | FieldUpdate::Assignee(value)
            | FieldUpdate::ProjectPath(value)
            | FieldUpdate::SessionId(value)
            | FieldUpdate::ArchivedAt(value) => check_optional(key, value.as_ref()),
        }
    }
}

/// Parameters for adding a subtask.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubtaskCreate {
    pub title: String,
    pub assignee: Option<String>,
    pub due_date: Option<String>,
}

impl SubtaskCreate {
    /// # Errors
    ///
    /// * `PlanError::InvalidInput` - When the title is empty or a value spans lines
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(PlanError::invalid_input("title").with_reason("title must not be empty"));
        }
        check_single_line("title", &self.title)?;
        check_optional("assignee", self.assignee.as_ref())?;
        check_optional("dueDate", self.due_date.as_ref())
    }
}

/// Partial update of a subtask; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubtaskUpdate {
    pub title: Option<String>,
    pub status: Option<SubtaskStatus>,
    pub assignee: Option<String>,
    pub due_date: Option<String>,
}

impl SubtaskUpdate {
    /// # Errors
    ///
    /// * `PlanError::InvalidInput` - When the title is empty or a value spans lines
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(
                    PlanError::invalid_input("title").with_reason("title must not be empty")
                );
            }
            check_single_line("title", title)?;
        }
        check_optional("assignee", self.assignee.as_ref())?;
        check_optional("dueDate", self.due_date.as_ref())
    }
}

/// A change applied to every file of a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "camelCase")]
pub enum BulkAction {
    /// Status change, checked against the workflow per file
    Status(PlanStatus),
    /// Tags appended when not already present
    AddTags(Vec<String>),
    /// Tags removed wherever present
    RemoveTags(Vec<String>),
    Assignee(Option<String>),
    Priority(Option<Priority>),
}

impl BulkAction {
    /// # Errors
    ///
    /// * `PlanError::InvalidInput` - When a value contains a line break
    pub fn validate(&self) -> Result<()> {
        match self {
            BulkAction::AddTags(tags) | BulkAction::RemoveTags(tags) => check_items("tags", tags),
            BulkAction::Assignee(value) => check_optional("assignee", value.as_ref()),
            BulkAction::Status(_) | BulkAction::Priority(_) => Ok(()),
        }
    }
}
