//! Decoded frontmatter record and its subtasks.

use serde::{Deserialize, Serialize};

use super::{PlanStatus, Priority, SubtaskStatus};

/// The metadata block embedded at the top of a plan file.
///
/// Every field is optional. `Vec` fields use "empty" for "absent" since the
/// encoder never writes an empty list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanFrontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,

    /// Written as `project_path` on disk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,

    /// Written as `session_id` on disk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PlanStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    /// Not validated for calendar correctness
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// Order as written, duplicates kept
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Free-form, e.g. `3d`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<String>,

    /// Filenames this plan depends on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked_by: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,

    /// Owned by the migration collaborator; preserved verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i64>,
}

impl PlanFrontmatter {
    /// The status a plan is in, `todo` when the field is absent.
    pub fn effective_status(&self) -> PlanStatus {
        self.status.unwrap_or_default()
    }

    /// Index of the subtask with the given id.
    pub fn subtask_index(&self, id: &str) -> Option<usize> {
        self.subtasks.iter().position(|s| s.id == id)
    }
}

/// A checklist item stored inside a plan's frontmatter.
///
/// Identity is `id`; uniqueness is up to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: SubtaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Completion counts for a list of subtasks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SubtaskProgress {
    pub done: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent, 0 when there are no subtasks
    pub percentage: u8,
}

impl SubtaskProgress {
    /// Count done subtasks.
    pub fn of(subtasks: &[Subtask]) -> Self {
        let total = subtasks.len();
        if total == 0 {
            return Self::default();
        }
        let done = subtasks
            .iter()
            .filter(|s| s.status == SubtaskStatus::Done)
            .count();
        let percentage = ((done as f64 / total as f64) * 100.0).round() as u8;
        Self {
            done,
            total,
            percentage,
        }
    }
}
