//! Status and priority enumerations for plans and subtasks.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of plan statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Not started yet
    #[default]
    Todo,

    /// Being worked on
    InProgress,

    /// Waiting for review
    Review,

    /// Finished
    Completed,
}

impl PlanStatus {
    /// All statuses in workflow order.
    pub const ALL: [PlanStatus; 4] = [
        PlanStatus::Todo,
        PlanStatus::InProgress,
        PlanStatus::Review,
        PlanStatus::Completed,
    ];

    /// The literal written to and read from a frontmatter block.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Todo => "todo",
            PlanStatus::InProgress => "in_progress",
            PlanStatus::Review => "review",
            PlanStatus::Completed => "completed",
        }
    }

    /// Best-effort normalization of a free-form status literal.
    ///
    /// Matching is case-insensitive and treats `-` and spaces like `_`.
    /// Returns `None` when the value cannot be mapped to a known status.
    pub fn normalize(value: &str) -> Option<Self> {
        let folded: String = value
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        match folded.as_str() {
            "todo" | "to_do" => Some(PlanStatus::Todo),
            "in_progress" | "inprogress" | "doing" => Some(PlanStatus::InProgress),
            "review" | "in_review" => Some(PlanStatus::Review),
            "completed" | "complete" | "done" => Some(PlanStatus::Completed),
            _ => None,
        }
    }
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(PlanStatus::Todo),
            "in_progress" => Ok(PlanStatus::InProgress),
            "review" => Ok(PlanStatus::Review),
            "completed" => Ok(PlanStatus::Completed),
            _ => Err(format!("Invalid plan status: {s}")),
        }
    }
}

/// Type-safe enumeration of plan priorities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// The literal written to and read from a frontmatter block.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(format!("Invalid priority: {s}")),
        }
    }
}

/// Type-safe enumeration of subtask statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubtaskStatus {
    /// Subtask is pending
    #[default]
    Todo,

    /// Subtask has been completed
    Done,
}

impl SubtaskStatus {
    /// The literal written to and read from a frontmatter block.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubtaskStatus::Todo => "todo",
            SubtaskStatus::Done => "done",
        }
    }

    /// The opposite status, used by toggling.
    pub fn toggled(self) -> Self {
        match self {
            SubtaskStatus::Todo => SubtaskStatus::Done,
            SubtaskStatus::Done => SubtaskStatus::Todo,
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// - `✓ Done` - Checkmark for completed subtasks
    /// - `○ Todo` - Circle for pending subtasks
    pub fn with_icon(&self) -> &'static str {
        match self {
            SubtaskStatus::Done => "✓ Done",
            SubtaskStatus::Todo => "○ Todo",
        }
    }
}

impl FromStr for SubtaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(SubtaskStatus::Todo),
            "done" => Ok(SubtaskStatus::Done),
            _ => Err(format!("Invalid subtask status: {s}")),
        }
    }
}
