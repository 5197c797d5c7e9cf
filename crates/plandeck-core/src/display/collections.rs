//! Collection wrapper types for displaying groups of domain objects.
//!
//! This module provides wrapper types that format collections of domain objects
//! with consistent structure and empty collection handling.

use std::fmt;

use crate::{
    archive::ArchivedPlan,
    audit::AuditEntry,
    models::{PlanMeta, Subtask, SubtaskProgress, VersionInfo},
};

/// Newtype wrapper for displaying a list of plans.
///
/// # Examples
///
/// ```rust
/// use jiff::Timestamp;
/// use plandeck_core::{display::PlanList, models::PlanMeta};
///
/// let plan = PlanMeta {
///     filename: "launch.md".to_string(),
///     title: "Launch".to_string(),
///     created_at: Timestamp::now(),
///     modified_at: Timestamp::now(),
///     size: 10,
///     preview: String::new(),
///     sections: vec![],
///     related_project: None,
///     frontmatter: None,
/// };
///
/// let output = PlanList(vec![plan]).to_string();
/// assert!(output.contains("## Launch (launch.md)"));
/// assert_eq!(PlanList(vec![]).to_string(), "No plans found.\n");
/// ```
pub struct PlanList(pub Vec<PlanMeta>);

impl PlanList {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of plans in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the plans.
    pub fn iter(&self) -> std::slice::Iter<'_, PlanMeta> {
        self.0.iter()
    }
}

impl IntoIterator for PlanList {
    type Item = PlanMeta;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PlanList {
    type Item = &'a PlanMeta;
    type IntoIter = std::slice::Iter<'a, PlanMeta>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PlanList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plans found.");
        }
        for plan in &self.0 {
            write!(f, "{plan}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for a plan's snapshot listing, newest first.
pub struct Versions(pub Vec<VersionInfo>);

impl Versions {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of versions in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Versions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No versions found.");
        }
        for version in &self.0 {
            write!(f, "{version}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for a plan's subtask checklist.
///
/// A progress line heads the list.
pub struct Subtasks(pub Vec<Subtask>);

impl Subtasks {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Completion counts for the collection.
    pub fn progress(&self) -> SubtaskProgress {
        SubtaskProgress::of(&self.0)
    }
}

impl fmt::Display for Subtasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No subtasks.");
        }
        writeln!(f, "Progress: {}", self.progress())?;
        writeln!(f)?;
        for subtask in &self.0 {
            write!(f, "{subtask}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for audit log entries.
pub struct AuditTrail(pub Vec<AuditEntry>);

impl fmt::Display for AuditTrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No audit entries.");
        }
        for entry in &self.0 {
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for the archive listing, newest first.
pub struct Archive(pub Vec<ArchivedPlan>);

impl fmt::Display for Archive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No archived plans.");
        }
        for plan in &self.0 {
            write!(f, "{plan}")?;
        }
        Ok(())
    }
}
