//! Display implementations for domain models.
//!
//! This module contains all Display trait implementations for the core domain
//! models, separated from the model definitions to maintain clean separation of
//! concerns.
//!
//! Output is markdown so the CLI can hand it straight to the terminal
//! renderer.

use std::fmt;

use serde_json::Value;

use super::datetime::LocalDateTime;
use crate::{
    archive::ArchivedPlan,
    audit::AuditEntry,
    codec::{FieldDiagnostic, FieldOutcome},
    models::{
        BulkResult, DiffLineKind, DiffResult, MigrationReport, PlanDetail, PlanFrontmatter,
        PlanMeta, PlanStatus, Priority, Subtask, SubtaskProgress, SubtaskStatus, VersionInfo,
    },
    deps::{DependencyGraph, DependencyNode, PlanDependencies},
};

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for SubtaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for SubtaskProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.done, self.total, self.percentage)
    }
}

/// Bullet list of the frontmatter fields that carry a value.
fn write_fields(f: &mut fmt::Formatter<'_>, fm: &PlanFrontmatter) -> fmt::Result {
    writeln!(f, "- **Status**: {}", fm.effective_status())?;
    if let Some(priority) = fm.priority {
        writeln!(f, "- **Priority**: {priority}")?;
    }
    if let Some(due) = &fm.due_date {
        writeln!(f, "- **Due**: {due}")?;
    }
    if let Some(estimate) = &fm.estimate {
        writeln!(f, "- **Estimate**: {estimate}")?;
    }
    if let Some(assignee) = &fm.assignee {
        writeln!(f, "- **Assignee**: {assignee}")?;
    }
    if !fm.tags.is_empty() {
        writeln!(f, "- **Tags**: {}", fm.tags.join(", "))?;
    }
    if !fm.blocked_by.is_empty() {
        writeln!(f, "- **Blocked by**: {}", fm.blocked_by.join(", "))?;
    }
    if !fm.subtasks.is_empty() {
        writeln!(f, "- **Subtasks**: {}", SubtaskProgress::of(&fm.subtasks))?;
    }
    if let Some(project) = &fm.project_path {
        writeln!(f, "- **Project path**: {project}")?;
    }
    if let Some(archived) = &fm.archived_at {
        writeln!(f, "- **Archived**: {archived}")?;
    }
    Ok(())
}

impl fmt::Display for PlanMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} ({})", self.title, self.filename)?;
        writeln!(f)?;

        match &self.frontmatter {
            Some(fm) => write_fields(f, fm)?,
            None => writeln!(f, "- **Status**: {}", PlanStatus::default())?,
        }
        if let Some(project) = &self.related_project {
            writeln!(f, "- **Project**: {project}")?;
        }
        writeln!(f, "- **Modified**: {}", LocalDateTime(&self.modified_at))?;

        if !self.preview.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.preview)?;
        }
        writeln!(f)?; // Add blank line after each plan

        Ok(())
    }
}

impl fmt::Display for PlanDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meta = &self.meta;
        writeln!(f, "# {}", meta.filename)?;
        writeln!(f)?;

        if let Some(fm) = &meta.frontmatter {
            write_fields(f, fm)?;
        }
        writeln!(f, "- **Size**: {} bytes", meta.size)?;
        writeln!(f, "- **Created**: {}", LocalDateTime(&meta.created_at))?;
        writeln!(f, "- **Modified**: {}", LocalDateTime(&meta.modified_at))?;

        let subtasks = meta
            .frontmatter
            .as_ref()
            .map(|fm| fm.subtasks.as_slice())
            .unwrap_or_default();
        if !subtasks.is_empty() {
            writeln!(f, "\n## Subtasks")?;
            writeln!(f)?;
            for subtask in subtasks {
                write!(f, "{subtask}")?;
            }
        }

        if !self.diagnostics.is_empty() {
            writeln!(f, "\n## Warnings")?;
            writeln!(f)?;
            for diagnostic in &self.diagnostics {
                writeln!(f, "- {diagnostic}")?;
            }
        }

        writeln!(f, "\n---\n")?;
        write!(f, "{}", self.body)
    }
}

impl fmt::Display for Subtask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {} {} `{}`",
            self.status.with_icon(),
            self.title,
            self.id
        )?;
        if let Some(assignee) = &self.assignee {
            write!(f, " @{assignee}")?;
        }
        if let Some(due) = &self.due_date {
            write!(f, " (due {due})")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for FieldDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            FieldOutcome::Ignored => write!(f, "line {}: unknown field `{}`", self.line, self.key),
            FieldOutcome::Malformed { raw } => write!(
                f,
                "line {}: unusable value for `{}`: `{raw}`",
                self.line, self.key
            ),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- `{}` {} ({} bytes): {}",
            self.version,
            LocalDateTime(&self.created_at),
            self.size_bytes,
            self.summary
        )
    }
}

impl fmt::Display for DiffResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} → {}", self.from_version, self.to_version)?;
        writeln!(f)?;
        writeln!(
            f,
            "+{} -{} ={}",
            self.stats.added, self.stats.removed, self.stats.unchanged
        )?;
        writeln!(f)?;

        writeln!(f, "```diff")?;
        for line in &self.lines {
            let marker = match line.kind {
                DiffLineKind::Added => '+',
                DiffLineKind::Removed => '-',
                DiffLineKind::Unchanged => ' ',
            };
            writeln!(f, "{marker}{}", line.content)?;
        }
        writeln!(f, "```")
    }
}

impl fmt::Display for BulkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} succeeded, {} failed",
            self.succeeded.len(),
            self.failed.len()
        )?;
        if !self.failed.is_empty() {
            writeln!(f)?;
            for failure in &self.failed {
                writeln!(f, "- {}: {}", failure.filename, failure.error)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Migrated {} plan(s)", self.migrated)?;
        for error in &self.errors {
            writeln!(f, "- {error}")?;
        }
        Ok(())
    }
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {} **{}** {}",
            LocalDateTime(&self.timestamp),
            self.action,
            self.filename
        )?;
        let has_details = match &self.details {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            _ => true,
        };
        if has_details {
            write!(f, " `{}`", self.details)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for ArchivedPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} ({})", self.title, self.filename)?;
        writeln!(f)?;
        writeln!(f, "- **Archived**: {}", LocalDateTime(&self.archived_at))?;
        writeln!(f, "- **Expires**: {}", LocalDateTime(&self.expires_at))?;
        writeln!(f, "- **From**: {}", self.original_path.display())?;
        if !self.preview.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.preview)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for DependencyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- {} ({}) [{}]", self.title, self.filename, self.status)
    }
}

fn write_path(f: &mut fmt::Formatter<'_>, names: &[String]) -> fmt::Result {
    writeln!(f, "{}", names.join(" → "))
}

impl fmt::Display for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No dependencies between plans.");
        }
        writeln!(f, "## Dependencies")?;
        writeln!(f)?;
        for edge in &self.edges {
            writeln!(f, "- {} → {}", edge.from, edge.to)?;
        }
        if !self.critical_path.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Critical path")?;
            writeln!(f)?;
            write_path(f, &self.critical_path)?;
        }
        if self.has_cycle {
            writeln!(f)?;
            writeln!(f, "## Cycles")?;
            writeln!(f)?;
            for cycle in &self.cycles {
                write!(f, "- ")?;
                write_path(f, cycle)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for PlanDependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Blocked by")?;
        writeln!(f)?;
        if self.blocked_by.is_empty() {
            writeln!(f, "Nothing.")?;
        }
        for node in &self.blocked_by {
            write!(f, "{node}")?;
        }
        writeln!(f)?;
        writeln!(f, "## Blocks")?;
        writeln!(f)?;
        if self.blocks.is_empty() {
            writeln!(f, "Nothing.")?;
        }
        for node in &self.blocks {
            write!(f, "{node}")?;
        }
        if self.chain.len() > 1 {
            writeln!(f)?;
            writeln!(f, "## Chain")?;
            writeln!(f)?;
            write_path(f, &self.chain)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::{DiffLine, DiffStats};

    fn meta() -> PlanMeta {
        let ts: Timestamp = "2026-10-19T12:00:00Z".parse().expect("timestamp");
        PlanMeta {
            filename: "launch.md".to_string(),
            title: "Launch".to_string(),
            created_at: ts,
            modified_at: ts,
            size: 42,
            preview: "Ship the thing.".to_string(),
            sections: vec![],
            related_project: None,
            frontmatter: Some(PlanFrontmatter {
                status: Some(PlanStatus::Review),
                priority: Some(Priority::High),
                tags: vec!["infra".to_string(), "q4".to_string()],
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_plan_meta_lists_set_fields_only() {
        let output = meta().to_string();
        assert!(output.starts_with("## Launch (launch.md)\n"));
        assert!(output.contains("- **Status**: review\n"));
        assert!(output.contains("- **Priority**: high\n"));
        assert!(output.contains("- **Tags**: infra, q4\n"));
        assert!(!output.contains("Assignee"));
        assert!(output.contains("Ship the thing."));
    }

    #[test]
    fn test_plan_detail_ends_with_body() {
        let detail = PlanDetail {
            meta: meta(),
            content: String::new(),
            body: "# Launch\n\nShip the thing.\n".to_string(),
            diagnostics: vec![FieldDiagnostic {
                line: 2,
                key: "priority".to_string(),
                outcome: FieldOutcome::Malformed {
                    raw: "super_high".to_string(),
                },
            }],
        };
        let output = detail.to_string();
        assert!(output.contains("## Warnings"));
        assert!(output.contains("line 2: unusable value for `priority`: `super_high`"));
        assert!(output.ends_with("---\n\n# Launch\n\nShip the thing.\n"));
    }

    #[test]
    fn test_diff_renders_markers() {
        let diff = DiffResult {
            from_version: "a".to_string(),
            to_version: "current".to_string(),
            lines: vec![
                DiffLine {
                    line_number: 1,
                    kind: DiffLineKind::Unchanged,
                    content: "same".to_string(),
                },
                DiffLine {
                    line_number: 2,
                    kind: DiffLineKind::Removed,
                    content: "old".to_string(),
                },
                DiffLine {
                    line_number: 3,
                    kind: DiffLineKind::Added,
                    content: "new".to_string(),
                },
            ],
            stats: DiffStats {
                added: 1,
                removed: 1,
                unchanged: 1,
            },
        };
        let output = diff.to_string();
        assert!(output.contains("+1 -1 =1"));
        assert!(output.contains("```diff\n same\n-old\n+new\n```"));
    }

    #[test]
    fn test_bulk_result_lists_failures() {
        let mut result = BulkResult::default();
        result.push_success("a.md");
        result.push_failure("b.md", "Plan not found: b.md");
        let output = result.to_string();
        assert!(output.starts_with("1 succeeded, 1 failed\n"));
        assert!(output.contains("- b.md: Plan not found: b.md"));
    }

    #[test]
    fn test_dependency_graph_shows_critical_path() {
        let mut blocked = meta();
        blocked.filename = "rollout.md".to_string();
        blocked.title = "Rollout".to_string();
        if let Some(fm) = blocked.frontmatter.as_mut() {
            fm.blocked_by = vec!["launch.md".to_string()];
        }
        let graph = DependencyGraph::build(&[meta(), blocked]);

        let output = graph.to_string();
        assert!(output.contains("- launch.md → rollout.md\n"));
        assert!(output.contains("## Critical path\n\nlaunch.md → rollout.md\n"));
        assert!(!output.contains("## Cycles"));

        let deps = graph.dependencies_of("rollout.md").expect("rollout");
        let output = deps.to_string();
        assert!(output.contains("## Blocked by\n\n- Launch (launch.md) [review]\n"));
        assert!(output.contains("## Blocks\n\nNothing.\n"));
        assert!(output.contains("## Chain"));

        assert_eq!(
            DependencyGraph::build(&[meta()]).to_string(),
            "No dependencies between plans.\n"
        );
    }
}
