//! Canonical writer for the metadata block.

use super::scan::DELIMITER;
use crate::models::{PlanFile, PlanFrontmatter};

/// Encode a plan back to text.
///
/// A plan without frontmatter encodes to its body unchanged. Fields are
/// written in a fixed order, lists always in block form.
pub fn encode(file: &PlanFile) -> String {
    match &file.frontmatter {
        Some(frontmatter) => {
            let mut out = encode_frontmatter(frontmatter);
            out.push_str(&file.body);
            out
        }
        None => file.body.clone(),
    }
}

/// Encode just the delimited block, including both `---` lines.
pub fn encode_frontmatter(frontmatter: &PlanFrontmatter) -> String {
    let mut writer = BlockWriter::default();

    writer.string("created", frontmatter.created.as_deref());
    writer.string("modified", frontmatter.modified.as_deref());
    writer.string("project_path", frontmatter.project_path.as_deref());
    writer.string("session_id", frontmatter.session_id.as_deref());
    writer.bare("status", frontmatter.status.map(|s| s.as_str()));
    writer.bare("priority", frontmatter.priority.map(|p| p.as_str()));
    writer.string("dueDate", frontmatter.due_date.as_deref());
    writer.list("tags", &frontmatter.tags);
    writer.string("estimate", frontmatter.estimate.as_deref());
    writer.list("blockedBy", &frontmatter.blocked_by);
    writer.string("assignee", frontmatter.assignee.as_deref());
    writer.string("archivedAt", frontmatter.archived_at.as_deref());

    if !frontmatter.subtasks.is_empty() {
        writer.line("subtasks:".to_string());
        for subtask in &frontmatter.subtasks {
            writer.line(format!("  - id: {}", quote(&subtask.id)));
            writer.line(format!("    title: {}", quote(&subtask.title)));
            writer.line(format!("    status: {}", subtask.status.as_str()));
            if let Some(assignee) = subtask.assignee.as_deref().filter(|a| !a.is_empty()) {
                writer.line(format!("    assignee: {}", quote(assignee)));
            }
            if let Some(due) = subtask.due_date.as_deref().filter(|d| !d.is_empty()) {
                writer.line(format!("    dueDate: {}", quote(due)));
            }
        }
    }

    if let Some(version) = frontmatter.schema_version {
        writer.line(format!("schemaVersion: {version}"));
    }

    writer.finish()
}

#[derive(Default)]
struct BlockWriter {
    out: String,
}

impl BlockWriter {
    fn line(&mut self, line: String) {
        self.out.push_str(&line);
        self.out.push('\n');
    }

    fn string(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.line(format!("{key}: {}", quote(value)));
        }
    }

    fn bare(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.line(format!("{key}: {value}"));
        }
    }

    fn list(&mut self, key: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        self.line(format!("{key}:"));
        for item in items {
            self.line(format!("  - {}", quote(item)));
        }
    }

    fn finish(self) -> String {
        format!("{DELIMITER}\n{}{DELIMITER}\n", self.out)
    }
}

/// Double-quote a value. The decoder does not interpret escapes, so the
/// value is written as-is between the quotes.
fn quote(value: &str) -> String {
    format!("\"{value}\"")
}
