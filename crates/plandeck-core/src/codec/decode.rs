//! Lenient, line-oriented decoder for the metadata block.

use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    scan::{
        inline_list, list_item, split_block, subtask_item, subtask_property, top_level_field,
        unquote,
    },
    FieldDiagnostic, FieldOutcome,
};
use crate::models::{PlanFile, PlanFrontmatter, PlanStatus, Priority, Subtask, SubtaskStatus};

/// A decoded plan plus the fields that were skipped along the way.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Decoded {
    pub file: PlanFile,
    pub diagnostics: Vec<FieldDiagnostic>,
}

/// Decode raw plan text.
///
/// Text without a well-formed `---` ... `---` block comes back untouched as
/// the body with `frontmatter == None`.
pub fn decode(raw: &str) -> PlanFile {
    decode_with_diagnostics(raw).file
}

/// Decode raw plan text, reporting skipped and malformed fields.
pub fn decode_with_diagnostics(raw: &str) -> Decoded {
    let Some(block) = split_block(raw) else {
        return Decoded {
            file: PlanFile::without_frontmatter(raw),
            diagnostics: Vec::new(),
        };
    };

    let lines: Vec<&str> = block.block.lines().collect();
    let mut decoder = BlockDecoder {
        lines: &lines,
        frontmatter: PlanFrontmatter::default(),
        diagnostics: Vec::new(),
    };
    decoder.run();

    if !decoder.diagnostics.is_empty() {
        debug!(
            "Decoded frontmatter with {} skipped field(s)",
            decoder.diagnostics.len()
        );
    }

    Decoded {
        file: PlanFile::with_frontmatter(decoder.frontmatter, block.body),
        diagnostics: decoder.diagnostics,
    }
}

/// Result of reading one enum-like scalar.
enum Parsed<T> {
    Recognized(T),
    Absent,
    Malformed,
}

/// Line offset of the first block line within the file (after `---`).
const FIRST_BLOCK_LINE: usize = 2;

struct BlockDecoder<'a> {
    lines: &'a [&'a str],
    frontmatter: PlanFrontmatter,
    diagnostics: Vec<FieldDiagnostic>,
}

impl BlockDecoder<'_> {
    fn run(&mut self) {
        let mut index = 0;
        while index < self.lines.len() {
            let line = self.lines[index];
            index += 1;

            let Some((key, value)) = top_level_field(line) else {
                self.skip_line(index - 1, line);
                continue;
            };
            index += self.field(index - 1, key, value);
        }
    }

    /// Apply one top-level field; returns how many following lines it consumed.
    fn field(&mut self, index: usize, key: &str, value: &str) -> usize {
        let scalar = unquote(value);
        let fm = &mut self.frontmatter;
        match key {
            "created" => fm.created = non_empty(scalar),
            "modified" => fm.modified = non_empty(scalar),
            "project_path" | "projectPath" => fm.project_path = non_empty(scalar),
            "session_id" | "sessionId" => fm.session_id = non_empty(scalar),
            "dueDate" => fm.due_date = non_empty(scalar),
            "estimate" => fm.estimate = non_empty(scalar),
            "assignee" => fm.assignee = non_empty(scalar),
            "archivedAt" => fm.archived_at = non_empty(scalar),
            "status" => match parse_status(scalar) {
                Parsed::Recognized(status) => fm.status = Some(status),
                Parsed::Absent => fm.status = None,
                Parsed::Malformed => {
                    fm.status = Some(PlanStatus::Todo);
                    self.malformed(index, key, scalar);
                }
            },
            "priority" => match parse_priority(scalar) {
                Parsed::Recognized(priority) => fm.priority = Some(priority),
                Parsed::Absent => fm.priority = None,
                Parsed::Malformed => {
                    fm.priority = None;
                    self.malformed(index, key, scalar);
                }
            },
            "schemaVersion" => match scalar.parse::<i64>() {
                Ok(version) => fm.schema_version = Some(version),
                Err(_) => {
                    fm.schema_version = None;
                    self.malformed(index, key, scalar);
                }
            },
            "tags" => {
                let (items, consumed) = self.list(index, scalar);
                self.frontmatter.tags = items;
                return consumed;
            }
            "blockedBy" => {
                let (items, consumed) = self.list(index, scalar);
                self.frontmatter.blocked_by = items;
                return consumed;
            }
            "subtasks" => {
                let (subtasks, consumed) = self.subtasks(index);
                self.frontmatter.subtasks = subtasks;
                return consumed;
            }
            _ => self.ignored(index, key),
        }
        0
    }

    /// Inline list, block list, or a lone scalar treated as a one-item list.
    fn list(&self, index: usize, value: &str) -> (Vec<String>, usize) {
        if let Some(items) = inline_list(value) {
            return (items, 0);
        }
        if !value.is_empty() {
            return (vec![value.to_string()], 0);
        }

        let items: Vec<String> = self.lines[index + 1..]
            .iter()
            .map_while(|line| list_item(line))
            .map(|item| unquote(item).to_string())
            .collect();
        let consumed = items.len();
        (items, consumed)
    }

    fn subtasks(&mut self, index: usize) -> (Vec<Subtask>, usize) {
        let mut subtasks = Vec::new();
        let mut current: Option<(usize, PartialSubtask)> = None;
        let mut consumed = 0;
        let lines = self.lines;

        for (offset, line) in lines[index + 1..].iter().enumerate() {
            let line_index = index + 1 + offset;
            if let Some((key, value)) = subtask_item(line) {
                if let Some((start, partial)) = current.take() {
                    self.finish_subtask(start, partial, &mut subtasks);
                }
                let mut partial = PartialSubtask::default();
                self.subtask_key(line_index, &mut partial, key, value);
                current = Some((line_index, partial));
            } else if let (Some((key, value)), Some((_, partial))) =
                (subtask_property(line), current.as_mut())
            {
                self.subtask_key(line_index, partial, key, value);
            } else {
                break;
            }
            consumed += 1;
        }

        if let Some((start, partial)) = current {
            self.finish_subtask(start, partial, &mut subtasks);
        }
        (subtasks, consumed)
    }

    fn subtask_key(&mut self, index: usize, partial: &mut PartialSubtask, key: &str, value: &str) {
        let value = unquote(value);
        match key {
            "id" => partial.id = non_empty(value),
            "title" => partial.title = non_empty(value),
            "assignee" => partial.assignee = non_empty(value),
            "dueDate" => partial.due_date = non_empty(value),
            "status" => match SubtaskStatus::from_str(value) {
                Ok(status) => partial.status = status,
                Err(_) => self.malformed(index, "subtasks.status", value),
            },
            _ => debug!("Ignoring unknown subtask key '{key}'"),
        }
    }

    fn finish_subtask(&mut self, index: usize, partial: PartialSubtask, out: &mut Vec<Subtask>) {
        match partial.build() {
            Some(subtask) => out.push(subtask),
            None => self.malformed(index, "subtasks", "item without id or title"),
        }
    }

    fn skip_line(&mut self, index: usize, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || line.starts_with(char::is_whitespace)
        {
            return;
        }
        self.ignored(index, trimmed);
    }

    fn ignored(&mut self, index: usize, key: &str) {
        self.diagnostics.push(FieldDiagnostic {
            line: index + FIRST_BLOCK_LINE,
            key: key.to_string(),
            outcome: FieldOutcome::Ignored,
        });
    }

    fn malformed(&mut self, index: usize, key: &str, raw: &str) {
        self.diagnostics.push(FieldDiagnostic {
            line: index + FIRST_BLOCK_LINE,
            key: key.to_string(),
            outcome: FieldOutcome::Malformed {
                raw: raw.to_string(),
            },
        });
    }
}

#[derive(Default)]
struct PartialSubtask {
    id: Option<String>,
    title: Option<String>,
    status: SubtaskStatus,
    assignee: Option<String>,
    due_date: Option<String>,
}

impl PartialSubtask {
    fn build(self) -> Option<Subtask> {
        Some(Subtask {
            id: self.id?,
            title: self.title?,
            status: self.status,
            assignee: self.assignee,
            due_date: self.due_date,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_status(value: &str) -> Parsed<PlanStatus> {
    if value.is_empty() {
        return Parsed::Absent;
    }
    match PlanStatus::normalize(value) {
        Some(status) => Parsed::Recognized(status),
        None => Parsed::Malformed,
    }
}

fn parse_priority(value: &str) -> Parsed<Priority> {
    if value.is_empty() {
        return Parsed::Absent;
    }
    match Priority::from_str(value) {
        Ok(priority) => Parsed::Recognized(priority),
        Err(_) => Parsed::Malformed,
    }
}
