//! Command-line argument definitions using clap
//!
//! Each command has a clap-derived argument struct that converts into the
//! matching core parameter type, keeping clap out of `plandeck-core`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → PlanRepository
//! ```
//!
//! Conversions that cannot fail use `From`. Those that parse free-form values
//! or read a file use `TryFrom` or `into_params` and report through `anyhow`.

use std::{fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use plandeck_core::{
    audit::AuditQuery,
    models::{PlanStatus, Priority, SubtaskStatus},
    params::{BulkAction, CreatePlan, FieldUpdate, SubtaskCreate, SubtaskUpdate},
};

// ============================================================================
// Value enums
// ============================================================================

/// Plan status as accepted on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Todo,
    #[value(name = "in_progress", alias = "in-progress")]
    InProgress,
    Review,
    Completed,
}

impl From<StatusArg> for PlanStatus {
    fn from(val: StatusArg) -> Self {
        match val {
            StatusArg::Todo => PlanStatus::Todo,
            StatusArg::InProgress => PlanStatus::InProgress,
            StatusArg::Review => PlanStatus::Review,
            StatusArg::Completed => PlanStatus::Completed,
        }
    }
}

/// Subtask status as accepted on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SubtaskStatusArg {
    Todo,
    Done,
}

impl From<SubtaskStatusArg> for SubtaskStatus {
    fn from(val: SubtaskStatusArg) -> Self {
        match val {
            SubtaskStatusArg::Todo => SubtaskStatus::Todo,
            SubtaskStatusArg::Done => SubtaskStatus::Done,
        }
    }
}

/// Frontmatter field that `plan set` can change
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FieldArg {
    Priority,
    #[value(name = "dueDate", alias = "due-date")]
    DueDate,
    Tags,
    Estimate,
    #[value(name = "blockedBy", alias = "blocked-by")]
    BlockedBy,
    Assignee,
    #[value(name = "project_path", alias = "project-path")]
    ProjectPath,
    #[value(name = "session_id", alias = "session-id")]
    SessionId,
    #[value(name = "archivedAt", alias = "archived-at")]
    ArchivedAt,
}

/// Change applied by `pd bulk`
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BulkActionArg {
    /// Move every plan to the given status
    Status,
    /// Add tags
    Tag,
    /// Remove tags
    Untag,
    /// Set the assignee; no value clears it
    Assign,
    /// Set the priority; no value clears it
    Priority,
}

/// Values joined into one scalar; nothing given means "clear".
fn scalar(values: Vec<String>) -> Option<String> {
    let joined = values.join(" ");
    (!joined.trim().is_empty()).then_some(joined)
}

fn parse_priority(values: Vec<String>) -> Result<Option<Priority>> {
    scalar(values)
        .map(|value| value.parse::<Priority>())
        .transpose()
        .map_err(|e| anyhow!(e))
}

// ============================================================================
// Plan commands
// ============================================================================

/// Where new plan content comes from
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct ContentSource {
    /// Content given inline
    #[arg(long)]
    pub content: Option<String>,
    /// Read content from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl ContentSource {
    /// Resolve to the content text, reading the file when one was given.
    pub fn read(self) -> Result<String> {
        match (self.content, self.file) {
            (Some(content), _) => Ok(content),
            (None, Some(path)) => fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display())),
            (None, None) => Err(anyhow!("Either --content or --file is required")),
        }
    }
}

/// Create a new plan
///
/// The content is stored exactly as given, frontmatter included.
#[derive(Args)]
pub struct CreatePlanArgs {
    /// Filename such as `release.md`; generated when omitted
    #[arg(long)]
    pub name: Option<String>,
    #[command(flatten)]
    pub source: ContentSource,
}

impl CreatePlanArgs {
    /// Convert to core parameters, reading `--file` if given.
    pub fn into_params(self) -> Result<CreatePlan> {
        Ok(CreatePlan {
            content: self.source.read()?,
            filename: self.name,
        })
    }
}

/// Replace a plan's content
#[derive(Args)]
pub struct UpdateContentArgs {
    /// Plan filename
    pub filename: String,
    #[command(flatten)]
    pub source: ContentSource,
}

/// A command that only needs a plan filename
#[derive(Args)]
pub struct FileArgs {
    /// Plan filename, e.g. `release.md`
    pub filename: String,
}

/// Change a plan's status along the workflow
#[derive(Args)]
pub struct StatusArgs {
    /// Plan filename
    pub filename: String,
    /// Target status
    #[arg(value_enum)]
    pub status: StatusArg,
}

/// Set or clear a frontmatter field
///
/// List fields take one value per item; scalar fields join the values with
/// spaces. Giving no value clears the field.
#[derive(Args)]
pub struct SetFieldArgs {
    /// Plan filename
    pub filename: String,
    /// Field to change
    #[arg(value_enum)]
    pub field: FieldArg,
    /// New value(s)
    pub values: Vec<String>,
}

impl TryFrom<SetFieldArgs> for FieldUpdate {
    type Error = anyhow::Error;

    fn try_from(val: SetFieldArgs) -> Result<Self> {
        let values = val.values;
        Ok(match val.field {
            FieldArg::Priority => FieldUpdate::Priority(parse_priority(values)?),
            FieldArg::DueDate => FieldUpdate::DueDate(scalar(values)),
            FieldArg::Tags => FieldUpdate::Tags(values),
            FieldArg::Estimate => FieldUpdate::Estimate(scalar(values)),
            FieldArg::BlockedBy => FieldUpdate::BlockedBy(values),
            FieldArg::Assignee => FieldUpdate::Assignee(scalar(values)),
            FieldArg::ProjectPath => FieldUpdate::ProjectPath(scalar(values)),
            FieldArg::SessionId => FieldUpdate::SessionId(scalar(values)),
            FieldArg::ArchivedAt => FieldUpdate::ArchivedAt(scalar(values)),
        })
    }
}

/// Rename a plan; its history moves along
#[derive(Args)]
pub struct RenamePlanArgs {
    /// Current filename
    pub filename: String,
    /// New filename
    pub new_filename: String,
}

/// Delete a plan, or move it to the archive
#[derive(Args)]
pub struct DeletePlanArgs {
    /// Plan filename
    pub filename: String,
    /// Confirm permanent deletion (required unless archiving)
    #[arg(long)]
    pub confirm: bool,
    /// Archive instead of deleting; `pd archive restore` brings it back
    #[arg(long)]
    pub archive: bool,
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// List all plans, most recently modified first
    #[command(alias = "ls")]
    List,
    /// Show a plan's metadata and content
    Show(FileArgs),
    /// Create a new plan
    #[command(alias = "c")]
    Create(CreatePlanArgs),
    /// Replace a plan's content
    Update(UpdateContentArgs),
    /// Change a plan's status
    Status(StatusArgs),
    /// Show the statuses a plan can move to
    Transitions(FileArgs),
    /// Set or clear a frontmatter field
    Set(SetFieldArgs),
    /// Rename a plan
    #[command(alias = "mv")]
    Rename(RenamePlanArgs),
    /// Delete a plan
    #[command(alias = "rm")]
    Delete(DeletePlanArgs),
}

// ============================================================================
// Subtask commands
// ============================================================================

/// Add a subtask to a plan
#[derive(Args)]
pub struct AddSubtaskArgs {
    /// Plan filename
    pub filename: String,
    /// Subtask title
    pub title: String,
    #[arg(long)]
    pub assignee: Option<String>,
    /// Due date, e.g. 2026-11-01
    #[arg(long = "due")]
    pub due_date: Option<String>,
}

impl From<AddSubtaskArgs> for SubtaskCreate {
    fn from(val: AddSubtaskArgs) -> Self {
        SubtaskCreate {
            title: val.title,
            assignee: val.assignee,
            due_date: val.due_date,
        }
    }
}

/// Update fields of a subtask
///
/// An empty `--assignee` or `--due` clears that field.
#[derive(Args)]
pub struct UpdateSubtaskArgs {
    /// Plan filename
    pub filename: String,
    /// Subtask id
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, value_enum)]
    pub status: Option<SubtaskStatusArg>,
    #[arg(long)]
    pub assignee: Option<String>,
    #[arg(long = "due")]
    pub due_date: Option<String>,
}

impl From<UpdateSubtaskArgs> for SubtaskUpdate {
    fn from(val: UpdateSubtaskArgs) -> Self {
        SubtaskUpdate {
            title: val.title,
            status: val.status.map(Into::into),
            assignee: val.assignee,
            due_date: val.due_date,
        }
    }
}

/// A command addressing one subtask
#[derive(Args)]
pub struct SubtaskRefArgs {
    /// Plan filename
    pub filename: String,
    /// Subtask id
    pub id: String,
}

#[derive(Subcommand)]
pub enum SubtaskCommands {
    /// List a plan's subtasks with progress
    #[command(alias = "ls")]
    List(FileArgs),
    /// Add a subtask
    #[command(alias = "a")]
    Add(AddSubtaskArgs),
    /// Update a subtask
    #[command(alias = "u")]
    Update(UpdateSubtaskArgs),
    /// Flip a subtask between todo and done
    #[command(alias = "t")]
    Toggle(SubtaskRefArgs),
    /// Remove a subtask
    #[command(alias = "rm")]
    Delete(SubtaskRefArgs),
}

// ============================================================================
// History commands
// ============================================================================

/// A command addressing one version of a plan
#[derive(Args)]
pub struct VersionArgs {
    /// Plan filename
    pub filename: String,
    /// Version id as shown by `history list`
    pub version: String,
}

/// Compare two versions, or a version with the current content
#[derive(Args)]
pub struct DiffArgs {
    /// Plan filename
    pub filename: String,
    /// Older version id
    pub from: String,
    /// Newer version id; the current content when omitted
    pub to: Option<String>,
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List saved versions, newest first
    #[command(alias = "ls")]
    List(FileArgs),
    /// Print the content of one version
    Show(VersionArgs),
    /// Line diff between versions
    Diff(DiffArgs),
    /// Restore a version as the current content
    Rollback(VersionArgs),
}

// ============================================================================
// Archive and dependencies
// ============================================================================

/// Archive several plans at once
#[derive(Args)]
pub struct ArchiveAddArgs {
    /// Plan filenames
    #[arg(required = true)]
    pub filenames: Vec<String>,
}

/// Permanently delete an archived plan
#[derive(Args)]
pub struct PurgeArgs {
    /// Archived plan filename
    pub filename: String,
    /// Confirm deletion (required)
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Subcommand)]
pub enum ArchiveCommands {
    /// List archived plans, newest first
    #[command(alias = "ls")]
    List,
    /// Archive plans
    Add(ArchiveAddArgs),
    /// Move an archived plan back
    Restore(FileArgs),
    /// Permanently delete an archived plan
    Purge(PurgeArgs),
    /// Delete archived plans past their retention
    Cleanup,
}

/// Show the dependency graph, or one plan's dependencies
#[derive(Args)]
pub struct DepsArgs {
    /// Plan filename; the whole graph when omitted
    pub filename: Option<String>,
}

// ============================================================================
// Bulk and audit
// ============================================================================

/// Apply one change to several plans
///
/// Each plan is updated on its own; failures are listed and do not stop
/// the others.
#[derive(Args)]
pub struct BulkArgs {
    /// Change to apply
    #[arg(value_enum)]
    pub action: BulkActionArg,
    /// Value(s) for the change
    pub values: Vec<String>,
    /// Comma-separated plan filenames
    #[arg(long, value_delimiter = ',', required = true)]
    pub files: Vec<String>,
}

impl BulkArgs {
    /// Split into the target files and the core action.
    pub fn into_params(self) -> Result<(Vec<String>, BulkAction)> {
        let values = self.values;
        let action = match self.action {
            BulkActionArg::Status => {
                let value = scalar(values).ok_or_else(|| anyhow!("A status is required"))?;
                let status = PlanStatus::normalize(&value)
                    .ok_or_else(|| anyhow!("Unknown status: {value}"))?;
                BulkAction::Status(status)
            }
            BulkActionArg::Tag => BulkAction::AddTags(values),
            BulkActionArg::Untag => BulkAction::RemoveTags(values),
            BulkActionArg::Assign => BulkAction::Assignee(scalar(values)),
            BulkActionArg::Priority => BulkAction::Priority(parse_priority(values)?),
        };
        Ok((self.files, action))
    }
}

/// Filter the audit log
#[derive(Args)]
pub struct AuditArgs {
    /// Only entries for this plan
    #[arg(long)]
    pub filename: Option<String>,
    /// Only entries with this action, e.g. `status_change`
    #[arg(long)]
    pub action: Option<String>,
    /// Show at most this many entries
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

impl From<AuditArgs> for AuditQuery {
    fn from(val: AuditArgs) -> Self {
        AuditQuery {
            filename: val.filename,
            action: val.action,
            limit: Some(val.limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_field_without_values_clears() {
        let update = FieldUpdate::try_from(SetFieldArgs {
            filename: "a.md".to_string(),
            field: FieldArg::Assignee,
            values: vec![],
        })
        .expect("convert");
        assert_eq!(update, FieldUpdate::Assignee(None));
    }

    #[test]
    fn test_set_priority_rejects_unknown_value() {
        let result = FieldUpdate::try_from(SetFieldArgs {
            filename: "a.md".to_string(),
            field: FieldArg::Priority,
            values: vec!["super_high".to_string()],
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_archive_commands_parse() {
        use clap::Parser;

        #[derive(Parser)]
        struct Cli {
            #[command(subcommand)]
            command: ArchiveCommands,
        }

        let cli = Cli::try_parse_from(["archive", "purge", "a.md", "--confirm"]).expect("parse");
        assert!(matches!(
            cli.command,
            ArchiveCommands::Purge(PurgeArgs { ref filename, confirm: true }) if filename == "a.md"
        ));
        assert!(Cli::try_parse_from(["archive", "add"]).is_err());
    }

    #[test]
    fn test_bulk_status_accepts_aliases() {
        let (files, action) = BulkArgs {
            action: BulkActionArg::Status,
            values: vec!["doing".to_string()],
            files: vec!["a.md".to_string(), "b.md".to_string()],
        }
        .into_params()
        .expect("convert");
        assert_eq!(files.len(), 2);
        assert_eq!(action, BulkAction::Status(PlanStatus::InProgress));
    }
}
