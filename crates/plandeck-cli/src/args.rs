use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{
    ArchiveCommands, AuditArgs, BulkArgs, DepsArgs, HistoryCommands, PlanCommands,
    SubtaskCommands,
};

/// Command-line front end for markdown plan files
///
/// Plans are markdown files with an optional frontmatter block. `pd` edits
/// that block (status, priority, tags, subtasks and more) without touching the
/// markdown body, refuses to overwrite files that changed on disk since they
/// were last read, and keeps a version history of every write.
#[derive(Parser)]
#[command(version, about, name = "pd")]
pub struct Args {
    /// Directory holding plan files. Defaults to
    /// $XDG_DATA_HOME/plandeck/plans
    #[arg(long, global = true)]
    pub plans_dir: Option<PathBuf>,

    /// Further directories searched for existing plans (repeatable)
    #[arg(long = "extra-dir", global = true)]
    pub extra_dirs: Vec<PathBuf>,

    /// Where archived plans are kept. Defaults to <plans-dir>/archive
    #[arg(long, global = true)]
    pub archive_dir: Option<PathBuf>,

    /// Days an archived plan is kept before `archive cleanup` removes it
    #[arg(long, global = true)]
    pub retention_days: Option<i64>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Manage plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Manage subtasks within a plan
    #[command(alias = "s")]
    Subtask {
        #[command(subcommand)]
        command: SubtaskCommands,
    },
    /// Browse versions, diff and roll back
    #[command(alias = "h")]
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// List, restore or purge archived plans
    #[command(alias = "a")]
    Archive {
        #[command(subcommand)]
        command: ArchiveCommands,
    },
    /// Show how plans block each other
    Deps(DepsArgs),
    /// Apply one change to several plans
    Bulk(BulkArgs),
    /// Show the audit log, newest first
    Audit(AuditArgs),
    /// Rewrite plans whose frontmatter uses an older schema
    Migrate,
}
