//! Command dispatch: runs each parsed command against the repository and
//! renders the result.

use anyhow::{bail, Result};
use plandeck_core::{
    display::{
        Archive, AuditTrail, CreateResult, DeleteResult, OperationStatus, PlanList, Subtasks,
        UpdateResult, Versions,
    },
    models::PlanStatus,
    params::{FieldUpdate, SubtaskCreate, SubtaskUpdate},
    PlanRepository,
};

use crate::{
    cli::{
        ArchiveCommands, AuditArgs, BulkArgs, DepsArgs, HistoryCommands, PlanCommands,
        SubtaskCommands,
    },
    renderer::TerminalRenderer,
};

/// Runs commands and prints their output.
pub struct CommandHandler {
    repo: PlanRepository,
    renderer: TerminalRenderer,
}

impl CommandHandler {
    pub fn new(repo: PlanRepository, renderer: TerminalRenderer) -> Self {
        Self { repo, renderer }
    }

    pub async fn list_plans(&self) -> Result<()> {
        let plans = self.repo.list_plans().await?;
        self.renderer.render(&PlanList(plans).to_string())
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::List => self.list_plans().await,
            PlanCommands::Show(args) => {
                let detail = self.repo.get_plan(&args.filename).await?;
                self.renderer.render(&detail.to_string())
            }
            PlanCommands::Create(args) => {
                let meta = self.repo.create_plan(&args.into_params()?).await?;
                self.renderer.render(&CreateResult::new(meta).to_string())
            }
            PlanCommands::Update(args) => {
                let content = args.source.read()?;
                let meta = self.repo.update_content(&args.filename, &content).await?;
                let changes = vec!["Content replaced".to_string()];
                self.renderer
                    .render(&UpdateResult::with_changes(meta, changes).to_string())
            }
            PlanCommands::Status(args) => {
                let status: PlanStatus = args.status.into();
                let meta = self.repo.update_status(&args.filename, status).await?;
                let changes = vec![format!("Status changed to {status}")];
                self.renderer
                    .render(&UpdateResult::with_changes(meta, changes).to_string())
            }
            PlanCommands::Transitions(args) => {
                let next = self.repo.available_transitions(&args.filename).await?;
                let mut output = format!("## Next statuses for {}\n\n", args.filename);
                for status in next {
                    output.push_str(&format!("- {status}\n"));
                }
                self.renderer.render(&output)
            }
            PlanCommands::Set(args) => {
                let filename = args.filename.clone();
                let update = FieldUpdate::try_from(args)?;
                let meta = self.repo.update_field(&filename, &update).await?;
                let changes = vec![format!("Updated {}", update.key())];
                self.renderer
                    .render(&UpdateResult::with_changes(meta, changes).to_string())
            }
            PlanCommands::Rename(args) => {
                let meta = self
                    .repo
                    .rename_plan(&args.filename, &args.new_filename)
                    .await?;
                let changes = vec![format!("Renamed from {}", args.filename)];
                self.renderer
                    .render(&UpdateResult::with_changes(meta, changes).to_string())
            }
            PlanCommands::Delete(args) if args.archive => {
                let archived = self.repo.archive_plan(&args.filename).await?;
                self.renderer.render_status(&OperationStatus::success(format!(
                    "Plan '{}' archived",
                    archived.filename
                )));
                self.renderer.render(&archived.to_string())
            }
            PlanCommands::Delete(args) => {
                if !args.confirm {
                    bail!(
                        "Refusing to delete '{}' without --confirm",
                        args.filename
                    );
                }
                self.repo.delete_plan(&args.filename).await?;
                self.renderer
                    .render(&DeleteResult::plan(&args.filename).to_string())
            }
        }
    }

    pub async fn handle_subtask_command(&self, command: SubtaskCommands) -> Result<()> {
        match command {
            SubtaskCommands::List(args) => {
                let subtasks = self.repo.list_subtasks(&args.filename).await?;
                self.renderer.render(&Subtasks(subtasks).to_string())
            }
            SubtaskCommands::Add(args) => {
                let filename = args.filename.clone();
                let subtask = self
                    .repo
                    .add_subtask(&filename, &SubtaskCreate::from(args))
                    .await?;
                self.renderer.render(&CreateResult::new(subtask).to_string())
            }
            SubtaskCommands::Update(args) => {
                let filename = args.filename.clone();
                let id = args.id.clone();
                let subtask = self
                    .repo
                    .update_subtask(&filename, &id, &SubtaskUpdate::from(args))
                    .await?;
                self.renderer.render(&UpdateResult::new(subtask).to_string())
            }
            SubtaskCommands::Toggle(args) => {
                let subtask = self.repo.toggle_subtask(&args.filename, &args.id).await?;
                let changes = vec![format!("Marked {}", subtask.status)];
                self.renderer
                    .render(&UpdateResult::with_changes(subtask, changes).to_string())
            }
            SubtaskCommands::Delete(args) => {
                self.repo.delete_subtask(&args.filename, &args.id).await?;
                self.renderer
                    .render(&DeleteResult::subtask(&args.id).to_string())
            }
        }
    }

    pub async fn handle_history_command(&self, command: HistoryCommands) -> Result<()> {
        match command {
            HistoryCommands::List(args) => {
                let versions = self.repo.list_versions(&args.filename).await?;
                self.renderer.render(&Versions(versions).to_string())
            }
            HistoryCommands::Show(args) => {
                let snapshot = self.repo.get_version(&args.filename, &args.version).await?;
                let output = format!(
                    "## {} @ {}\n\n{}\n\n---\n\n{}",
                    snapshot.filename, snapshot.version, snapshot.summary, snapshot.content
                );
                self.renderer.render(&output)
            }
            HistoryCommands::Diff(args) => {
                let diff = self
                    .repo
                    .diff_versions(&args.filename, &args.from, args.to.as_deref())
                    .await?;
                self.renderer.render(&diff.to_string())
            }
            HistoryCommands::Rollback(args) => {
                let meta = self.repo.rollback(&args.filename, &args.version).await?;
                let changes = vec![format!("Rolled back to {}", args.version)];
                self.renderer
                    .render(&UpdateResult::with_changes(meta, changes).to_string())
            }
        }
    }

    pub async fn handle_archive_command(&self, command: ArchiveCommands) -> Result<()> {
        match command {
            ArchiveCommands::List => {
                let archived = self.repo.list_archived().await?;
                self.renderer.render(&Archive(archived).to_string())
            }
            ArchiveCommands::Add(args) => {
                let result = self.repo.bulk_archive(&args.filenames).await?;
                self.renderer.render(&result.to_string())?;
                if !result.is_complete() {
                    bail!(
                        "{} of {} plan(s) could not be archived",
                        result.failed.len(),
                        args.filenames.len()
                    );
                }
                Ok(())
            }
            ArchiveCommands::Restore(args) => {
                let meta = self.repo.restore_archived(&args.filename).await?;
                let changes = vec!["Restored from the archive".to_string()];
                self.renderer
                    .render(&UpdateResult::with_changes(meta, changes).to_string())
            }
            ArchiveCommands::Purge(args) => {
                if !args.confirm {
                    bail!(
                        "Refusing to purge '{}' without --confirm",
                        args.filename
                    );
                }
                self.repo.purge_archived(&args.filename).await?;
                self.renderer
                    .render(&DeleteResult::plan(&args.filename).to_string())
            }
            ArchiveCommands::Cleanup => {
                let removed = self.repo.cleanup_expired_archives().await?;
                self.renderer.render(&format!(
                    "Removed {removed} expired archived plan(s)\n"
                ))
            }
        }
    }

    pub async fn deps(&self, args: DepsArgs) -> Result<()> {
        match args.filename {
            Some(filename) => {
                let deps = self.repo.plan_dependencies(&filename).await?;
                self.renderer
                    .render(&format!("# Dependencies of {filename}\n\n{deps}"))
            }
            None => {
                let graph = self.repo.dependency_graph().await?;
                self.renderer.render(&graph.to_string())
            }
        }
    }

    pub async fn bulk(&self, args: BulkArgs) -> Result<()> {
        let (files, action) = args.into_params()?;
        let result = self.repo.bulk_update(&files, &action).await?;
        self.renderer.render(&result.to_string())?;
        if !result.is_complete() {
            bail!("{} of {} plan(s) failed", result.failed.len(), files.len());
        }
        Ok(())
    }

    pub async fn audit(&self, args: AuditArgs) -> Result<()> {
        let entries = self.repo.audit_log(&args.into()).await?;
        self.renderer.render(&AuditTrail(entries).to_string())
    }

    pub async fn migrate(&self) -> Result<()> {
        let report = self.repo.migrate_all().await?;
        self.renderer.render(&report.to_string())?;
        if report.errors.is_empty() {
            Ok(())
        } else {
            self.renderer.render_status(&OperationStatus::failure(format!(
                "{} plan(s) could not be migrated",
                report.errors.len()
            )));
            bail!("Migration incomplete")
        }
    }
}
