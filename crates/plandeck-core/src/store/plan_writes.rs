//! Plan-level mutations: create, update, status, fields, rename, delete.

use std::{
    fs::{self, OpenOptions},
    io::Write,
};

use jiff::tz::Offset;
use log::{info, warn};
use serde_json::json;

use super::{
    files::{ensure_dir, read_plan, validate_filename},
    parent_dir, Mutation, PlanStore,
};
use crate::{
    audit::actions,
    codec,
    error::{FileSystemResultExt, PlanError, Result},
    models::{BulkResult, MigrationReport, PlanFile, PlanMeta, PlanStatus},
    params::{BulkAction, CreatePlan, FieldUpdate},
    transitions::{allowed_transitions, check_transition},
};

impl PlanStore {
    /// `plan-YYYYMMDD-HHMMSS-mmm.md` for the current time, suffixed when taken.
    fn generate_filename(&self) -> String {
        let dt = Offset::UTC.to_datetime(self.now());
        let base = format!(
            "plan-{:04}{:02}{:02}-{:02}{:02}{:02}-{:03}",
            dt.year(),
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second(),
            dt.millisecond()
        );
        let mut candidate = format!("{base}.md");
        let mut n = 2;
        while self.exists(&candidate) {
            candidate = format!("{base}-{n}.md");
            n += 1;
        }
        candidate
    }

    /// Write `content` verbatim as a new plan in the primary directory.
    pub fn create_plan(&self, params: &CreatePlan) -> Result<PlanMeta> {
        let filename = match &params.filename {
            Some(name) => name.clone(),
            None => self.generate_filename(),
        };
        validate_filename(&filename)?;
        if self.exists(&filename) {
            return Err(PlanError::AlreadyExists { filename });
        }

        ensure_dir(self.plans_dir())?;
        let path = self.plans_dir().join(&filename);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(PlanError::AlreadyExists { filename });
            }
            Err(e) => return Err(PlanError::file_system(&path, e)),
        };
        file.write_all(params.content.as_bytes())
            .and_then(|()| file.sync_all())
            .fs_context(&path)?;

        // The caller knows exactly what is on disk now.
        self.conflicts().observe(self.plans_dir(), &filename);
        info!("Created plan '{filename}'");
        self.audit(actions::CREATE, &filename, json!({}));
        self.get_plan_meta(&filename)
    }

    /// Replace the whole file content.
    pub fn update_content(&self, filename: &str, content: &str) -> Result<PlanMeta> {
        let path = self.resolve(filename)?;
        let previous = read_plan(&path, filename)?;
        let meta = self.commit(&path, filename, &previous, content, "Content updated")?;
        self.audit(
            actions::UPDATE,
            filename,
            json!({ "contentLength": content.chars().count() }),
        );
        Ok(meta)
    }

    /// Move the plan along the status workflow.
    pub fn update_status(&self, filename: &str, status: PlanStatus) -> Result<PlanMeta> {
        let now = self.now().to_string();
        let ((), meta) = self.mutate_frontmatter(filename, |frontmatter| {
            let from = frontmatter.effective_status();
            check_transition(from, status)?;
            frontmatter.status = Some(status);
            frontmatter.modified = Some(now);
            Ok(Mutation {
                value: (),
                summary: format!("Status changed to {status}"),
                action: actions::STATUS_CHANGE,
                details: json!({ "from": from, "to": status }),
            })
        })?;
        Ok(meta)
    }

    /// Statuses the plan can move to from its current one.
    pub fn available_transitions(&self, filename: &str) -> Result<Vec<PlanStatus>> {
        let path = self.resolve(filename)?;
        let content = read_plan(&path, filename)?;
        let current = self
            .decode_current(&content)
            .file
            .frontmatter
            .map(|fm| fm.effective_status())
            .unwrap_or_default();
        Ok(allowed_transitions(current).to_vec())
    }

    /// Set or clear one frontmatter field.
    pub fn update_field(&self, filename: &str, update: &FieldUpdate) -> Result<PlanMeta> {
        update.validate()?;
        let now = self.now().to_string();
        let ((), meta) = self.mutate_frontmatter(filename, |fm| {
            match update.clone() {
                FieldUpdate::Priority(value) => fm.priority = value,
                FieldUpdate::DueDate(value) => fm.due_date = value,
                FieldUpdate::Tags(items) => fm.tags = items,
                FieldUpdate::Estimate(value) => fm.estimate = value,
                FieldUpdate::BlockedBy(items) => fm.blocked_by = items,
                FieldUpdate::Assignee(value) => fm.assignee = value,
                FieldUpdate::ProjectPath(value) => fm.project_path = value,
                FieldUpdate::SessionId(value) => fm.session_id = value,
                FieldUpdate::ArchivedAt(value) => fm.archived_at = value,
            }
            fm.modified = Some(now);
            Ok(Mutation {
                value: (),
                summary: format!("Updated {}", update.key()),
                action: actions::FIELD_UPDATE,
                details: json!({ "field": update.key() }),
            })
        })?;
        Ok(meta)
    }

    /// Apply `action` to each file independently.
    pub fn bulk_update(&self, filenames: &[String], action: &BulkAction) -> BulkResult {
        let mut result = BulkResult::default();
        if let Err(e) = action.validate() {
            for filename in filenames {
                result.push_failure(filename.as_str(), &e);
            }
            return result;
        }

        for filename in filenames {
            match self.apply_bulk_action(filename, action) {
                Ok(()) => result.push_success(filename.as_str()),
                Err(e) => {
                    warn!("Bulk update of '{filename}' failed: {e}");
                    result.push_failure(filename.as_str(), e);
                }
            }
        }
        result
    }

    fn apply_bulk_action(&self, filename: &str, action: &BulkAction) -> Result<()> {
        match action {
            BulkAction::Status(status) => self.update_status(filename, *status).map(drop),
            BulkAction::Assignee(value) => self
                .update_field(filename, &FieldUpdate::Assignee(value.clone()))
                .map(drop),
            BulkAction::Priority(value) => self
                .update_field(filename, &FieldUpdate::Priority(*value))
                .map(drop),
            BulkAction::AddTags(tags) => {
                let mut current = self.current_tags(filename)?;
                for tag in tags {
                    if !current.contains(tag) {
                        current.push(tag.clone());
                    }
                }
                self.update_field(filename, &FieldUpdate::Tags(current))
                    .map(drop)
            }
            BulkAction::RemoveTags(tags) => {
                let mut current = self.current_tags(filename)?;
                current.retain(|tag| !tags.contains(tag));
                self.update_field(filename, &FieldUpdate::Tags(current))
                    .map(drop)
            }
        }
    }

    fn current_tags(&self, filename: &str) -> Result<Vec<String>> {
        let path = self.resolve(filename)?;
        let content = read_plan(&path, filename)?;
        Ok(codec::decode(&content)
            .frontmatter
            .map(|fm| fm.tags)
            .unwrap_or_default())
    }

    /// Rename within the plan's directory; history follows the plan.
    pub fn rename_plan(&self, filename: &str, new_filename: &str) -> Result<PlanMeta> {
        validate_filename(filename)?;
        validate_filename(new_filename)?;
        let path = self.resolve(filename)?;
        if self.exists(new_filename) {
            return Err(PlanError::AlreadyExists {
                filename: new_filename.to_string(),
            });
        }

        // Old snapshots under the new name would be mistaken for this plan's.
        if self.versions().has_history(new_filename) {
            return Err(PlanError::HistoryExists {
                filename: new_filename.to_string(),
            });
        }

        let dir = parent_dir(&path);
        let target = dir.join(new_filename);
        fs::rename(&path, &target).fs_context(&path)?;
        if let Err(e) = self.versions().rename_history(filename, new_filename) {
            if let Err(undo) = fs::rename(&target, &path) {
                warn!("Could not move '{new_filename}' back to '{filename}': {undo}");
            }
            return Err(e);
        }

        self.conflicts().forget(filename);
        self.conflicts().observe(dir, new_filename);
        info!("Renamed plan '{filename}' to '{new_filename}'");
        self.audit(actions::RENAME, new_filename, json!({ "from": filename }));
        self.get_plan_meta(new_filename)
    }

    /// Remove the plan file. Its history is kept.
    pub fn delete_plan(&self, filename: &str) -> Result<()> {
        let path = self.resolve(filename)?;
        fs::remove_file(&path).fs_context(&path)?;
        self.conflicts().forget(filename);
        info!("Deleted plan '{filename}'");
        self.audit(actions::DELETE, filename, json!({ "permanent": true }));
        Ok(())
    }

    /// Delete each file independently.
    pub fn bulk_delete(&self, filenames: &[String]) -> BulkResult {
        let mut result = BulkResult::default();
        for filename in filenames {
            match self.delete_plan(filename) {
                Ok(()) => result.push_success(filename.as_str()),
                Err(e) => result.push_failure(filename.as_str(), e),
            }
        }
        result
    }

    /// Rewrite every plan whose frontmatter is behind the current schema.
    pub fn migrate_all(&self) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();
        for meta in self.list_plans()? {
            match self.migrate_one(&meta.filename) {
                Ok(true) => report.migrated += 1,
                Ok(false) => {}
                Err(e) => report.errors.push(format!("{}: {e}", meta.filename)),
            }
        }
        info!(
            "Migrated {} plan(s), {} error(s)",
            report.migrated,
            report.errors.len()
        );
        Ok(report)
    }

    fn migrate_one(&self, filename: &str) -> Result<bool> {
        let path = self.resolve(filename)?;
        let previous = read_plan(&path, filename)?;
        // A plan without a block counts as schema version 0 and gains one.
        let PlanFile { frontmatter, body } = codec::decode(&previous);
        let frontmatter = frontmatter.unwrap_or_default();
        if !self.config.migrator.needs_migration(&frontmatter) {
            return Ok(false);
        }

        let migrated = self.config.migrator.migrate(frontmatter);
        let next = codec::encode(&PlanFile::with_frontmatter(migrated, body));
        self.commit(&path, filename, &previous, &next, "Schema migrated")?;
        self.audit(actions::MIGRATE, filename, json!({}));
        Ok(true)
    }
}
