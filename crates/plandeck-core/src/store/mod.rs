//! Synchronous plan engine behind [`crate::PlanRepository`].
//!
//! Every read and write of plan files goes through [`PlanStore`]. Mutations
//! share one commit path:
//!
//! ```text
//! conflict check ─▶ snapshot previous content ─▶ atomic write ─▶ fingerprint ─▶ audit
//! ```
//!
//! The snapshot is taken before the new bytes land, so an interrupted write
//! leaves the file in its previous state with the previous content also in
//! history.

mod archive_writes;
pub mod files;
mod history_writes;
mod plan_writes;
mod subtask_writes;

pub use history_writes::CURRENT_LABEL;

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::SystemTime,
};

use jiff::Timestamp;
use log::{info, warn};
use serde_json::Value;

use self::files::{atomic_write, is_plan_file, read_plan, validate_filename};
use crate::{
    archive::ArchiveStore,
    audit::{AuditEntry, AuditLogger},
    clock::Clock,
    codec::{self, outline, Decoded},
    conflict::ConflictDetector,
    error::{FileSystemResultExt, PlanError, Result},
    history::VersionStore,
    migration::MigrationHandler,
    models::{PlanDetail, PlanFile, PlanFrontmatter, PlanMeta},
};

/// Collaborators and directories a [`PlanStore`] works with.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Primary directory; new plans are created here
    pub plans_dir: PathBuf,
    /// Further directories searched, in order, for existing plans
    pub extra_dirs: Vec<PathBuf>,
    pub versions: VersionStore,
    /// Soft-deleted plans
    pub archive: Arc<ArchiveStore>,
    pub conflicts: Arc<ConflictDetector>,
    pub audit: Arc<dyn AuditLogger>,
    pub migrator: Arc<dyn MigrationHandler>,
    pub clock: Arc<dyn Clock>,
}

/// Plan file engine. Cheap to clone; clones share every collaborator.
#[derive(Debug, Clone)]
pub struct PlanStore {
    config: Arc<StoreConfig>,
}

/// What a frontmatter mutation produced.
pub(crate) struct Mutation<T> {
    pub(crate) value: T,
    /// Summary stored with the snapshot of the replaced content
    pub(crate) summary: String,
    pub(crate) action: &'static str,
    pub(crate) details: Value,
}

impl PlanStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn plans_dir(&self) -> &Path {
        &self.config.plans_dir
    }

    pub fn versions(&self) -> &VersionStore {
        &self.config.versions
    }

    pub fn archive(&self) -> &ArchiveStore {
        &self.config.archive
    }

    pub fn conflicts(&self) -> &ConflictDetector {
        &self.config.conflicts
    }

    pub fn audit_logger(&self) -> &dyn AuditLogger {
        self.config.audit.as_ref()
    }

    pub(crate) fn now(&self) -> Timestamp {
        self.config.clock.now()
    }

    /// Configured directories, primary first.
    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.config.plans_dir.as_path())
            .chain(self.config.extra_dirs.iter().map(PathBuf::as_path))
    }

    /// Path of an existing plan; the first directory holding it wins.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf> {
        validate_filename(filename)?;
        self.directories()
            .map(|dir| dir.join(filename))
            .find(|path| path.is_file())
            .ok_or_else(|| PlanError::NotFound {
                filename: filename.to_string(),
            })
    }

    /// Whether any configured directory already holds `filename`.
    pub(crate) fn exists(&self, filename: &str) -> bool {
        self.directories().any(|dir| dir.join(filename).exists())
    }

    /// Decode and bring the frontmatter up to the current schema.
    ///
    /// An absent block stays absent.
    pub(crate) fn decode_current(&self, content: &str) -> Decoded {
        let mut decoded = codec::decode_with_diagnostics(content);
        if let Some(frontmatter) = decoded.file.frontmatter.take() {
            decoded.file.frontmatter = Some(self.upgrade(frontmatter));
        }
        decoded
    }

    fn upgrade(&self, frontmatter: PlanFrontmatter) -> PlanFrontmatter {
        let migrator = &self.config.migrator;
        if migrator.needs_migration(&frontmatter) {
            migrator.migrate(frontmatter)
        } else {
            frontmatter
        }
    }

    /// Every plan across configured directories, newest-modified first.
    pub fn list_plans(&self) -> Result<Vec<PlanMeta>> {
        let mut seen = HashSet::new();
        let mut plans = Vec::new();

        for dir in self.directories() {
            let entries = match fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Skipping unreadable plans directory {}: {e}", dir.display());
                    continue;
                }
            };
            for entry in entries.flatten() {
                let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                    continue;
                };
                if !is_plan_file(&name) || !seen.insert(name.clone()) {
                    continue;
                }
                match self.meta_at(&name, &entry.path()) {
                    Ok(meta) => plans.push(meta),
                    Err(e) => warn!("Skipping unreadable plan '{name}': {e}"),
                }
            }
        }

        plans.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        Ok(plans)
    }

    /// Metadata only; does not count as a read for conflict detection.
    pub fn get_plan_meta(&self, filename: &str) -> Result<PlanMeta> {
        let path = self.resolve(filename)?;
        self.meta_at(filename, &path)
    }

    /// Full plan, recording its fingerprint for later conflict checks.
    pub fn get_plan(&self, filename: &str) -> Result<PlanDetail> {
        let path = self.resolve(filename)?;
        let dir = parent_dir(&path);

        // Fingerprint before reading: a write racing the read then shows up
        // as a conflict instead of being silently accepted.
        let fingerprint = self.conflicts().fingerprint(dir, filename).fs_context(&path)?;
        let content = read_plan(&path, filename)?;
        self.conflicts().record_file_state(dir, filename, fingerprint);

        let decoded = self.decode_current(&content);
        let meta = self.build_meta(filename, &path, &decoded.file)?;
        Ok(PlanDetail {
            meta,
            body: decoded.file.body,
            content,
            diagnostics: decoded.diagnostics,
        })
    }

    fn meta_at(&self, filename: &str, path: &Path) -> Result<PlanMeta> {
        let content = read_plan(path, filename)?;
        let decoded = self.decode_current(&content);
        self.build_meta(filename, path, &decoded.file)
    }

    fn build_meta(&self, filename: &str, path: &Path, file: &PlanFile) -> Result<PlanMeta> {
        let metadata = fs::metadata(path).fs_context(path)?;
        let modified_at = metadata
            .modified()
            .ok()
            .and_then(to_timestamp)
            .unwrap_or_else(|| self.now());
        let created_at = metadata
            .created()
            .ok()
            .and_then(to_timestamp)
            .unwrap_or(modified_at);

        Ok(PlanMeta {
            filename: filename.to_string(),
            title: outline::title(&file.body),
            created_at,
            modified_at,
            size: metadata.len(),
            preview: outline::preview(&file.body, outline::PREVIEW_LENGTH),
            sections: outline::sections(&file.body),
            related_project: outline::related_project(&file.body),
            frontmatter: file.frontmatter.clone(),
        })
    }

    /// The single write path for existing plans.
    ///
    /// Fails with [`PlanError::Conflict`] before touching anything when the
    /// file changed since its last read. Otherwise snapshots `previous`,
    /// replaces the file with `next` and records the new fingerprint.
    pub(crate) fn commit(
        &self,
        path: &Path,
        filename: &str,
        previous: &str,
        next: &str,
        summary: &str,
    ) -> Result<PlanMeta> {
        let dir = parent_dir(path);
        self.conflicts().ensure_unchanged(dir, filename)?;

        self.versions().save_version(filename, previous, summary)?;
        atomic_write(path, next.as_bytes())?;
        self.conflicts().observe(dir, filename);

        info!("Wrote '{filename}' ({summary})");
        self.meta_at(filename, path)
    }

    /// Read, decode, mutate and re-encode the frontmatter of `filename`.
    ///
    /// A plan without a block gains one.
    pub(crate) fn mutate_frontmatter<T>(
        &self,
        filename: &str,
        apply: impl FnOnce(&mut PlanFrontmatter) -> Result<Mutation<T>>,
    ) -> Result<(T, PlanMeta)> {
        let path = self.resolve(filename)?;
        let previous = read_plan(&path, filename)?;
        let PlanFile { frontmatter, body } = self.decode_current(&previous).file;

        let mut frontmatter =
            frontmatter.unwrap_or_else(|| self.upgrade(PlanFrontmatter::default()));
        let mutation = apply(&mut frontmatter)?;
        let next = codec::encode(&PlanFile::with_frontmatter(frontmatter, body));

        let meta = self.commit(&path, filename, &previous, &next, &mutation.summary)?;
        self.audit(mutation.action, filename, mutation.details);
        Ok((mutation.value, meta))
    }

    /// Fire-and-forget audit notification.
    pub(crate) fn audit(&self, action: &str, filename: &str, details: Value) {
        let entry = AuditEntry {
            timestamp: self.now(),
            action: action.to_string(),
            filename: filename.to_string(),
            details,
        };
        if let Err(e) = self.config.audit.log(&entry) {
            warn!("Failed to write audit entry for '{filename}': {e}");
        }
    }
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or(Path::new("."))
}

fn to_timestamp(time: SystemTime) -> Option<Timestamp> {
    Timestamp::try_from(time).ok()
}
