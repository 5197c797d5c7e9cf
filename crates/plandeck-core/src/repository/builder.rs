//! Builder for creating and configuring [`PlanRepository`] instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::task;

use super::PlanRepository;
use crate::{
    archive::{ArchiveStore, ARCHIVE_DIR, DEFAULT_RETENTION_DAYS},
    audit::{AuditLogger, JsonlAuditLog, NoopAuditLog},
    clock::{Clock, FileStatSource, FsStat, SystemClock},
    conflict::ConflictDetector,
    error::{PlanError, Result},
    history::VersionStore,
    migration::{MigrationHandler, SchemaMigrator},
    store::{files::ensure_dir, PlanStore, StoreConfig},
};

/// Name of the version store directory inside the plans directory.
pub const HISTORY_DIR: &str = ".history";

/// Builder for creating and configuring repositories.
#[derive(Debug, Clone, Default)]
pub struct PlanRepositoryBuilder {
    plans_dir: Option<PathBuf>,
    extra_dirs: Vec<PathBuf>,
    history_dir: Option<PathBuf>,
    archive_dir: Option<PathBuf>,
    archive_retention_days: Option<i64>,
    audit: Option<Arc<dyn AuditLogger>>,
    audit_disabled: bool,
    migrator: Option<Arc<dyn MigrationHandler>>,
    stat: Option<Arc<dyn FileStatSource>>,
    clock: Option<Arc<dyn Clock>>,
}

impl PlanRepositoryBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the primary plans directory, where new plans are created.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/plandeck/plans` or `~/.local/share/plandeck/plans`
    pub fn with_plans_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.plans_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Adds a directory searched after the primary one for existing plans.
    pub fn with_extra_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.extra_dirs.push(path.as_ref().to_path_buf());
        self
    }

    /// Sets where snapshots are stored; defaults to `<plans_dir>/.history`.
    pub fn with_history_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.history_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets where archived plans go; defaults to `<plans_dir>/archive`.
    pub fn with_archive_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.archive_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Days an archived plan is kept before cleanup removes it (default 30).
    pub fn with_archive_retention_days(mut self, days: i64) -> Self {
        self.archive_retention_days = Some(days);
        self
    }

    /// Replaces the default JSONL audit log.
    pub fn with_audit_logger(mut self, logger: Arc<dyn AuditLogger>) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Disables auditing altogether.
    pub fn without_audit(mut self) -> Self {
        self.audit_disabled = true;
        self
    }

    /// Replaces the built-in schema migrator.
    pub fn with_migration_handler(mut self, handler: Arc<dyn MigrationHandler>) -> Self {
        self.migrator = Some(handler);
        self
    }

    /// Replaces the file-system stat source used for fingerprints.
    pub fn with_stat_source(mut self, stat: Arc<dyn FileStatSource>) -> Self {
        self.stat = Some(stat);
        self
    }

    /// Replaces the system clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the configured repository.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::Configuration` if no default directory can be found
    /// Returns `PlanError::FileSystem` if a directory cannot be created
    pub async fn build(self) -> Result<PlanRepository> {
        let plans_dir = match self.plans_dir {
            Some(path) => path,
            None => Self::default_plans_dir()?,
        };
        let history_dir = self
            .history_dir
            .unwrap_or_else(|| plans_dir.join(HISTORY_DIR));
        let archive = ArchiveStore::new(
            self.archive_dir
                .unwrap_or_else(|| plans_dir.join(ARCHIVE_DIR)),
            self.archive_retention_days
                .unwrap_or(DEFAULT_RETENTION_DAYS),
        );

        let dirs = (plans_dir.clone(), history_dir.clone());
        task::spawn_blocking(move || {
            ensure_dir(&dirs.0)?;
            ensure_dir(&dirs.1)
        })
        .await
        .map_err(|e| PlanError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let stat = self.stat.unwrap_or_else(|| Arc::new(FsStat));
        let audit: Arc<dyn AuditLogger> = if self.audit_disabled {
            Arc::new(NoopAuditLog)
        } else {
            self.audit
                .unwrap_or_else(|| Arc::new(JsonlAuditLog::in_dir(&plans_dir)))
        };

        let store = PlanStore::new(StoreConfig {
            plans_dir,
            extra_dirs: self.extra_dirs,
            versions: VersionStore::new(history_dir, clock.clone()),
            archive: Arc::new(archive),
            conflicts: Arc::new(ConflictDetector::new(stat)),
            audit,
            migrator: self.migrator.unwrap_or_else(|| Arc::new(SchemaMigrator)),
            clock,
        });
        Ok(PlanRepository::new(store))
    }

    /// Returns the default plans directory following XDG Base Directory
    /// specification.
    fn default_plans_dir() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("plandeck")
            .create_data_directory("plans")
            .map_err(|e| PlanError::Configuration {
                message: format!("No usable data directory: {e}"),
            })
    }
}
