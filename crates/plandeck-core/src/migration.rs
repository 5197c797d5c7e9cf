//! Frontmatter schema migration.

use std::fmt::Debug;

use crate::models::PlanFrontmatter;

/// Schema version written by this crate.
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Upgrades decoded frontmatter to the current schema.
///
/// The repository calls this on every decoded read and trusts the output
/// verbatim.
pub trait MigrationHandler: Send + Sync + Debug {
    fn needs_migration(&self, frontmatter: &PlanFrontmatter) -> bool;
    fn migrate(&self, frontmatter: PlanFrontmatter) -> PlanFrontmatter;
}

type Step = fn(PlanFrontmatter) -> PlanFrontmatter;

/// Ordered `(from, to, step)` migrations.
const STEPS: [(i64, i64, Step); 1] = [(0, 1, stamp_v1)];

fn stamp_v1(mut frontmatter: PlanFrontmatter) -> PlanFrontmatter {
    // Version 1 only introduced the version field; scalar tags are already
    // lists once decoded.
    frontmatter.schema_version = Some(1);
    frontmatter
}

/// The built-in step-wise migrator. A missing version counts as 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaMigrator;

impl MigrationHandler for SchemaMigrator {
    fn needs_migration(&self, frontmatter: &PlanFrontmatter) -> bool {
        frontmatter.schema_version.unwrap_or(0) < CURRENT_SCHEMA_VERSION
    }

    fn migrate(&self, mut frontmatter: PlanFrontmatter) -> PlanFrontmatter {
        let mut version = frontmatter.schema_version.unwrap_or(0);
        for (from, to, step) in STEPS {
            if version == from {
                frontmatter = step(frontmatter);
                version = to;
            }
        }
        frontmatter
    }
}

/// Leaves every record untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMigration;

impl MigrationHandler for NoMigration {
    fn needs_migration(&self, _frontmatter: &PlanFrontmatter) -> bool {
        false
    }

    fn migrate(&self, frontmatter: PlanFrontmatter) -> PlanFrontmatter {
        frontmatter
    }
}
