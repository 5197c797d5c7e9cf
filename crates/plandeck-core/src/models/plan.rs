//! Plan file models.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::PlanFrontmatter;
use crate::codec::FieldDiagnostic;

/// A whole plan artifact: optional metadata block plus the markdown body.
///
/// `frontmatter == None` means the file has no metadata block at all, which
/// is distinct from `Some(PlanFrontmatter::default())` (an empty block).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanFile {
    pub frontmatter: Option<PlanFrontmatter>,
    /// Opaque markdown text following the block
    pub body: String,
}

impl PlanFile {
    /// A plan without a metadata block.
    pub fn without_frontmatter(body: impl Into<String>) -> Self {
        Self {
            frontmatter: None,
            body: body.into(),
        }
    }

    /// A plan with the given metadata block.
    pub fn with_frontmatter(frontmatter: PlanFrontmatter, body: impl Into<String>) -> Self {
        Self {
            frontmatter: Some(frontmatter),
            body: body.into(),
        }
    }
}

/// Plan metadata as shown in list views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanMeta {
    /// Filename including extension, e.g. `release-checklist.md`
    pub filename: String,

    /// First `# ` heading of the body, `Untitled` when missing
    pub title: String,

    /// File creation time (falls back to modification time)
    pub created_at: Timestamp,

    /// File modification time
    pub modified_at: Timestamp,

    /// File size in bytes
    pub size: u64,

    /// Leading prose after the title
    pub preview: String,

    /// `## ` headings in document order
    pub sections: Vec<String>,

    /// Project path mentioned in the body, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_project: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontmatter: Option<PlanFrontmatter>,
}

/// Full plan details including content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanDetail {
    #[serde(flatten)]
    pub meta: PlanMeta,

    /// Exact bytes on disk
    pub content: String,

    /// Markdown body after the metadata block
    pub body: String,

    /// Fields skipped or rejected while decoding the block
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<FieldDiagnostic>,
}
