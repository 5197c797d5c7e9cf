//! Frontmatter codec: the metadata block at the top of a plan file.
//!
//! A plan file optionally starts with a block delimited by two lines that
//! consist exactly of `---`:
//!
//! ```text
//! ---
//! status: in_progress
//! tags:
//!   - "backend"
//! subtasks:
//!   - id: "st-1"
//!     title: "Design API"
//!     status: done
//! ---
//! # Markdown body, kept verbatim
//! ```
//!
//! The block is scanned line by line for a fixed set of known fields. It is
//! not a YAML parser: top-level fields start at column 0, indented lines only
//! continue an open list or subtask field, and unknown or malformed fields are
//! skipped one at a time without affecting the rest of the block or the body.
//!
//! Round trips are value-preserving, not byte-preserving: [`encode`] always
//! writes lists in block form and quotes string values, so
//! `decode(&encode(&decode(x)))` equals `decode(x)` while the text may differ.
//!
//! ```rust
//! use plandeck_core::codec::{decode, encode};
//!
//! let file = decode("---\nblockedBy: [a.md, b.md]\n---\n# Plan\n");
//! let frontmatter = file.frontmatter.as_ref().expect("block present");
//! assert_eq!(frontmatter.blocked_by, vec!["a.md", "b.md"]);
//!
//! let text = encode(&file);
//! assert!(text.contains("  - \"a.md\""));
//! assert_eq!(decode(&text), file);
//! ```

mod decode;
mod encode;
pub mod outline;
mod scan;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

pub use decode::{decode, decode_with_diagnostics, Decoded};
pub use encode::{encode, encode_frontmatter};

/// How a single line of the metadata block was treated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum FieldOutcome {
    /// Not a field this codec knows; skipped
    Ignored,
    /// A known field whose value could not be used as written
    Malformed { raw: String },
}

/// A field the decoder skipped or could not use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldDiagnostic {
    /// 1-based line number within the whole file
    pub line: usize,
    pub key: String,
    #[serde(flatten)]
    pub outcome: FieldOutcome,
}
