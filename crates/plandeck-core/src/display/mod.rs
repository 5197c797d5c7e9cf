//! Display formatting functions and result types.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! this module adds wrappers for collections and operation results so the
//! same data reads well in each context.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrapper Types   │    │   Formatted     │
//! │ (PlanMeta, ...) │───▶│ & Result Types  │───▶│ markdown output │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: PlanList, Versions, Subtasks, AuditTrail, Archive
//! - [`results`]: CreateResult, UpdateResult, DeleteResult
//! - [`status`]: OperationStatus
//! - [`datetime`]: Timestamp formatting in the system time zone
//! - [`models`]: Display implementations for domain models
//!
//! ## Usage Examples
//!
//! ```rust
//! use plandeck_core::display::OperationStatus;
//!
//! let success = OperationStatus::success("Plan deleted");
//! assert_eq!(success.to_string(), "Success: Plan deleted\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Archive, AuditTrail, PlanList, Subtasks, Versions};
pub use datetime::{LocalDateTime, ShortDateTime};
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
