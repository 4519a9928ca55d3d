//! # tracker-types
//!
//! Wire types for the task_tracker monitoring API. These are the records the
//! backend produces and the dashboard consumes: periodic per-project task
//! counters, per-assignee task counts and project metadata, plus the
//! `{ok, message, content}` envelope every endpoint answers with.
//!
//! ## Features
//!
//! - `serde`: JSON (de)serialization matching the backend field names
//!
//! ## Example
//!
//! ```rust
//! use tracker_types::{MonitoringSnapshot, TaskStatus};
//!
//! let snapshot = MonitoringSnapshot::builder()
//!     .timestamp(1_546_300_800)
//!     .new_tasks(120)
//!     .closed_tasks(30)
//!     .build();
//!
//! assert_eq!(snapshot.count(TaskStatus::New), 120);
//! assert!(!snapshot.is_idle());
//! ```

mod assignee;
mod project;
mod response;
mod snapshot;

pub use assignee::*;
pub use project::*;
pub use response::*;
pub use snapshot::*;
