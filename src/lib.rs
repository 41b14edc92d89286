//! dstask is a Rust model of directory server administrative tasks: typed task definitions, a
//! property schema per task type, and a lossless codec between tasks and their directory entries.
//!
//! A task entry is identified by `ds-task-id`, carries the generic `ds-task` object class plus a
//! type-specific one, and names its implementation in `ds-task-class-name`. Scheduling state
//! (`ds-task-state`, actual start/completion times, log messages) is maintained by the server and
//! is read-only here.
//!
//! The crate performs no I/O: it only converts between [`Task`] values and [`Entry`] values.
//!
//! ## Quick start
//! ```
//! use dstask::{Task, TaskOptions, PopulateComposedAttributeValuesTask};
//!
//! # fn main() -> Result<(), dstask::Error> {
//! let populate = PopulateComposedAttributeValuesTask {
//!     plugin_config_names: vec!["Composed cn".to_string()],
//!     backend_ids: vec!["userRoot".to_string()],
//!     max_rate_per_second: Some(1234),
//! };
//! let task = Task::with_options(None, populate, TaskOptions::default());
//!
//! let entry = task.to_entry();
//! let decoded = Task::from_entry(&entry)?;
//! assert_eq!(decoded, task);
//! # Ok(())
//! # }
//! ```
//!
//! ## Symbolic names
//! Closed sets (task states, failed dependency actions, timestamp formats, security levels)
//! resolve names case-insensitively and treat `-` and `_` as equivalent, so
//! `"COMPLETED_SUCCESSFULLY"`, `"completed-successfully"` and `"Completed Successfully"` all name
//! the same state. See [`SymbolicName`].
//!
//! ## Features
//! - `serde`: `Serialize`/`Deserialize` for tasks, entries and value types.
//! - `tracing`: debug events on decode and warnings for unknown attributes.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::dbg_macro)]

mod codec;
mod entry;
mod error;
mod options;
mod schema;
mod symbolic;
mod types;
mod util;

pub use crate::codec::{DecodeWarning, TaskCodec};
pub use crate::entry::{Attribute, Entry, OBJECT_CLASS_ATTRIBUTE};
pub use crate::error::{Error, Result};
pub use crate::options::{TaskCodecOptions, UnknownAttributeMode};
pub use crate::schema::{DataType, TaskProperty, properties_for};
pub use crate::symbolic::{NameTable, SymbolicName};
pub use crate::types::export::{ExportTask, ExportTaskProperties};
pub use crate::types::file_retention::{
    FileRetentionTask, FileRetentionTaskProperties, TimestampFormat,
};
pub use crate::types::populate::{
    PopulateComposedAttributeValuesTask, PopulateComposedAttributeValuesTaskProperties,
};
pub use crate::types::server_profile::GenerateServerProfileTask;
pub use crate::types::state::{FailedDependencyAction, TaskState};
pub use crate::types::support_data::{CollectSupportDataTask, SecurityLevel};
pub use crate::types::task::{Task, TaskDetails, TaskOptions};
pub use crate::types::task_type::TaskType;
pub use crate::types::values::{PropertyValue, PropertyValueMap};
