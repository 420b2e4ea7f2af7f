//! todograph: todo lists whose tasks block, contain and relate to each other.
//!
//! Each task owns an edge-set of task ids. The [`Relations`] operations
//! update both ends of an edge together and refuse self-references, direct
//! blocking reversals and a second parent.
//!
//! # Example
//!
//! ```
//! use todograph::{Relations, Task};
//!
//! let mut a = Task::new("Plan release");
//! let mut b = Task::new("Write changelog");
//! let mut c = Task::new("Tag version");
//!
//! a.add_child(&mut b)?;
//! b.add_child(&mut c)?;
//! c.add_blocker(&mut a)?;
//!
//! // a is downstream of c now, so c cannot also block a
//! assert!(a.add_blocker(&mut c).unwrap_err().is_cycle());
//! assert_eq!(c.dependencies().parent(), Some(b.id()));
//! # Ok::<(), todograph::RelationError>(())
//! ```

mod id;
mod list;
mod manager;
mod relations;
mod storage;
mod types;

// Re-export public API
pub use id::{ListId, TaskId};
pub use list::{ListError, TaskList};
pub use manager::{ManagerError, TaskManager};
pub use relations::{RelationError, Relations, check_add_blocker, check_add_child, check_add_related};
pub use storage::{STORE_DIR, Storage, TaskListSink, TaskListSource};
pub use types::{Dependencies, IdSet, MAX_TITLE_LEN, Task, ValidationError};
