//! Relationship engine: blocking, parent/child and related edges.
//!
//! Every operation takes the primary task and its partner, checks the
//! preconditions against both edge-sets, and only then writes both sides.
//! A returned error therefore leaves both tasks untouched.
//!
//! Only direct two-task reversals are rejected. Longer blocking chains
//! (A blocks B blocks C blocks A) and cycles through parent/child links
//! are not searched for.

use crate::id::TaskId;
use crate::types::Task;
use thiserror::Error;

/// Errors raised by relationship mutations.
///
/// These signal a caller logic error; retrying the same call fails again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelationError {
    /// Self-block or direct two-task blocking cycle.
    #[error("cycle dependency between {task} and {blocker}: {reason}")]
    CycleDependency {
        task: TaskId,
        blocker: TaskId,
        reason: &'static str,
    },

    /// Self-parent, direct parent cycle, or a child that already has another parent.
    #[error("cannot make {child} a child of {parent}: {reason}")]
    InsufficientChildren {
        parent: TaskId,
        child: TaskId,
        reason: &'static str,
    },

    /// Related edge from a task to itself.
    #[error("task {0} cannot be related to itself")]
    SelfRelation(TaskId),
}

impl RelationError {
    pub fn is_cycle(&self) -> bool {
        matches!(self, RelationError::CycleDependency { .. })
    }

    pub fn is_insufficient_children(&self) -> bool {
        matches!(self, RelationError::InsufficientChildren { .. })
    }
}

/// Check whether `blocker` may be recorded as blocking `task`.
///
/// Takes shared references so callers can pass the same task twice.
pub fn check_add_blocker(task: &Task, blocker: &Task) -> Result<(), RelationError> {
    let cycle = |reason| RelationError::CycleDependency {
        task: task.id().clone(),
        blocker: blocker.id().clone(),
        reason,
    };

    if task.id() == blocker.id() {
        return Err(cycle("task cannot block itself"));
    }
    if task.dependencies().blocking().contains(blocker.id())
        || blocker.dependencies().blocked_by().contains(task.id())
    {
        return Err(cycle("blocker is already blocked by task"));
    }

    Ok(())
}

/// Check whether `child` may be placed under `parent`.
pub fn check_add_child(parent: &Task, child: &Task) -> Result<(), RelationError> {
    let insufficient = |reason| RelationError::InsufficientChildren {
        parent: parent.id().clone(),
        child: child.id().clone(),
        reason,
    };

    if parent.id() == child.id() {
        return Err(insufficient("task cannot be a child of itself"));
    }
    if parent.dependencies().parent() == Some(child.id()) {
        return Err(insufficient("child is the parent of the parent task"));
    }
    if let Some(existing) = child.dependencies().parent()
        && existing != parent.id()
    {
        return Err(insufficient("child already has a different parent"));
    }

    Ok(())
}

/// Check whether `task` and `other` may be related.
pub fn check_add_related(task: &Task, other: &Task) -> Result<(), RelationError> {
    if task.id() == other.id() {
        return Err(RelationError::SelfRelation(task.id().clone()));
    }
    Ok(())
}

/// Relationship operations on a pair of tasks.
///
/// Each method mutates both `self` and the partner and returns `self` so
/// calls can be chained:
///
/// ```
/// use todograph::{Relations, Task};
///
/// let mut report = Task::new("Write report");
/// let mut data = Task::new("Collect data");
/// let mut notes = Task::new("Meeting notes");
///
/// report.add_blocker(&mut data)?.add_related(&mut notes)?;
///
/// assert!(report.dependencies().blocked_by().contains(data.id()));
/// assert!(notes.dependencies().related().contains(report.id()));
/// # Ok::<(), todograph::RelationError>(())
/// ```
pub trait Relations {
    /// Record that `blocker` must complete before `self`.
    fn add_blocker(&mut self, blocker: &mut Task) -> Result<&mut Self, RelationError>;

    /// Drop a blocking edge; absent edges are ignored.
    fn remove_blocker(&mut self, blocker: &mut Task) -> &mut Self;

    /// Make `child` a child of `self`.
    fn add_child(&mut self, child: &mut Task) -> Result<&mut Self, RelationError>;

    /// Drop `child` from `self`'s children.
    ///
    /// The child's parent link is cleared only when it points at `self`.
    fn remove_child(&mut self, child: &mut Task) -> &mut Self;

    /// Relate `self` and `other` symmetrically.
    fn add_related(&mut self, other: &mut Task) -> Result<&mut Self, RelationError>;

    /// Drop a related edge; absent edges are ignored.
    fn remove_related(&mut self, other: &mut Task) -> &mut Self;
}

impl Relations for Task {
    fn add_blocker(&mut self, blocker: &mut Task) -> Result<&mut Self, RelationError> {
        check_add_blocker(self, blocker)?;

        let task_id = self.id().clone();
        self.dependencies_mut().blocked_by.insert(blocker.id().clone());
        blocker.dependencies_mut().blocking.insert(task_id);
        Ok(self)
    }

    fn remove_blocker(&mut self, blocker: &mut Task) -> &mut Self {
        let task_id = self.id().clone();
        self.dependencies_mut().blocked_by.remove(blocker.id());
        blocker.dependencies_mut().blocking.remove(&task_id);
        self
    }

    fn add_child(&mut self, child: &mut Task) -> Result<&mut Self, RelationError> {
        check_add_child(self, child)?;

        let parent_id = self.id().clone();
        self.dependencies_mut().children.insert(child.id().clone());
        child.dependencies_mut().parent = Some(parent_id);
        Ok(self)
    }

    fn remove_child(&mut self, child: &mut Task) -> &mut Self {
        if child.dependencies().parent() == Some(self.id()) {
            child.dependencies_mut().parent = None;
        }
        self.dependencies_mut().children.remove(child.id());
        self
    }

    fn add_related(&mut self, other: &mut Task) -> Result<&mut Self, RelationError> {
        check_add_related(self, other)?;

        let task_id = self.id().clone();
        self.dependencies_mut().related.insert(other.id().clone());
        other.dependencies_mut().related.insert(task_id);
        Ok(self)
    }

    fn remove_related(&mut self, other: &mut Task) -> &mut Self {
        let task_id = self.id().clone();
        self.dependencies_mut().related.remove(other.id());
        other.dependencies_mut().related.remove(&task_id);
        self
    }
}
