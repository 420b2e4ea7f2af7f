//! Task lists: ordered containers that resolve edge ids to tasks.

use crate::id::{ListId, TaskId};
use crate::relations::{self, RelationError, Relations};
use crate::types::{Dependencies, IdSet, Task};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from id-based task list operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("task already in list: {0}")]
    DuplicateTask(TaskId),

    #[error(transparent)]
    Relation(#[from] RelationError),

    #[error("inconsistent edge on task {task}: {detail}")]
    Inconsistent { task: TaskId, detail: String },
}

/// A named, ordered collection of tasks.
///
/// Owns every task it contains; edges between tasks are plain ids that
/// resolve through this list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "TaskListRecord")]
pub struct TaskList {
    id: ListId,
    pub name: String,
    order: Vec<TaskId>,
    tasks: HashMap<TaskId, Task>,
}

impl TaskList {
    /// Create an empty list with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let id = ListId::generate(&name, chrono::Utc::now());
        Self::with_id(id, name)
    }

    pub fn with_id(id: ListId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            order: Vec::new(),
            tasks: HashMap::new(),
        }
    }

    pub fn id(&self) -> &ListId {
        &self.id
    }

    /// Append a task to the end of the list.
    pub fn add_task(&mut self, task: Task) -> Result<TaskId, ListError> {
        let id = task.id().clone();
        if self.tasks.contains_key(&id) {
            return Err(ListError::DuplicateTask(id));
        }
        self.order.push(id.clone());
        self.tasks.insert(id.clone(), task);
        Ok(id)
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Mutable access to a task's fields. Edges stay behind the
    /// relationship operations.
    pub fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Tasks in list order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.order.iter().filter_map(|id| self.tasks.get(id))
    }

    /// Record that `blocker_id` blocks `task_id`.
    pub fn add_blocker(&mut self, task_id: &TaskId, blocker_id: &TaskId) -> Result<(), ListError> {
        if task_id == blocker_id {
            let task = self.require(task_id)?;
            relations::check_add_blocker(task, task)?;
        }
        let (task, blocker) = self.pair_mut(task_id, blocker_id)?;
        task.add_blocker(blocker)?;
        Ok(())
    }

    pub fn remove_blocker(&mut self, task_id: &TaskId, blocker_id: &TaskId) -> Result<(), ListError> {
        if task_id == blocker_id {
            self.require(task_id)?;
            return Ok(());
        }
        let (task, blocker) = self.pair_mut(task_id, blocker_id)?;
        task.remove_blocker(blocker);
        Ok(())
    }

    /// Make `child_id` a child of `parent_id`.
    pub fn add_child(&mut self, parent_id: &TaskId, child_id: &TaskId) -> Result<(), ListError> {
        if parent_id == child_id {
            let task = self.require(parent_id)?;
            relations::check_add_child(task, task)?;
        }
        let (parent, child) = self.pair_mut(parent_id, child_id)?;
        parent.add_child(child)?;
        Ok(())
    }

    pub fn remove_child(&mut self, parent_id: &TaskId, child_id: &TaskId) -> Result<(), ListError> {
        if parent_id == child_id {
            self.require(parent_id)?;
            return Ok(());
        }
        let (parent, child) = self.pair_mut(parent_id, child_id)?;
        parent.remove_child(child);
        Ok(())
    }

    pub fn add_related(&mut self, task_id: &TaskId, other_id: &TaskId) -> Result<(), ListError> {
        if task_id == other_id {
            let task = self.require(task_id)?;
            relations::check_add_related(task, task)?;
        }
        let (task, other) = self.pair_mut(task_id, other_id)?;
        task.add_related(other)?;
        Ok(())
    }

    pub fn remove_related(&mut self, task_id: &TaskId, other_id: &TaskId) -> Result<(), ListError> {
        if task_id == other_id {
            self.require(task_id)?;
            return Ok(());
        }
        let (task, other) = self.pair_mut(task_id, other_id)?;
        task.remove_related(other);
        Ok(())
    }

    /// Remove a task after detaching it from every partner.
    ///
    /// Children of the removed task are left without a parent. The returned
    /// task carries no edges.
    pub fn remove_task(&mut self, id: &TaskId) -> Result<Task, ListError> {
        let mut task = self
            .tasks
            .remove(id)
            .ok_or_else(|| ListError::TaskNotFound(id.clone()))?;
        self.order.retain(|existing| existing != id);

        let deps = std::mem::take(task.dependencies_mut());
        for blocker in &deps.blocked_by {
            if let Some(partner) = self.tasks.get_mut(blocker) {
                partner.dependencies_mut().blocking.remove(id);
            }
        }
        for blocked in &deps.blocking {
            if let Some(partner) = self.tasks.get_mut(blocked) {
                partner.dependencies_mut().blocked_by.remove(id);
            }
        }
        for related in &deps.related {
            if let Some(partner) = self.tasks.get_mut(related) {
                partner.dependencies_mut().related.remove(id);
            }
        }
        for child in &deps.children {
            if let Some(partner) = self.tasks.get_mut(child)
                && partner.dependencies().parent() == Some(id)
            {
                partner.dependencies_mut().parent = None;
            }
        }
        if let Some(parent) = deps.parent.as_ref().and_then(|p| self.tasks.get_mut(p)) {
            parent.dependencies_mut().children.remove(id);
        }

        Ok(task)
    }

    /// Check that every edge resolves inside this list and is mirrored by
    /// its partner.
    pub fn verify(&self) -> Result<(), ListError> {
        for task in self.tasks() {
            task.validate().map_err(|e| ListError::Inconsistent {
                task: task.id().clone(),
                detail: e.to_string(),
            })?;
            let deps = task.dependencies();
            self.verify_mirrored(task, deps.blocked_by(), "blocked_by", |d| d.blocking())?;
            self.verify_mirrored(task, deps.blocking(), "blocking", |d| d.blocked_by())?;
            self.verify_mirrored(task, deps.related(), "related", |d| d.related())?;
            for child_id in deps.children() {
                let child = self.resolve(task, child_id, "children")?;
                if child.dependencies().parent() != Some(task.id()) {
                    return Err(ListError::Inconsistent {
                        task: task.id().clone(),
                        detail: format!("child {} has a different parent", child_id),
                    });
                }
            }
            if let Some(parent_id) = deps.parent() {
                let parent = self.resolve(task, parent_id, "parent")?;
                if !parent.dependencies().children().contains(task.id()) {
                    return Err(ListError::Inconsistent {
                        task: task.id().clone(),
                        detail: format!("parent {} does not list it as a child", parent_id),
                    });
                }
            }
        }
        Ok(())
    }

    fn verify_mirrored(
        &self,
        task: &Task,
        ids: &IdSet,
        field: &str,
        mirror: impl Fn(&Dependencies) -> &IdSet,
    ) -> Result<(), ListError> {
        for id in ids {
            let partner = self.resolve(task, id, field)?;
            if !mirror(partner.dependencies()).contains(task.id()) {
                return Err(ListError::Inconsistent {
                    task: task.id().clone(),
                    detail: format!("{} entry {} is not mirrored", field, id),
                });
            }
        }
        Ok(())
    }

    fn resolve(&self, task: &Task, id: &TaskId, field: &str) -> Result<&Task, ListError> {
        self.tasks.get(id).ok_or_else(|| ListError::Inconsistent {
            task: task.id().clone(),
            detail: format!("{} entry {} is not in the list", field, id),
        })
    }

    fn require(&self, id: &TaskId) -> Result<&Task, ListError> {
        self.tasks
            .get(id)
            .ok_or_else(|| ListError::TaskNotFound(id.clone()))
    }

    /// Borrow two distinct tasks mutably. Callers handle equal ids first.
    fn pair_mut(&mut self, first: &TaskId, second: &TaskId) -> Result<(&mut Task, &mut Task), ListError> {
        debug_assert_ne!(first, second);
        match self.tasks.get_disjoint_mut([first, second]) {
            [Some(a), Some(b)] => Ok((a, b)),
            [None, _] => Err(ListError::TaskNotFound(first.clone())),
            [_, None] => Err(ListError::TaskNotFound(second.clone())),
        }
    }
}

/// Serialized shape of a task list: tasks inline, in list order.
#[derive(Deserialize)]
struct TaskListRecord {
    id: ListId,
    name: String,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl TryFrom<TaskListRecord> for TaskList {
    type Error = ListError;

    fn try_from(record: TaskListRecord) -> Result<Self, Self::Error> {
        let mut list = TaskList::with_id(record.id, record.name);
        for task in record.tasks {
            list.add_task(task)?;
        }
        Ok(list)
    }
}

impl Serialize for TaskList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let tasks: Vec<&Task> = self.tasks().collect();
        let mut state = serializer.serialize_struct("TaskList", 3)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("tasks", &tasks)?;
        state.end()
    }
}
