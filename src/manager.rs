//! Task manager: owns the task lists for the lifetime of the process.

use crate::id::{ListId, TaskId};
use crate::list::TaskList;
use crate::storage::{TaskListSink, TaskListSource};
use crate::types::Task;
use eyre::{Context, Result};
use log::{debug, info, warn};

/// Errors that can occur during manager operations.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("task list not found: {0}")]
    ListNotFound(String),

    #[error("validation error: {0}")]
    Validation(#[from] crate::types::ValidationError),
}

/// Holds every task list loaded at start-up.
#[derive(Debug, Default)]
pub struct TaskManager {
    lists: Vec<TaskList>,
}

impl TaskManager {
    /// Create a manager with no lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all task lists from `source`.
    ///
    /// Lists whose edges do not line up are still loaded; the problem is
    /// logged so it can be repaired.
    pub fn load(source: &impl TaskListSource) -> Result<Self> {
        let lists = source.load_lists().context("Failed to load task lists")?;
        for list in &lists {
            if let Err(e) = list.verify() {
                warn!("Task list {} ({}) is inconsistent: {}", list.id(), list.name, e);
            }
        }
        info!("Loaded {} task list(s)", lists.len());
        Ok(Self { lists })
    }

    /// Build a new task with a fresh id and the current time.
    ///
    /// The task is not stored anywhere until added to a list.
    pub fn create_task(&self, title: &str, description: Option<&str>) -> Result<Task> {
        let mut task = Task::new(title);
        task.description = description.map(String::from);

        task.validate()
            .map_err(|e| eyre::eyre!(ManagerError::Validation(e)))?;

        debug!("Built task {} '{}'", task.id(), task.title);
        Ok(task)
    }

    /// Create a task and append it to the named or identified list.
    pub fn add_task(&mut self, list: &str, title: &str, description: Option<&str>) -> Result<TaskId> {
        self.find(list)?;
        let task = self.create_task(title, description)?;
        let list = self.find_mut(list)?;
        let id = list.add_task(task)?;
        info!("Created task {} in list {}", id, list.id());
        Ok(id)
    }

    /// Create an empty list.
    pub fn create_list(&mut self, name: &str) -> &mut TaskList {
        let list = TaskList::new(name);
        info!("Created task list {} '{}'", list.id(), list.name);
        self.lists.push(list);
        self.lists.last_mut().expect("list was just pushed")
    }

    pub fn lists(&self) -> &[TaskList] {
        &self.lists
    }

    pub fn list(&self, id: &ListId) -> Option<&TaskList> {
        self.lists.iter().find(|l| l.id() == id)
    }

    pub fn list_mut(&mut self, id: &ListId) -> Option<&mut TaskList> {
        self.lists.iter_mut().find(|l| l.id() == id)
    }

    pub fn list_by_name(&self, name: &str) -> Option<&TaskList> {
        self.lists.iter().find(|l| l.name == name)
    }

    /// Resolve a list by id first, then by name.
    pub fn find(&self, key: &str) -> Result<&TaskList> {
        self.lists
            .iter()
            .find(|l| l.id().as_str() == key)
            .or_else(|| self.list_by_name(key))
            .ok_or_else(|| eyre::eyre!(ManagerError::ListNotFound(key.to_string())))
    }

    /// Mutable form of [`TaskManager::find`].
    pub fn find_mut(&mut self, key: &str) -> Result<&mut TaskList> {
        let index = self
            .lists
            .iter()
            .position(|l| l.id().as_str() == key)
            .or_else(|| self.lists.iter().position(|l| l.name == key))
            .ok_or_else(|| eyre::eyre!(ManagerError::ListNotFound(key.to_string())))?;
        Ok(&mut self.lists[index])
    }

    /// Persist one list.
    pub fn save_list(&self, key: &str, sink: &mut impl TaskListSink) -> Result<()> {
        let list = self.find(key)?;
        sink.save_list(list)
            .with_context(|| format!("Failed to save task list {}", list.id()))
    }

    /// Persist every list.
    pub fn save(&self, sink: &mut impl TaskListSink) -> Result<()> {
        for list in &self.lists {
            sink.save_list(list)
                .with_context(|| format!("Failed to save task list {}", list.id()))?;
        }
        debug!("Saved {} task list(s)", self.lists.len());
        Ok(())
    }
}
