//! Core data types for the task graph.

use crate::id::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 500;

/// A single unit of work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier, fixed at construction
    id: TaskId,

    /// Short description of the work
    pub title: String,

    /// Optional longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// When created
    pub created_at: DateTime<Utc>,

    /// Relationship edges to other tasks
    #[serde(default)]
    dependencies: Dependencies,
}

impl Task {
    /// Create a task with a fresh id and no relationships.
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let created_at = Utc::now();
        let id = TaskId::generate(&title, created_at);
        Self::with_id(id, title, created_at)
    }

    /// Create a task with a caller-supplied identity.
    pub fn with_id(id: TaskId, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            created_at,
            dependencies: Dependencies::default(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    /// Read-only view of the task's edges.
    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    pub(crate) fn dependencies_mut(&mut self) -> &mut Dependencies {
        &mut self.dependencies
    }

    /// Validate the task's fields and local edge invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TitleTooLong);
        }
        if self.title.chars().any(|c| c.is_control()) {
            return Err(ValidationError::InvalidCharacters);
        }

        let deps = &self.dependencies;
        if deps.parent.as_ref() == Some(&self.id)
            || deps.children.contains(&self.id)
            || deps.blocked_by.contains(&self.id)
            || deps.blocking.contains(&self.id)
        {
            return Err(ValidationError::SelfReference(self.id.clone()));
        }

        Ok(())
    }
}

/// Edge-set owned by a single task.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Dependencies {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) parent: Option<TaskId>,

    #[serde(default, skip_serializing_if = "IdSet::is_empty")]
    pub(crate) blocked_by: IdSet,

    #[serde(default, skip_serializing_if = "IdSet::is_empty")]
    pub(crate) blocking: IdSet,

    #[serde(default, skip_serializing_if = "IdSet::is_empty")]
    pub(crate) children: IdSet,

    #[serde(default, skip_serializing_if = "IdSet::is_empty")]
    pub(crate) related: IdSet,
}

impl Dependencies {
    pub fn parent(&self) -> Option<&TaskId> {
        self.parent.as_ref()
    }

    /// Tasks that must complete before this one.
    pub fn blocked_by(&self) -> &IdSet {
        &self.blocked_by
    }

    /// Tasks waiting on this one.
    pub fn blocking(&self) -> &IdSet {
        &self.blocking
    }

    pub fn children(&self) -> &IdSet {
        &self.children
    }

    pub fn related(&self) -> &IdSet {
        &self.related
    }

    /// True if no edge of any kind is recorded.
    pub fn is_empty(&self) -> bool {
        self.parent.is_none()
            && self.blocked_by.is_empty()
            && self.blocking.is_empty()
            && self.children.is_empty()
            && self.related.is_empty()
    }
}

/// Insertion-ordered set of task ids.
///
/// Edge sets stay small, so a vector with linear membership checks keeps
/// serialization order stable without a second index. Duplicates in stored
/// data are dropped on load, keeping the first occurrence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Vec<TaskId>")]
pub struct IdSet(Vec<TaskId>);

impl IdSet {
    /// Insert an id, returning false if it was already present.
    pub(crate) fn insert(&mut self, id: TaskId) -> bool {
        if self.contains(&id) {
            false
        } else {
            self.0.push(id);
            true
        }
    }

    /// Remove an id, returning true if it was present.
    pub(crate) fn remove(&mut self, id: &TaskId) -> bool {
        let len_before = self.0.len();
        self.0.retain(|existing| existing != id);
        self.0.len() != len_before
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskId> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[TaskId] {
        &self.0
    }
}

impl From<Vec<TaskId>> for IdSet {
    fn from(ids: Vec<TaskId>) -> Self {
        let mut set = IdSet::default();
        for id in ids {
            set.insert(id);
        }
        set
    }
}

impl<'a> IntoIterator for &'a IdSet {
    type Item = &'a TaskId;
    type IntoIter = std::slice::Iter<'a, TaskId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Validation errors for tasks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("title exceeds 500 characters")]
    TitleTooLong,

    #[error("title contains control characters")]
    InvalidCharacters,

    #[error("task {0} references itself")]
    SelfReference(TaskId),
}
