//! Shared test infrastructure for todograph integration tests.
//!
//! Provides TestEnv helper for consistent test setup/teardown.

#![allow(dead_code)]

use tempfile::TempDir;
use todograph::{Storage, Task, TaskId, TaskList, TaskManager};

/// Name of the list every TestEnv starts with.
pub const LIST: &str = "Test list";

/// Test environment with automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub storage: Storage,
    pub manager: TaskManager,
}

impl TestEnv {
    /// Create a new test environment with an initialized store and one empty list.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = Storage::init(temp_dir.path()).expect("Failed to init storage");
        let mut manager = TaskManager::new();
        manager.create_list(LIST);
        Self {
            temp_dir,
            storage,
            manager,
        }
    }

    /// Create a task in the default list.
    pub fn create_task(&mut self, title: &str) -> TaskId {
        self.manager
            .add_task(LIST, title, None)
            .expect("Failed to create task")
    }

    pub fn list(&self) -> &TaskList {
        self.manager.find(LIST).expect("Default list missing")
    }

    pub fn list_mut(&mut self) -> &mut TaskList {
        self.manager.find_mut(LIST).expect("Default list missing")
    }

    pub fn task(&self, id: &TaskId) -> &Task {
        self.list().get(id).expect("Task missing from list")
    }

    /// Persist every list and load a fresh manager from disk.
    pub fn save_and_reload(&mut self) {
        self.manager.save(&mut self.storage).expect("Failed to save");
        let storage = Storage::open(self.temp_dir.path()).expect("Failed to reopen storage");
        self.manager = TaskManager::load(&storage).expect("Failed to reload");
    }

    /// Assert the default list has no dangling or one-sided edges.
    pub fn assert_consistent(&self) {
        if let Err(e) = self.list().verify() {
            panic!("List is inconsistent: {}", e);
        }
    }

    pub fn assert_blocked_by(&self, task: &TaskId, blocker: &TaskId) {
        assert!(
            self.task(task).dependencies().blocked_by().contains(blocker),
            "Expected {} to be blocked by {}",
            task,
            blocker
        );
        assert!(
            self.task(blocker).dependencies().blocking().contains(task),
            "Expected {} to list {} as blocking",
            blocker,
            task
        );
    }

    pub fn assert_child_of(&self, child: &TaskId, parent: &TaskId) {
        assert_eq!(self.task(child).dependencies().parent(), Some(parent));
        assert!(self.task(parent).dependencies().children().contains(child));
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
