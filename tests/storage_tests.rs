//! Integration tests for persistence through the manager.

mod common;

use common::{LIST, TestEnv};
use std::fs;
use todograph::{STORE_DIR, Storage, TaskList, TaskListSource, TaskManager};

#[test]
fn test_relationships_survive_reload() {
    let mut env = TestEnv::new();
    let a = env.create_task("A");
    let b = env.create_task("B");
    let c = env.create_task("C");
    env.list_mut().add_blocker(&a, &b).unwrap();
    env.list_mut().add_child(&a, &c).unwrap();
    env.list_mut().add_related(&b, &c).unwrap();

    env.save_and_reload();

    env.assert_blocked_by(&a, &b);
    env.assert_child_of(&c, &a);
    assert!(env.task(&b).dependencies().related().contains(&c));
    env.assert_consistent();
}

#[test]
fn test_reload_keeps_task_order_and_fields() {
    let mut env = TestEnv::new();
    let ids: Vec<_> = ["first", "second", "third"]
        .iter()
        .map(|t| env.create_task(t))
        .collect();
    let with_desc = env
        .manager
        .add_task(LIST, "described", Some("has a body"))
        .unwrap();

    env.save_and_reload();

    let order: Vec<_> = env.list().tasks().map(|t| t.id().clone()).collect();
    assert_eq!(&order[..3], ids.as_slice());
    assert_eq!(
        env.task(&with_desc).description.as_deref(),
        Some("has a body")
    );
}

#[test]
fn test_latest_snapshot_wins_after_removal() {
    let mut env = TestEnv::new();
    let a = env.create_task("A");
    let b = env.create_task("B");
    env.list_mut().add_related(&a, &b).unwrap();
    env.save_and_reload();

    env.list_mut().remove_task(&a).unwrap();
    env.save_and_reload();

    assert!(!env.list().contains(&a));
    assert!(env.task(&b).dependencies().related().is_empty());
}

#[test]
fn test_multiple_lists_load_in_creation_order() {
    let mut env = TestEnv::new();
    env.manager.create_list("Second");
    env.manager.create_list("Third");

    env.save_and_reload();

    let names: Vec<_> = env.manager.lists().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec![LIST, "Second", "Third"]);
}

#[test]
fn test_load_skips_garbage_lines() {
    let mut env = TestEnv::new();
    env.create_task("Keep me");
    env.manager.save(&mut env.storage).unwrap();

    let path = env.temp_dir.path().join(STORE_DIR).join("lists.jsonl");
    let mut contents = fs::read_to_string(&path).unwrap();
    contents.push_str("{\"id\": \"tl-broken\"\n");
    fs::write(&path, contents).unwrap();

    let storage = Storage::open(env.temp_dir.path()).unwrap();
    let lists = storage.load_lists().unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].len(), 1);
}

#[test]
fn test_inconsistent_list_still_loads() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let mut storage = Storage::init(temp_dir.path()).unwrap();

    // Related edge to a task that is not in the list
    let mut list = TaskList::new("Dangling");
    let mut a = todograph::Task::new("A");
    let mut ghost = todograph::Task::new("Ghost");
    todograph::Relations::add_related(&mut a, &mut ghost).unwrap();
    list.add_task(a).unwrap();
    storage.append_list(&list).unwrap();

    let manager = TaskManager::load(&storage).unwrap();
    assert_eq!(manager.lists().len(), 1);
    assert!(manager.lists()[0].verify().is_err());
}

#[test]
fn test_compact_keeps_latest_state() {
    let mut env = TestEnv::new();
    for title in ["a", "b", "c"] {
        env.create_task(title);
        env.manager.save(&mut env.storage).unwrap();
    }

    let dropped = env.storage.compact().unwrap();
    assert_eq!(dropped, 2);

    env.save_and_reload();
    assert_eq!(env.list().len(), 3);
}

#[test]
fn test_open_missing_store_fails() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    assert!(Storage::open(temp_dir.path()).is_err());
}
