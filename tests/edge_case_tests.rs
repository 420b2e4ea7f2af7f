//! Integration tests for edge cases.
//!
//! Tests self-references, unknown ids, removal cleanup and unusual titles.

mod common;

use common::{LIST, TestEnv};
use todograph::{ListError, MAX_TITLE_LEN, RelationError, TaskId};

// =============================================================================
// Self references
// =============================================================================

#[test]
fn test_self_block_rejected_state_unchanged() {
    let mut env = TestEnv::new();
    let a = env.create_task("A");

    let result = env.list_mut().add_blocker(&a, &a);

    assert!(matches!(
        result,
        Err(ListError::Relation(RelationError::CycleDependency { .. }))
    ));
    assert!(env.task(&a).dependencies().is_empty());
}

#[test]
fn test_self_child_rejected() {
    let mut env = TestEnv::new();
    let a = env.create_task("A");

    let result = env.list_mut().add_child(&a, &a);

    assert!(matches!(
        result,
        Err(ListError::Relation(RelationError::InsufficientChildren { .. }))
    ));
    assert!(env.task(&a).dependencies().parent().is_none());
}

#[test]
fn test_self_related_rejected() {
    let mut env = TestEnv::new();
    let a = env.create_task("A");

    let result = env.list_mut().add_related(&a, &a);

    assert_eq!(
        result,
        Err(ListError::Relation(RelationError::SelfRelation(a.clone())))
    );
}

// =============================================================================
// Unknown ids
// =============================================================================

#[test]
fn test_unknown_partner_leaves_task_untouched() {
    let mut env = TestEnv::new();
    let a = env.create_task("A");
    let ghost = TaskId::from("td-0000000000");

    assert_eq!(
        env.list_mut().add_blocker(&a, &ghost),
        Err(ListError::TaskNotFound(ghost.clone()))
    );
    assert_eq!(
        env.list_mut().remove_child(&ghost, &a),
        Err(ListError::TaskNotFound(ghost.clone()))
    );
    assert!(env.task(&a).dependencies().is_empty());
}

#[test]
fn test_unknown_list_rejected() {
    let mut env = TestEnv::new();
    assert!(env.manager.add_task("No such list", "Task", None).is_err());
    assert!(env.manager.find(LIST).is_ok());
}

// =============================================================================
// Removal
// =============================================================================

#[test]
fn test_remove_parent_orphans_children() {
    let mut env = TestEnv::new();
    let parent = env.create_task("Parent");
    let kid1 = env.create_task("Kid 1");
    let kid2 = env.create_task("Kid 2");
    env.list_mut().add_child(&parent, &kid1).unwrap();
    env.list_mut().add_child(&parent, &kid2).unwrap();

    env.list_mut().remove_task(&parent).unwrap();

    assert!(env.task(&kid1).dependencies().parent().is_none());
    assert!(env.task(&kid2).dependencies().parent().is_none());
    env.assert_consistent();

    // Orphans can be adopted again
    let adopter = env.create_task("Adopter");
    env.list_mut().add_child(&adopter, &kid1).unwrap();
    env.assert_child_of(&kid1, &adopter);
}

#[test]
fn test_remove_child_task_updates_parent() {
    let mut env = TestEnv::new();
    let parent = env.create_task("Parent");
    let kid = env.create_task("Kid");
    env.list_mut().add_child(&parent, &kid).unwrap();

    env.list_mut().remove_task(&kid).unwrap();

    assert!(env.task(&parent).dependencies().children().is_empty());
    env.assert_consistent();
}

#[test]
fn test_remove_task_twice() {
    let mut env = TestEnv::new();
    let a = env.create_task("A");

    env.list_mut().remove_task(&a).unwrap();
    assert_eq!(
        env.list_mut().remove_task(&a),
        Err(ListError::TaskNotFound(a))
    );
}

// =============================================================================
// Titles
// =============================================================================

#[test]
fn test_unicode_title() {
    let mut env = TestEnv::new();
    let id = env.create_task("修复登录 🐛");
    assert_eq!(env.task(&id).title, "修复登录 🐛");
}

#[test]
fn test_title_at_max_length() {
    let mut env = TestEnv::new();
    let title = "é".repeat(MAX_TITLE_LEN);
    let id = env.create_task(&title);
    assert_eq!(env.task(&id).title.chars().count(), MAX_TITLE_LEN);
}

#[test]
fn test_invalid_titles_rejected() {
    let mut env = TestEnv::new();
    let too_long = "x".repeat(MAX_TITLE_LEN + 1);

    for title in ["", "   ", "line\nbreak", too_long.as_str()] {
        assert!(
            env.manager.add_task(LIST, title, None).is_err(),
            "title {:?} should be rejected",
            title
        );
    }
    assert!(env.list().is_empty());
}
