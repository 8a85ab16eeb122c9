//! Undo and redo across the whole stack.

use std::sync::Arc;

use fabula::{
    EntityManager, EntityManagerConfig, EntityParams, EntityPatch, RelationshipConfig,
    UpdateOptions, Value,
};

fn containment() -> EntityManagerConfig {
    let mut config = EntityManagerConfig::new();
    config
        .register_relationship("contains", RelationshipConfig::mirrored("contained_by"))
        .unwrap();
    config
        .register_relationship("contained_by", RelationshipConfig::mirrored("contains"))
        .unwrap();
    config
}

#[test]
fn undo_walks_back_through_manager_operations() {
    let mut manager = EntityManager::new(containment());
    let room = manager.create_entity(EntityParams::new("room")).unwrap();
    let lamp = manager.create_entity(EntityParams::new("item")).unwrap();
    manager.create_relationship(&room.id, "contains", &lamp.id);

    // The mirrored inverse edge is its own undoable step.
    let state = manager.state_manager_mut().undo().unwrap();
    assert!(state.entity(&room.id).unwrap().has_target("contains", &lamp.id));
    assert!(!state.entity(&lamp.id).unwrap().has_target("contained_by", &room.id));

    let state = manager.state_manager_mut().undo().unwrap();
    assert!(!state.entity(&room.id).unwrap().has_target("contains", &lamp.id));
}

#[test]
fn redo_restores_the_exact_snapshot() {
    let mut manager = EntityManager::new(containment());
    let item = manager
        .create_entity(EntityParams::new("item").attribute("weight", 5i64))
        .unwrap();
    manager
        .update_entity(
            &item.id,
            EntityPatch::new().attribute("weight", 9i64),
            UpdateOptions::default(),
        )
        .unwrap();
    let after_update = manager.state();

    manager.state_manager_mut().undo();
    assert_eq!(
        manager.state().entity(&item.id).unwrap().attribute("weight"),
        Some(&Value::Int(5))
    );

    let redone = manager.state_manager_mut().redo().unwrap();
    assert!(Arc::ptr_eq(&after_update, &redone));
}

#[test]
fn a_new_change_forks_away_the_redoable_future() {
    let mut manager = EntityManager::new(containment());
    let item = manager
        .create_entity(EntityParams::new("item").attribute("weight", 5i64))
        .unwrap();
    manager
        .update_entity(
            &item.id,
            EntityPatch::new().attribute("weight", 9i64),
            UpdateOptions::default(),
        )
        .unwrap();
    manager.state_manager_mut().undo();
    manager
        .update_entity(
            &item.id,
            EntityPatch::new().attribute("weight", 7i64),
            UpdateOptions::default(),
        )
        .unwrap();
    assert!(manager.state_manager_mut().redo().is_none());
    assert_eq!(
        manager.state().entity(&item.id).unwrap().attribute("weight"),
        Some(&Value::Int(7))
    );
}

#[test]
fn undo_beyond_the_floor_keeps_the_initial_world() {
    let mut manager = EntityManager::new(containment());
    manager.create_entity(EntityParams::new("room")).unwrap();
    assert!(manager.state_manager_mut().undo().is_some());
    assert!(manager.state_manager_mut().undo().is_none());
    assert!(manager.state().is_empty());
}
