//! Raw relationship semantics at the state layer.

use std::sync::Arc;

use fabula::{EntityId, EntityParams, StateManager, StateManagerConfig};

#[test]
fn edges_keep_insertion_order() {
    let mut manager = StateManager::new(StateManagerConfig::default());
    let room = manager.create_entity(EntityParams::new("room"), None);
    let first = manager.create_entity(EntityParams::new("item"), None);
    let second = manager.create_entity(EntityParams::new("item"), None);
    manager.create_relationship(&room.id, "contains", &first.id, None);
    manager.create_relationship(&room.id, "contains", &second.id, None);
    let targets: Vec<EntityId> = manager
        .entity(&room.id)
        .unwrap()
        .targets("contains")
        .into_iter()
        .collect();
    assert_eq!(targets, vec![first.id, second.id]);
}

#[test]
fn duplicate_edge_is_a_silent_success() {
    let mut manager = StateManager::new(StateManagerConfig::default());
    let room = manager.create_entity(EntityParams::new("room"), None);
    let item = manager.create_entity(EntityParams::new("item"), None);
    assert!(manager.create_relationship(&room.id, "contains", &item.id, None));
    let before = manager.state();
    assert!(manager.create_relationship(&room.id, "contains", &item.id, None));
    assert!(Arc::ptr_eq(&before, &manager.state()));
    assert_eq!(manager.entity(&room.id).unwrap().targets("contains").len(), 1);
}

#[test]
fn removing_an_entity_leaves_inbound_edges_dangling() {
    // The state layer does not chase references; that is the entity
    // manager's job.
    let mut manager = StateManager::new(StateManagerConfig::default());
    let room = manager.create_entity(EntityParams::new("room"), None);
    let item = manager.create_entity(EntityParams::new("item"), None);
    manager.create_relationship(&room.id, "contains", &item.id, None);
    manager.remove_entity(&item.id, None);
    assert!(manager.entity(&room.id).unwrap().has_target("contains", &item.id));
}

#[test]
fn relationship_to_unknown_target_is_rejected() {
    let mut manager = StateManager::new(StateManagerConfig::default());
    let room = manager.create_entity(EntityParams::new("room"), None);
    let before = manager.state();
    assert!(!manager.create_relationship(&room.id, "contains", &EntityId::new("ghost"), None));
    assert!(Arc::ptr_eq(&before, &manager.state()));
}
