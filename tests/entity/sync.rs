//! Bidirectional relationship upkeep through the public facade.

use std::cell::RefCell;
use std::rc::Rc;

use fabula::{
    EntityManager, EntityManagerConfig, EntityParams, EntityPatch, Event, ListenerOptions,
    RelationshipConfig, UpdateOptions, WorldEvent, WorldEventKind,
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
fn forward_and_inverse_edges_stay_in_step() {
    let mut manager = EntityManager::new(containment());
    let room = manager.create_entity(EntityParams::new("room")).unwrap();
    let lamp = manager.create_entity(EntityParams::new("item")).unwrap();

    manager.create_relationship(&room.id, "contains", &lamp.id);
    assert!(manager.entity(&lamp.id).unwrap().has_target("contained_by", &room.id));

    manager.remove_relationship(&room.id, "contains", &lamp.id);
    assert!(!manager.entity(&lamp.id).unwrap().has_target("contained_by", &room.id));
    assert!(!manager.entity(&room.id).unwrap().has_target("contains", &lamp.id));
}

#[test]
fn sync_works_when_started_from_the_inverse_side() {
    let mut manager = EntityManager::new(containment());
    let room = manager.create_entity(EntityParams::new("room")).unwrap();
    let lamp = manager.create_entity(EntityParams::new("item")).unwrap();
    manager.create_relationship(&lamp.id, "contained_by", &room.id);
    assert!(manager.entity(&room.id).unwrap().has_target("contains", &lamp.id));
}

#[test]
fn patch_replacement_moves_the_inverse_edges() {
    let mut manager = EntityManager::new(containment());
    let chest = manager.create_entity(EntityParams::new("container")).unwrap();
    let coin = manager.create_entity(EntityParams::new("item")).unwrap();
    let gem = manager.create_entity(EntityParams::new("item")).unwrap();
    manager.create_relationship(&chest.id, "contains", &coin.id);

    manager
        .update_entity(
            &chest.id,
            EntityPatch::new().relationship("contains", [gem.id.clone()]),
            UpdateOptions::default(),
        )
        .unwrap();

    assert!(!manager.entity(&coin.id).unwrap().has_target("contained_by", &chest.id));
    assert!(manager.entity(&gem.id).unwrap().has_target("contained_by", &chest.id));
}

#[test]
fn merging_patch_only_adds_inverse_edges() {
    let mut manager = EntityManager::new(containment());
    let chest = manager.create_entity(EntityParams::new("container")).unwrap();
    let coin = manager.create_entity(EntityParams::new("item")).unwrap();
    let gem = manager.create_entity(EntityParams::new("item")).unwrap();
    manager.create_relationship(&chest.id, "contains", &coin.id);

    manager
        .update_entity(
            &chest.id,
            EntityPatch::new().relationship("contains", [gem.id.clone()]),
            UpdateOptions::merging(),
        )
        .unwrap();

    assert!(manager.entity(&coin.id).unwrap().has_target("contained_by", &chest.id));
    assert!(manager.entity(&gem.id).unwrap().has_target("contained_by", &chest.id));
}

#[test]
fn removal_cleans_up_both_directions() {
    let mut manager = EntityManager::new(containment());
    let room = manager.create_entity(EntityParams::new("room")).unwrap();
    let lamp = manager.create_entity(EntityParams::new("item")).unwrap();
    manager.create_relationship(&room.id, "contains", &lamp.id);

    assert!(manager.remove_entity(&lamp.id));
    let room = manager.entity(&room.id).unwrap();
    assert!(!room.has_target("contains", &lamp.id));
}

#[test]
fn removal_leaves_one_way_edges_out_of_the_event_stream() {
    let mut manager = EntityManager::new(containment());
    let hall = manager.create_entity(EntityParams::new("room")).unwrap();
    let cellar = manager.create_entity(EntityParams::new("room")).unwrap();
    manager.create_relationship(&hall.id, "leads_to", &cellar.id);

    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    manager
        .events()
        .on_any(ListenerOptions::default(), move |event: &WorldEvent| {
            sink.borrow_mut().push(event.kind());
            Ok(())
        });

    // The one-way edge vanishes with the entity; only mirrored edges
    // are retracted through relationship removals.
    assert!(manager.remove_entity(&hall.id));
    assert_eq!(
        *log.borrow(),
        vec![WorldEventKind::StateUpdated, WorldEventKind::EntityRemoved]
    );
}

#[test]
fn removal_retracts_mirrored_edges_before_the_entity_goes() {
    let mut manager = EntityManager::new(containment());
    let room = manager.create_entity(EntityParams::new("room")).unwrap();
    let lamp = manager.create_entity(EntityParams::new("item")).unwrap();
    manager.create_relationship(&room.id, "contains", &lamp.id);

    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    manager
        .events()
        .on_any(ListenerOptions::default(), move |event: &WorldEvent| {
            sink.borrow_mut().push(event.kind());
            Ok(())
        });

    assert!(manager.remove_entity(&lamp.id));
    let kinds = log.borrow();
    assert!(kinds.contains(&WorldEventKind::RelationshipRemoved));
    assert_eq!(kinds.last(), Some(&WorldEventKind::EntityRemoved));
}

#[test]
fn symmetric_relationships_mirror_under_their_own_type() {
    let mut config = EntityManagerConfig::new();
    config
        .register_relationship("adjacent_to", RelationshipConfig::symmetric())
        .unwrap();
    let mut manager = EntityManager::new(config);
    let cave = manager.create_entity(EntityParams::new("room")).unwrap();
    let tunnel = manager.create_entity(EntityParams::new("room")).unwrap();
    manager.create_relationship(&cave.id, "adjacent_to", &tunnel.id);
    assert!(manager.entity(&tunnel.id).unwrap().has_target("adjacent_to", &cave.id));
}
