//! Subscribing to world events through the public facade.

use std::cell::RefCell;
use std::rc::Rc;

use fabula::{
    EntityParams, Event, ListenerOptions, StateManager, StateManagerConfig, WorldEvent,
    WorldEventKind,
};

#[test]
fn world_changes_reach_kind_specific_listeners() {
    let mut manager = StateManager::new(StateManagerConfig::default());
    let events = manager.events();
    let created: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&created);
    events.on(
        WorldEventKind::EntityCreated,
        ListenerOptions::default(),
        move |event: &WorldEvent| {
            if let WorldEvent::EntityCreated { id, .. } = event {
                sink.borrow_mut().push(id.to_string());
            }
            Ok(())
        },
    );
    let room = manager.create_entity(EntityParams::new("room"), None);
    manager.create_entity(EntityParams::new("item"), None);
    assert_eq!(created.borrow().len(), 2);
    assert_eq!(created.borrow()[0], room.id.to_string());
}

#[test]
fn wildcard_listener_sees_every_change_in_order() {
    let mut manager = StateManager::new(StateManagerConfig::default());
    let events = manager.events();
    let kinds = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&kinds);
    events.on_any(ListenerOptions::default(), move |event: &WorldEvent| {
        sink.borrow_mut().push(event.kind());
        Ok(())
    });
    let room = manager.create_entity(EntityParams::new("room"), None);
    let item = manager.create_entity(EntityParams::new("item"), None);
    manager.create_relationship(&room.id, "contains", &item.id, None);
    assert_eq!(
        *kinds.borrow(),
        vec![
            WorldEventKind::StateUpdated,
            WorldEventKind::EntityCreated,
            WorldEventKind::StateUpdated,
            WorldEventKind::EntityCreated,
            WorldEventKind::StateUpdated,
            WorldEventKind::RelationshipCreated,
        ]
    );
}

#[test]
fn state_updated_carries_both_snapshots() {
    let mut manager = StateManager::new(StateManagerConfig::default());
    let events = manager.events();
    let observed = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&observed);
    events.on(
        WorldEventKind::StateUpdated,
        ListenerOptions::once(),
        move |event: &WorldEvent| {
            if let WorldEvent::StateUpdated {
                previous, current, ..
            } = event
            {
                *sink.borrow_mut() = Some((previous.len(), current.len()));
            }
            Ok(())
        },
    );
    manager.create_entity(EntityParams::new("room"), None);
    assert_eq!(*observed.borrow(), Some((0, 1)));
}

#[test]
fn removed_listener_misses_later_changes() {
    let mut manager = StateManager::new(StateManagerConfig::default());
    let events = manager.events();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    let token = events.on(
        WorldEventKind::EntityCreated,
        ListenerOptions::default(),
        move |_: &WorldEvent| {
            *sink.borrow_mut() += 1;
            Ok(())
        },
    );
    manager.create_entity(EntityParams::new("room"), None);
    assert!(events.off(token));
    manager.create_entity(EntityParams::new("room"), None);
    assert_eq!(*count.borrow(), 1);
}
