//! A small end-to-end play session exercising every layer together.

use std::cell::RefCell;
use std::rc::Rc;

use fabula::{
    AttributeConfig, EntityManager, EntityManagerConfig, EntityParams, EntityPatch,
    ListenerOptions, QueryEngine, QueryOptions, RelationshipConfig, UpdateOptions, Value, ValueKind,
    WorldEvent, WorldEventKind,
};

fn game_config() -> EntityManagerConfig {
    let mut config = EntityManagerConfig::new();
    config
        .register_relationship("contains", RelationshipConfig::mirrored("contained_by"))
        .unwrap();
    config
        .register_relationship("contained_by", RelationshipConfig::mirrored("contains"))
        .unwrap();
    config
        .register_relationship("leads_to", RelationshipConfig::one_way())
        .unwrap();
    config
        .register_attribute(
            "room",
            "name",
            AttributeConfig::new().required().kind(ValueKind::String),
        )
        .unwrap();
    config
}

#[test]
fn a_short_session_holds_together() {
    let mut game = EntityManager::new(game_config());

    // Watch every entity creation as the world is authored.
    let events = game.events();
    let created = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&created);
    events.on(
        WorldEventKind::EntityCreated,
        ListenerOptions::default(),
        move |_: &WorldEvent| {
            *sink.borrow_mut() += 1;
            Ok(())
        },
    );

    // Author a tiny map.
    let cellar = game
        .create_entity(EntityParams::new("room").attribute("name", "cellar"))
        .unwrap();
    let stairs = game
        .create_entity(EntityParams::new("room").attribute("name", "stairs"))
        .unwrap();
    let hall = game
        .create_entity(EntityParams::new("room").attribute("name", "hall"))
        .unwrap();
    game.create_relationship(&cellar.id, "leads_to", &stairs.id);
    game.create_relationship(&stairs.id, "leads_to", &hall.id);

    let lamp = game
        .create_entity(
            EntityParams::new("item")
                .attribute("name", "lamp")
                .attribute("lit", false),
        )
        .unwrap();
    game.create_relationship(&cellar.id, "contains", &lamp.id);
    assert_eq!(*created.borrow(), 4);

    // The player starts in the cellar and lights the lamp.
    game.state_manager_mut().set_focus(Some(cellar.id.clone()));
    game.update_entity(
        &lamp.id,
        EntityPatch::new().attribute("lit", true),
        UpdateOptions::default(),
    )
    .unwrap();

    // Reads over one frozen snapshot.
    let state = game.state();
    let engine = QueryEngine::new(&state);
    assert_eq!(
        engine
            .find_path(&cellar.id, &hall.id, "leads_to")
            .len(),
        3
    );
    assert_eq!(
        engine
            .find_related(&cellar.id, Some("contains"), &QueryOptions::new())
            .first()
            .unwrap()
            .attribute("lit"),
        Some(&Value::Bool(true))
    );
    assert_eq!(state.meta.focus, Some(cellar.id.clone()));
    assert!(state.entity(&lamp.id).unwrap().has_target("contained_by", &cellar.id));

    // Undo the lamp lighting; the frozen snapshot is unaffected.
    game.state_manager_mut().undo();
    assert_eq!(
        game.state().entity(&lamp.id).unwrap().attribute("lit"),
        Some(&Value::Bool(false))
    );
    assert_eq!(
        state.entity(&lamp.id).unwrap().attribute("lit"),
        Some(&Value::Bool(true))
    );
}
