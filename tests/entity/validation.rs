//! Attribute validation through the public facade.

use fabula::{
    AttributeConfig, EntityManager, EntityManagerConfig, EntityParams, EntityPatch, Error,
    UpdateOptions, ValueKind,
};

fn item_config() -> EntityManagerConfig {
    let mut config = EntityManagerConfig::new();
    config
        .register_attribute(
            "item",
            "name",
            AttributeConfig::new().required().kind(ValueKind::String),
        )
        .unwrap();
    config
        .register_attribute(
            "item",
            "weight",
            AttributeConfig::new()
                .kind(ValueKind::Int)
                .validate(|v| v.as_int().is_some_and(|w| w >= 0)),
        )
        .unwrap();
    config
}

#[test]
fn a_valid_item_is_created() {
    let mut manager = EntityManager::new(item_config());
    let lamp = manager
        .create_entity(
            EntityParams::new("item")
                .attribute("name", "lamp")
                .attribute("weight", 2i64),
        )
        .unwrap();
    assert_eq!(lamp.kind, "item");
}

#[test]
fn missing_required_attribute_lands_nothing() {
    let mut manager = EntityManager::new(item_config());
    let err = manager
        .create_entity(EntityParams::new("item").attribute("weight", 2i64))
        .unwrap_err();
    assert!(matches!(err, Error::MissingAttribute { .. }));
    assert!(manager.state().is_empty());
    assert!(manager.state_manager().history().is_empty());
}

#[test]
fn kind_mismatch_reports_expected_and_actual() {
    let mut manager = EntityManager::new(item_config());
    let err = manager
        .create_entity(
            EntityParams::new("item")
                .attribute("name", "lamp")
                .attribute("weight", "heavy"),
        )
        .unwrap_err();
    match err {
        Error::AttributeKind {
            expected, actual, ..
        } => {
            assert_eq!(expected, ValueKind::Int);
            assert_eq!(actual, ValueKind::String);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rules_only_bind_the_configured_type() {
    let mut manager = EntityManager::new(item_config());
    // Rooms have no registered rules, so anything goes.
    let room = manager.create_entity(EntityParams::new("room").attribute("weight", "vast"));
    assert!(room.is_ok());
}

#[test]
fn updates_validate_patched_attributes_only() {
    let mut manager = EntityManager::new(item_config());
    let lamp = manager
        .create_entity(
            EntityParams::new("item")
                .attribute("name", "lamp")
                .attribute("weight", 2i64),
        )
        .unwrap();
    // Patching an unrelated attribute does not re-check "weight".
    let renamed = manager.update_entity(
        &lamp.id,
        EntityPatch::new().attribute("name", "brass lamp"),
        UpdateOptions::default(),
    );
    assert!(renamed.is_ok());
    // Patching a ruled attribute with a bad value fails.
    let err = manager
        .update_entity(
            &lamp.id,
            EntityPatch::new().attribute("weight", -1i64),
            UpdateOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::ValidationFailed { .. }));
}

#[test]
fn unknown_id_is_ok_none_not_an_error() {
    let mut manager = EntityManager::new(item_config());
    let result = manager.update_entity(
        &fabula::EntityId::new("ghost"),
        EntityPatch::new().attribute("weight", 1i64),
        UpdateOptions::default(),
    );
    assert!(matches!(result, Ok(None)));
}
