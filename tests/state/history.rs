//! History recording and bounds.

use fabula::{EntityParams, StateManager, StateManagerConfig};

#[test]
fn described_changes_are_recorded_in_order() {
    let mut manager = StateManager::new(StateManagerConfig::default());
    manager.create_entity(EntityParams::new("room"), Some("dug the cellar"));
    manager.create_entity(EntityParams::new("item"), Some("forged the lamp"));
    let descriptions: Vec<&str> = manager
        .history()
        .iter()
        .filter_map(|entry| entry.description.as_deref())
        .collect();
    assert_eq!(descriptions, vec!["dug the cellar", "forged the lamp"]);
}

#[test]
fn default_descriptions_name_the_operation() {
    let mut manager = StateManager::new(StateManagerConfig::default());
    let room = manager.create_entity(EntityParams::new("room"), None);
    let latest = manager.history().latest().unwrap();
    assert_eq!(
        latest.description.as_deref(),
        Some(format!("Created entity: {}", room.id).as_str())
    );
}

#[test]
fn history_is_bounded_by_configuration() {
    let mut manager = StateManager::new(StateManagerConfig::default().max_history_size(5));
    for i in 0..20 {
        manager.create_entity(EntityParams::new("item"), Some(&format!("step {i}")));
    }
    assert_eq!(manager.history().len(), 5);
    assert_eq!(
        manager.history().latest().and_then(|e| e.description.as_deref()),
        Some("step 19")
    );
}

#[test]
fn history_entries_keep_their_snapshots_alive() {
    let mut manager = StateManager::new(StateManagerConfig::default());
    let room = manager.create_entity(EntityParams::new("room"), Some("built a room"));
    manager.remove_entity(&room.id, Some("demolished it"));
    let entries: Vec<usize> = manager.history().iter().map(|e| e.state.len()).collect();
    assert_eq!(entries, vec![1, 0]);
}
