//! The world snapshot and its metadata.

use fabula_foundation::{EntityId, Value};
use im::{HashMap, OrdMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

// ===== World Meta =====

/// Bookkeeping carried along with every snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldMeta {
    /// Monotonic snapshot counter, starting at 1.
    pub version: u64,
    /// Wall-clock time of the last change, in milliseconds since the
    /// Unix epoch.
    pub timestamp: u64,
    /// Count of changes applied since the initial snapshot.
    pub turn_number: u64,
    /// The entity currently in focus, if any.
    pub focus: Option<EntityId>,
}

impl WorldMeta {
    /// Metadata for a fresh world created at the given time.
    #[must_use]
    pub fn initial(timestamp: u64) -> Self {
        Self {
            version: 1,
            timestamp,
            turn_number: 0,
            focus: None,
        }
    }
}

// ===== World State =====

/// One immutable snapshot of the entire world.
///
/// Cloning is O(1); derived snapshots share structure with their
/// ancestors. Entities are keyed in an ordered map so iteration is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldState {
    /// Every entity in the world, keyed by id.
    pub entities: OrdMap<EntityId, Entity>,
    /// Snapshot bookkeeping.
    pub meta: WorldMeta,
    /// Host-attached plain data, opaque to the world model.
    pub extensions: HashMap<String, Value>,
}

impl WorldState {
    /// Creates an empty world stamped with the given time.
    #[must_use]
    pub fn new(timestamp: u64) -> Self {
        Self {
            entities: OrdMap::new(),
            meta: WorldMeta::initial(timestamp),
            extensions: HashMap::new(),
        }
    }

    /// Looks up an entity by id.
    #[must_use]
    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Whether an entity with this id exists.
    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// The number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the world holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Returns a snapshot with the entity inserted or replaced.
    #[must_use]
    pub fn insert_entity(&self, entity: Entity) -> Self {
        let mut next = self.clone();
        next.entities.insert(entity.id.clone(), entity);
        next
    }

    /// Returns a snapshot without the entity.
    #[must_use]
    pub fn remove_entity(&self, id: &EntityId) -> Self {
        let mut next = self.clone();
        next.entities.remove(id);
        next
    }

    /// Returns a snapshot with one entity rewritten in place.
    ///
    /// If the id is unknown the snapshot is returned unchanged.
    #[must_use]
    pub fn map_entity(&self, id: &EntityId, f: impl FnOnce(&Entity) -> Entity) -> Self {
        match self.entities.get(id) {
            Some(entity) => self.insert_entity(f(entity)),
            None => self.clone(),
        }
    }

    /// Returns a snapshot with the focus slot changed.
    #[must_use]
    pub fn with_focus(&self, focus: Option<EntityId>) -> Self {
        let mut next = self.clone();
        next.meta.focus = focus;
        next
    }

    /// Looks up a host extension value.
    #[must_use]
    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    /// Returns a snapshot with a host extension value set.
    #[must_use]
    pub fn with_extension(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        next.extensions.insert(key.into(), value.into());
        next
    }

    /// Returns this snapshot advanced by one change.
    ///
    /// Bumps the version and turn number and refreshes the timestamp.
    /// The state manager stamps every applied transformation with
    /// this; undo and redo repoint without stamping.
    #[must_use]
    pub fn advanced(&self, timestamp: u64) -> Self {
        let mut next = self.clone();
        next.meta.version += 1;
        next.meta.turn_number += 1;
        next.meta.timestamp = timestamp;
        next
    }
}
