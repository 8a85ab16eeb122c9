//! World change events.

use std::sync::Arc;

use fabula_events::Event;
use fabula_foundation::EntityId;

use crate::entity::EntityPatch;
use crate::world::WorldState;

/// A change announced by the state manager.
///
/// Every applied transformation announces [`WorldEvent::StateUpdated`]
/// first; the entity and relationship operations follow it with a
/// specific event describing what changed.
#[derive(Debug, Clone)]
pub enum WorldEvent {
    /// The current snapshot was replaced.
    StateUpdated {
        /// The snapshot before the change.
        previous: Arc<WorldState>,
        /// The snapshot after the change.
        current: Arc<WorldState>,
        /// Description of the change, if one was given.
        description: Option<String>,
    },
    /// An entity was created.
    EntityCreated {
        /// The new entity's id.
        id: EntityId,
        /// The new entity's type tag.
        kind: String,
    },
    /// An entity was updated.
    EntityUpdated {
        /// The updated entity's id.
        id: EntityId,
        /// The entity's type tag after the update.
        kind: String,
        /// The patch as requested, not the merged result.
        changes: EntityPatch,
    },
    /// An entity was removed.
    EntityRemoved {
        /// The removed entity's id.
        id: EntityId,
        /// The removed entity's type tag.
        kind: String,
    },
    /// An edge was added.
    RelationshipCreated {
        /// The entity the edge starts at.
        source: EntityId,
        /// The relationship type.
        rel_type: String,
        /// The entity the edge points to.
        target: EntityId,
    },
    /// An edge was removed.
    RelationshipRemoved {
        /// The entity the edge started at.
        source: EntityId,
        /// The relationship type.
        rel_type: String,
        /// The entity the edge pointed to.
        target: EntityId,
    },
}

/// Discriminant of [`WorldEvent`], used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorldEventKind {
    /// The current snapshot was replaced.
    StateUpdated,
    /// An entity was created.
    EntityCreated,
    /// An entity was updated.
    EntityUpdated,
    /// An entity was removed.
    EntityRemoved,
    /// An edge was added.
    RelationshipCreated,
    /// An edge was removed.
    RelationshipRemoved,
}

impl Event for WorldEvent {
    type Kind = WorldEventKind;

    fn kind(&self) -> WorldEventKind {
        match self {
            Self::StateUpdated { .. } => WorldEventKind::StateUpdated,
            Self::EntityCreated { .. } => WorldEventKind::EntityCreated,
            Self::EntityUpdated { .. } => WorldEventKind::EntityUpdated,
            Self::EntityRemoved { .. } => WorldEventKind::EntityRemoved,
            Self::RelationshipCreated { .. } => WorldEventKind::RelationshipCreated,
            Self::RelationshipRemoved { .. } => WorldEventKind::RelationshipRemoved,
        }
    }
}
