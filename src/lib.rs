//! Fabula is an immutable, event-notifying world model for
//! interactive narrative systems.
//!
//! The world is a graph of typed entities connected by named, ordered
//! relationships. Every change produces a new snapshot that shares
//! structure with the old one, so history, undo, and time travel are
//! cheap; every change is announced through a typed event emitter.
//!
//! The workspace is layered:
//!
//! ```text
//! Layer 3: fabula_query      — read-only graph queries and traversal
//! Layer 2: fabula_entity     — validation + bidirectional sync
//! Layer 1: fabula_state      — immutable snapshots, history, undo
//! Layer 0: fabula_events     — typed publish/subscribe fabric
//! Layer 0: fabula_foundation — values, entity ids, errors
//! ```
//!
//! Most hosts talk to an [`EntityManager`] for writes and a
//! [`QueryEngine`] over the current snapshot for reads:
//!
//! ```
//! use fabula::{
//!     EntityManager, EntityManagerConfig, EntityParams, QueryEngine, QueryOptions,
//!     RelationshipConfig,
//! };
//!
//! # fn main() -> fabula::Result<()> {
//! let mut config = EntityManagerConfig::new();
//! config.register_relationship("contains", RelationshipConfig::mirrored("contained_by"))?;
//!
//! let mut manager = EntityManager::new(config);
//! let room = manager.create_entity(EntityParams::new("room"))?;
//! let lamp = manager.create_entity(EntityParams::new("item").attribute("name", "lamp"))?;
//! manager.create_relationship(&room.id, "contains", &lamp.id);
//!
//! let state = manager.state();
//! let engine = QueryEngine::new(&state);
//! assert_eq!(engine.find_related(&room.id, Some("contains"), &QueryOptions::new()).len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use fabula_foundation::{EntityId, Error, Result, Value, ValueKind};

pub use fabula_events::{Event, EventEmitter, ListenerOptions, ListenerToken};

pub use fabula_state::{
    Entity, EntityParams, EntityPatch, History, HistoryEntry, StateManager, StateManagerConfig,
    UpdateOptions, WorldEvent, WorldEventKind, WorldMeta, WorldState,
};

pub use fabula_entity::{
    inverse_edits, AttributeConfig, EdgeOp, EntityManager, EntityManagerConfig, RelationshipConfig,
};

pub use fabula_query::{EntityQuery, QueryEngine, QueryOptions, QueryResult, SortDirection};
