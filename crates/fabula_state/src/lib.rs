//! Immutable world state and the state manager.
//!
//! The world is a persistent value: every mutation produces a new
//! [`WorldState`] that structurally shares unchanged data with its
//! predecessor, so snapshots are O(1) to take and keep. The
//! [`StateManager`] owns the current snapshot, a bounded history, the
//! undo/redo stacks, and an event emitter that announces every change.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod entity;
mod event;
mod history;
mod manager;
mod world;

pub use entity::{Entity, EntityParams, EntityPatch, UpdateOptions};
pub use event::{WorldEvent, WorldEventKind};
pub use history::{History, HistoryEntry};
pub use manager::{StateManager, StateManagerConfig};
pub use world::{WorldMeta, WorldState};
