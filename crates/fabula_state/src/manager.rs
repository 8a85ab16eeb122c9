//! The state manager.
//!
//! Owns the current snapshot and applies transformations to it. A
//! transformation that returns the input pointer unchanged is a no-op:
//! nothing is recorded, nothing is announced. Pointer identity is
//! deliberately the only no-op signal; a structurally equal but
//! freshly allocated snapshot still counts as a change.

use std::rc::Rc;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use fabula_events::EventEmitter;
use fabula_foundation::{EntityId, Value};

use crate::entity::{Entity, EntityParams, EntityPatch, UpdateOptions};
use crate::event::WorldEvent;
use crate::history::{History, HistoryEntry};
use crate::world::WorldState;

/// Milliseconds since the Unix epoch, saturating at zero for clocks
/// set before it.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

// ===== Configuration =====

/// Configuration for a [`StateManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateManagerConfig {
    /// Capacity of the history ring and the undo stack.
    pub max_history_size: usize,
    /// Whether undo/redo stacks are maintained.
    pub enable_undo: bool,
    /// Record every change in history, not only described ones.
    pub track_all_changes: bool,
}

impl Default for StateManagerConfig {
    fn default() -> Self {
        Self {
            max_history_size: 100,
            enable_undo: true,
            track_all_changes: false,
        }
    }
}

impl StateManagerConfig {
    /// Sets the history and undo capacity.
    #[must_use]
    pub fn max_history_size(mut self, size: usize) -> Self {
        self.max_history_size = size;
        self
    }

    /// Enables or disables undo/redo.
    #[must_use]
    pub fn enable_undo(mut self, enabled: bool) -> Self {
        self.enable_undo = enabled;
        self
    }

    /// Records every change in history, described or not.
    #[must_use]
    pub fn track_all_changes(mut self, enabled: bool) -> Self {
        self.track_all_changes = enabled;
        self
    }
}

// ===== State Manager =====

/// Owns the current world snapshot, history, undo/redo, and events.
///
/// All mutations funnel through [`Self::update_state`]; the entity and
/// relationship operations are conveniences layered on top of it, each
/// announcing a specific event after the general
/// [`WorldEvent::StateUpdated`].
pub struct StateManager {
    current: Arc<WorldState>,
    config: StateManagerConfig,
    history: History,
    undo_stack: Vec<Arc<WorldState>>,
    redo_stack: Vec<Arc<WorldState>>,
    next_id: u64,
    emitter: Rc<EventEmitter<WorldEvent>>,
}

impl StateManager {
    /// Creates a manager over a fresh empty world.
    #[must_use]
    pub fn new(config: StateManagerConfig) -> Self {
        Self::with_state(Arc::new(WorldState::new(now_ms())), config)
    }

    /// Creates a manager over an existing snapshot.
    ///
    /// The snapshot becomes the permanent undo floor; undo can never
    /// step below it.
    #[must_use]
    pub fn with_state(initial: Arc<WorldState>, config: StateManagerConfig) -> Self {
        let mut undo_stack = Vec::new();
        if config.enable_undo {
            undo_stack.push(Arc::clone(&initial));
        }
        Self {
            current: initial,
            history: History::new(config.max_history_size),
            undo_stack,
            redo_stack: Vec::new(),
            next_id: 0,
            emitter: Rc::new(EventEmitter::new()),
            config,
        }
    }

    // ===== Accessors =====

    /// The current snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<WorldState> {
        Arc::clone(&self.current)
    }

    /// Looks up an entity in the current snapshot.
    #[must_use]
    pub fn entity(&self, id: &EntityId) -> Option<Entity> {
        self.current.entity(id).cloned()
    }

    /// The recorded change history, oldest first.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The emitter announcing this manager's changes.
    #[must_use]
    pub fn events(&self) -> Rc<EventEmitter<WorldEvent>> {
        Rc::clone(&self.emitter)
    }

    /// Whether a call to [`Self::undo`] would restore a snapshot.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.config.enable_undo && self.undo_stack.len() > 1
    }

    /// Whether a call to [`Self::redo`] would restore a snapshot.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    // ===== Core Update =====

    /// Applies a transformation to the current snapshot.
    ///
    /// Returning the input `Arc` unchanged makes the call a no-op with
    /// no history entry, no undo push, and no event. Otherwise the
    /// result is stamped (version, turn, timestamp), recorded, and
    /// announced; any redoable future is discarded.
    pub fn update_state(
        &mut self,
        transformer: impl FnOnce(&Arc<WorldState>) -> Arc<WorldState>,
        description: Option<&str>,
    ) -> Arc<WorldState> {
        self.apply(transformer, description, None)
    }

    /// Like [`Self::update_state`], labeling the history entry with
    /// the command that caused the change.
    pub fn update_state_for_command(
        &mut self,
        transformer: impl FnOnce(&Arc<WorldState>) -> Arc<WorldState>,
        description: Option<&str>,
        command: &str,
    ) -> Arc<WorldState> {
        self.apply(transformer, description, Some(command))
    }

    fn apply(
        &mut self,
        transformer: impl FnOnce(&Arc<WorldState>) -> Arc<WorldState>,
        description: Option<&str>,
        command: Option<&str>,
    ) -> Arc<WorldState> {
        let next = transformer(&self.current);
        if Arc::ptr_eq(&next, &self.current) {
            return next;
        }
        let timestamp = now_ms();
        let stamped = Arc::new(next.advanced(timestamp));
        let previous = std::mem::replace(&mut self.current, Arc::clone(&stamped));
        if self.config.track_all_changes || description.is_some() {
            self.history.push(HistoryEntry {
                state: Arc::clone(&stamped),
                timestamp,
                description: description.map(str::to_string),
                command: command.map(str::to_string),
            });
        }
        if self.config.enable_undo {
            self.undo_stack.push(Arc::clone(&stamped));
            if self.undo_stack.len() > self.config.max_history_size {
                self.undo_stack.remove(0);
            }
            self.redo_stack.clear();
        }
        tracing::debug!(version = stamped.meta.version, description, "state updated");
        self.emitter.emit(&WorldEvent::StateUpdated {
            previous,
            current: Arc::clone(&stamped),
            description: description.map(str::to_string),
        });
        stamped
    }

    // ===== Entity Operations =====

    /// Creates an entity with a fresh generated id.
    ///
    /// Ids are never reused, even across removals.
    pub fn create_entity(&mut self, params: EntityParams, description: Option<&str>) -> Entity {
        let id = self.fresh_id();
        let entity = Entity {
            id: id.clone(),
            kind: params.kind,
            attributes: params.attributes,
            relationships: params.relationships,
        };
        let fallback = format!("Created entity: {id}");
        let description = description.unwrap_or(&fallback);
        let inserted = entity.clone();
        self.apply(
            move |state| Arc::new(state.insert_entity(inserted)),
            Some(description),
            None,
        );
        self.emitter.emit(&WorldEvent::EntityCreated {
            id,
            kind: entity.kind.clone(),
        });
        entity
    }

    /// Applies a patch to an entity, returning the merged result.
    ///
    /// `None` when the id is unknown. Applying an empty patch still
    /// counts as a change. The emitted event carries the entity's kind
    /// as of before the patch.
    pub fn update_entity(
        &mut self,
        id: &EntityId,
        patch: EntityPatch,
        options: UpdateOptions,
        description: Option<&str>,
    ) -> Option<Entity> {
        let existing = self.current.entity(id)?.clone();
        let merged = patch.apply_to(&existing, options);
        let fallback = format!("Updated entity: {id}");
        let description = description.unwrap_or(&fallback);
        let inserted = merged.clone();
        self.apply(
            move |state| Arc::new(state.insert_entity(inserted)),
            Some(description),
            None,
        );
        self.emitter.emit(&WorldEvent::EntityUpdated {
            id: id.clone(),
            kind: existing.kind,
            changes: patch,
        });
        Some(merged)
    }

    /// Removes an entity; `false` when the id is unknown.
    ///
    /// Edges pointing at the removed entity are left dangling; the
    /// entity manager layer retracts them before delegating here.
    pub fn remove_entity(&mut self, id: &EntityId, description: Option<&str>) -> bool {
        let Some(kind) = self.current.entity(id).map(|e| e.kind.clone()) else {
            return false;
        };
        let fallback = format!("Removed entity: {id}");
        let description = description.unwrap_or(&fallback);
        self.apply(
            |state| Arc::new(state.remove_entity(id)),
            Some(description),
            None,
        );
        self.emitter.emit(&WorldEvent::EntityRemoved {
            id: id.clone(),
            kind,
        });
        true
    }

    // ===== Relationship Operations =====

    /// Adds an edge from `source` to `target`.
    ///
    /// Both endpoints must exist; otherwise `false`. An edge that
    /// already exists succeeds without a state change or event.
    pub fn create_relationship(
        &mut self,
        source: &EntityId,
        rel_type: &str,
        target: &EntityId,
        description: Option<&str>,
    ) -> bool {
        let Some(source_entity) = self.current.entity(source) else {
            return false;
        };
        if !self.current.contains(target) {
            return false;
        }
        if source_entity.has_target(rel_type, target) {
            return true;
        }
        let fallback = format!("Created relationship: {source} -{rel_type}-> {target}");
        let description = description.unwrap_or(&fallback);
        self.apply(
            |state| {
                Arc::new(state.map_entity(source, |entity| {
                    entity.add_target(rel_type, target.clone())
                }))
            },
            Some(description),
            None,
        );
        self.emitter.emit(&WorldEvent::RelationshipCreated {
            source: source.clone(),
            rel_type: rel_type.to_string(),
            target: target.clone(),
        });
        true
    }

    /// Removes an edge; `false` if the source or the edge is missing.
    pub fn remove_relationship(
        &mut self,
        source: &EntityId,
        rel_type: &str,
        target: &EntityId,
        description: Option<&str>,
    ) -> bool {
        let Some(source_entity) = self.current.entity(source) else {
            return false;
        };
        if !source_entity.has_target(rel_type, target) {
            return false;
        }
        let fallback = format!("Removed relationship: {source} -{rel_type}-> {target}");
        let description = description.unwrap_or(&fallback);
        self.apply(
            |state| {
                Arc::new(state.map_entity(source, |entity| entity.remove_target(rel_type, target)))
            },
            Some(description),
            None,
        );
        self.emitter.emit(&WorldEvent::RelationshipRemoved {
            source: source.clone(),
            rel_type: rel_type.to_string(),
            target: target.clone(),
        });
        true
    }

    // ===== Focus and Extensions =====

    /// Moves the focus slot; a regular tracked change.
    pub fn set_focus(&mut self, focus: Option<EntityId>) -> Arc<WorldState> {
        self.update_state(
            |state| Arc::new(state.with_focus(focus)),
            Some("Changed focus"),
        )
    }

    /// Writes a host extension value; a regular tracked change.
    pub fn set_extension(&mut self, key: &str, value: impl Into<Value>) -> Arc<WorldState> {
        let value = value.into();
        let description = format!("Set extension: {key}");
        self.update_state(
            move |state| Arc::new(state.with_extension(key, value)),
            Some(&description),
        )
    }

    // ===== Undo / Redo =====

    /// Restores the previous snapshot.
    ///
    /// The initial snapshot is a permanent floor: with nothing applied
    /// on top of it this returns `None`. Restoring repoints without
    /// stamping, so version and turn counters keep their old values.
    pub fn undo(&mut self) -> Option<Arc<WorldState>> {
        if !self.config.enable_undo || self.undo_stack.len() <= 1 {
            return None;
        }
        let popped = self.undo_stack.pop()?;
        self.redo_stack.push(popped);
        let restored = Arc::clone(self.undo_stack.last()?);
        let previous = std::mem::replace(&mut self.current, Arc::clone(&restored));
        tracing::debug!(version = restored.meta.version, "undo");
        self.emitter.emit(&WorldEvent::StateUpdated {
            previous,
            current: Arc::clone(&restored),
            description: Some("Undo operation".to_string()),
        });
        Some(restored)
    }

    /// Reapplies the most recently undone snapshot.
    ///
    /// `None` when there is nothing to redo. Any normal change clears
    /// the redoable future.
    pub fn redo(&mut self) -> Option<Arc<WorldState>> {
        if !self.config.enable_undo {
            return None;
        }
        let restored = self.redo_stack.pop()?;
        self.undo_stack.push(Arc::clone(&restored));
        let previous = std::mem::replace(&mut self.current, Arc::clone(&restored));
        tracing::debug!(version = restored.meta.version, "redo");
        self.emitter.emit(&WorldEvent::StateUpdated {
            previous,
            current: Arc::clone(&restored),
            description: Some("Redo operation".to_string()),
        });
        Some(restored)
    }

    // ===== Id Generation =====

    /// Generates a collision-free id from a monotonic counter.
    ///
    /// The counter is never rewound, so removed ids do not come back.
    fn fresh_id(&mut self) -> EntityId {
        loop {
            self.next_id += 1;
            let candidate = EntityId::new(format!("entity-{}", self.next_id));
            if !self.current.contains(&candidate) {
                return candidate;
            }
        }
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new(StateManagerConfig::default())
    }
}
