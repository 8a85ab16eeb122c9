//! The entity manager.
//!
//! Wraps a [`StateManager`] with attribute validation and
//! bidirectional relationship upkeep. Validation fails fast: an
//! invalid create or update returns an error before any state change
//! lands.

use std::rc::Rc;
use std::sync::Arc;

use fabula_events::EventEmitter;
use fabula_foundation::{EntityId, Error, Result, Value};
use fabula_state::{
    Entity, EntityParams, EntityPatch, StateManager, UpdateOptions, WorldEvent, WorldState,
};
use im::HashMap as ImHashMap;

use crate::config::EntityManagerConfig;
use crate::sync::{inverse_edits, EdgeOp};

/// The primary write API over the world model.
pub struct EntityManager {
    state: StateManager,
    config: EntityManagerConfig,
}

impl EntityManager {
    /// Creates a manager over a fresh state manager.
    #[must_use]
    pub fn new(config: EntityManagerConfig) -> Self {
        Self::with_state_manager(StateManager::default(), config)
    }

    /// Creates a manager over an existing state manager.
    #[must_use]
    pub fn with_state_manager(state: StateManager, config: EntityManagerConfig) -> Self {
        Self { state, config }
    }

    // ===== Accessors =====

    /// The current snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<WorldState> {
        self.state.state()
    }

    /// Looks up an entity by id.
    #[must_use]
    pub fn entity(&self, id: &EntityId) -> Option<Entity> {
        self.state.entity(id)
    }

    /// The emitter announcing this manager's changes.
    #[must_use]
    pub fn events(&self) -> Rc<EventEmitter<WorldEvent>> {
        self.state.events()
    }

    /// The underlying state manager.
    #[must_use]
    pub fn state_manager(&self) -> &StateManager {
        &self.state
    }

    /// The underlying state manager, mutably; grants direct access to
    /// undo/redo and raw state updates.
    pub fn state_manager_mut(&mut self) -> &mut StateManager {
        &mut self.state
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &EntityManagerConfig {
        &self.config
    }

    // ===== Entity Operations =====

    /// Creates a validated entity.
    ///
    /// Inverse edges for seeded bidirectional relationships are
    /// created after the entity itself; seeded targets that do not
    /// exist are skipped.
    ///
    /// # Errors
    ///
    /// Attribute validation failures, reported before any mutation.
    pub fn create_entity(&mut self, params: EntityParams) -> Result<Entity> {
        self.validate_create(&params.kind, &params.attributes)?;
        let entity = self.state.create_entity(params, None);
        for (rel_type, targets) in entity.relationships.clone() {
            let Some(rel_config) = self.config.relationship_config(&rel_type) else {
                continue;
            };
            for op in inverse_edits(
                &entity.id,
                &rel_type,
                &im::Vector::new(),
                &targets,
                rel_config,
            ) {
                self.apply_edge_op(&op);
            }
        }
        Ok(entity)
    }

    /// Applies a validated patch; `Ok(None)` when the id is unknown.
    ///
    /// For every configured bidirectional relationship type touched by
    /// the patch, the difference between old and new target lists is
    /// mirrored as inverse-edge changes.
    ///
    /// # Errors
    ///
    /// Attribute validation failures against the patched type, before
    /// any mutation.
    pub fn update_entity(
        &mut self,
        id: &EntityId,
        patch: EntityPatch,
        options: UpdateOptions,
    ) -> Result<Option<Entity>> {
        let Some(existing) = self.state.entity(id) else {
            return Ok(None);
        };
        let effective_kind = patch.kind.as_deref().unwrap_or(&existing.kind);
        self.validate_update(effective_kind, &patch.attributes)?;
        let old_relationships = existing.relationships.clone();
        let Some(merged) = self.state.update_entity(id, patch, options, None) else {
            return Ok(None);
        };
        let mut touched: Vec<String> = old_relationships
            .keys()
            .chain(merged.relationships.keys())
            .cloned()
            .collect();
        touched.sort_unstable();
        touched.dedup();
        for rel_type in touched {
            let Some(rel_config) = self.config.relationship_config(&rel_type) else {
                continue;
            };
            let old_targets = old_relationships.get(&rel_type).cloned().unwrap_or_default();
            let new_targets = merged
                .relationships
                .get(&rel_type)
                .cloned()
                .unwrap_or_default();
            for op in inverse_edits(id, &rel_type, &old_targets, &new_targets, rel_config) {
                self.apply_edge_op(&op);
            }
        }
        Ok(Some(merged))
    }

    /// Removes an entity, retracting configured inverse edges first.
    ///
    /// Outgoing edges of bidirectional types go through
    /// [`Self::remove_relationship`], so the inverse edges on the
    /// targets are retracted before the entity disappears. One-way
    /// edges just vanish with the entity, without relationship events
    /// of their own. `false` when the id is unknown.
    pub fn remove_entity(&mut self, id: &EntityId) -> bool {
        let Some(entity) = self.state.entity(id) else {
            return false;
        };
        for (rel_type, targets) in entity.relationships {
            let bidirectional = self
                .config
                .relationship_config(&rel_type)
                .is_some_and(|rel_config| rel_config.bidirectional);
            if !bidirectional {
                continue;
            }
            for target in targets {
                self.remove_relationship(id, &rel_type, &target);
            }
        }
        self.state.remove_entity(id, None)
    }

    // ===== Relationship Operations =====

    /// Adds an edge, mirroring the inverse when configured.
    ///
    /// `false` when either endpoint is missing; idempotent success
    /// when the edge already exists.
    pub fn create_relationship(
        &mut self,
        source: &EntityId,
        rel_type: &str,
        target: &EntityId,
    ) -> bool {
        if !self.state.create_relationship(source, rel_type, target, None) {
            return false;
        }
        if let Some(rel_config) = self.config.relationship_config(rel_type) {
            if rel_config.bidirectional {
                let inverse = rel_config.inverse_of(rel_type).to_string();
                self.state.create_relationship(target, &inverse, source, None);
            }
        }
        true
    }

    /// Removes an edge, retracting the inverse when configured.
    ///
    /// `false` when the source or the edge is missing.
    pub fn remove_relationship(
        &mut self,
        source: &EntityId,
        rel_type: &str,
        target: &EntityId,
    ) -> bool {
        if !self.state.remove_relationship(source, rel_type, target, None) {
            return false;
        }
        if let Some(rel_config) = self.config.relationship_config(rel_type) {
            if rel_config.bidirectional {
                let inverse = rel_config.inverse_of(rel_type).to_string();
                self.state.remove_relationship(target, &inverse, source, None);
            }
        }
        true
    }

    // ===== Reads =====

    /// Every entity with the given type tag, in id order.
    #[must_use]
    pub fn entities_by_kind(&self, kind: &str) -> Vec<Entity> {
        self.state
            .state()
            .iter()
            .filter(|entity| entity.kind == kind)
            .cloned()
            .collect()
    }

    /// The ids an entity points at.
    ///
    /// With a relationship type, the targets of that type in edge
    /// order; with `None`, the deduplicated targets of every type.
    #[must_use]
    pub fn related_entities(&self, id: &EntityId, rel_type: Option<&str>) -> Vec<EntityId> {
        let Some(entity) = self.state.entity(id) else {
            return Vec::new();
        };
        match rel_type {
            Some(rel_type) => entity.targets(rel_type).into_iter().collect(),
            None => {
                let mut all = Vec::new();
                for targets in entity.relationships.values() {
                    for target in targets {
                        if !all.contains(target) {
                            all.push(target.clone());
                        }
                    }
                }
                all
            }
        }
    }

    /// An entity's attribute map; `None` when the id is unknown.
    #[must_use]
    pub fn attributes(&self, id: &EntityId) -> Option<ImHashMap<String, Value>> {
        self.state.entity(id).map(|entity| entity.attributes)
    }

    // ===== Validation =====

    fn validate_create(&self, kind: &str, attributes: &ImHashMap<String, Value>) -> Result<()> {
        if !self.config.validate_entities {
            return Ok(());
        }
        let Some(configs) = self.config.attribute_configs(kind) else {
            return Ok(());
        };
        for (name, attr_config) in configs {
            match attributes.get(name) {
                Some(value) => Self::check_value(kind, name, value, attr_config)?,
                None if attr_config.required => {
                    return Err(Error::MissingAttribute {
                        entity_kind: kind.to_string(),
                        attribute: name.clone(),
                    });
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Updates check only the attributes the patch names; required
    /// attributes were already supplied at creation.
    fn validate_update(&self, kind: &str, patched: &ImHashMap<String, Value>) -> Result<()> {
        if !self.config.validate_entities {
            return Ok(());
        }
        for (name, value) in patched {
            if let Some(attr_config) = self.config.attribute_config(kind, name) {
                Self::check_value(kind, name, value, attr_config)?;
            }
        }
        Ok(())
    }

    fn check_value(
        kind: &str,
        name: &str,
        value: &Value,
        attr_config: &crate::config::AttributeConfig,
    ) -> Result<()> {
        if let Some(expected) = attr_config.kind {
            if value.kind() != expected {
                return Err(Error::AttributeKind {
                    entity_kind: kind.to_string(),
                    attribute: name.to_string(),
                    expected,
                    actual: value.kind(),
                });
            }
        }
        if let Some(predicate) = &attr_config.validate {
            if !predicate(value) {
                return Err(Error::ValidationFailed {
                    entity_kind: kind.to_string(),
                    attribute: name.to_string(),
                });
            }
        }
        Ok(())
    }

    fn apply_edge_op(&mut self, op: &EdgeOp) {
        tracing::debug!(?op, "mirroring inverse edge");
        match op {
            EdgeOp::Create {
                source,
                rel_type,
                target,
            } => {
                self.state.create_relationship(source, rel_type, target, None);
            }
            EdgeOp::Remove {
                source,
                rel_type,
                target,
            } => {
                self.state.remove_relationship(source, rel_type, target, None);
            }
        }
    }
}
