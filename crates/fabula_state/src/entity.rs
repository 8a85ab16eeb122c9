//! Entities and the parameter/patch types used to shape them.
//!
//! An [`Entity`] is a persistent value. The update helpers never
//! mutate in place; each returns a new entity sharing structure with
//! the old one.

use fabula_foundation::{EntityId, Value};
use im::{HashMap, Vector};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ===== Entity =====

/// A node in the world graph.
///
/// Attributes hold plain [`Value`] data; relationships are named,
/// ordered lists of target entity ids. Both maps are always present,
/// possibly empty.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entity {
    /// Unique identifier, never reused within a manager's lifetime.
    pub id: EntityId,
    /// The entity's type tag, e.g. `"room"` or `"item"`.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: String,
    /// Named plain-data attributes.
    pub attributes: HashMap<String, Value>,
    /// Outgoing edges, grouped by relationship type.
    pub relationships: HashMap<String, Vector<EntityId>>,
}

impl Entity {
    /// Creates an entity with empty attribute and relationship maps.
    #[must_use]
    pub fn new(id: EntityId, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            attributes: HashMap::new(),
            relationships: HashMap::new(),
        }
    }

    /// Looks up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns a copy with the attribute set.
    #[must_use]
    pub fn with_attribute(&self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        next.attributes.insert(name.into(), value.into());
        next
    }

    /// Returns a copy with the attribute removed.
    #[must_use]
    pub fn without_attribute(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.attributes.remove(name);
        next
    }

    /// Returns a copy with a different type tag.
    #[must_use]
    pub fn with_kind(&self, kind: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.kind = kind.into();
        next
    }

    /// The targets of one relationship type, empty if the type is
    /// absent.
    #[must_use]
    pub fn targets(&self, rel_type: &str) -> Vector<EntityId> {
        self.relationships.get(rel_type).cloned().unwrap_or_default()
    }

    /// Whether an edge of the given type to the given target exists.
    #[must_use]
    pub fn has_target(&self, rel_type: &str, target: &EntityId) -> bool {
        self.relationships
            .get(rel_type)
            .is_some_and(|targets| targets.contains(target))
    }

    /// Returns a copy with an edge appended.
    ///
    /// Adding an edge that already exists returns an unchanged copy;
    /// target lists never hold duplicates.
    #[must_use]
    pub fn add_target(&self, rel_type: impl Into<String>, target: EntityId) -> Self {
        let rel_type = rel_type.into();
        let mut next = self.clone();
        let targets = next.relationships.entry(rel_type).or_default();
        if !targets.contains(&target) {
            targets.push_back(target);
        }
        next
    }

    /// Returns a copy with an edge removed.
    ///
    /// An emptied target list stays in the map as an empty list.
    #[must_use]
    pub fn remove_target(&self, rel_type: &str, target: &EntityId) -> Self {
        let mut next = self.clone();
        if let Some(targets) = next.relationships.get_mut(rel_type) {
            targets.retain(|t| t != target);
        }
        next
    }
}

// ===== Entity Params =====

/// Parameters for creating a new entity.
///
/// The id is always generated by the state manager; params carry
/// everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityParams {
    /// The new entity's type tag.
    pub kind: String,
    /// Initial attributes.
    pub attributes: HashMap<String, Value>,
    /// Initial relationships.
    pub relationships: HashMap<String, Vector<EntityId>>,
}

impl EntityParams {
    /// Starts params for an entity of the given type.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: HashMap::new(),
            relationships: HashMap::new(),
        }
    }

    /// Adds an initial attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Adds an initial relationship with the given targets.
    #[must_use]
    pub fn relationship(
        mut self,
        rel_type: impl Into<String>,
        targets: impl IntoIterator<Item = EntityId>,
    ) -> Self {
        self.relationships
            .insert(rel_type.into(), targets.into_iter().collect());
        self
    }
}

// ===== Entity Patch =====

/// A partial update applied on top of an existing entity.
///
/// Omitted pieces survive the update untouched. Attributes always
/// shallow-merge over the existing map; how relationships combine is
/// governed by [`UpdateOptions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityPatch {
    /// Replacement type tag, if the type should change.
    pub kind: Option<String>,
    /// Attributes to set; existing keys not named here survive.
    pub attributes: HashMap<String, Value>,
    /// Relationship types to update; `None` leaves all edges alone.
    pub relationships: Option<HashMap<String, Vector<EntityId>>>,
}

impl EntityPatch {
    /// Starts an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the entity's type tag.
    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Sets an attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets the targets for a relationship type.
    #[must_use]
    pub fn relationship(
        mut self,
        rel_type: impl Into<String>,
        targets: impl IntoIterator<Item = EntityId>,
    ) -> Self {
        self.relationships
            .get_or_insert_with(HashMap::new)
            .insert(rel_type.into(), targets.into_iter().collect());
        self
    }

    /// Applies this patch to an entity, producing the merged result.
    ///
    /// The id is always preserved. The type changes only when the
    /// patch names one. Attributes shallow-merge, patch values winning.
    /// With `merge_relationships`, each patched type becomes the
    /// ordered, deduplicated union of old and new targets; without it,
    /// each patched type replaces the old list wholesale. Types the
    /// patch does not mention survive either way.
    #[must_use]
    pub fn apply_to(&self, entity: &Entity, options: UpdateOptions) -> Entity {
        let kind = self.kind.clone().unwrap_or_else(|| entity.kind.clone());
        let attributes = self.attributes.clone().union(entity.attributes.clone());
        let relationships = match &self.relationships {
            None => entity.relationships.clone(),
            Some(patched) => {
                if options.merge_relationships {
                    let mut merged = entity.relationships.clone();
                    for (rel_type, new_targets) in patched {
                        let combined = merged.entry(rel_type.clone()).or_default();
                        for target in new_targets {
                            if !combined.contains(target) {
                                combined.push_back(target.clone());
                            }
                        }
                    }
                    merged
                } else {
                    patched.clone().union(entity.relationships.clone())
                }
            }
        };
        Entity {
            id: entity.id.clone(),
            kind,
            attributes,
            relationships,
        }
    }
}

// ===== Update Options =====

/// Options controlling how an [`EntityPatch`] combines with the
/// existing entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Union patched relationship targets with the existing ones
    /// instead of replacing each patched type's list.
    pub merge_relationships: bool,
}

impl UpdateOptions {
    /// Options that union relationship targets.
    #[must_use]
    pub fn merging() -> Self {
        Self {
            merge_relationships: true,
        }
    }
}
