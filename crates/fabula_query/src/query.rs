//! Query descriptions and results.

use std::fmt;

use fabula_foundation::{EntityId, Value};
use fabula_state::Entity;
use im::{HashMap, Vector};

// ===== Entity Query =====

/// Matching criteria for entities.
///
/// Three declarative dimensions (type membership, attribute equality,
/// relationship superset) combine with AND, or with OR across the
/// dimensions that were actually specified when `match_any` is set. A
/// custom predicate, when present, is authoritative: the declarative
/// dimensions are ignored entirely. A query with nothing specified
/// matches every entity.
#[derive(Default)]
pub struct EntityQuery {
    /// Acceptable type tags.
    pub kinds: Option<Vec<String>>,
    /// Attribute values the entity must carry, compared structurally.
    pub attributes: Option<HashMap<String, Value>>,
    /// Per-type target ids the entity's edges must include.
    pub relationships: Option<HashMap<String, Vector<EntityId>>>,
    /// Arbitrary predicate; exclusive with the dimensions above.
    pub predicate: Option<Box<dyn Fn(&Entity) -> bool>>,
    /// OR the specified dimensions instead of ANDing them.
    pub match_any: bool,
}

impl EntityQuery {
    /// Starts an empty query matching everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts one type tag (repeatable).
    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kinds.get_or_insert_with(Vec::new).push(kind.into());
        self
    }

    /// Requires an attribute to hold a value.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Requires the entity's edges of one type to include all the
    /// given targets.
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

    /// Replaces all declarative dimensions with a predicate.
    #[must_use]
    pub fn predicate(mut self, predicate: impl Fn(&Entity) -> bool + 'static) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// ORs the specified dimensions.
    #[must_use]
    pub fn match_any(mut self) -> Self {
        self.match_any = true;
        self
    }

    /// Whether an entity satisfies this query.
    #[must_use]
    pub fn matches(&self, entity: &Entity) -> bool {
        if let Some(predicate) = &self.predicate {
            return predicate(entity);
        }
        let mut checks = Vec::with_capacity(3);
        if let Some(kinds) = &self.kinds {
            checks.push(kinds.iter().any(|k| *k == entity.kind));
        }
        if let Some(attributes) = &self.attributes {
            checks.push(
                attributes
                    .iter()
                    .all(|(name, value)| entity.attribute(name) == Some(value)),
            );
        }
        if let Some(relationships) = &self.relationships {
            checks.push(relationships.iter().all(|(rel_type, wanted)| {
                wanted.iter().all(|target| entity.has_target(rel_type, target))
            }));
        }
        if checks.is_empty() {
            return true;
        }
        if self.match_any {
            checks.into_iter().any(|ok| ok)
        } else {
            checks.into_iter().all(|ok| ok)
        }
    }
}

impl fmt::Debug for EntityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityQuery")
            .field("kinds", &self.kinds)
            .field("attributes", &self.attributes)
            .field("relationships", &self.relationships)
            .field("predicate", &self.predicate.as_ref().map(|_| "<fn>"))
            .field("match_any", &self.match_any)
            .finish()
    }
}

// ===== Query Options =====

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Result shaping: sorting and truncation.
///
/// `sort_by` is a dot path into the entity: the special paths `id`
/// and `type` address the entity itself, anything else starts at an
/// attribute and descends through nested maps (and lists, by numeric
/// segment). The limit truncates after sorting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Dot path to sort by; unsorted (id iteration order) when absent.
    pub sort_by: Option<String>,
    /// Sort direction.
    pub direction: SortDirection,
    /// Keep at most this many results.
    pub limit: Option<usize>,
}

impl QueryOptions {
    /// Unsorted, unlimited options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts results by a dot path, ascending.
    #[must_use]
    pub fn sort_by(mut self, path: impl Into<String>) -> Self {
        self.sort_by = Some(path.into());
        self
    }

    /// Sets the sort direction.
    #[must_use]
    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Truncates results after sorting.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

// ===== Query Result =====

/// Matched entities together with their ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    /// Ids of the matches, in result order.
    pub ids: Vec<EntityId>,
    /// The matches themselves, in the same order.
    pub entities: Vec<Entity>,
}

impl QueryResult {
    /// Builds a result from matched entities.
    #[must_use]
    pub fn from_entities(entities: Vec<Entity>) -> Self {
        let ids = entities.iter().map(|e| e.id.clone()).collect();
        Self { ids, entities }
    }

    /// The number of matches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// The first match, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Entity> {
        self.entities.first()
    }
}
