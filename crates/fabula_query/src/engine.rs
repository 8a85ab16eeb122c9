//! The query engine.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet, VecDeque};

use fabula_foundation::{EntityId, Value};
use fabula_state::{Entity, WorldState};

use crate::query::{EntityQuery, QueryOptions, QueryResult, SortDirection};

/// Read-only queries over one world snapshot.
///
/// Borrowing keeps the engine honest: it can observe the snapshot but
/// never change it, and results stay coherent because the snapshot
/// underneath cannot move.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    world: &'a WorldState,
}

impl<'a> QueryEngine<'a> {
    /// Creates an engine over a snapshot.
    #[must_use]
    pub fn new(world: &'a WorldState) -> Self {
        Self { world }
    }

    // ===== Filtering =====

    /// Every entity matching the query, shaped by the options.
    #[must_use]
    pub fn find_entities(&self, query: &EntityQuery, options: &QueryOptions) -> QueryResult {
        let matches: Vec<Entity> = self
            .world
            .iter()
            .filter(|entity| query.matches(entity))
            .cloned()
            .collect();
        shaped(matches, options)
    }

    /// The first matching entity in id order.
    #[must_use]
    pub fn find_entity(&self, query: &EntityQuery) -> Option<Entity> {
        self.world
            .iter()
            .find(|entity| query.matches(entity))
            .cloned()
    }

    /// Every entity with the given type tag.
    #[must_use]
    pub fn find_by_kind(&self, kind: &str) -> QueryResult {
        self.find_entities(&EntityQuery::new().kind(kind), &QueryOptions::new())
    }

    /// Every entity whose attribute equals the value, structurally.
    #[must_use]
    pub fn find_by_attribute(&self, name: &str, value: impl Into<Value>) -> QueryResult {
        self.find_entities(
            &EntityQuery::new().attribute(name, value),
            &QueryOptions::new(),
        )
    }

    // ===== Relationship Reads =====

    /// The entities one entity points at, skipping dangling targets.
    ///
    /// With a relationship type, the targets of that type in edge
    /// order; with `None`, the deduplicated targets of every type.
    /// Sort and limit from the options apply afterward.
    #[must_use]
    pub fn find_related(
        &self,
        id: &EntityId,
        rel_type: Option<&str>,
        options: &QueryOptions,
    ) -> QueryResult {
        let Some(entity) = self.world.entity(id) else {
            return QueryResult::from_entities(Vec::new());
        };
        let mut targets: Vec<EntityId> = Vec::new();
        match rel_type {
            Some(rel_type) => targets.extend(entity.targets(rel_type)),
            None => {
                for list in entity.relationships.values() {
                    for target in list {
                        if !targets.contains(target) {
                            targets.push(target.clone());
                        }
                    }
                }
            }
        }
        let entities = targets
            .into_iter()
            .filter_map(|target| self.world.entity(&target))
            .cloned()
            .collect();
        shaped(entities, options)
    }

    /// The entities pointing at one entity, in id order.
    ///
    /// With a relationship type, only edges of that type count; with
    /// `None`, any edge does. Sort and limit from the options apply
    /// afterward.
    #[must_use]
    pub fn find_relating_to(
        &self,
        id: &EntityId,
        rel_type: Option<&str>,
        options: &QueryOptions,
    ) -> QueryResult {
        let entities = self
            .world
            .iter()
            .filter(|entity| match rel_type {
                Some(rel_type) => entity.has_target(rel_type, id),
                None => entity
                    .relationships
                    .values()
                    .any(|targets| targets.contains(id)),
            })
            .cloned()
            .collect();
        shaped(entities, options)
    }

    // ===== Traversal =====

    /// Breadth-first distances from an origin over one edge type.
    ///
    /// The origin itself is excluded. Each reachable entity appears
    /// once at the distance it was first discovered, never farther
    /// than `max_distance` hops. Unknown origins yield an empty map.
    #[must_use]
    pub fn find_nearby(
        &self,
        origin: &EntityId,
        rel_type: &str,
        max_distance: usize,
    ) -> HashMap<EntityId, usize> {
        let mut distances = HashMap::new();
        if !self.world.contains(origin) {
            return distances;
        }
        let mut visited: HashSet<EntityId> = HashSet::from([origin.clone()]);
        let mut queue: VecDeque<(EntityId, usize)> = VecDeque::from([(origin.clone(), 0)]);
        while let Some((id, distance)) = queue.pop_front() {
            if distance == max_distance {
                continue;
            }
            let Some(entity) = self.world.entity(&id) else {
                continue;
            };
            for target in entity.targets(rel_type) {
                if visited.insert(target.clone()) {
                    distances.insert(target.clone(), distance + 1);
                    queue.push_back((target, distance + 1));
                }
            }
        }
        distances
    }

    /// A shortest path (by hop count) between two entities over one
    /// edge type, following edges forward only.
    ///
    /// Inclusive of both endpoints; empty when either endpoint is
    /// unknown or no path exists. A path from an entity to itself is
    /// just that entity.
    #[must_use]
    pub fn find_path(&self, start: &EntityId, end: &EntityId, rel_type: &str) -> Vec<EntityId> {
        if !self.world.contains(start) || !self.world.contains(end) {
            return Vec::new();
        }
        if start == end {
            return vec![start.clone()];
        }
        let mut parents: HashMap<EntityId, EntityId> = HashMap::new();
        let mut visited: HashSet<EntityId> = HashSet::from([start.clone()]);
        let mut queue: VecDeque<EntityId> = VecDeque::from([start.clone()]);
        while let Some(id) = queue.pop_front() {
            let Some(entity) = self.world.entity(&id) else {
                continue;
            };
            for target in entity.targets(rel_type) {
                if !visited.insert(target.clone()) {
                    continue;
                }
                parents.insert(target.clone(), id.clone());
                if target == *end {
                    return unwind_path(&parents, start, end);
                }
                queue.push_back(target);
            }
        }
        Vec::new()
    }
}

/// Rebuilds the discovered path from the parent links, start to end.
fn unwind_path(
    parents: &HashMap<EntityId, EntityId>,
    start: &EntityId,
    end: &EntityId,
) -> Vec<EntityId> {
    let mut path = vec![end.clone()];
    let mut cursor = end;
    while let Some(parent) = parents.get(cursor) {
        path.push(parent.clone());
        if parent == start {
            break;
        }
        cursor = parent;
    }
    path.reverse();
    path
}

// ===== Shaping =====

/// Applies sort and limit, in that order.
fn shaped(mut entities: Vec<Entity>, options: &QueryOptions) -> QueryResult {
    if let Some(path) = &options.sort_by {
        sort_entities(&mut entities, path, options.direction);
    }
    if let Some(limit) = options.limit {
        entities.truncate(limit);
    }
    QueryResult::from_entities(entities)
}

/// Stable sort by a dot path; entities without a value at the path
/// sort last under either direction, and incomparable values keep
/// their relative order.
fn sort_entities(entities: &mut [Entity], path: &str, direction: SortDirection) {
    entities.sort_by(|a, b| compare_at_path(a, b, path, direction));
}

fn compare_at_path(a: &Entity, b: &Entity, path: &str, direction: SortDirection) -> Ordering {
    match (value_at_path(a, path), value_at_path(b, path)) {
        (Some(left), Some(right)) => {
            let ordering = left.partial_cmp(&right).unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Resolves a dot path against an entity.
///
/// `id` and `type` address the entity itself; any other path starts
/// at an attribute and descends through maps by key and lists by
/// numeric index.
fn value_at_path(entity: &Entity, path: &str) -> Option<Value> {
    match path {
        "id" => return Some(Value::from(entity.id.as_str())),
        "type" => return Some(Value::from(entity.kind.as_str())),
        _ => {}
    }
    let mut segments = path.split('.');
    let mut current = entity.attribute(segments.next()?)?.clone();
    for segment in segments {
        current = match &current {
            Value::Map(map) => map.get(segment)?.clone(),
            Value::List(list) => {
                let index: usize = segment.parse().ok()?;
                list.get(index)?.clone()
            }
            _ => return None,
        };
    }
    Some(current)
}
