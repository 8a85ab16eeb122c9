//! Bidirectional relationship diffing.

use fabula_foundation::EntityId;
use im::Vector;

use crate::config::RelationshipConfig;

/// One edge change to apply on the write path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeOp {
    /// Add an edge.
    Create {
        /// The entity the edge starts at.
        source: EntityId,
        /// The relationship type.
        rel_type: String,
        /// The entity the edge points to.
        target: EntityId,
    },
    /// Remove an edge.
    Remove {
        /// The entity the edge starts at.
        source: EntityId,
        /// The relationship type.
        rel_type: String,
        /// The entity the edge points to.
        target: EntityId,
    },
}

/// Computes the inverse-edge operations implied by a target-list
/// change on one entity.
///
/// Pure function over the old and new target lists: only the delta
/// produces operations, so targets present in both lists yield
/// nothing. For a non-bidirectional configuration the result is empty.
/// Removals come before additions.
#[must_use]
pub fn inverse_edits(
    entity: &EntityId,
    rel_type: &str,
    old_targets: &Vector<EntityId>,
    new_targets: &Vector<EntityId>,
    config: &RelationshipConfig,
) -> Vec<EdgeOp> {
    if !config.bidirectional {
        return Vec::new();
    }
    let inverse = config.inverse_of(rel_type);
    let mut ops = Vec::new();
    for removed in old_targets.iter().filter(|t| !new_targets.contains(t)) {
        ops.push(EdgeOp::Remove {
            source: removed.clone(),
            rel_type: inverse.to_string(),
            target: entity.clone(),
        });
    }
    for added in new_targets.iter().filter(|t| !old_targets.contains(t)) {
        ops.push(EdgeOp::Create {
            source: added.clone(),
            rel_type: inverse.to_string(),
            target: entity.clone(),
        });
    }
    ops
}
