//! Validated, relationship-aware entity management.
//!
//! The entity manager is the primary write API: it validates
//! attributes against per-type configuration before any mutation
//! lands, and keeps configured bidirectional relationships in sync by
//! mirroring every edge change with its inverse.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod manager;
mod sync;

pub use config::{AttributeConfig, EntityManagerConfig, RelationshipConfig};
pub use manager::EntityManager;
pub use sync::{inverse_edits, EdgeOp};
