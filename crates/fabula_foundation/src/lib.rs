//! Core types for the Fabula world model.
//!
//! This crate provides:
//! - [`Value`] - The tagged attribute value type for all world data
//! - [`EntityId`] - Opaque, never-reused entity identifiers
//! - [`Error`] - Error types for contract violations
//!
//! Everything stored in a world snapshot is built from these types, so
//! a snapshot is recursively plain data and can be handed to any
//! serializer.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod id;
mod value;

pub use error::{Error, Result};
pub use id::EntityId;
pub use value::{Value, ValueKind};
