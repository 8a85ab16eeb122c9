//! Read-only queries and graph traversal over a world snapshot.
//!
//! A [`QueryEngine`] borrows one immutable snapshot and answers
//! filter, sort, and breadth-first traversal questions about it. It
//! never mutates; pair it with a fresh snapshot after each change.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod engine;
mod query;

pub use engine::QueryEngine;
pub use query::{EntityQuery, QueryOptions, QueryResult, SortDirection};
