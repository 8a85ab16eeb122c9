//! Typed event fabric for the Fabula world model.
//!
//! Provides a synchronous, in-process event emitter with named and
//! wildcard subscriptions, priority ordering, and one-shot listeners.
//! State mutations in the layers above announce themselves through an
//! [`EventEmitter`] so that observers never need to poll for changes.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod emitter;

pub use emitter::{Event, EventEmitter, ListenerOptions, ListenerToken};
