//! Error types for the Fabula world model.
//!
//! Uses `thiserror` for ergonomic error definition. Only contract
//! violations are errors; not-found conditions are signaled with
//! `Option`/`bool` returns by the layers above.

use thiserror::Error;

use crate::value::ValueKind;

/// Result alias used throughout Fabula.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Fabula operations.
///
/// Every variant is a configuration or contract error raised
/// synchronously from the offending call, before any mutation lands.
#[derive(Debug, Error)]
pub enum Error {
    /// A required attribute was not supplied.
    #[error("required attribute \"{attribute}\" missing for entity type \"{entity_kind}\"")]
    MissingAttribute {
        /// The entity type being validated.
        entity_kind: String,
        /// The missing attribute name.
        attribute: String,
    },

    /// An attribute value had the wrong kind.
    #[error(
        "attribute \"{attribute}\" for entity type \"{entity_kind}\" must be of type \"{expected}\", got \"{actual}\""
    )]
    AttributeKind {
        /// The entity type being validated.
        entity_kind: String,
        /// The offending attribute name.
        attribute: String,
        /// The kind declared in configuration.
        expected: ValueKind,
        /// The kind actually supplied.
        actual: ValueKind,
    },

    /// A custom attribute validator rejected the value.
    #[error("attribute \"{attribute}\" for entity type \"{entity_kind}\" failed custom validation")]
    ValidationFailed {
        /// The entity type being validated.
        entity_kind: String,
        /// The offending attribute name.
        attribute: String,
    },

    /// A configuration key was registered twice.
    #[error("duplicate registration: {0}")]
    DuplicateRegistration(String),

    /// An event listener reported a failure.
    ///
    /// Never surfaced from mutation calls; the emitter logs and
    /// suppresses these.
    #[error("listener error: {0}")]
    Listener(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Creates a listener error from any displayable cause.
    #[must_use]
    pub fn listener(message: impl Into<String>) -> Self {
        Self::Listener(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
