//! Entity manager configuration.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use fabula_foundation::{Error, Result, Value, ValueKind};

// ===== Relationship Config =====

/// How edges of one relationship type behave.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipConfig {
    /// Mirror every edge change with an inverse edge on the target.
    pub bidirectional: bool,
    /// The relationship type of the mirrored edge; the same type when
    /// absent.
    pub inverse_type: Option<String>,
    /// Reserved: each source may hold at most one edge of this type.
    /// Carried in configuration but not yet enforced.
    pub exclusive: bool,
}

impl RelationshipConfig {
    /// A plain one-way relationship.
    #[must_use]
    pub fn one_way() -> Self {
        Self::default()
    }

    /// A bidirectional relationship mirrored under a different type,
    /// e.g. `contains` mirrored as `contained_by`.
    #[must_use]
    pub fn mirrored(inverse_type: impl Into<String>) -> Self {
        Self {
            bidirectional: true,
            inverse_type: Some(inverse_type.into()),
            exclusive: false,
        }
    }

    /// A bidirectional relationship mirrored under its own type,
    /// e.g. `adjacent_to`.
    #[must_use]
    pub fn symmetric() -> Self {
        Self {
            bidirectional: true,
            inverse_type: None,
            exclusive: false,
        }
    }

    /// The type the mirrored edge is stored under.
    #[must_use]
    pub fn inverse_of<'a>(&'a self, rel_type: &'a str) -> &'a str {
        self.inverse_type.as_deref().unwrap_or(rel_type)
    }
}

// ===== Attribute Config =====

/// Validation rules for one attribute of one entity type.
#[derive(Clone, Default)]
pub struct AttributeConfig {
    /// The attribute must be present when the entity is created.
    pub required: bool,
    /// The value must be of this kind when present.
    pub kind: Option<ValueKind>,
    /// Custom predicate the value must satisfy when present.
    pub validate: Option<Rc<dyn Fn(&Value) -> bool>>,
}

impl AttributeConfig {
    /// An unconstrained attribute.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the attribute at creation time.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Constrains the value to one kind.
    #[must_use]
    pub fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Adds a custom validation predicate.
    #[must_use]
    pub fn validate(mut self, predicate: impl Fn(&Value) -> bool + 'static) -> Self {
        self.validate = Some(Rc::new(predicate));
        self
    }
}

impl fmt::Debug for AttributeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeConfig")
            .field("required", &self.required)
            .field("kind", &self.kind)
            .field("validate", &self.validate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

// ===== Entity Manager Config =====

/// Complete configuration for an [`crate::EntityManager`].
///
/// Attribute rules are registered per entity type; relationship rules
/// per relationship type. Registering the same key twice is a contract
/// error, caught at registration rather than surfacing as silently
/// replaced rules later.
#[derive(Debug, Clone, Default)]
pub struct EntityManagerConfig {
    attributes: HashMap<String, HashMap<String, AttributeConfig>>,
    relationships: HashMap<String, RelationshipConfig>,
    /// Validate attributes on create and update. Defaults to on.
    pub validate_entities: bool,
}

impl EntityManagerConfig {
    /// An empty configuration with validation enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            attributes: HashMap::new(),
            relationships: HashMap::new(),
            validate_entities: true,
        }
    }

    /// Disables attribute validation.
    #[must_use]
    pub fn without_validation(mut self) -> Self {
        self.validate_entities = false;
        self
    }

    /// Registers the validation rules for one attribute of one entity
    /// type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRegistration`] if rules for this
    /// type/attribute pair already exist.
    pub fn register_attribute(
        &mut self,
        entity_kind: impl Into<String>,
        attribute: impl Into<String>,
        config: AttributeConfig,
    ) -> Result<()> {
        let entity_kind = entity_kind.into();
        let attribute = attribute.into();
        let for_kind = self.attributes.entry(entity_kind.clone()).or_default();
        if for_kind.contains_key(&attribute) {
            return Err(Error::DuplicateRegistration(format!(
                "attribute \"{attribute}\" for entity type \"{entity_kind}\""
            )));
        }
        for_kind.insert(attribute, config);
        Ok(())
    }

    /// Registers the behavior of one relationship type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRegistration`] if the type is already
    /// registered.
    pub fn register_relationship(
        &mut self,
        rel_type: impl Into<String>,
        config: RelationshipConfig,
    ) -> Result<()> {
        let rel_type = rel_type.into();
        if self.relationships.contains_key(&rel_type) {
            return Err(Error::DuplicateRegistration(format!(
                "relationship type \"{rel_type}\""
            )));
        }
        self.relationships.insert(rel_type, config);
        Ok(())
    }

    /// The attribute rules registered for one entity type.
    #[must_use]
    pub fn attribute_configs(&self, entity_kind: &str) -> Option<&HashMap<String, AttributeConfig>> {
        self.attributes.get(entity_kind)
    }

    /// The rules for one attribute of one entity type.
    #[must_use]
    pub fn attribute_config(&self, entity_kind: &str, attribute: &str) -> Option<&AttributeConfig> {
        self.attributes.get(entity_kind)?.get(attribute)
    }

    /// The behavior of one relationship type.
    #[must_use]
    pub fn relationship_config(&self, rel_type: &str) -> Option<&RelationshipConfig> {
        self.relationships.get(rel_type)
    }
}
