//! Entity-relationship schema: entities with typed attributes, connected by
//! relationships carrying cardinality and participation constraints.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::validate::{self, DiagramError};
use super::{DiagramKind, DiagramSchema, Document, LinkAttrs, Node, NodeBody};

const FIRST_X: f64 = 100.0;
const FIRST_Y: f64 = 100.0;
const ROW_SPACING: f64 = 150.0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub is_key: bool,
    #[serde(default)]
    pub is_multivalued: bool,
    #[serde(default)]
    pub is_derived: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// A primary-key attribute.
    pub fn key(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_key: true, ..Self::default() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub is_weak: bool,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Append an attribute.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the attribute name is blank.
    pub fn push_attribute(&mut self, attribute: Attribute) -> Result<(), DiagramError> {
        validate::require_entry("attribute", &attribute.name)?;
        self.attributes.push(attribute);
        Ok(())
    }

    /// Replace the attribute at `index`.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if `index` is out of range, or a validation
    /// error if the new name is blank.
    pub fn edit_attribute(&mut self, index: usize, attribute: Attribute) -> Result<(), DiagramError> {
        validate::require_entry("attribute", &attribute.name)?;
        let slot = self
            .attributes
            .get_mut(index)
            .ok_or(DiagramError::EntryNotFound { field: "attribute", index })?;
        *slot = attribute;
        Ok(())
    }

    /// Remove the attribute at `index`, returning it.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if `index` is out of range.
    pub fn remove_attribute(&mut self, index: usize) -> Result<Attribute, DiagramError> {
        if index >= self.attributes.len() {
            return Err(DiagramError::EntryNotFound { field: "attribute", index });
        }
        Ok(self.attributes.remove(index))
    }

    /// Names of the key attributes, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(|a| a.is_key)
            .map(|a| a.name.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityPatch {
    pub name: Option<String>,
    pub attributes: Option<Vec<Attribute>>,
    pub is_weak: Option<bool>,
}

impl From<Entity> for EntityPatch {
    fn from(entity: Entity) -> Self {
        Self { name: Some(entity.name), attributes: Some(entity.attributes), is_weak: Some(entity.is_weak) }
    }
}

impl NodeBody for Entity {
    type Patch = EntityPatch;

    const NAME_FIELD: &'static str = "name";

    fn name(&self) -> &str {
        &self.name
    }

    fn check_entries(&self) -> Result<(), DiagramError> {
        self.attributes
            .iter()
            .try_for_each(|attribute| validate::require_entry("attribute", &attribute.name))
    }

    fn apply(&mut self, patch: EntityPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(attributes) = patch.attributes {
            self.attributes = attributes;
        }
        if let Some(is_weak) = patch.is_weak {
            self.is_weak = is_weak;
        }
    }
}

/// Relationship cardinality. Accepts both the long wire names and the
/// compact `1-1` / `1-N` / `N-N` notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cardinality {
    #[serde(rename = "one-to-one", alias = "1-1")]
    OneToOne,
    #[default]
    #[serde(rename = "one-to-many", alias = "1-N")]
    OneToMany,
    #[serde(rename = "many-to-many", alias = "N-N")]
    ManyToMany,
}

impl Cardinality {
    #[must_use]
    pub fn notation(self) -> &'static str {
        match self {
            Self::OneToOne => "1-1",
            Self::OneToMany => "1-N",
            Self::ManyToMany => "N-N",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.notation())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(rename = "type", default)]
    pub cardinality: Cardinality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub is_identifying: bool,
    #[serde(default)]
    pub is_total_participation: bool,
}

impl Relationship {
    #[must_use]
    pub fn new(cardinality: Cardinality) -> Self {
        Self { cardinality, ..Self::default() }
    }
}

impl LinkAttrs for Relationship {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Er;

impl DiagramSchema for Er {
    const KIND: DiagramKind = DiagramKind::Er;
    const NODES_FIELD: &'static str = "entities";
    const LINKS_FIELD: &'static str = "relationships";
    const LINK_ID_PREFIX: &'static str = "rel-";

    type Body = Entity;
    type Attrs = Relationship;

    fn seed() -> Vec<Node<Entity>> {
        let user = Entity {
            name: "User".into(),
            attributes: vec![Attribute::key("user_id"), Attribute::new("username"), Attribute::new("email")],
            is_weak: false,
        };
        vec![Node::new("1", user).at(FIRST_X, FIRST_Y)]
    }

    #[allow(clippy::cast_precision_loss)]
    fn default_position(index: usize) -> Option<(f64, f64)> {
        Some((FIRST_X, FIRST_Y + ROW_SPACING * index as f64))
    }
}

pub type ErDocument = Document<Er>;

#[cfg(test)]
#[path = "er_test.rs"]
mod tests;
