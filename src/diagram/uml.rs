//! UML class-diagram schema: classes connected by typed associations.

use serde::{Deserialize, Serialize};

use super::validate::{self, DiagramError};
use super::{DiagramKind, DiagramSchema, Document, LinkAttrs, Node, NodeBody};

const FIRST_X: f64 = 100.0;
const FIRST_Y: f64 = 100.0;
const ROW_SPACING: f64 = 150.0;

/// A UML class box. Attribute and method lines are free text (`- id: String`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Append an attribute line.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `line` is blank.
    pub fn push_attribute(&mut self, line: impl Into<String>) -> Result<(), DiagramError> {
        let line = line.into();
        validate::require_entry("attribute", &line)?;
        self.attributes.push(line);
        Ok(())
    }

    /// Append a method line.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `line` is blank.
    pub fn push_method(&mut self, line: impl Into<String>) -> Result<(), DiagramError> {
        let line = line.into();
        validate::require_entry("method", &line)?;
        self.methods.push(line);
        Ok(())
    }

    /// Remove the attribute line at `index`, returning it.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if `index` is out of range.
    pub fn remove_attribute(&mut self, index: usize) -> Result<String, DiagramError> {
        if index >= self.attributes.len() {
            return Err(DiagramError::EntryNotFound { field: "attribute", index });
        }
        Ok(self.attributes.remove(index))
    }

    /// Remove the method line at `index`, returning it.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if `index` is out of range.
    pub fn remove_method(&mut self, index: usize) -> Result<String, DiagramError> {
        if index >= self.methods.len() {
            return Err(DiagramError::EntryNotFound { field: "method", index });
        }
        Ok(self.methods.remove(index))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassPatch {
    pub name: Option<String>,
    pub attributes: Option<Vec<String>>,
    pub methods: Option<Vec<String>>,
}

impl From<Class> for ClassPatch {
    fn from(class: Class) -> Self {
        Self { name: Some(class.name), attributes: Some(class.attributes), methods: Some(class.methods) }
    }
}

impl NodeBody for Class {
    type Patch = ClassPatch;

    const NAME_FIELD: &'static str = "name";

    fn name(&self) -> &str {
        &self.name
    }

    fn check_entries(&self) -> Result<(), DiagramError> {
        for line in &self.attributes {
            validate::require_entry("attribute", line)?;
        }
        for line in &self.methods {
            validate::require_entry("method", line)?;
        }
        Ok(())
    }

    fn apply(&mut self, patch: ClassPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(attributes) = patch.attributes {
            self.attributes = attributes;
        }
        if let Some(methods) = patch.methods {
            self.methods = methods;
        }
    }
}

/// Relationship flavour between two classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssociationKind {
    #[default]
    Association,
    Inheritance,
    Composition,
    Aggregation,
    Dependency,
}

impl AssociationKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Association => "association",
            Self::Inheritance => "inheritance",
            Self::Composition => "composition",
            Self::Aggregation => "aggregation",
            Self::Dependency => "dependency",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Association {
    #[serde(rename = "type", default)]
    pub kind: AssociationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Association {
    #[must_use]
    pub fn new(kind: AssociationKind) -> Self {
        Self { kind, label: None }
    }
}

impl LinkAttrs for Association {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Uml;

impl DiagramSchema for Uml {
    const KIND: DiagramKind = DiagramKind::Uml;
    const NODES_FIELD: &'static str = "classes";
    const LINKS_FIELD: &'static str = "relationships";
    const LINK_ID_PREFIX: &'static str = "rel-";

    type Body = Class;
    type Attrs = Association;

    fn seed() -> Vec<Node<Class>> {
        let user = Class {
            name: "User".into(),
            attributes: vec!["- id: String".into(), "- name: String".into()],
            methods: vec!["+ login()".into(), "+ logout()".into()],
        };
        vec![Node::new("1", user).at(FIRST_X, FIRST_Y)]
    }

    #[allow(clippy::cast_precision_loss)]
    fn default_position(index: usize) -> Option<(f64, f64)> {
        Some((FIRST_X, FIRST_Y + ROW_SPACING * index as f64))
    }
}

pub type UmlDocument = Document<Uml>;

#[cfg(test)]
#[path = "uml_test.rs"]
mod tests;
