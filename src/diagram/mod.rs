//! Diagram model: element identity, diagram kinds, and the shared node/link shapes.
//!
//! DESIGN
//! ======
//! Flowcharts, UML class diagrams and ER diagrams share one shape: a set of
//! nodes plus directed links between them. Everything kind-specific lives in a
//! node body (`B`) and a link attribute bag (`A`), both flattened into the
//! node/link on the wire so payloads match what the generation and rendering
//! services exchange. A [`DiagramSchema`] ties one body type, one attribute
//! type, the default seed and the wire field names together for a kind.
//!
//! Kind tags (step kinds, association kinds, cardinalities) are closed enums,
//! matched exhaustively wherever protection rules are evaluated.

pub mod document;
pub mod er;
pub mod flowchart;
pub mod id;
pub mod uml;
pub mod validate;

use std::fmt;

use serde::de::{self, DeserializeOwned, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

pub use document::Document;
pub use er::Er;
pub use flowchart::Flowchart;
pub use uml::Uml;
pub use validate::{DiagramError, ValidationError};

// =============================================================================
// IDENTITY
// =============================================================================

/// Identifier of a node or link within one document (`"1"`, `"rel-2"`, ...).
///
/// An empty id stands for "not selected" in link forms and for "not yet
/// assigned" on links decoded from a generation payload. Integer ids on the
/// wire (`"id": 3`) decode to their decimal string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ElementIdVisitor)
    }
}

struct ElementIdVisitor;

impl Visitor<'_> for ElementIdVisitor {
    type Value = ElementId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ElementId, E> {
        Ok(ElementId::new(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<ElementId, E> {
        Ok(ElementId(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ElementId, E> {
        Ok(ElementId(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ElementId, E> {
        Ok(ElementId(v.to_string()))
    }
}

impl From<&str> for ElementId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ElementId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

// =============================================================================
// DIAGRAM KIND
// =============================================================================

/// The three supported diagram families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    Flowchart,
    Uml,
    Er,
}

impl DiagramKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flowchart => "flowchart",
            Self::Uml => "uml",
            Self::Er => "er",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "flowchart" => Some(Self::Flowchart),
            "uml" => Some(Self::Uml),
            "er" => Some(Self::Er),
            _ => None,
        }
    }

    /// Key under which a render request carries the document.
    #[must_use]
    pub fn data_field(self) -> &'static str {
        match self {
            Self::Flowchart => "flowchart_data",
            Self::Uml => "uml_data",
            Self::Er => "er_data",
        }
    }

    /// File name used when exporting the rendered artifact.
    #[must_use]
    pub fn export_filename(self) -> String {
        format!("{}.svg", self.as_str())
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// NODES AND LINKS
// =============================================================================

/// A diagram element with identity. `body` carries the kind-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<B> {
    pub id: ElementId,
    #[serde(flatten)]
    pub body: B,
    /// Canvas position hint. Flowchart steps carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl<B> Node<B> {
    pub fn new(id: impl Into<ElementId>, body: B) -> Self {
        Self { id: id.into(), body, x: None, y: None }
    }

    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }
}

/// A directed relation between two nodes of the same document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link<A> {
    #[serde(default)]
    pub id: ElementId,
    pub from: ElementId,
    pub to: ElementId,
    #[serde(flatten)]
    pub attrs: A,
}

impl<A> Link<A> {
    /// Returns `true` if `node` is either endpoint of this link.
    #[must_use]
    pub fn touches(&self, node: &ElementId) -> bool {
        &self.from == node || &self.to == node
    }
}

// =============================================================================
// SCHEMA TRAITS
// =============================================================================

/// Kind-specific node payload (flowchart step, UML class, ER entity).
pub trait NodeBody:
    Clone + fmt::Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Sparse update; absent fields are left untouched.
    type Patch: fmt::Debug + Default + DeserializeOwned + From<Self> + Send;

    /// Wire/form name of the required display field (`label` or `name`).
    const NAME_FIELD: &'static str;

    /// The display name that must be non-empty.
    fn name(&self) -> &str;

    /// Reserved role of this node, if any. Reserved nodes cannot be deleted
    /// and their role cannot be edited away.
    fn reserved_role(&self) -> Option<&'static str> {
        None
    }

    /// Check list entries (attribute and method lines) for blanks.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first blank entry.
    fn check_entries(&self) -> Result<(), DiagramError> {
        Ok(())
    }

    /// Apply a patch in place. Callers work on a copy so a rejected patch
    /// never reaches the document.
    fn apply(&mut self, patch: Self::Patch);
}

/// Kind-specific link attributes (transition label, association kind, ...).
pub trait LinkAttrs:
    Clone + fmt::Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

/// Binds the node body, link attributes, seed and wire names of one diagram kind.
pub trait DiagramSchema: fmt::Debug + Clone + Default + PartialEq + Send + Sync + 'static {
    const KIND: DiagramKind;
    /// Payload key holding the node sequence (`nodes`, `classes`, `entities`).
    const NODES_FIELD: &'static str;
    /// Payload key holding the link sequence (`edges`, `relationships`).
    const LINKS_FIELD: &'static str;
    /// Prefix of allocated link ids.
    const LINK_ID_PREFIX: &'static str;

    type Body: NodeBody;
    type Attrs: LinkAttrs;

    /// Elements a freshly opened editor starts with.
    fn seed() -> Vec<Node<Self::Body>>;

    /// Position of the node appended at `index`, if this kind lays nodes out.
    fn default_position(index: usize) -> Option<(f64, f64)>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
