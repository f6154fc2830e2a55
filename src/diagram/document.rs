//! Diagram document: the node/link collection behind one open editor.
//!
//! DESIGN
//! ======
//! Every element-level mutation is all-or-nothing: the validator runs against
//! the current state (or a scratch copy for patches) and the collections are
//! touched only after every rule passed. Each successful mutation bumps
//! `revision`, which artifact sync uses to tell whether a render still
//! matches the document.
//!
//! `replace_all` is the reconciliation entry point. It trusts element content
//! from the generation service and skips per-element validation, but still
//! refuses to keep links whose endpoints do not resolve, so no document ever
//! holds a dangling reference. Node ids are checked once at decode time:
//! a payload with blank or repeated node ids is rejected whole, since
//! renumbering would silently re-target its links.

use serde::Deserialize;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::validate::{self, DiagramError};
use super::{DiagramKind, DiagramSchema, ElementId, Link, Node, NodeBody, id};

/// Body patch type for a schema's nodes.
pub type PatchOf<S> = <<S as DiagramSchema>::Body as NodeBody>::Patch;

/// Decoded element collections of a payload, not yet committed.
pub type Parts<S> = (Vec<Node<<S as DiagramSchema>::Body>>, Vec<Link<<S as DiagramSchema>::Attrs>>);

#[derive(Debug, Clone, PartialEq)]
pub struct Document<S: DiagramSchema> {
    nodes: Vec<Node<S::Body>>,
    links: Vec<Link<S::Attrs>>,
    revision: u64,
}

impl<S: DiagramSchema> Document<S> {
    /// A document holding the kind's default seed.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(S::seed(), Vec::new())
    }

    /// A document with no elements at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_parts(Vec::new(), Vec::new())
    }

    /// Build a document from trusted parts without validation.
    #[must_use]
    pub fn from_parts(nodes: Vec<Node<S::Body>>, links: Vec<Link<S::Attrs>>) -> Self {
        Self { nodes, links, revision: 0 }
    }

    #[must_use]
    pub fn kind(&self) -> DiagramKind {
        S::KIND
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node<S::Body>] {
        &self.nodes
    }

    #[must_use]
    pub fn links(&self) -> &[Link<S::Attrs>] {
        &self.links
    }

    #[must_use]
    pub fn node(&self, id: &ElementId) -> Option<&Node<S::Body>> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    #[must_use]
    pub fn link(&self, id: &ElementId) -> Option<&Link<S::Attrs>> {
        self.links.iter().find(|l| &l.id == id)
    }

    /// Monotonic counter of committed mutations.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // =========================================================================
    // NODES
    // =========================================================================

    /// Append a node with a freshly allocated id and the kind's default position.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is blank or the body claims a
    /// reserved role.
    pub fn add_node(&mut self, body: S::Body) -> Result<ElementId, DiagramError> {
        validate::require_fields(&body)?;
        validate::check_insertable(&body)?;

        let id = id::next_node_id(&self.nodes);
        let mut node = Node::new(id.clone(), body);
        if let Some((x, y)) = S::default_position(self.nodes.len()) {
            node = node.at(x, y);
        }
        self.nodes.push(node);
        self.commit();
        Ok(id)
    }

    /// Apply a sparse patch to an existing node. The id never changes.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` is absent, a validation error if the patched
    /// name or any patched list entry is blank, and `Protected` if the patch
    /// would change a reserved role.
    pub fn update_node(&mut self, id: &ElementId, patch: PatchOf<S>) -> Result<(), DiagramError> {
        let index = self.index_of(id)?;
        let before = &self.nodes[index].body;
        let mut after = before.clone();
        after.apply(patch);

        validate::require_fields(&after)?;
        validate::check_role_change(id, before, &after)?;

        self.nodes[index].body = after;
        self.commit();
        Ok(())
    }

    /// Remove a node and every link incident to it. Returns the ids of the
    /// links removed by the cascade.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` is absent and `Protected` if the node holds
    /// a reserved role.
    pub fn remove_node(&mut self, id: &ElementId) -> Result<Vec<ElementId>, DiagramError> {
        let index = self.index_of(id)?;
        validate::check_deletable(&self.nodes[index])?;

        self.nodes.remove(index);
        let mut cascaded = Vec::new();
        self.links.retain(|link| {
            if link.touches(id) {
                cascaded.push(link.id.clone());
                false
            } else {
                true
            }
        });
        self.commit();
        Ok(cascaded)
    }

    // =========================================================================
    // LINKS
    // =========================================================================

    /// Append a link between two existing, distinct nodes.
    ///
    /// # Errors
    ///
    /// Returns a validation error if an endpoint is missing, unknown, or both
    /// endpoints are the same node.
    pub fn add_link(&mut self, from: &ElementId, to: &ElementId, attrs: S::Attrs) -> Result<ElementId, DiagramError> {
        validate::require_endpoints(from, to)?;
        validate::resolve_endpoints(&self.nodes, from, to)?;
        validate::reject_self_loop(from, to)?;

        let id = id::next_link_id(S::LINK_ID_PREFIX, &self.links);
        self.links.push(Link { id: id.clone(), from: from.clone(), to: to.clone(), attrs });
        self.commit();
        Ok(id)
    }

    /// Remove a link. Unknown ids are ignored; returns whether anything changed.
    pub fn remove_link(&mut self, id: &ElementId) -> bool {
        let before = self.links.len();
        self.links.retain(|l| &l.id != id);
        let changed = self.links.len() != before;
        if changed {
            self.commit();
        }
        changed
    }

    // =========================================================================
    // WHOLESALE
    // =========================================================================

    /// Replace every node and link at once. Links without an id get one;
    /// links whose endpoints do not resolve are dropped and returned.
    pub fn replace_all(&mut self, nodes: Vec<Node<S::Body>>, links: Vec<Link<S::Attrs>>) -> Vec<Link<S::Attrs>> {
        let (kept, dropped): (Vec<_>, Vec<_>) = links.into_iter().partition(|link| {
            validate::resolve_endpoints(&nodes, &link.from, &link.to).is_ok()
                && validate::reject_self_loop(&link.from, &link.to).is_ok()
        });

        let mut links: Vec<Link<S::Attrs>> = Vec::with_capacity(kept.len());
        for mut link in kept {
            if link.id.is_empty() || links.iter().any(|l| l.id == link.id) {
                link.id = id::next_link_id(S::LINK_ID_PREFIX, &links);
            }
            links.push(link);
        }

        self.nodes = nodes;
        self.links = links;
        self.commit();
        dropped
    }

    /// Decode the node and link sequences of a payload such as
    /// `{"classes": [...], "relationships": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` if either sequence is missing, is not an
    /// array, holds an element that does not decode, or repeats a node id.
    pub fn decode_payload(payload: &serde_json::Value) -> Result<Parts<S>, DiagramError> {
        let sequence = |field: &str| {
            payload
                .get(field)
                .filter(|v| v.is_array())
                .ok_or_else(|| DiagramError::MalformedDocument(format!("missing {field}")))
        };
        let raw_nodes = sequence(S::NODES_FIELD)?;
        let raw_links = sequence(S::LINKS_FIELD)?;

        let nodes = Vec::<Node<S::Body>>::deserialize(raw_nodes)
            .map_err(|e| DiagramError::MalformedDocument(format!("{}: {e}", S::NODES_FIELD)))?;
        let links = Vec::<Link<S::Attrs>>::deserialize(raw_links)
            .map_err(|e| DiagramError::MalformedDocument(format!("{}: {e}", S::LINKS_FIELD)))?;
        validate::unique_node_ids(&nodes)?;
        Ok((nodes, links))
    }

    /// Snapshot of the document as a wire payload.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` if an element fails to serialize.
    pub fn to_payload(&self) -> Result<serde_json::Value, DiagramError> {
        serde_json::to_value(self).map_err(|e| DiagramError::MalformedDocument(e.to_string()))
    }

    fn index_of(&self, id: &ElementId) -> Result<usize, DiagramError> {
        self.nodes
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| DiagramError::NotFound(id.clone()))
    }

    fn commit(&mut self) {
        self.revision += 1;
    }
}

impl<S: DiagramSchema> Default for Document<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DiagramSchema> Serialize for Document<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(S::NODES_FIELD, &self.nodes)?;
        map.serialize_entry(S::LINKS_FIELD, &self.links)?;
        map.end()
    }
}

#[cfg(test)]
#[path = "document_test.rs"]
mod tests;
