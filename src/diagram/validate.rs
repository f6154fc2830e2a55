//! Integrity validator: stateless checks run before any element mutation.
//!
//! Rules are evaluated in a fixed order and the first violation wins:
//! 1. required-field presence
//! 2. reference resolvability
//! 3. no self-loop
//! 4. deletion protection for reserved node kinds
//!
//! Nothing here mutates; the document commits only after every applicable
//! check has passed.

use std::collections::HashSet;

use super::{ElementId, Link, Node, NodeBody};

// =============================================================================
// ERRORS
// =============================================================================

/// Why a form input or link draft was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("{field} cannot be empty")]
    EmptyEntry { field: &'static str },

    #[error("both 'from' and 'to' nodes are required")]
    MissingEndpoint,

    #[error("node {0} does not exist")]
    UnknownEndpoint(ElementId),

    #[error("cannot connect a node to itself")]
    SelfLoop,

    #[error("{0} nodes are reserved and cannot be added")]
    ReservedKind(&'static str),

    #[error("please enter a prompt")]
    EmptyPrompt,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors produced by document mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagramError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{role} node {id} is protected")]
    Protected { id: ElementId, role: &'static str },

    #[error("element not found: {0}")]
    NotFound(ElementId),

    #[error("no {field} at position {index}")]
    EntryNotFound { field: &'static str, index: usize },

    #[error("malformed document: {0}")]
    MalformedDocument(String),
}

impl crate::error::ErrorCode for DiagramError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::Protected { .. } => "E_PROTECTED_ELEMENT",
            Self::NotFound(_) | Self::EntryNotFound { .. } => "E_NOT_FOUND",
            Self::MalformedDocument(_) => "E_MALFORMED_DOCUMENT",
        }
    }
}

// =============================================================================
// RULE 1: REQUIRED FIELDS
// =============================================================================

/// The node's display name must be non-blank.
pub fn require_name<B: NodeBody>(body: &B) -> Result<(), DiagramError> {
    if body.name().trim().is_empty() {
        return Err(ValidationError::MissingField { field: B::NAME_FIELD }.into());
    }
    Ok(())
}

/// The node's name and every list entry it carries must be non-blank.
pub fn require_fields<B: NodeBody>(body: &B) -> Result<(), DiagramError> {
    require_name(body)?;
    body.check_entries()
}

/// Both link endpoints must be selected.
pub fn require_endpoints(from: &ElementId, to: &ElementId) -> Result<(), DiagramError> {
    if from.is_empty() || to.is_empty() {
        return Err(ValidationError::MissingEndpoint.into());
    }
    Ok(())
}

/// List entries (class attributes, methods, ER attribute names) must be non-blank.
pub fn require_entry(field: &'static str, value: &str) -> Result<(), DiagramError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyEntry { field }.into());
    }
    Ok(())
}

/// Reserved roles only come from the seed or from generation, never from a form.
pub fn check_insertable<B: NodeBody>(body: &B) -> Result<(), DiagramError> {
    match body.reserved_role() {
        Some(role) => Err(ValidationError::ReservedKind(role).into()),
        None => Ok(()),
    }
}

/// A patch may not move a node into or out of a reserved role.
pub fn check_role_change<B: NodeBody>(id: &ElementId, before: &B, after: &B) -> Result<(), DiagramError> {
    match (before.reserved_role(), after.reserved_role()) {
        (Some(role), next) if next != Some(role) => Err(DiagramError::Protected { id: id.clone(), role }),
        (None, Some(role)) => Err(ValidationError::ReservedKind(role).into()),
        _ => Ok(()),
    }
}

// =============================================================================
// RULE 2: REFERENCES
// =============================================================================

/// Every endpoint must name a node currently in the document.
pub fn resolve_endpoints<B>(nodes: &[Node<B>], from: &ElementId, to: &ElementId) -> Result<(), DiagramError> {
    for endpoint in [from, to] {
        if !nodes.iter().any(|n| &n.id == endpoint) {
            return Err(ValidationError::UnknownEndpoint(endpoint.clone()).into());
        }
    }
    Ok(())
}

// =============================================================================
// RULE 3: SELF-LOOPS
// =============================================================================

pub fn reject_self_loop(from: &ElementId, to: &ElementId) -> Result<(), DiagramError> {
    if from == to {
        return Err(ValidationError::SelfLoop.into());
    }
    Ok(())
}

// =============================================================================
// RULE 4: DELETION PROTECTION
// =============================================================================

pub fn check_deletable<B: NodeBody>(node: &Node<B>) -> Result<(), DiagramError> {
    match node.body.reserved_role() {
        Some(role) => Err(DiagramError::Protected { id: node.id.clone(), role }),
        None => Ok(()),
    }
}

// =============================================================================
// WHOLE-DOCUMENT CHECK
// =============================================================================

/// Links whose endpoints do not resolve, or that loop onto themselves.
///
/// Element-level mutations can never produce these; a replaced document from
/// a generation service might.
#[must_use]
pub fn dangling_links<'a, B, A>(nodes: &[Node<B>], links: &'a [Link<A>]) -> Vec<&'a Link<A>> {
    links
        .iter()
        .filter(|link| {
            resolve_endpoints(nodes, &link.from, &link.to).is_err() || reject_self_loop(&link.from, &link.to).is_err()
        })
        .collect()
}

/// Every node must carry a non-blank id that no other node shares.
///
/// # Errors
///
/// Returns `MalformedDocument` naming the first blank or repeated id.
pub fn unique_node_ids<B>(nodes: &[Node<B>]) -> Result<(), DiagramError> {
    let mut seen = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if node.id.is_empty() {
            return Err(DiagramError::MalformedDocument("node without an id".into()));
        }
        if !seen.insert(node.id.as_str()) {
            return Err(DiagramError::MalformedDocument(format!("duplicate node id {}", node.id)));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
