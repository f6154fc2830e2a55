//! Pending form state. Never part of the committed document.

use serde::{Deserialize, Serialize};

use crate::diagram::ElementId;

/// Draft of a node being added, or of an existing node being edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeForm<B> {
    #[serde(flatten)]
    pub body: B,
    /// Set while editing an existing node; confirm then patches it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editing: Option<ElementId>,
}

impl<B: Default> NodeForm<B> {
    pub fn reset(&mut self) {
        *self = Self { body: B::default(), editing: None };
    }
}

/// Draft of a link. Empty endpoints mean "not selected yet".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkForm<A> {
    #[serde(default)]
    pub from: ElementId,
    #[serde(default)]
    pub to: ElementId,
    #[serde(flatten)]
    pub attrs: A,
}

impl<A: Default> LinkForm<A> {
    pub fn new(from: impl Into<ElementId>, to: impl Into<ElementId>, attrs: A) -> Self {
        Self { from: from.into(), to: to.into(), attrs }
    }

    pub fn reset(&mut self) {
        *self = Self { from: ElementId::default(), to: ElementId::default(), attrs: A::default() };
    }
}
