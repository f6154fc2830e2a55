//! Flowchart schema: steps connected by transitions.

use serde::{Deserialize, Serialize};

use super::{DiagramKind, DiagramSchema, Document, LinkAttrs, Node, NodeBody};

/// Role of a flowchart step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Start,
    End,
    #[default]
    Process,
    Decision,
    Input,
    Output,
}

impl StepKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Process => "process",
            Self::Decision => "decision",
            Self::Input => "input",
            Self::Output => "output",
        }
    }

    /// `start` and `end` bracket every flowchart and are never deletable.
    #[must_use]
    pub fn is_reserved(self) -> bool {
        match self {
            Self::Start | Self::End => true,
            Self::Process | Self::Decision | Self::Input | Self::Output => false,
        }
    }
}

/// A flowchart node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: StepKind,
}

impl Step {
    pub fn new(label: impl Into<String>, kind: StepKind) -> Self {
        Self { label: label.into(), kind }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepPatch {
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<StepKind>,
}

impl From<Step> for StepPatch {
    fn from(step: Step) -> Self {
        Self { label: Some(step.label), kind: Some(step.kind) }
    }
}

impl NodeBody for Step {
    type Patch = StepPatch;

    const NAME_FIELD: &'static str = "label";

    fn name(&self) -> &str {
        &self.label
    }

    fn reserved_role(&self) -> Option<&'static str> {
        self.kind.is_reserved().then(|| self.kind.as_str())
    }

    fn apply(&mut self, patch: StepPatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
    }
}

/// Attributes of a flowchart edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Transition {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self { label: Some(label.into()) }
    }
}

impl LinkAttrs for Transition {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flowchart;

impl DiagramSchema for Flowchart {
    const KIND: DiagramKind = DiagramKind::Flowchart;
    const NODES_FIELD: &'static str = "nodes";
    const LINKS_FIELD: &'static str = "edges";
    const LINK_ID_PREFIX: &'static str = "edge-";

    type Body = Step;
    type Attrs = Transition;

    fn seed() -> Vec<Node<Step>> {
        vec![Node::new("1", Step::new("Start", StepKind::Start)), Node::new("2", Step::new("End", StepKind::End))]
    }

    fn default_position(_index: usize) -> Option<(f64, f64)> {
        None
    }
}

pub type FlowchartDocument = Document<Flowchart>;

#[cfg(test)]
#[path = "flowchart_test.rs"]
mod tests;
