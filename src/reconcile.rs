//! Reconciliation controller: merges generated diagrams into the editor.
//!
//! DESIGN
//! ======
//! Two surfaces, `generating` and `manual`. Accepting a generation result
//! replaces the whole document, overwrites the cached artifact with the one
//! the generator returned (no extra render) and flips to `manual`. Manual
//! commits only invalidate the artifact. Switching surfaces by hand never
//! touches the document.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::artifact::ArtifactSync;
use crate::diagram::{DiagramError, DiagramSchema, Document};
use crate::remote::GeneratedDiagram;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    #[default]
    Generating,
    Manual,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciler {
    surface: Surface,
}

impl Reconciler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn switch_to(&mut self, surface: Surface) {
        debug!(from = ?self.surface, to = ?surface, "surface switched");
        self.surface = surface;
    }

    /// Replace `document` with a generation result. Returns how many links
    /// were dropped because their endpoints did not resolve.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` if the payload lacks either collection or
    /// an element fails to decode. Nothing changes in that case.
    pub fn accept<S: DiagramSchema>(
        &mut self,
        document: &mut Document<S>,
        sync: &mut ArtifactSync,
        generated: GeneratedDiagram,
    ) -> Result<usize, DiagramError> {
        let (nodes, links) = Document::<S>::decode_payload(&generated.payload)?;
        let dropped = document.replace_all(nodes, links);
        if !dropped.is_empty() {
            warn!(kind = %S::KIND, dropped = dropped.len(), "generated links with unresolved endpoints dropped");
        }

        match generated.artifact {
            Some(artifact) => sync.overwrite(artifact, document.revision()),
            None => sync.invalidate(),
        }
        self.surface = Surface::Manual;

        info!(
            kind = %S::KIND,
            nodes = document.nodes().len(),
            links = document.links().len(),
            revision = document.revision(),
            "generated diagram reconciled"
        );
        Ok(dropped.len())
    }

    /// A manual commit landed; the cached artifact no longer matches.
    pub fn on_commit(&self, sync: &mut ArtifactSync, revision: u64) {
        debug!(surface = ?self.surface, revision, "document committed; artifact stale");
        sync.invalidate();
    }
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
