//! Editing engine: CRUD over one document plus the pending form drafts.
//!
//! DESIGN
//! ======
//! Users fill a node form or a link form and confirm it. A confirm either
//! commits and resets the form, or fails and leaves both the document and
//! the form untouched with `last_error` set to the user-visible reason.
//! Direct operations (patch, remove) follow the same error rule so a failed
//! call never hides a previous draft.

pub mod forms;

use tracing::{debug, info, warn};

use crate::diagram::document::PatchOf;
use crate::diagram::{DiagramError, DiagramSchema, Document, ElementId};
use crate::error::EditorError;
pub use forms::{LinkForm, NodeForm};

#[derive(Debug, Clone, PartialEq)]
pub struct Editor<S: DiagramSchema> {
    document: Document<S>,
    node_form: NodeForm<S::Body>,
    link_form: LinkForm<S::Attrs>,
    last_error: Option<String>,
}

impl<S: DiagramSchema> Default for Editor<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DiagramSchema> Editor<S> {
    /// Editor over a freshly seeded document.
    #[must_use]
    pub fn new() -> Self {
        Self::with_document(Document::new())
    }

    #[must_use]
    pub fn with_document(document: Document<S>) -> Self {
        Self { document, node_form: NodeForm::default(), link_form: LinkForm::default(), last_error: None }
    }

    #[must_use]
    pub fn document(&self) -> &Document<S> {
        &self.document
    }

    pub(crate) fn document_mut(&mut self) -> &mut Document<S> {
        &mut self.document
    }

    #[must_use]
    pub fn node_form(&self) -> &NodeForm<S::Body> {
        &self.node_form
    }

    #[must_use]
    pub fn link_form(&self) -> &LinkForm<S::Attrs> {
        &self.link_form
    }

    /// User-visible reason of the last failed operation, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Record a failure from outside the document (remote call, export).
    pub fn report(&mut self, err: &EditorError) {
        self.last_error = Some(err.user_message());
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // =========================================================================
    // FORMS
    // =========================================================================

    pub fn set_node_form(&mut self, body: S::Body) {
        self.node_form.body = body;
    }

    pub fn set_link_form(&mut self, form: LinkForm<S::Attrs>) {
        self.link_form = form;
    }

    /// Edit the node draft in place (push a method, edit an ER attribute...).
    /// A rejected edit leaves the draft as it was.
    ///
    /// # Errors
    ///
    /// Returns whatever the edit rejects with.
    pub fn edit_node_form<T>(
        &mut self,
        edit: impl FnOnce(&mut S::Body) -> Result<T, DiagramError>,
    ) -> Result<T, DiagramError> {
        let mut draft = self.node_form.body.clone();
        let out = self.record(edit(&mut draft))?;
        self.node_form.body = draft;
        Ok(out)
    }

    /// Load an existing node into the form so that `confirm_node` patches it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` is absent.
    pub fn begin_edit(&mut self, id: &ElementId) -> Result<(), DiagramError> {
        let body = self
            .document
            .node(id)
            .map(|n| n.body.clone())
            .ok_or_else(|| DiagramError::NotFound(id.clone()));
        let body = self.record(body)?;
        self.node_form = NodeForm { body, editing: Some(id.clone()) };
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.node_form.reset();
        self.last_error = None;
    }

    // =========================================================================
    // COMMITS
    // =========================================================================

    /// Commit the node draft: add it, or patch the node being edited.
    ///
    /// # Errors
    ///
    /// Returns the validation, protection or not-found failure; the draft is kept.
    pub fn confirm_node(&mut self) -> Result<ElementId, DiagramError> {
        let body = self.node_form.body.clone();
        let result = match self.node_form.editing.clone() {
            Some(id) => self
                .document
                .update_node(&id, <PatchOf<S> as From<S::Body>>::from(body))
                .map(|()| id),
            None => self.document.add_node(body),
        };
        let id = self.record(result)?;
        info!(kind = %S::KIND, node_id = %id, revision = self.document.revision(), "node committed");
        self.node_form.reset();
        Ok(id)
    }

    /// Commit the link draft.
    ///
    /// # Errors
    ///
    /// Returns the validation failure; the draft is kept.
    pub fn confirm_link(&mut self) -> Result<ElementId, DiagramError> {
        let LinkForm { from, to, attrs } = self.link_form.clone();
        let result = self.document.add_link(&from, &to, attrs);
        let id = self.record(result)?;
        info!(kind = %S::KIND, link_id = %id, %from, %to, revision = self.document.revision(), "link committed");
        self.link_form.reset();
        Ok(id)
    }

    /// Fill the node form and confirm it in one step.
    ///
    /// # Errors
    ///
    /// See [`Self::confirm_node`].
    pub fn submit_node(&mut self, body: S::Body) -> Result<ElementId, DiagramError> {
        self.node_form = NodeForm { body, editing: None };
        self.confirm_node()
    }

    /// Fill the link form and confirm it in one step.
    ///
    /// # Errors
    ///
    /// See [`Self::confirm_link`].
    pub fn submit_link(&mut self, form: LinkForm<S::Attrs>) -> Result<ElementId, DiagramError> {
        self.link_form = form;
        self.confirm_link()
    }

    /// Patch a node directly, bypassing the form.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, a validation failure, or `Protected`.
    pub fn update_node(&mut self, id: &ElementId, patch: PatchOf<S>) -> Result<(), DiagramError> {
        let result = self.document.update_node(id, patch);
        self.record(result)?;
        info!(kind = %S::KIND, node_id = %id, revision = self.document.revision(), "node updated");
        Ok(())
    }

    /// Remove a node and its incident links.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Protected`.
    pub fn remove_node(&mut self, id: &ElementId) -> Result<Vec<ElementId>, DiagramError> {
        let result = self.document.remove_node(id);
        let cascaded = self.record(result)?;
        if self.node_form.editing.as_ref() == Some(id) {
            self.node_form.reset();
        }
        info!(kind = %S::KIND, node_id = %id, cascaded = cascaded.len(), "node removed");
        Ok(cascaded)
    }

    /// Remove a link; unknown ids are a successful no-op.
    pub fn remove_link(&mut self, id: &ElementId) -> bool {
        let removed = self.document.remove_link(id);
        self.last_error = None;
        debug!(kind = %S::KIND, link_id = %id, removed, "link remove");
        removed
    }

    fn record<T>(&mut self, result: Result<T, DiagramError>) -> Result<T, DiagramError> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Ok(value)
            }
            Err(err) => {
                warn!(kind = %S::KIND, error = %err, "edit rejected");
                self.last_error = Some(EditorError::from(err.clone()).user_message());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
