//! Session: one open diagram editor.
//!
//! DESIGN
//! ======
//! A session owns everything for one editor instance: the user context, the
//! editing engine (document + drafts), the reconciliation surface, the
//! artifact cache and the per-operation states. Nothing is shared between
//! sessions.
//!
//! Remote actions are split into `begin_*` / job `run` / `finish_*` so a host
//! holding the session behind a lock can release it while the collaborator
//! call is outstanding. `begin_*` enforces single flight and snapshots what
//! the call needs; `finish_*` applies the outcome against whatever the
//! session looks like by then. The `generate`, `refresh_preview` and `save`
//! helpers chain the three steps for callers that own the session outright.

pub mod erased;
pub mod ops;

use serde::Serialize;
use tracing::{info, warn};

use crate::artifact::{
    Artifact, ArtifactSync, ExportError, ExportedFile, RefreshStart, RefreshTicket, export_artifact,
};
use crate::diagram::document::PatchOf;
use crate::diagram::{DiagramError, DiagramKind, DiagramSchema, ElementId, ValidationError};
use crate::editor::{Editor, LinkForm};
use crate::error::EditorError;
use crate::reconcile::{Reconciler, Surface};
use crate::remote::{DiagramService, GeneratedDiagram, HistoryItem, PersistReceipt, RemoteError};
pub use erased::{DynSession, SessionSnapshot, open_session};
use ops::{Operation, Operations};

// =============================================================================
// CONTEXT
// =============================================================================

/// Who the session acts for. Passed explicitly to every remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub user_email: String,
    #[serde(skip)]
    pub auth_token: Option<String>,
}

impl SessionContext {
    pub fn new(user_email: impl Into<String>) -> Self {
        Self { user_email: user_email.into(), auth_token: None }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

// =============================================================================
// JOBS
// =============================================================================

/// A generation call, detached from the session.
#[derive(Debug, Clone)]
pub struct GenerateJob {
    context: SessionContext,
    kind: DiagramKind,
    prompt: String,
}

impl GenerateJob {
    /// # Errors
    ///
    /// Returns the collaborator's failure.
    pub async fn run(&self, service: &dyn DiagramService) -> Result<GeneratedDiagram, RemoteError> {
        service.generate(&self.context, self.kind, &self.prompt).await
    }
}

/// A render call pinned to the document revision it was dispatched for.
#[derive(Debug)]
pub struct RenderJob {
    ticket: RefreshTicket,
    context: SessionContext,
    kind: DiagramKind,
    payload: serde_json::Value,
}

impl RenderJob {
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.ticket.revision()
    }

    /// # Errors
    ///
    /// Returns the collaborator's failure.
    pub async fn run(&self, service: &dyn DiagramService) -> Result<Artifact, RemoteError> {
        service.render(&self.context, self.kind, &self.payload).await
    }
}

/// Outcome of asking for a preview refresh.
#[derive(Debug)]
pub enum RefreshStep {
    /// Render now, then hand the job back to `finish_refresh`.
    Dispatch(RenderJob),
    /// A render is already outstanding; this is the previous artifact.
    Cached(Artifact),
}

/// A storage call carrying the artifact cached at dispatch time.
#[derive(Debug, Clone)]
pub struct PersistJob {
    context: SessionContext,
    kind: DiagramKind,
    artifact: Artifact,
}

impl PersistJob {
    /// # Errors
    ///
    /// Returns the collaborator's failure.
    pub async fn run(&self, service: &dyn DiagramService) -> Result<PersistReceipt, RemoteError> {
        service.persist(&self.context, self.kind, &self.artifact).await
    }
}

/// A history lookup scoped to the session's user and kind.
#[derive(Debug, Clone)]
pub struct HistoryJob {
    context: SessionContext,
    kind: DiagramKind,
}

impl HistoryJob {
    /// # Errors
    ///
    /// Returns the collaborator's failure.
    pub async fn run(&self, service: &dyn DiagramService) -> Result<Vec<HistoryItem>, EditorError> {
        Ok(service.history(&self.context, Some(self.kind)).await?)
    }
}

// =============================================================================
// SESSION
// =============================================================================

#[derive(Debug, Clone)]
pub struct DiagramSession<S: DiagramSchema> {
    context: SessionContext,
    editor: Editor<S>,
    reconciler: Reconciler,
    artifact: ArtifactSync,
    ops: Operations,
}

impl<S: DiagramSchema> DiagramSession<S> {
    /// Open an editor on the kind's default seed.
    #[must_use]
    pub fn new(context: SessionContext) -> Self {
        info!(kind = %S::KIND, user = %context.user_email, "session opened");
        Self {
            context,
            editor: Editor::new(),
            reconciler: Reconciler::new(),
            artifact: ArtifactSync::new(),
            ops: Operations::default(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> DiagramKind {
        S::KIND
    }

    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    #[must_use]
    pub fn editor(&self) -> &Editor<S> {
        &self.editor
    }

    #[must_use]
    pub fn surface(&self) -> Surface {
        self.reconciler.surface()
    }

    #[must_use]
    pub fn artifact(&self) -> &ArtifactSync {
        &self.artifact
    }

    #[must_use]
    pub fn ops(&self) -> &Operations {
        &self.ops
    }

    pub fn switch_surface(&mut self, surface: Surface) {
        self.reconciler.switch_to(surface);
    }

    // =========================================================================
    // EDITS
    // =========================================================================

    /// Run an editor operation; any committed change invalidates the artifact.
    ///
    /// # Errors
    ///
    /// Returns the editor's failure wrapped as [`EditorError::Diagram`].
    pub fn edit<T>(
        &mut self,
        op: impl FnOnce(&mut Editor<S>) -> Result<T, DiagramError>,
    ) -> Result<T, EditorError> {
        let before = self.editor.document().revision();
        let out = op(&mut self.editor);
        let after = self.editor.document().revision();
        if after != before {
            self.reconciler.on_commit(&mut self.artifact, after);
        }
        Ok(out?)
    }

    /// # Errors
    ///
    /// See [`Editor::submit_node`].
    pub fn add_node(&mut self, body: S::Body) -> Result<ElementId, EditorError> {
        self.edit(|editor| editor.submit_node(body))
    }

    /// # Errors
    ///
    /// See [`Editor::update_node`].
    pub fn update_node(&mut self, id: &ElementId, patch: PatchOf<S>) -> Result<(), EditorError> {
        self.edit(|editor| editor.update_node(id, patch))
    }

    /// # Errors
    ///
    /// See [`Editor::remove_node`].
    pub fn remove_node(&mut self, id: &ElementId) -> Result<Vec<ElementId>, EditorError> {
        self.edit(|editor| editor.remove_node(id))
    }

    /// # Errors
    ///
    /// See [`Editor::submit_link`].
    pub fn add_link(&mut self, form: LinkForm<S::Attrs>) -> Result<ElementId, EditorError> {
        self.edit(|editor| editor.submit_link(form))
    }

    pub fn remove_link(&mut self, id: &ElementId) -> bool {
        self.edit(|editor| Ok(editor.remove_link(id))).unwrap_or(false)
    }

    /// # Errors
    ///
    /// See [`Editor::confirm_node`].
    pub fn confirm_node(&mut self) -> Result<ElementId, EditorError> {
        self.edit(Editor::confirm_node)
    }

    /// # Errors
    ///
    /// See [`Editor::confirm_link`].
    pub fn confirm_link(&mut self) -> Result<ElementId, EditorError> {
        self.edit(Editor::confirm_link)
    }

    // =========================================================================
    // GENERATE
    // =========================================================================

    /// # Errors
    ///
    /// Returns a validation error for a blank prompt and `Busy` while a
    /// generation is outstanding.
    pub fn begin_generate(&mut self, prompt: &str) -> Result<GenerateJob, EditorError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(self.report(DiagramError::from(ValidationError::EmptyPrompt).into()));
        }
        self.ops.begin(Operation::Generate)?;
        info!(kind = %S::KIND, prompt_len = prompt.len(), "generation dispatched");
        Ok(GenerateJob { context: self.context.clone(), kind: S::KIND, prompt: prompt.to_owned() })
    }

    /// Apply a generation outcome: reconcile on success, keep everything on failure.
    ///
    /// # Errors
    ///
    /// Returns the remote failure, or `MalformedDocument` if the payload does
    /// not decode.
    pub fn finish_generate(&mut self, result: Result<GeneratedDiagram, RemoteError>) -> Result<(), EditorError> {
        let outcome = result.map_err(EditorError::from).and_then(|generated| {
            let document = self.editor.document_mut();
            self.reconciler
                .accept(document, &mut self.artifact, generated)
                .map_err(EditorError::from)
        });
        match outcome {
            Ok(_) => {
                self.ops.succeed(Operation::Generate);
                self.editor.clear_error();
                Ok(())
            }
            Err(err) => {
                self.ops.fail(Operation::Generate, err.user_message());
                Err(self.report(err))
            }
        }
    }

    /// Generate and reconcile in one call.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_generate`] and [`Self::finish_generate`].
    pub async fn generate(&mut self, service: &dyn DiagramService, prompt: &str) -> Result<(), EditorError> {
        let job = self.begin_generate(prompt)?;
        let result = job.run(service).await;
        self.finish_generate(result)
    }

    // =========================================================================
    // PREVIEW
    // =========================================================================

    /// # Errors
    ///
    /// Returns `Busy` if a render is outstanding and nothing is cached yet,
    /// or `MalformedDocument` if the document does not serialize.
    pub fn begin_refresh(&mut self) -> Result<RefreshStep, EditorError> {
        let payload = self.editor.document().to_payload()?;
        let revision = self.editor.document().revision();
        match self.artifact.begin_refresh(revision) {
            RefreshStart::Dispatch(ticket) => {
                self.ops.begin(Operation::Render)?;
                info!(kind = %S::KIND, revision, "render dispatched");
                Ok(RefreshStep::Dispatch(RenderJob {
                    ticket,
                    context: self.context.clone(),
                    kind: S::KIND,
                    payload,
                }))
            }
            RefreshStart::Pending(Some(previous)) => Ok(RefreshStep::Cached(previous)),
            RefreshStart::Pending(None) => Err(EditorError::Busy(Operation::Render)),
        }
    }

    /// Store a render outcome. The artifact stays stale if the document moved on.
    ///
    /// # Errors
    ///
    /// Returns the remote failure; the previous artifact is kept.
    pub fn finish_refresh(
        &mut self,
        job: RenderJob,
        result: Result<Artifact, RemoteError>,
    ) -> Result<Artifact, EditorError> {
        let current = self.editor.document().revision();
        let rendered = job.revision();
        match self.artifact.complete(job.ticket, result, current) {
            Ok(artifact) => {
                self.ops.succeed(Operation::Render);
                info!(kind = %S::KIND, rendered, current, stale = self.artifact.is_stale(), "render complete");
                Ok(artifact)
            }
            Err(err) => {
                let err = EditorError::from(err);
                warn!(kind = %S::KIND, rendered, error = %err, "render failed");
                self.ops.fail(Operation::Render, err.user_message());
                Err(self.report(err))
            }
        }
    }

    /// Refresh the preview in one call.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_refresh`] and [`Self::finish_refresh`].
    pub async fn refresh_preview(&mut self, service: &dyn DiagramService) -> Result<Artifact, EditorError> {
        match self.begin_refresh()? {
            RefreshStep::Cached(artifact) => Ok(artifact),
            RefreshStep::Dispatch(job) => {
                let result = job.run(service).await;
                self.finish_refresh(job, result)
            }
        }
    }

    // =========================================================================
    // PERSIST, HISTORY, EXPORT
    // =========================================================================

    /// # Errors
    ///
    /// Returns `NoArtifact` if nothing was rendered yet and `Busy` while a
    /// save is outstanding.
    pub fn begin_persist(&mut self) -> Result<PersistJob, EditorError> {
        let Some(artifact) = self.artifact.cached().filter(|a| !a.is_empty()).cloned() else {
            return Err(self.report(ExportError::NoArtifact.into()));
        };
        self.ops.begin(Operation::Persist)?;
        Ok(PersistJob { context: self.context.clone(), kind: S::KIND, artifact })
    }

    /// # Errors
    ///
    /// Returns the remote failure.
    pub fn finish_persist(
        &mut self,
        result: Result<PersistReceipt, RemoteError>,
    ) -> Result<PersistReceipt, EditorError> {
        match result {
            Ok(receipt) => {
                self.ops.succeed(Operation::Persist);
                info!(kind = %S::KIND, location = %receipt.stored_location, "diagram saved");
                Ok(receipt)
            }
            Err(err) => {
                let err = EditorError::from(err);
                self.ops.fail(Operation::Persist, err.user_message());
                Err(self.report(err))
            }
        }
    }

    /// Save the cached artifact in one call.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_persist`] and [`Self::finish_persist`].
    pub async fn save(&mut self, service: &dyn DiagramService) -> Result<PersistReceipt, EditorError> {
        let job = self.begin_persist()?;
        let result = job.run(service).await;
        self.finish_persist(result)
    }

    /// Lookup of this session's saved diagrams, filtered to this kind.
    #[must_use]
    pub fn history_job(&self) -> HistoryJob {
        HistoryJob { context: self.context.clone(), kind: S::KIND }
    }

    /// Saved diagrams of this session's user, filtered to this kind.
    ///
    /// # Errors
    ///
    /// Returns the remote failure.
    pub async fn history(&self, service: &dyn DiagramService) -> Result<Vec<HistoryItem>, EditorError> {
        self.history_job().run(service).await
    }

    /// The cached artifact as `{kind}.svg`, stale or not.
    ///
    /// # Errors
    ///
    /// Returns `NoArtifact` if nothing was rendered yet.
    pub fn export(&self) -> Result<ExportedFile, EditorError> {
        let file = export_artifact(self.artifact.cached(), &S::KIND.export_filename())?;
        info!(kind = %S::KIND, bytes = file.bytes.len(), stale = self.artifact.is_stale(), "artifact exported");
        Ok(file)
    }

    fn report(&mut self, err: EditorError) -> EditorError {
        self.editor.report(&err);
        err
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
