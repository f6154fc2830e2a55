//! Kind-erased sessions for hosts that hold editors of every kind.
//!
//! Element bodies cross this boundary as JSON and are decoded against the
//! session's own schema, so a UML session rejects a flowchart step with a
//! validation error rather than a type error at the host.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{DiagramSession, GenerateJob, HistoryJob, PersistJob, RefreshStep, RenderJob, SessionContext};
use crate::artifact::{Artifact, ArtifactStatus, ExportedFile};
use crate::diagram::document::PatchOf;
use crate::diagram::{DiagramError, DiagramKind, DiagramSchema, ElementId, Er, Flowchart, Uml, ValidationError};
use crate::editor::LinkForm;
use crate::error::EditorError;
use crate::reconcile::Surface;
use crate::remote::{GeneratedDiagram, PersistReceipt, RemoteError};
use crate::session::ops::Operations;

/// Everything a client needs to redraw one editor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub kind: DiagramKind,
    pub user_email: String,
    pub surface: Surface,
    pub revision: u64,
    pub document: serde_json::Value,
    pub node_form: serde_json::Value,
    pub link_form: serde_json::Value,
    pub artifact: ArtifactStatus,
    pub operations: Operations,
    pub last_error: Option<String>,
}

/// Object-safe view of a [`DiagramSession`].
pub trait DynSession: Send + Sync {
    fn kind(&self) -> DiagramKind;

    fn context(&self) -> &SessionContext;

    /// # Errors
    ///
    /// Returns `MalformedDocument` if the document fails to serialize.
    fn snapshot(&self) -> Result<SessionSnapshot, EditorError>;

    /// # Errors
    ///
    /// Returns a validation error if `body` does not decode for this kind.
    fn add_node(&mut self, body: serde_json::Value) -> Result<ElementId, EditorError>;

    /// # Errors
    ///
    /// Returns a validation error if `patch` does not decode for this kind.
    fn update_node(&mut self, id: &ElementId, patch: serde_json::Value) -> Result<(), EditorError>;

    /// # Errors
    ///
    /// Returns `NotFound` or `Protected`.
    fn remove_node(&mut self, id: &ElementId) -> Result<Vec<ElementId>, EditorError>;

    /// # Errors
    ///
    /// Returns a validation error if the link does not decode or is rejected.
    fn add_link(&mut self, link: serde_json::Value) -> Result<ElementId, EditorError>;

    fn remove_link(&mut self, id: &ElementId) -> bool;

    fn switch_surface(&mut self, surface: Surface);

    /// # Errors
    ///
    /// See [`DiagramSession::begin_generate`].
    fn begin_generate(&mut self, prompt: &str) -> Result<GenerateJob, EditorError>;

    /// # Errors
    ///
    /// See [`DiagramSession::finish_generate`].
    fn finish_generate(&mut self, result: Result<GeneratedDiagram, RemoteError>) -> Result<(), EditorError>;

    /// # Errors
    ///
    /// See [`DiagramSession::begin_refresh`].
    fn begin_refresh(&mut self) -> Result<RefreshStep, EditorError>;

    /// # Errors
    ///
    /// See [`DiagramSession::finish_refresh`].
    fn finish_refresh(&mut self, job: RenderJob, result: Result<Artifact, RemoteError>)
    -> Result<Artifact, EditorError>;

    /// # Errors
    ///
    /// See [`DiagramSession::begin_persist`].
    fn begin_persist(&mut self) -> Result<PersistJob, EditorError>;

    /// # Errors
    ///
    /// See [`DiagramSession::finish_persist`].
    fn finish_persist(&mut self, result: Result<PersistReceipt, RemoteError>)
    -> Result<PersistReceipt, EditorError>;

    /// See [`DiagramSession::history_job`].
    fn history_job(&self) -> HistoryJob;

    /// # Errors
    ///
    /// Returns `NoArtifact` if nothing was rendered yet.
    fn export(&self) -> Result<ExportedFile, EditorError>;
}

/// Open a seeded session of `kind`.
#[must_use]
pub fn open_session(kind: DiagramKind, context: SessionContext) -> Box<dyn DynSession> {
    match kind {
        DiagramKind::Flowchart => Box::new(DiagramSession::<Flowchart>::new(context)),
        DiagramKind::Uml => Box::new(DiagramSession::<Uml>::new(context)),
        DiagramKind::Er => Box::new(DiagramSession::<Er>::new(context)),
    }
}

fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, DiagramError> {
    serde_json::from_value(value).map_err(|e| ValidationError::InvalidInput(e.to_string()).into())
}

fn encode<T: Serialize>(value: &T) -> Result<serde_json::Value, DiagramError> {
    serde_json::to_value(value).map_err(|e| DiagramError::MalformedDocument(e.to_string()))
}

impl<S: DiagramSchema> DiagramSession<S> {
    fn decode_or_report<T: DeserializeOwned>(&mut self, value: serde_json::Value) -> Result<T, EditorError> {
        decode(value).map_err(|e| {
            let err = EditorError::from(e);
            self.editor.report(&err);
            err
        })
    }
}

impl<S: DiagramSchema> DynSession for DiagramSession<S> {
    fn kind(&self) -> DiagramKind {
        S::KIND
    }

    fn context(&self) -> &SessionContext {
        DiagramSession::context(self)
    }

    fn snapshot(&self) -> Result<SessionSnapshot, EditorError> {
        let editor = self.editor();
        Ok(SessionSnapshot {
            kind: S::KIND,
            user_email: self.context.user_email.clone(),
            surface: self.surface(),
            revision: editor.document().revision(),
            document: editor.document().to_payload()?,
            node_form: encode(editor.node_form())?,
            link_form: encode(editor.link_form())?,
            artifact: self.artifact.status(),
            operations: self.ops.clone(),
            last_error: editor.last_error().map(str::to_owned),
        })
    }

    fn add_node(&mut self, body: serde_json::Value) -> Result<ElementId, EditorError> {
        let body: S::Body = self.decode_or_report(body)?;
        DiagramSession::add_node(self, body)
    }

    fn update_node(&mut self, id: &ElementId, patch: serde_json::Value) -> Result<(), EditorError> {
        let patch: PatchOf<S> = self.decode_or_report(patch)?;
        DiagramSession::update_node(self, id, patch)
    }

    fn remove_node(&mut self, id: &ElementId) -> Result<Vec<ElementId>, EditorError> {
        DiagramSession::remove_node(self, id)
    }

    fn add_link(&mut self, link: serde_json::Value) -> Result<ElementId, EditorError> {
        let form: LinkForm<S::Attrs> = self.decode_or_report(link)?;
        DiagramSession::add_link(self, form)
    }

    fn remove_link(&mut self, id: &ElementId) -> bool {
        DiagramSession::remove_link(self, id)
    }

    fn switch_surface(&mut self, surface: Surface) {
        DiagramSession::switch_surface(self, surface);
    }

    fn begin_generate(&mut self, prompt: &str) -> Result<GenerateJob, EditorError> {
        DiagramSession::begin_generate(self, prompt)
    }

    fn finish_generate(&mut self, result: Result<GeneratedDiagram, RemoteError>) -> Result<(), EditorError> {
        DiagramSession::finish_generate(self, result)
    }

    fn begin_refresh(&mut self) -> Result<RefreshStep, EditorError> {
        DiagramSession::begin_refresh(self)
    }

    fn finish_refresh(
        &mut self,
        job: RenderJob,
        result: Result<Artifact, RemoteError>,
    ) -> Result<Artifact, EditorError> {
        DiagramSession::finish_refresh(self, job, result)
    }

    fn begin_persist(&mut self) -> Result<PersistJob, EditorError> {
        DiagramSession::begin_persist(self)
    }

    fn finish_persist(&mut self, result: Result<PersistReceipt, RemoteError>) -> Result<PersistReceipt, EditorError> {
        DiagramSession::finish_persist(self, result)
    }

    fn history_job(&self) -> HistoryJob {
        DiagramSession::history_job(self)
    }

    fn export(&self) -> Result<ExportedFile, EditorError> {
        DiagramSession::export(self)
    }
}

#[cfg(test)]
#[path = "erased_test.rs"]
mod tests;
