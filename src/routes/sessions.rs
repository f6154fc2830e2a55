//! Editor session routes.
//!
//! DESIGN
//! ======
//! Every handler locks one session, applies one operation and answers with
//! the resulting snapshot. Remote operations run in three steps: begin under
//! the lock, await the collaborator with the lock released, then finish
//! under the lock again. Edits landing in between bump the revision, which
//! is what lets a late render come back marked stale. The await and the
//! finish step run on a spawned task.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::artifact::ArtifactStatus;
use crate::diagram::{DiagramError, DiagramKind, ElementId, ValidationError};
use crate::error::{EditorError, ErrorCode};
use crate::reconcile::Surface;
use crate::remote::{HistoryItem, PersistReceipt};
use crate::session::{RefreshStep, SessionContext, SessionSnapshot};
use crate::state::{AppState, SharedSession};

// =============================================================================
// ERRORS
// =============================================================================

/// Failures returned by the session routes.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("session {0} not found")]
    SessionNotFound(Uuid),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("internal error: {0}")]
    Task(String),
}

impl From<DiagramError> for ApiError {
    fn from(err: DiagramError) -> Self {
        Self::Editor(err.into())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Editor(DiagramError::from(err).into())
    }
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SessionNotFound(_) => "E_SESSION_NOT_FOUND",
            Self::Editor(err) => err.error_code(),
            Self::Task(_) => "E_INTERNAL",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::SessionNotFound(_) | Self::Task(_) => false,
            Self::Editor(err) => err.retryable(),
        }
    }
}

/// HTTP status for an error code.
pub(crate) fn status_for_code(code: &str) -> StatusCode {
    match code {
        "E_VALIDATION" | "E_MALFORMED_DOCUMENT" => StatusCode::UNPROCESSABLE_ENTITY,
        "E_PROTECTED_ELEMENT" | "E_BUSY" => StatusCode::CONFLICT,
        "E_NOT_FOUND" | "E_NO_ARTIFACT" | "E_SESSION_NOT_FOUND" => StatusCode::NOT_FOUND,
        "E_REMOTE_CALL" => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        let message = match &self {
            Self::Editor(err) => err.user_message(),
            Self::SessionNotFound(_) | Self::Task(_) => self.to_string(),
        };
        debug!(code, %message, "request rejected");
        let body = ErrorBody { code, message, retryable: self.retryable() };
        (status_for_code(code), Json(body)).into_response()
    }
}

// =============================================================================
// REQUEST / RESPONSE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSessionBody {
    pub kind: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub id: Uuid,
    pub session: SessionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct ElementResponse {
    pub id: ElementId,
    pub session: SessionSnapshot,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveNodeResponse {
    pub removed_links: Vec<ElementId>,
    pub session: SessionSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct SurfaceBody {
    pub surface: Surface,
}

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub svg: String,
    pub artifact: ArtifactStatus,
}

// =============================================================================
// HELPERS
// =============================================================================

async fn find(state: &AppState, id: Uuid) -> Result<SharedSession, ApiError> {
    state.get(id).await.ok_or(ApiError::SessionNotFound(id))
}

/// Token from an `Authorization: Bearer ...` header, if any.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token.to_owned()) }
}

// =============================================================================
// LIFECYCLE
// =============================================================================

/// `POST /api/sessions`: open a seeded editor.
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateSessionBody>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), ApiError> {
    let kind = DiagramKind::parse(&body.kind)
        .ok_or_else(|| ValidationError::InvalidInput(format!("unknown diagram kind '{}'", body.kind)))?;
    let email = body.email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingField { field: "email" }.into());
    }

    let mut context = SessionContext::new(email);
    if let Some(token) = bearer_token(&headers) {
        context = context.with_token(token);
    }

    let id = state.open(kind, context).await;
    info!(session_id = %id, %kind, "session opened");

    let session = find(&state, id).await?.lock().await.snapshot()?;
    Ok((StatusCode::CREATED, Json(CreateSessionResponse { id, session })))
}

/// `GET /api/sessions/{id}`
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let snapshot = find(&state, id).await?.lock().await.snapshot()?;
    Ok(Json(snapshot))
}

/// `DELETE /api/sessions/{id}`
pub async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    if !state.close(id).await {
        return Err(ApiError::SessionNotFound(id));
    }
    info!(session_id = %id, "session closed");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// MANUAL EDITING
// =============================================================================

/// `POST /api/sessions/{id}/nodes`
pub async fn add_node(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<ElementResponse>), ApiError> {
    let shared = find(&state, id).await?;
    let mut session = shared.lock().await;
    let node_id = session.add_node(body)?;
    let snapshot = session.snapshot()?;
    Ok((StatusCode::CREATED, Json(ElementResponse { id: node_id, session: snapshot })))
}

/// `PATCH /api/sessions/{id}/nodes/{node_id}`
pub async fn update_node(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(Uuid, String)>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let shared = find(&state, id).await?;
    let mut session = shared.lock().await;
    session.update_node(&ElementId::new(node_id), patch)?;
    Ok(Json(session.snapshot()?))
}

/// `DELETE /api/sessions/{id}/nodes/{node_id}`: cascades to touching links.
pub async fn remove_node(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(Uuid, String)>,
) -> Result<Json<RemoveNodeResponse>, ApiError> {
    let shared = find(&state, id).await?;
    let mut session = shared.lock().await;
    let removed_links = session.remove_node(&ElementId::new(node_id))?;
    let snapshot = session.snapshot()?;
    Ok(Json(RemoveNodeResponse { removed_links, session: snapshot }))
}

/// `POST /api/sessions/{id}/links`
pub async fn add_link(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<ElementResponse>), ApiError> {
    let shared = find(&state, id).await?;
    let mut session = shared.lock().await;
    let link_id = session.add_link(body)?;
    let snapshot = session.snapshot()?;
    Ok((StatusCode::CREATED, Json(ElementResponse { id: link_id, session: snapshot })))
}

/// `DELETE /api/sessions/{id}/links/{link_id}`: unknown ids are a no-op.
pub async fn remove_link(
    State(state): State<AppState>,
    Path((id, link_id)): Path<(Uuid, String)>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let shared = find(&state, id).await?;
    let mut session = shared.lock().await;
    session.remove_link(&ElementId::new(link_id));
    Ok(Json(session.snapshot()?))
}

/// `PUT /api/sessions/{id}/surface`
pub async fn switch_surface(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SurfaceBody>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let shared = find(&state, id).await?;
    let mut session = shared.lock().await;
    session.switch_surface(body.surface);
    Ok(Json(session.snapshot()?))
}

// =============================================================================
// REMOTE OPERATIONS
// =============================================================================

/// Run a remote step to completion even if the request is dropped, so an
/// operation never stays in flight after its client disconnects.
async fn detach<T, F>(task: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, EditorError>> + Send + 'static,
{
    match tokio::spawn(task).await {
        Ok(result) => Ok(result?),
        Err(e) => {
            error!(error = %e, "remote task aborted");
            Err(ApiError::Task(e.to_string()))
        }
    }
}

/// `POST /api/sessions/{id}/generate`
pub async fn generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let shared = find(&state, id).await?;
    let job = shared.lock().await.begin_generate(&body.prompt)?;

    let service = Arc::clone(&state.service);
    let snapshot = detach(async move {
        let result = job.run(service.as_ref()).await;
        let mut session = shared.lock().await;
        session.finish_generate(result)?;
        session.snapshot()
    })
    .await?;
    Ok(Json(snapshot))
}

/// `POST /api/sessions/{id}/preview`
pub async fn refresh_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let shared = find(&state, id).await?;
    let step = shared.lock().await.begin_refresh()?;

    let service = Arc::clone(&state.service);
    let response = detach(async move {
        let artifact = match step {
            RefreshStep::Cached(artifact) => artifact,
            RefreshStep::Dispatch(job) => {
                let result = job.run(service.as_ref()).await;
                shared.lock().await.finish_refresh(job, result)?
            }
        };
        let status = shared.lock().await.snapshot()?.artifact;
        Ok::<_, EditorError>(PreviewResponse { svg: artifact.as_str().to_owned(), artifact: status })
    })
    .await?;
    Ok(Json(response))
}

/// `POST /api/sessions/{id}/save`
pub async fn save(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<PersistReceipt>, ApiError> {
    let shared = find(&state, id).await?;
    let job = shared.lock().await.begin_persist()?;

    let service = Arc::clone(&state.service);
    let receipt = detach(async move {
        let result = job.run(service.as_ref()).await;
        shared.lock().await.finish_persist(result)
    })
    .await?;
    Ok(Json(receipt))
}

/// `GET /api/sessions/{id}/history`: past diagrams of this session's kind.
pub async fn history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<HistoryItem>>, ApiError> {
    let job = find(&state, id).await?.lock().await.history_job();
    let items = job.run(state.service.as_ref()).await?;
    Ok(Json(items))
}

/// `GET /api/sessions/{id}/export`: the cached artifact as an SVG download.
pub async fn export(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response, ApiError> {
    let file = find(&state, id).await?.lock().await.export()?;
    info!(session_id = %id, filename = %file.filename, bytes = file.bytes.len(), "artifact exported");

    Ok((
        [(CONTENT_TYPE, file.mime.to_owned()), (CONTENT_DISPOSITION, file.content_disposition())],
        file.bytes,
    )
        .into_response())
}

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;
