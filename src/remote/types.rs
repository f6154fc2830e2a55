//! Remote types: service-neutral results, errors and the collaborator trait.

use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;
use crate::diagram::DiagramKind;
use crate::session::SessionContext;

// =============================================================================
// ERROR
// =============================================================================

/// Failures of the generation, render, storage and history collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// No base URL was configured; every remote call fails.
    #[error("diagram service is not configured")]
    NotConfigured,

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The request never produced a response (connect, timeout, body read).
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("{message} (status {status})")]
    Status { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("invalid response format: {0}")]
    Parse(String),

    /// The service answered 2xx but reported `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for RemoteError {
    fn error_code(&self) -> &'static str {
        "E_REMOTE_CALL"
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// A generation result: the raw diagram object plus the rendering that came
/// with it. The payload is decoded against the session's schema later.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDiagram {
    pub payload: serde_json::Value,
    pub artifact: Option<Artifact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistReceipt {
    #[serde(alias = "s3_url")]
    pub stored_location: String,
}

/// One saved diagram. Reads the storage service's field names, writes
/// the editor API's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    #[serde(alias = "diagram_id")]
    pub id: String,
    #[serde(alias = "diagram_type")]
    pub kind: String,
    #[serde(alias = "created_at")]
    pub created_at: String,
    #[serde(alias = "link", default)]
    pub view_link: Option<String>,
    #[serde(alias = "s3_link", default)]
    pub storage_link: Option<String>,
}

// =============================================================================
// SERVICE TRAIT
// =============================================================================

/// External collaborators behind one seam. Enables mocking in tests.
#[async_trait::async_trait]
pub trait DiagramService: Send + Sync {
    /// Turn a natural-language prompt into a diagram plus its rendering.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the call fails or the response lacks
    /// either element collection.
    async fn generate(&self, ctx: &SessionContext, kind: DiagramKind, prompt: &str)
    -> Result<GeneratedDiagram, RemoteError>;

    /// Render a document payload to an artifact.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the call fails or no artifact comes back.
    async fn render(
        &self,
        ctx: &SessionContext,
        kind: DiagramKind,
        document: &serde_json::Value,
    ) -> Result<Artifact, RemoteError>;

    /// Store a rendered artifact.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the upload is rejected.
    async fn persist(
        &self,
        ctx: &SessionContext,
        kind: DiagramKind,
        artifact: &Artifact,
    ) -> Result<PersistReceipt, RemoteError>;

    /// List previously stored diagrams, optionally filtered by kind.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the call fails or reports `success: false`.
    async fn history(&self, ctx: &SessionContext, kind: Option<DiagramKind>)
    -> Result<Vec<HistoryItem>, RemoteError>;
}

/// Stand-in used when no service URL is configured. Manual editing and
/// export keep working; every remote call fails fast.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredService;

#[async_trait::async_trait]
impl DiagramService for UnconfiguredService {
    async fn generate(&self, _: &SessionContext, _: DiagramKind, _: &str) -> Result<GeneratedDiagram, RemoteError> {
        Err(RemoteError::NotConfigured)
    }

    async fn render(&self, _: &SessionContext, _: DiagramKind, _: &serde_json::Value) -> Result<Artifact, RemoteError> {
        Err(RemoteError::NotConfigured)
    }

    async fn persist(&self, _: &SessionContext, _: DiagramKind, _: &Artifact) -> Result<PersistReceipt, RemoteError> {
        Err(RemoteError::NotConfigured)
    }

    async fn history(&self, _: &SessionContext, _: Option<DiagramKind>) -> Result<Vec<HistoryItem>, RemoteError> {
        Err(RemoteError::NotConfigured)
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
