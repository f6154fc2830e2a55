//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the diagram service and a map of open editor sessions. Each session
//! sits behind its own async mutex so edits to one editor never wait on
//! another; handlers drop the session lock across remote calls.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::diagram::DiagramKind;
use crate::remote::DiagramService;
use crate::session::{DynSession, SessionContext, open_session};

pub type SharedSession = Arc<Mutex<Box<dyn DynSession>>>;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
    pub service: Arc<dyn DiagramService>,
}

impl AppState {
    #[must_use]
    pub fn new(service: Arc<dyn DiagramService>) -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())), service }
    }

    /// Open a seeded editor session and return its id.
    pub async fn open(&self, kind: DiagramKind, context: SessionContext) -> Uuid {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(open_session(kind, context)));
        self.sessions.write().await.insert(id, session);
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Discard a session. Returns `false` if it did not exist.
    pub async fn close(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    use super::*;
    use crate::artifact::Artifact;
    use crate::remote::{GeneratedDiagram, HistoryItem, PersistReceipt, RemoteError};

    /// Scripted diagram service. Queued results are returned in order; an
    /// empty queue falls back to a canned success (or an error for generate).
    #[derive(Default)]
    pub struct MockService {
        pub generated: StdMutex<VecDeque<Result<GeneratedDiagram, RemoteError>>>,
        pub renders: StdMutex<VecDeque<Result<Artifact, RemoteError>>>,
        pub persists: StdMutex<VecDeque<Result<PersistReceipt, RemoteError>>>,
        pub render_payloads: StdMutex<Vec<serde_json::Value>>,
        pub persisted: StdMutex<Vec<Artifact>>,
    }

    impl MockService {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        pub fn queue_generate(&self, result: Result<GeneratedDiagram, RemoteError>) {
            self.generated.lock().unwrap().push_back(result);
        }

        pub fn queue_render(&self, result: Result<Artifact, RemoteError>) {
            self.renders.lock().unwrap().push_back(result);
        }

        pub fn queue_persist(&self, result: Result<PersistReceipt, RemoteError>) {
            self.persists.lock().unwrap().push_back(result);
        }

        #[must_use]
        pub fn render_calls(&self) -> usize {
            self.render_payloads.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl DiagramService for MockService {
        async fn generate(
            &self,
            _ctx: &SessionContext,
            _kind: DiagramKind,
            _prompt: &str,
        ) -> Result<GeneratedDiagram, RemoteError> {
            self.generated
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(RemoteError::Request("no generation queued".into())))
        }

        async fn render(
            &self,
            _ctx: &SessionContext,
            _kind: DiagramKind,
            document: &serde_json::Value,
        ) -> Result<Artifact, RemoteError> {
            self.render_payloads.lock().unwrap().push(document.clone());
            self.renders
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Artifact::new("<svg>rendered</svg>")))
        }

        async fn persist(
            &self,
            _ctx: &SessionContext,
            _kind: DiagramKind,
            artifact: &Artifact,
        ) -> Result<PersistReceipt, RemoteError> {
            self.persisted.lock().unwrap().push(artifact.clone());
            self.persists
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(PersistReceipt { stored_location: "s3://diagrams/saved.svg".into() }))
        }

        async fn history(
            &self,
            ctx: &SessionContext,
            kind: Option<DiagramKind>,
        ) -> Result<Vec<HistoryItem>, RemoteError> {
            Ok(vec![HistoryItem {
                id: format!("{}-1", ctx.user_email),
                kind: kind.map_or("flowchart", DiagramKind::as_str).into(),
                created_at: "2024-01-01T00:00:00Z".into(),
                view_link: None,
                storage_link: Some("s3://diagrams/1.svg".into()),
            }])
        }
    }

    /// `AppState` backed by a fresh [`MockService`].
    #[must_use]
    pub fn test_app_state() -> (AppState, Arc<MockService>) {
        let mock = Arc::new(MockService::new());
        (AppState::new(mock.clone()), mock)
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
