//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One axum router hosts any number of independent editor sessions under
//! `/api/sessions`. Sessions are keyed by UUID and never share documents.

pub mod sessions;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/sessions", post(sessions::create_session))
        .route("/api/sessions/{id}", get(sessions::get_session).delete(sessions::delete_session))
        .route("/api/sessions/{id}/nodes", post(sessions::add_node))
        .route(
            "/api/sessions/{id}/nodes/{node_id}",
            patch(sessions::update_node).delete(sessions::remove_node),
        )
        .route("/api/sessions/{id}/links", post(sessions::add_link))
        .route("/api/sessions/{id}/links/{link_id}", delete(sessions::remove_link))
        .route("/api/sessions/{id}/surface", put(sessions::switch_surface))
        .route("/api/sessions/{id}/generate", post(sessions::generate))
        .route("/api/sessions/{id}/preview", post(sessions::refresh_preview))
        .route("/api/sessions/{id}/save", post(sessions::save))
        .route("/api/sessions/{id}/export", get(sessions::export))
        .route("/api/sessions/{id}/history", get(sessions::history))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
