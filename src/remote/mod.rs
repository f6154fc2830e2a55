//! Remote: the boundary to generation, rendering, storage and history.
//!
//! DESIGN
//! ======
//! The editor core treats every collaborator as an opaque async call behind
//! [`DiagramService`]. The HTTP implementation owns transport concerns
//! (timeouts, bearer auth, status mapping); the core enforces none of them
//! and never retries. When no base URL is configured the process still
//! starts with [`UnconfiguredService`], so manual editing and export work
//! offline.

pub mod config;
pub mod http;
pub mod types;

use std::sync::Arc;

use tracing::{info, warn};

pub use config::RemoteConfig;
pub use http::HttpDiagramService;
pub use types::{DiagramService, GeneratedDiagram, HistoryItem, PersistReceipt, RemoteError, UnconfiguredService};

/// Pick the diagram service from environment variables.
///
/// Falls back to [`UnconfiguredService`] when the base URL is missing or
/// invalid, or when the HTTP client cannot be built.
#[must_use]
pub fn service_from_env() -> Arc<dyn DiagramService> {
    match RemoteConfig::from_env().and_then(|config| {
        let base_url = config.base_url.clone();
        HttpDiagramService::new(config).map(|service| (base_url, service))
    }) {
        Ok((base_url, service)) => {
            info!(%base_url, "diagram service configured");
            Arc::new(service)
        }
        Err(RemoteError::NotConfigured) => {
            warn!("DIAGRAM_API_BASE_URL not set; generation, preview and save are disabled");
            Arc::new(UnconfiguredService)
        }
        Err(e) => {
            warn!(error = %e, "diagram service unavailable; generation, preview and save are disabled");
            Arc::new(UnconfiguredService)
        }
    }
}
