//! Rendered artifacts and the bookkeeping around them.
//!
//! An artifact is the SVG text produced by the rendering or generation
//! service. The core never interprets it: it is cached, marked stale,
//! exported byte-for-byte and base64-encoded for persistence.

pub mod export;
pub mod sync;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

pub use export::{ExportError, ExportedFile, SVG_MIME, export_artifact};
pub use sync::{ArtifactStatus, ArtifactSync, RefreshStart, RefreshTicket};

/// Opaque rendered image (SVG markup).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Artifact(String);

impl Artifact {
    pub fn new(svg: impl Into<String>) -> Self {
        Self(svg.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Standard base64 of the raw bytes, as the storage service expects.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.as_bytes())
    }
}

impl From<String> for Artifact {
    fn from(svg: String) -> Self {
        Self(svg)
    }
}
