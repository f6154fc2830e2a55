//! Artifact sync: one cached render plus a staleness flag.
//!
//! DESIGN
//! ======
//! A refresh is split in two so the owner can release its lock while the
//! render call is outstanding:
//!
//! 1. `begin_refresh(revision)` either hands out a [`RefreshTicket`] pinned to
//!    the document revision being rendered, or, if a render is already in
//!    flight, returns the cached artifact so the caller observes the previous
//!    result.
//! 2. `complete(ticket, result, current_revision)` stores the outcome. An
//!    artifact rendered from an older revision than the one now committed is
//!    cached but stays stale (last committed wins). An artifact older than
//!    what is already cached (a generation landed meanwhile) is discarded.
//!
//! A failed refresh keeps the previous artifact and leaves the cache stale so
//! a retry is always possible.

use serde::Serialize;
use tracing::{debug, warn};

use super::Artifact;

/// Proof that a render was dispatched for `revision`.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct RefreshTicket {
    revision: u64,
}

impl RefreshTicket {
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum RefreshStart {
    /// Caller should render and then call [`ArtifactSync::complete`].
    Dispatch(RefreshTicket),
    /// Another refresh is outstanding; here is the previous artifact.
    Pending(Option<Artifact>),
}

/// Read-only view for snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactStatus {
    pub present: bool,
    pub stale: bool,
    pub refreshing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSync {
    cached: Option<Artifact>,
    /// Document revision the cached artifact was produced from.
    cached_revision: Option<u64>,
    stale: bool,
    in_flight: Option<u64>,
}

impl Default for ArtifactSync {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactSync {
    /// Nothing cached yet, so the (absent) artifact is stale.
    #[must_use]
    pub fn new() -> Self {
        Self { cached: None, cached_revision: None, stale: true, in_flight: None }
    }

    #[must_use]
    pub fn cached(&self) -> Option<&Artifact> {
        self.cached.as_ref()
    }

    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn status(&self) -> ArtifactStatus {
        ArtifactStatus { present: self.cached.is_some(), stale: self.stale, refreshing: self.is_refreshing() }
    }

    /// Mark the cache as no longer matching the document.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Replace the cache with an artifact known to match `revision`, as when a
    /// generation result arrives with its own rendering.
    pub fn overwrite(&mut self, artifact: Artifact, revision: u64) {
        self.cached = Some(artifact);
        self.cached_revision = Some(revision);
        self.stale = false;
    }

    pub fn begin_refresh(&mut self, revision: u64) -> RefreshStart {
        if let Some(pending) = self.in_flight {
            debug!(pending, revision, "refresh already in flight; serving cached artifact");
            return RefreshStart::Pending(self.cached.clone());
        }
        self.in_flight = Some(revision);
        RefreshStart::Dispatch(RefreshTicket { revision })
    }

    /// Record the outcome of a dispatched render.
    ///
    /// # Errors
    ///
    /// Passes a render failure through unchanged after marking the cache stale.
    pub fn complete<E>(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Artifact, E>,
        current_revision: u64,
    ) -> Result<Artifact, E> {
        if self.in_flight == Some(ticket.revision) {
            self.in_flight = None;
        }

        let artifact = match result {
            Ok(artifact) => artifact,
            Err(err) => {
                self.stale = true;
                return Err(err);
            }
        };

        if self.cached_revision.is_some_and(|cached| cached > ticket.revision) {
            warn!(
                rendered = ticket.revision,
                cached = ?self.cached_revision,
                "discarding render older than cached artifact"
            );
            return Ok(self.cached.clone().unwrap_or(artifact));
        }

        self.cached = Some(artifact.clone());
        self.cached_revision = Some(ticket.revision);
        self.stale = ticket.revision != current_revision;
        if self.stale {
            debug!(rendered = ticket.revision, current_revision, "render arrived stale");
        }
        Ok(artifact)
    }
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
