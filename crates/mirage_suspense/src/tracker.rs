//! Discovery path tracker.

use crate::FactStore;
use mirage_core::DiscoveryPath;
use mirage_error::{PathError, PathErrorKind};

/// Tracks every discovery path for one story.
///
/// Closure is idempotent and irreversible; the controller's termination
/// condition reads [`PathTracker::open_path_count`].
pub struct PathTracker {
    paths: Vec<DiscoveryPath>,
}

impl PathTracker {
    /// Creates a tracker over the scenario's initial paths.
    pub fn new(paths: Vec<DiscoveryPath>) -> Self {
        Self { paths }
    }

    /// All paths, open and closed, in registration order.
    pub fn paths(&self) -> &[DiscoveryPath] {
        &self.paths
    }

    /// Looks up a path by id.
    pub fn path(&self, path_id: &str) -> Option<&DiscoveryPath> {
        self.paths.iter().find(|p| p.id() == path_id)
    }

    /// Paths still open, in registration order.
    pub fn open_paths(&self) -> Vec<&DiscoveryPath> {
        self.paths.iter().filter(|p| p.is_open()).collect()
    }

    /// Number of paths still open.
    pub fn open_path_count(&self) -> usize {
        self.paths.iter().filter(|p| p.is_open()).count()
    }

    /// Paths whose evidence chain includes the given evidence.
    ///
    /// Used to determine blast radius when an action resolves evidence
    /// tied to more than one route.
    pub fn paths_touching(&self, evidence_id: &str) -> Vec<&DiscoveryPath> {
        self.paths.iter().filter(|p| p.touches(evidence_id)).collect()
    }

    /// Unresolved steps left along a path's evidence chain.
    pub fn remaining_steps(&self, path: &DiscoveryPath, store: &FactStore) -> u32 {
        path.evidence_chain()
            .iter()
            .map(|id| store.remaining_steps(id).unwrap_or(0))
            .sum()
    }

    /// Closes a path, recording what closed it.
    ///
    /// Idempotent: closing an already-closed path is a no-op, not an
    /// error. Closed paths never reopen.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPath` when the id is not registered.
    #[tracing::instrument(skip(self))]
    pub fn close_path(&mut self, path_id: &str, closed_by: &str) -> Result<(), PathError> {
        let path = self
            .paths
            .iter_mut()
            .find(|p| p.id() == path_id)
            .ok_or_else(|| PathError::new(PathErrorKind::UnknownPath(path_id.to_string())))?;

        if path.is_open() {
            path.close(closed_by);
            tracing::info!(path = path_id, closed_by, "Discovery path closed");
        }
        Ok(())
    }

    /// Registers a fresh path mid-story (a new minor lead emerging).
    pub fn open_new_path(&mut self, path: DiscoveryPath) {
        tracing::debug!(path = %path.id(), "New discovery path opened");
        self.paths.push(path);
    }
}
