//! The revision backend abstraction.
//!
//! A revision is a named scene snapshot owned by a backend; the content on
//! the wire is the SVG envelope from [`crate::envelope`]. Backends that
//! support optimistic updates carry a version token per entry.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionEntry {
    pub path: String,
    /// Backend-specific version token (a content hash for GitHub-style
    /// backends); `None` for backends without one.
    pub version: Option<String>,
}

/// Async revision storage. Implementations make no assumption about the
/// executor; callers await operations sequentially.
pub trait RevisionStore {
    fn list_files(&self, branch: &str) -> impl Future<Output = Result<Vec<RevisionEntry>>>;

    fn get_content(&self, path: &str, branch: &str) -> impl Future<Output = Result<Vec<u8>>>;

    /// Creates or updates a revision. `version` is the token of the revision
    /// being replaced, `None` when creating. Returns the new token for
    /// backends that issue one.
    fn put_content(
        &self,
        path: &str,
        branch: &str,
        content: &[u8],
        message: &str,
        version: Option<&str>,
    ) -> impl Future<Output = Result<Option<String>>>;

    fn delete_content(
        &self,
        path: &str,
        branch: &str,
        message: &str,
        version: Option<&str>,
    ) -> impl Future<Output = Result<()>>;

    fn list_branches(&self) -> impl Future<Output = Result<Vec<String>>>;
}

/// Destination paths are validated locally before any I/O.
pub(crate) fn require_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(Error::EmptyPath);
    }
    Ok(())
}
