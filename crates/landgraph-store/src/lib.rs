#![forbid(unsafe_code)]

//! Storage backends and external collaborators for landgraph scenes:
//! revision stores (GitHub-style, GitLab-style, local), the SVG envelope
//! revisions are persisted as, and the service-catalog HTTP client.

pub mod envelope;
pub mod error;
pub mod github;
pub mod gitlab;
pub mod local;
pub mod proto;
pub mod revision;
mod util;

pub use error::{Error, Result};
pub use github::GitHubStore;
pub use gitlab::GitLabStore;
pub use local::LocalStore;
pub use proto::CatalogClient;
pub use revision::{RevisionEntry, RevisionStore};
