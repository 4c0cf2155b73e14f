#![forbid(unsafe_code)]

//! `landgraph` builds architecture-landscape diagrams out of typed entities
//! on top of a generic element graph, and keeps them honest: extraction,
//! structural diffing, in-place replacement surgery, and reconciliation
//! against an external service catalog.
//!
//! # Features
//!
//! - `store`: enable the revision storage backends and catalog HTTP client
//!   (`landgraph::store`)

pub use landgraph_core::*;

#[cfg(feature = "store")]
pub mod store {
    pub use landgraph_store::envelope;
    pub use landgraph_store::{
        CatalogClient, Error, GitHubStore, GitLabStore, LocalStore, Result, RevisionEntry,
        RevisionStore,
    };
}
