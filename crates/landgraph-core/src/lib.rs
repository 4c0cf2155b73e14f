#![forbid(unsafe_code)]

//! Landscape object graph and reconciliation engine (headless).
//!
//! Typed architecture-diagram entities (domains, services, proto-service
//! stubs, comments, notes, calls, methods) projected onto a generic element
//! graph, and back:
//! - [`objects`] projects a typed object into drawable elements,
//! - [`extract()`] recovers typed objects from tagged elements,
//! - [`diff()`] compares two element sets structurally,
//! - [`replace()`] swaps one element for a typed object while rewiring every
//!   reference to it,
//! - [`formalize()`] reconciles a scene against the external service catalog.
//!
//! All engine operations are pure value transformations: they take a scene
//! and return a new one, never touching the input.

pub mod catalog;
pub mod diff;
pub mod element;
pub mod error;
pub mod extract;
pub mod formalize;
pub mod geom;
pub mod objects;
pub mod replace;
pub mod scene;

pub use catalog::{Catalog, CatalogService};
pub use diff::{DiffResult, annotate, diff, identical};
pub use element::{Binding, BoundKind, BoundRef, Element, ElementKind, StrokeStyle};
pub use error::{Error, Result};
pub use extract::{Extracted, Recovered, Tag, extract};
pub use formalize::{Formalized, LintReport, format, formalize, lint};
pub use geom::{Placement, Point, Rect, Size};
pub use objects::{
    Call, Comment, Domain, ExtraBindings, LandscapeObject, Method, Note, ProtoService, Service,
};
pub use replace::replace;
pub use scene::{Scene, ViewState};
