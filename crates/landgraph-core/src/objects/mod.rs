//! The typed object catalog: the seven landscape entities and their
//! canonical projections onto generic scene elements.
//!
//! A landscape object has no existence independent of its projection; it is
//! reconstructed on demand from tagged elements (see [`crate::extract()`]).
//! Object identity and element identity are deliberately independent: a
//! replacement creates a new element id for the same logical position.

mod call;
mod comment;
mod domain;
mod method;
mod note;
mod service;

pub use call::Call;
pub use comment::Comment;
pub use domain::Domain;
pub use method::Method;
pub use note::Note;
pub use service::{ProtoService, Service};

use crate::element::{Binding, BoundRef, Element};
use crate::geom::Placement;

pub(crate) fn fresh_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Pre-existing attachments a caller wants carried onto a freshly projected
/// container: arrow-kind bound refs, and — when the projected object stands
/// in for a relation arrow — its endpoint refs and point list.
#[derive(Debug, Clone, Default)]
pub struct ExtraBindings {
    pub bound: Vec<BoundRef>,
    pub start: Option<Binding>,
    pub end: Option<Binding>,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LandscapeObject {
    Domain(Domain),
    Service(Service),
    ProtoService(ProtoService),
    Comment(Comment),
    Note(Note),
    Call(Call),
    Method(Method),
}

impl LandscapeObject {
    pub fn id(&self) -> &str {
        match self {
            LandscapeObject::Domain(o) => &o.id,
            LandscapeObject::Service(o) => &o.id,
            LandscapeObject::ProtoService(o) => &o.id,
            LandscapeObject::Comment(o) => &o.id,
            LandscapeObject::Note(o) => &o.id,
            LandscapeObject::Call(o) => &o.id,
            LandscapeObject::Method(o) => &o.id,
        }
    }

    /// The id the projected container element carries. A domain projects its
    /// frame under the domain *name* (services reference their domain frame
    /// by name); every other variant projects under the object id.
    pub fn anchor_id(&self) -> &str {
        match self {
            LandscapeObject::Domain(o) => &o.name,
            other => other.id(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            LandscapeObject::Domain(_) => "domain",
            LandscapeObject::Service(_) => "service",
            LandscapeObject::ProtoService(_) => "proto_service",
            LandscapeObject::Comment(_) => "comment",
            LandscapeObject::Note(_) => "note",
            LandscapeObject::Call(_) => "call",
            LandscapeObject::Method(_) => "method",
        }
    }

    /// Projects this object into freshly allocated scene elements at the
    /// given placement. Never mutates its inputs.
    pub fn project(&self, placement: &Placement, bindings: &ExtraBindings) -> Vec<Element> {
        match self {
            LandscapeObject::Domain(o) => domain::project(o, placement, bindings),
            LandscapeObject::Service(o) => service::project_service(o, placement, bindings),
            LandscapeObject::ProtoService(o) => service::project_proto(o, placement, bindings),
            LandscapeObject::Comment(o) => comment::project(o, placement, bindings),
            LandscapeObject::Note(o) => note::project(o, placement, bindings),
            LandscapeObject::Call(o) => call::project(o, placement, bindings),
            LandscapeObject::Method(o) => method::project(o, placement, bindings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::geom::Placement;

    #[test]
    fn projection_is_reproducible_without_explicit_placement() {
        let service = Service::new(Some("payments"), Some("billing.core".to_string()));
        let first = LandscapeObject::Service(service.clone())
            .project(&Placement::default(), &ExtraBindings::default());
        let second = LandscapeObject::Service(service)
            .project(&Placement::default(), &ExtraBindings::default());

        let rect_a = first.iter().find(|e| e.kind == ElementKind::Rectangle).unwrap();
        let rect_b = second.iter().find(|e| e.kind == ElementKind::Rectangle).unwrap();
        assert_eq!((rect_a.x, rect_a.y), (10.0, 10.0));
        assert_eq!((rect_a.x, rect_a.y, rect_a.width, rect_a.height), (
            rect_b.x, rect_b.y, rect_b.width, rect_b.height
        ));
    }

    #[test]
    fn anchor_id_is_the_name_for_domains_only() {
        let domain = Domain::new(Some("billing.core"));
        let object = LandscapeObject::Domain(domain);
        assert_eq!(object.anchor_id(), "billing.core");

        let method = Method::new(Some("Charge"), None);
        let id = method.id.clone();
        assert_eq!(LandscapeObject::Method(method).anchor_id(), id);
    }

    #[test]
    fn extra_bindings_land_on_the_container() {
        let bindings = ExtraBindings {
            bound: vec![BoundRef::arrow("incoming")],
            ..ExtraBindings::default()
        };
        let service = Service::new(Some("payments"), None);
        let elements =
            LandscapeObject::Service(service).project(&Placement::default(), &bindings);
        let rect = elements
            .iter()
            .find(|e| e.kind == ElementKind::Rectangle)
            .unwrap();
        assert!(rect.bound_elements.iter().any(|b| b.id == "incoming"));
    }
}
