use super::{ExtraBindings, fresh_id};
use crate::element::{Element, ElementKind, StrokeStyle};
use crate::geom::Placement;
use serde_json::json;

/// A bounded-context frame; everything visually inside it belongs to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub id: String,
    pub name: String,
}

impl Domain {
    pub fn new(name: Option<&str>) -> Self {
        let id = fresh_id();
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("Domain {id}"),
        };
        Self { id, name }
    }
}

pub(super) fn project(
    object: &Domain,
    placement: &Placement,
    bindings: &ExtraBindings,
) -> Vec<Element> {
    let origin = placement.origin_or(10.0, 10.0);
    let size = placement.size_or(500.0, 200.0);

    // The frame id is the domain name: contained elements point at their
    // domain through `frame_id` by name.
    vec![
        Element::new(ElementKind::Frame, object.name.clone())
            .at(origin.x, origin.y)
            .sized(size.width, size.height)
            .with_stroke("#bbb", 2.0, StrokeStyle::Solid)
            .with_bound(bindings.bound.clone())
            .with_tag(json!({ "type": "domain", "name": object.name })),
    ]
}
