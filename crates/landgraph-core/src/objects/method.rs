use super::{ExtraBindings, fresh_id};
use crate::element::{Element, ElementKind, StrokeStyle};
use crate::geom::Placement;
use serde_json::json;

/// A single operation inside a service; a smaller captioned box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub id: String,
    pub name: String,
    pub domain: Option<String>,
}

impl Method {
    pub fn new(name: Option<&str>, domain: Option<String>) -> Self {
        let id = fresh_id();
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("Method {id}"),
        };
        Self { id, name, domain }
    }
}

pub(super) fn project(
    object: &Method,
    placement: &Placement,
    bindings: &ExtraBindings,
) -> Vec<Element> {
    let origin = placement.origin_or(10.0, 10.0);
    let size = placement.size_or(200.0, 100.0);
    let group_id = fresh_id();

    let label = Element::new(ElementKind::Text, fresh_id())
        .at(origin.x + 120.0, origin.y + 35.0)
        .sized(size.width, size.height)
        .with_text(&object.name, 20.0, 3)
        .with_stroke("#1e1e1e", 2.0, StrokeStyle::Solid)
        .with_groups(vec![group_id.clone()])
        .with_frame(object.domain.clone());

    let rect = Element::new(ElementKind::Rectangle, object.id.clone())
        .at(origin.x, origin.y)
        .sized(size.width, size.height)
        .with_groups(vec![group_id.clone()])
        .with_frame(object.domain.clone())
        .with_bound(bindings.bound.clone())
        .with_tag(json!({ "type": "method", "caption": object.name, "groupId": group_id }));

    vec![label, rect]
}
