use super::{ExtraBindings, fresh_id};
use crate::element::{BoundRef, Element, ElementKind};
use crate::geom::Placement;
use serde_json::json;

/// A free-floating remark; semi-transparent and locked so it reads as an
/// annotation rather than a diagram shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub text: Option<String>,
}

impl Comment {
    pub fn new(text: Option<&str>) -> Self {
        Self {
            id: fresh_id(),
            text: text.map(str::to_string),
        }
    }
}

pub(super) fn project(
    object: &Comment,
    placement: &Placement,
    bindings: &ExtraBindings,
) -> Vec<Element> {
    let origin = placement.origin_or(10.0, 10.0);
    let size = placement.size_or(150.0, 300.0);
    let text = object.text.clone().unwrap_or_default();
    let label_id = fresh_id();

    let mut bound = vec![BoundRef::text(label_id.clone())];
    bound.extend(bindings.bound.iter().cloned());

    let rect = Element::new(ElementKind::Rectangle, object.id.clone())
        .at(origin.x, origin.y)
        .sized(size.width, size.height)
        .with_opacity(50.0)
        .with_locked(true)
        .with_bound(bound)
        .with_tag(json!({ "type": "comment", "text": object.text }));

    let label = Element::new(ElementKind::Text, label_id)
        .at(origin.x + 10.0, origin.y + 10.0)
        .with_text(&text, 20.0, 1)
        .with_opacity(50.0)
        .with_locked(true)
        .with_container(Some(object.id.clone()));

    vec![rect, label]
}
