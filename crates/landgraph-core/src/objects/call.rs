use super::{ExtraBindings, fresh_id};
use crate::element::{BoundRef, Element, ElementKind, StrokeStyle};
use crate::geom::Placement;
use serde_json::json;

/// An arrow-style relation between two other entities, with a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub id: String,
    pub text: Option<String>,
    pub domain: Option<String>,
}

impl Call {
    pub fn new(text: Option<&str>, domain: Option<String>) -> Self {
        Self {
            id: fresh_id(),
            text: text.map(str::to_string),
            domain,
        }
    }
}

pub(super) fn project(
    object: &Call,
    placement: &Placement,
    bindings: &ExtraBindings,
) -> Vec<Element> {
    let origin = placement.origin_or(10.0, 10.0);
    let size = placement.size_or(300.0, 150.0);
    let text = object.text.clone().unwrap_or_default();
    let label_id = fresh_id();

    let label = Element::new(ElementKind::Text, label_id.clone())
        .at(origin.x + 10.0, origin.y)
        .sized(150.0, 25.0)
        .with_text(&text, 20.0, 1)
        .with_frame(object.domain.clone())
        .with_container(Some(object.id.clone()));

    let mut bound = vec![BoundRef::text(label_id)];
    bound.extend(bindings.bound.iter().cloned());

    let arrow = Element::new(ElementKind::Arrow, object.id.clone())
        .at(origin.x, origin.y)
        .sized(size.width, size.height)
        .with_stroke("#1e1e1e", 2.0, StrokeStyle::Solid)
        .with_frame(object.domain.clone())
        .with_bound(bound)
        .with_endpoints(
            bindings.start.clone(),
            bindings.end.clone(),
            bindings.points.clone(),
        )
        .with_tag(json!({ "type": "call", "text": object.text }));

    vec![label, arrow]
}
