use super::{ExtraBindings, fresh_id};
use crate::element::{BoundRef, Element, ElementKind, StrokeStyle};
use crate::geom::Placement;
use serde_json::json;

/// A dashed, low-opacity annotation block with its own label element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    pub text: Option<String>,
    pub domain: Option<String>,
}

impl Note {
    pub fn new(text: Option<&str>, domain: Option<String>) -> Self {
        Self {
            id: fresh_id(),
            text: text.map(str::to_string),
            domain,
        }
    }
}

pub(super) fn project(
    object: &Note,
    placement: &Placement,
    bindings: &ExtraBindings,
) -> Vec<Element> {
    let origin = placement.origin_or(10.0, 10.0);
    let size = placement.size_or(400.0, 300.0);
    let text = object.text.clone().unwrap_or_default();
    let label_id = fresh_id();

    let mut bound = vec![BoundRef::text(label_id.clone())];
    bound.extend(bindings.bound.iter().cloned());

    let rect = Element::new(ElementKind::Rectangle, object.id.clone())
        .at(origin.x, origin.y)
        .sized(size.width, size.height)
        .with_stroke("#1e1e1e", 2.0, StrokeStyle::Dashed)
        .with_opacity(60.0)
        .with_frame(object.domain.clone())
        .with_bound(bound)
        .with_tag(json!({ "type": "note", "text": object.text, "groupId": fresh_id() }));

    let label = Element::new(ElementKind::Text, label_id)
        .at(origin.x + 10.0, origin.y + 10.0)
        .with_text(&text, 20.0, 2)
        .with_stroke("#1e1e1e", 2.0, StrokeStyle::Dashed)
        .with_opacity(60.0)
        .with_frame(object.domain.clone())
        .with_container(Some(object.id.clone()));

    vec![rect, label]
}
