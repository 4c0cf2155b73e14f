use super::{ExtraBindings, fresh_id};
use crate::element::{Element, ElementKind, StrokeStyle};
use crate::geom::{Placement, Point};
use serde_json::json;

/// A service the user has drawn and named by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub id: String,
    pub name: String,
    /// Parent domain name, if the service sits inside a domain frame.
    pub domain: Option<String>,
}

impl Service {
    pub fn new(name: Option<&str>, domain: Option<String>) -> Self {
        let id = fresh_id();
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("Service {id}"),
        };
        Self { id, name, domain }
    }
}

/// A service stub mirroring a catalog entry; visually a service box with a
/// four-part glyph marking it as catalog-backed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoService {
    pub id: String,
    pub name: String,
    pub domain: Option<String>,
}

impl ProtoService {
    pub fn new(name: Option<&str>, domain: Option<String>) -> Self {
        let id = fresh_id();
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("Proto {id}"),
        };
        Self { id, name, domain }
    }
}

pub(super) fn project_service(
    object: &Service,
    placement: &Placement,
    bindings: &ExtraBindings,
) -> Vec<Element> {
    boxed_with_label(
        &object.id,
        &object.name,
        object.domain.clone(),
        placement,
        bindings,
        json!({ "type": "service", "caption": object.name, "groupId": fresh_id() }),
    )
}

pub(super) fn project_proto(
    object: &ProtoService,
    placement: &Placement,
    bindings: &ExtraBindings,
) -> Vec<Element> {
    let group_id = fresh_id();
    let origin = placement.origin_or(10.0, 10.0);
    // Glyphs, label and rect all share the proto's group id; the glyphs each
    // carry a second, glyph-local group on top.
    let mut elements = glyph_elements(&group_id, origin, object.domain.clone());
    elements.extend(boxed_with_label(
        &object.id,
        &object.name,
        object.domain.clone(),
        placement,
        bindings,
        json!({ "type": "proto_service", "caption": object.name, "groupId": group_id }),
    ));
    elements
}

/// Container rectangle + centered label text joined by one shared group id.
/// The tag (and therefore the group id recorded in it) sits on the rectangle.
fn boxed_with_label(
    id: &str,
    caption: &str,
    domain: Option<String>,
    placement: &Placement,
    bindings: &ExtraBindings,
    tag: serde_json::Value,
) -> Vec<Element> {
    let origin = placement.origin_or(10.0, 10.0);
    let size = placement.size_or(300.0, 150.0);
    let group_id = tag["groupId"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(fresh_id);

    let label = Element::new(ElementKind::Text, fresh_id())
        .at(origin.x + 120.0, origin.y + 35.0)
        .sized(size.width, size.height)
        .with_text(caption, 20.0, 3)
        .with_stroke("#1e1e1e", 2.0, StrokeStyle::Solid)
        .with_groups(vec![group_id.clone()])
        .with_frame(domain.clone());

    let rect = Element::new(ElementKind::Rectangle, id)
        .at(origin.x, origin.y)
        .sized(size.width, size.height)
        .with_groups(vec![group_id])
        .with_frame(domain)
        .with_bound(bindings.bound.clone())
        .with_tag(tag);

    vec![label, rect]
}

/// The four-part catalog glyph in the proto box corner. Point tables are
/// verbatim from the hand-drawn original.
fn glyph_elements(group_id: &str, origin: Point, domain: Option<String>) -> Vec<Element> {
    let parts: [(&str, f64, f64, f64, f64, &[[f64; 2]]); 4] = [
        (
            "#db4437",
            9.0,
            6.0,
            8.392662423353515,
            7.1295536681477945,
            &[
                [0.0, 0.0],
                [5.9787196287137085, 0.0],
                [0.5613832156213272, 7.1295536681477945],
                [-2.413942794639805, 3.143740225421502],
                [0.0, 0.0],
            ],
        ),
        (
            "#0f9d58",
            19.0,
            6.0,
            11.255711576340085,
            11.087297361179717,
            &[
                [0.0, 0.0],
                [8.336523994716236, 11.087297361179717],
                [11.255711576340085, 7.045345489816145],
                [6.006789378408086, 0.028068678942906336],
                [0.0, 0.0],
            ],
        ),
        (
            "#4285f4",
            7.0,
            9.0,
            11.311850004977368,
            10.946951824962253,
            &[
                [0.0, 0.0],
                [-2.8069107243492946, 3.7612607989286384],
                [2.526219651914362, 10.946951824962253],
                [8.504939280628072, 10.778539751304816],
                [0.0, 0.0],
            ],
        ),
        (
            "#ffc107",
            19.0,
            20.0,
            8.308455315773331,
            7.0734130980075856,
            &[
                [0.0, 0.0],
                [5.192784840046201, -7.045344419064679],
                [8.308455315773331, -2.8911156904265445],
                [5.922581200076428, 0.028068678942906333],
                [0.0, 0.0],
            ],
        ),
    ];

    parts
        .iter()
        .map(|(fill, dx, dy, width, height, points)| {
            Element::new(ElementKind::Line, fresh_id())
                .at(origin.x + dx, origin.y + dy)
                .sized(*width, *height)
                .with_background(fill)
                .with_groups(vec![group_id.to_string(), fresh_id()])
                .with_frame(domain.clone())
                .with_endpoints(None, None, points.to_vec())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::BoundRef;

    #[test]
    fn service_projects_grouped_rect_and_label() {
        let service = Service::new(Some("payments"), Some("billing.core".to_string()));
        let elements = project_service(
            &service,
            &Placement::at(100.0, 40.0),
            &ExtraBindings::default(),
        );

        assert_eq!(elements.len(), 2);
        let label = &elements[0];
        let rect = &elements[1];
        assert_eq!(label.kind, ElementKind::Text);
        assert_eq!(label.text.as_deref(), Some("payments"));
        assert_eq!((label.x, label.y), (220.0, 75.0));
        assert_eq!(rect.id, service.id);
        assert_eq!(rect.frame_id.as_deref(), Some("billing.core"));
        assert_eq!(label.group_ids, rect.group_ids);
        let tag = rect.tag.as_ref().unwrap();
        assert_eq!(tag["type"], "service");
        assert_eq!(tag["caption"], "payments");
        assert_eq!(tag["groupId"].as_str(), rect.group_ids.first().map(|s| s.as_str()));
    }

    #[test]
    fn proto_service_adds_four_glyphs_in_the_same_group() {
        let proto = ProtoService::new(Some("InvoiceService"), None);
        let elements = project_proto(&proto, &Placement::default(), &ExtraBindings::default());

        assert_eq!(elements.len(), 6);
        let glyphs: Vec<_> = elements
            .iter()
            .filter(|e| e.kind == ElementKind::Line)
            .collect();
        assert_eq!(glyphs.len(), 4);
        let rect = elements
            .iter()
            .find(|e| e.kind == ElementKind::Rectangle)
            .unwrap();
        let group = rect.group_ids.first().unwrap();
        assert!(glyphs.iter().all(|g| g.group_ids.contains(group)));
        assert_eq!(rect.tag.as_ref().unwrap()["type"], "proto_service");
    }

    #[test]
    fn carried_bindings_attach_to_the_rect_only() {
        let service = Service::new(Some("payments"), None);
        let bindings = ExtraBindings {
            bound: vec![BoundRef::arrow("a1"), BoundRef::arrow("a2")],
            ..ExtraBindings::default()
        };
        let elements = project_service(&service, &Placement::default(), &bindings);
        let rect = &elements[1];
        assert_eq!(rect.bound_elements.len(), 2);
        assert!(elements[0].bound_elements.is_empty());
    }
}
