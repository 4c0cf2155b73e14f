//! Graph surgery: swap one element for a typed object projection while
//! preserving every arrow, label, and attachment that pointed at it.

use std::collections::HashSet;

use tracing::debug;

use crate::element::{BoundKind, Element};
use crate::error::{Error, Result};
use crate::geom::Placement;
use crate::objects::{ExtraBindings, LandscapeObject};
use crate::scene::Scene;

/// Replaces the element identified by `origin_id` with a fresh projection of
/// `new_object` at the origin's geometry, rewiring every reference to the
/// origin onto the new object's container element. An absent origin id is a
/// no-op (the caller's add-new path handles empty selections).
///
/// The committed scene is rebuilt whole: either the full rewrite lands or the
/// input scene comes back untouched.
pub fn replace(scene: &Scene, origin_id: &str, new_object: &LandscapeObject) -> Result<Scene> {
    let Some(origin) = scene.get(origin_id) else {
        return Ok(scene.clone());
    };
    let origin = origin.clone();

    let incoming_arrow_ids: HashSet<&str> = origin.bound_arrow_ids().collect();
    let incoming_arrows: Vec<&Element> = scene
        .elements
        .iter()
        .filter(|el| el.kind.is_linear() && incoming_arrow_ids.contains(el.id.as_str()))
        .collect();
    let bound_containers: Vec<&Element> = scene
        .elements
        .iter()
        .filter(|el| {
            el.id != origin.id
                && !incoming_arrow_ids.contains(el.id.as_str())
                && el.bound_elements.iter().any(|b| b.id == origin.id)
        })
        .collect();

    let bindings = ExtraBindings {
        bound: origin
            .bound_elements
            .iter()
            .filter(|b| b.kind == BoundKind::Arrow)
            .cloned()
            .collect(),
        start: if origin.kind.is_linear() {
            origin.start_binding.clone()
        } else {
            None
        },
        end: if origin.kind.is_linear() {
            origin.end_binding.clone()
        } else {
            None
        },
        points: if origin.kind.is_linear() {
            origin.points.clone()
        } else {
            Vec::new()
        },
    };
    let placement = Placement::at(origin.x, origin.y).with_size(origin.width, origin.height);
    let projected = new_object.project(&placement, &bindings);
    let anchor = new_object.anchor_id();

    let origin_labels: HashSet<&str> = origin.bound_text_ids().collect();
    let dropped: HashSet<&str> = std::iter::once(origin.id.as_str())
        .chain(origin_labels.iter().copied())
        .chain(incoming_arrows.iter().map(|el| el.id.as_str()))
        .chain(bound_containers.iter().map(|el| el.id.as_str()))
        .collect();

    let mut elements: Vec<Element> = scene
        .elements
        .iter()
        .filter(|el| !dropped.contains(el.id.as_str()))
        .cloned()
        .collect();
    elements.extend(projected);
    elements.extend(
        incoming_arrows
            .iter()
            .map(|el| (*el).clone().rebind_endpoints(&origin.id, anchor)),
    );
    elements.extend(
        bound_containers
            .iter()
            .map(|el| (*el).clone().rebound_to(&origin.id, anchor)),
    );

    // Containment refs are weak: children of a replaced frame follow it when
    // the replacement is a frame too, and are detached otherwise. Labels whose
    // container went away are detached the same way.
    let frame_anchor = match new_object {
        LandscapeObject::Domain(_) => Some(anchor),
        _ => None,
    };
    for el in &mut elements {
        if el.frame_id.as_deref() == Some(origin.id.as_str()) {
            el.frame_id = frame_anchor.map(str::to_string);
        }
        if el.container_id.as_deref() == Some(origin.id.as_str()) {
            el.container_id = None;
        }
    }

    let committed = Scene {
        elements,
        view: scene.view.clone(),
    }
    .with_cleared_selection();

    if committed
        .elements
        .iter()
        .any(|el| el.references(&origin.id))
    {
        return Err(Error::DanglingReplacement {
            id: origin.id.clone(),
        });
    }
    debug!(
        origin = %origin.id,
        replacement = %anchor,
        kind = new_object.kind_name(),
        "replaced element"
    );
    Ok(committed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Binding, BoundRef, ElementKind};
    use crate::objects::{Call, Domain, Service};

    fn rect_with_two_arrows_and_label() -> Scene {
        let rect = Element::new(ElementKind::Rectangle, "origin")
            .at(50.0, 60.0)
            .sized(120.0, 80.0)
            .with_bound(vec![
                BoundRef::arrow("in-1"),
                BoundRef::arrow("in-2"),
                BoundRef::text("label"),
            ]);
        let label = Element::new(ElementKind::Text, "label")
            .with_container(Some("origin".into()));
        let arrow = |id: &str, from: &str| {
            Element::new(ElementKind::Arrow, id).with_endpoints(
                Some(Binding::to(from)),
                Some(Binding::to("origin")),
                vec![[0.0, 0.0], [50.0, 0.0]],
            )
        };
        let peer = Element::new(ElementKind::Rectangle, "peer")
            .with_bound(vec![BoundRef::arrow("origin")]);
        Scene::from_elements(vec![
            rect,
            label,
            arrow("in-1", "peer"),
            arrow("in-2", "peer"),
            peer,
        ])
    }

    #[test]
    fn replacement_preserves_arrow_and_container_counts() {
        let scene = rect_with_two_arrows_and_label();
        let service = LandscapeObject::Service(Service::new(Some("payments"), None));
        let result = replace(&scene, "origin", &service).unwrap();

        let new_id = service.anchor_id();
        let arrows: Vec<_> = result
            .elements
            .iter()
            .filter(|el| el.kind == ElementKind::Arrow)
            .collect();
        assert_eq!(arrows.len(), 2);
        for arrow in &arrows {
            assert_eq!(
                arrow.end_binding.as_ref().unwrap().element_id,
                new_id,
                "incoming arrows must target the replacement"
            );
        }
        let peer = result.get("peer").unwrap();
        assert!(peer.bound_elements.iter().any(|b| b.id == new_id));
        assert!(!result.elements.iter().any(|el| el.references("origin")));
        assert!(!result.contains("origin"));
        assert!(!result.contains("label"));
    }

    #[test]
    fn arrow_kind_bound_refs_carry_over_to_the_new_container() {
        let scene = rect_with_two_arrows_and_label();
        let service = LandscapeObject::Service(Service::new(Some("payments"), None));
        let result = replace(&scene, "origin", &service).unwrap();

        let container = result.get(service.anchor_id()).unwrap();
        assert_eq!((container.x, container.y), (50.0, 60.0));
        assert_eq!((container.width, container.height), (120.0, 80.0));
        let carried: Vec<_> = container.bound_arrow_ids().collect();
        assert_eq!(carried, vec!["in-1", "in-2"]);
    }

    #[test]
    fn replacing_an_arrow_passes_its_endpoints_through() {
        let arrow = Element::new(ElementKind::Arrow, "rel")
            .at(0.0, 0.0)
            .sized(200.0, 10.0)
            .with_endpoints(
                Some(Binding::to("a")),
                Some(Binding::to("b")),
                vec![[0.0, 0.0], [200.0, 10.0]],
            );
        let scene = Scene::from_elements(vec![
            Element::new(ElementKind::Rectangle, "a"),
            Element::new(ElementKind::Rectangle, "b"),
            arrow,
        ]);
        let call = LandscapeObject::Call(Call::new(Some("invoke"), None));
        let result = replace(&scene, "rel", &call).unwrap();

        let replacement = result.get(call.anchor_id()).unwrap();
        assert_eq!(replacement.kind, ElementKind::Arrow);
        assert_eq!(replacement.start_binding, Some(Binding::to("a")));
        assert_eq!(replacement.end_binding, Some(Binding::to("b")));
        assert_eq!(replacement.points.len(), 2);
    }

    #[test]
    fn replacing_a_populated_frame_reframes_its_children() {
        let domain = LandscapeObject::Domain(Domain::new(Some("billing.core")));
        let mut elements = domain.project(&Placement::at(0.0, 0.0), &ExtraBindings::default());
        elements.push(
            Element::new(ElementKind::Rectangle, "svc").with_frame(Some("billing.core".into())),
        );
        let scene = Scene::from_elements(elements);

        let renamed = LandscapeObject::Domain(Domain::new(Some("billing.v2")));
        let result = replace(&scene, "billing.core", &renamed).unwrap();
        assert!(!result.contains("billing.core"));
        assert_eq!(
            result.get("svc").unwrap().frame_id.as_deref(),
            Some("billing.v2")
        );
    }

    #[test]
    fn replacing_a_frame_with_a_non_frame_detaches_its_children() {
        let domain = LandscapeObject::Domain(Domain::new(Some("billing.core")));
        let mut elements = domain.project(&Placement::at(0.0, 0.0), &ExtraBindings::default());
        elements.push(
            Element::new(ElementKind::Rectangle, "svc").with_frame(Some("billing.core".into())),
        );
        let scene = Scene::from_elements(elements);

        let service = LandscapeObject::Service(Service::new(Some("payments"), None));
        let result = replace(&scene, "billing.core", &service).unwrap();
        assert_eq!(result.get("svc").unwrap().frame_id, None);
        assert!(!result.elements.iter().any(|el| el.references("billing.core")));
    }

    #[test]
    fn absent_origin_is_a_no_op() {
        let scene = rect_with_two_arrows_and_label();
        let service = LandscapeObject::Service(Service::new(Some("payments"), None));
        let result = replace(&scene, "missing", &service).unwrap();
        assert_eq!(result, scene);
    }

    #[test]
    fn commit_clears_the_selection() {
        let mut scene = rect_with_two_arrows_and_label();
        scene.view.selected_element_ids.push("origin".into());
        let service = LandscapeObject::Service(Service::new(Some("payments"), None));
        let result = replace(&scene, "origin", &service).unwrap();
        assert!(result.view.selected_element_ids.is_empty());
    }
}
