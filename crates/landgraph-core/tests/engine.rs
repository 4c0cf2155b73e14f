//! End-to-end scenarios exercising extraction, diff, replacement, and
//! catalog reconciliation together.

use landgraph_core::{
    Binding, BoundRef, Catalog, Domain, Element, ElementKind, ExtraBindings, LandscapeObject,
    Placement, Scene, Service, diff, extract, formalize, lint, replace,
};
use serde_json::json;

fn billing_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .push_proto_document(&json!({
            "files": [
                {
                    "services": [
                        {
                            "name": "InvoiceService",
                            "fullName": "billing.core.InvoiceService",
                            "description": "invoice issuing"
                        }
                    ]
                }
            ]
        }))
        .expect("catalog document");
    catalog
}

fn scene_with_billing_domain() -> Scene {
    let elements = LandscapeObject::Domain(Domain::new(Some("billing.core")))
        .project(&Placement::at(10.0, 10.0), &ExtraBindings::default());
    Scene::from_elements(elements)
}

#[test]
fn lint_reports_the_absent_service_but_not_the_present_domain() {
    let catalog = billing_catalog();
    let scene = scene_with_billing_domain();

    let report = lint(&scene, &catalog);
    let service_warnings = report
        .diagnostics
        .iter()
        .filter(|m| m.contains("proto absent InvoiceService"))
        .count();
    assert!(service_warnings >= 1);
    assert!(
        !report
            .diagnostics
            .iter()
            .any(|m| m.contains("proto domain absent")),
        "the domain is present and must not be flagged"
    );
}

#[test]
fn formalize_adds_one_proto_service_attached_to_the_existing_domain() {
    let catalog = billing_catalog();
    let scene = scene_with_billing_domain();

    let formalized = formalize(&scene, &catalog);
    assert!(formalized.absent_domains.is_empty());

    let rects: Vec<&Element> = formalized
        .absent_services
        .iter()
        .filter(|el| el.kind == ElementKind::Rectangle)
        .collect();
    assert_eq!(rects.len(), 1, "exactly one placeholder service");
    assert_eq!(rects[0].frame_id.as_deref(), Some("billing.core"));
    assert_eq!(rects[0].tag.as_ref().unwrap()["type"], "proto_service");
    assert_eq!(rects[0].tag.as_ref().unwrap()["caption"], "InvoiceService");
}

#[test]
fn formalize_is_idempotent_over_its_committed_output() {
    let catalog = billing_catalog();
    let scene = scene_with_billing_domain();

    let first = formalize(&scene, &catalog);
    let mut committed = first.normalized.clone();
    committed.extend(first.absent_services.clone());
    committed.extend(first.absent_domains.clone());
    let second = formalize(&Scene::from_elements(committed), &catalog);

    assert!(second.absent_services.is_empty());
    assert!(second.absent_domains.is_empty());
    let signature = |elements: &[Element]| {
        let mut keys: Vec<(String, i64, i64)> = elements
            .iter()
            .map(|el| (el.kind.to_string(), el.x as i64, el.y as i64))
            .collect();
        keys.sort();
        keys
    };
    let mut first_all = first.normalized.clone();
    first_all.extend(first.absent_services);
    first_all.extend(first.absent_domains);
    assert_eq!(signature(&second.normalized), signature(&first_all));
}

#[test]
fn replacing_a_plain_rectangle_keeps_both_arrows_and_the_dependent() {
    let origin = Element::new(ElementKind::Rectangle, "origin")
        .at(100.0, 100.0)
        .sized(160.0, 90.0)
        .with_bound(vec![
            BoundRef::arrow("arrow-1"),
            BoundRef::arrow("arrow-2"),
            BoundRef::text("old-label"),
        ]);
    let old_label = Element::new(ElementKind::Text, "old-label")
        .with_container(Some("origin".to_string()));
    let arrow = |id: &str| {
        Element::new(ElementKind::Arrow, id).with_endpoints(
            Some(Binding::to("neighbor")),
            Some(Binding::to("origin")),
            vec![[0.0, 0.0], [100.0, 0.0]],
        )
    };
    let dependent = Element::new(ElementKind::Rectangle, "neighbor")
        .with_bound(vec![BoundRef::arrow("origin")]);
    let scene = Scene::from_elements(vec![
        origin,
        old_label,
        arrow("arrow-1"),
        arrow("arrow-2"),
        dependent,
    ]);

    let service = LandscapeObject::Service(Service::new(Some("payments"), None));
    let result = replace(&scene, "origin", &service).expect("replacement");

    let incoming: Vec<&Element> = result
        .elements
        .iter()
        .filter(|el| {
            el.kind == ElementKind::Arrow
                && el
                    .end_binding
                    .as_ref()
                    .is_some_and(|b| b.element_id == service.anchor_id())
        })
        .collect();
    assert_eq!(incoming.len(), 2);
    assert!(
        !result.elements.iter().any(|el| el.references("origin")),
        "no element may still reference the removed id"
    );
    let neighbor = result.get("neighbor").unwrap();
    assert!(
        neighbor
            .bound_elements
            .iter()
            .any(|b| b.id == service.anchor_id())
    );
    assert!(!result.contains("old-label"));
}

#[test]
fn replacement_output_round_trips_through_the_extractor() {
    let origin = Element::new(ElementKind::Rectangle, "origin")
        .at(0.0, 0.0)
        .sized(300.0, 150.0);
    let scene = Scene::from_elements(vec![origin]);
    let service = LandscapeObject::Service(Service::new(Some("payments"), None));
    let result = replace(&scene, "origin", &service).expect("replacement");

    let extracted = extract(&result);
    assert_eq!(extracted.services.len(), 1);
    assert_eq!(extracted.services[0].object.name, "payments");
}

#[test]
fn a_moved_rectangle_diffs_as_removed_plus_added() {
    let before = vec![
        Element::new(ElementKind::Rectangle, "r").at(0.0, 0.0).sized(100.0, 50.0),
    ];
    let after = vec![
        Element::new(ElementKind::Rectangle, "r").at(40.0, 0.0).sized(100.0, 50.0),
    ];

    let result = diff(&before, &after);
    assert_eq!(result.removed.len(), 1);
    assert_eq!(result.added.len(), 1);
    assert!(result.matching.is_empty());
}

#[test]
fn diffing_any_scene_with_itself_is_a_fixpoint() {
    let catalog = billing_catalog();
    let scene = scene_with_billing_domain();
    let formalized = formalize(&scene, &catalog);
    let mut elements = formalized.normalized;
    elements.extend(formalized.absent_services);
    elements.extend(formalized.absent_domains);

    let result = diff(&elements, &elements);
    assert!(result.is_unchanged());
    assert_eq!(result.matching.len(), elements.len());
}
