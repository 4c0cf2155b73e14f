//! Reconciles a scene against the external service catalog.
//!
//! `formalize` computes placeholders for catalog entries missing from the
//! scene and a canonical re-projection of everything already recognized.
//! `lint` additionally flags unclassified elements and placeholders with a
//! warning overlay and one diagnostic per flagged element; `format` commits
//! the reconciled set cleanly.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::catalog::Catalog;
use crate::element::{Element, StrokeStyle};
use crate::extract::{Extracted, Recovered, Tag, extract};
use crate::geom::Placement;
use crate::objects::{Domain, ExtraBindings, LandscapeObject, ProtoService};
use crate::scene::Scene;

/// Horizontal step between placeholder domains.
const DOMAIN_STEP_X: f64 = 300.0;
/// Vertical step between placeholder services.
const SERVICE_STEP_Y: f64 = 100.0;

const WARNING_COLOR: &str = "#fcc2d7";

/// The reconciliation result, as three element sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Formalized {
    /// Canonical re-projection of every recognized entity at its position.
    pub normalized: Vec<Element>,
    /// Placeholders for catalog services absent from the scene.
    pub absent_services: Vec<Element>,
    /// Placeholders for catalog domains absent from the scene.
    pub absent_domains: Vec<Element>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LintReport {
    pub elements: Vec<Element>,
    pub diagnostics: Vec<String>,
}

pub fn formalize(scene: &Scene, catalog: &Catalog) -> Formalized {
    let extracted = extract(scene);
    formalize_extracted(&extracted, catalog)
}

fn formalize_extracted(extracted: &Extracted, catalog: &Catalog) -> Formalized {
    let absent_domain_objects: Vec<Domain> = catalog
        .domains
        .iter()
        .filter(|name| !extracted.domains.iter().any(|d| &d.object.name == *name))
        .map(|name| Domain::new(Some(name)))
        .collect();

    let mut domain_x = 0.0;
    let absent_domains: Vec<Element> = absent_domain_objects
        .iter()
        .flat_map(|domain| {
            domain_x += DOMAIN_STEP_X;
            LandscapeObject::Domain(domain.clone())
                .project(&Placement::at(domain_x, 0.0), &ExtraBindings::default())
        })
        .collect();

    let mut service_y = 0.0;
    let absent_services: Vec<Element> = catalog
        .services
        .iter()
        .filter(|service| {
            !extracted
                .proto_services
                .iter()
                .any(|p| p.object.name == service.name)
        })
        .flat_map(|service| {
            service_y += SERVICE_STEP_Y;
            // A freshly placed absent domain wins over an existing one.
            let domain = absent_domain_objects
                .iter()
                .find(|d| d.name == service.domain)
                .map(|d| d.name.clone())
                .or_else(|| {
                    extracted
                        .domains
                        .iter()
                        .find(|d| d.object.name == service.domain)
                        .map(|d| d.object.name.clone())
                });
            LandscapeObject::ProtoService(ProtoService::new(Some(&service.name), domain))
                .project(&Placement::at(0.0, service_y), &ExtraBindings::default())
        })
        .collect();

    let mut normalized = Vec::new();
    for entry in &extracted.domains {
        normalized.extend(reproject(LandscapeObject::Domain(entry.object.clone()), entry));
    }
    for entry in &extracted.proto_services {
        normalized.extend(reproject(
            LandscapeObject::ProtoService(entry.object.clone()),
            entry,
        ));
    }
    for entry in &extracted.services {
        normalized.extend(reproject(
            LandscapeObject::Service(entry.object.clone()),
            entry,
        ));
    }
    for entry in &extracted.comments {
        normalized.extend(reproject(
            LandscapeObject::Comment(entry.object.clone()),
            entry,
        ));
    }
    for entry in &extracted.notes {
        normalized.extend(reproject(LandscapeObject::Note(entry.object.clone()), entry));
    }

    Formalized {
        normalized,
        absent_services,
        absent_domains,
    }
}

fn reproject<T>(object: LandscapeObject, entry: &Recovered<T>) -> Vec<Element> {
    object.project(
        &Placement::at(entry.origin.x, entry.origin.y),
        &ExtraBindings::default(),
    )
}

/// Scene elements belonging to some recognized entity's projection: the
/// classified container itself, everything sharing a group with it, its
/// attached label texts, and labels living inside it.
fn classified_footprint(scene: &Scene, extracted: &Extracted) -> HashSet<String> {
    let mut source_ids: HashSet<&str> = HashSet::new();
    for entry in &extracted.domains {
        source_ids.insert(&entry.source_id);
    }
    for entry in &extracted.services {
        source_ids.insert(&entry.source_id);
    }
    for entry in &extracted.proto_services {
        source_ids.insert(&entry.source_id);
    }
    for entry in &extracted.comments {
        source_ids.insert(&entry.source_id);
    }
    for entry in &extracted.notes {
        source_ids.insert(&entry.source_id);
    }

    let mut footprint: HashSet<String> = HashSet::new();
    let mut groups: HashSet<&str> = HashSet::new();
    for element in &scene.elements {
        if source_ids.contains(element.id.as_str()) {
            footprint.insert(element.id.clone());
            groups.extend(element.group_ids.iter().map(String::as_str));
            footprint.extend(element.bound_text_ids().map(str::to_string));
        }
    }
    for element in &scene.elements {
        let in_group = element.group_ids.iter().any(|g| groups.contains(g.as_str()));
        let in_container = element
            .container_id
            .as_deref()
            .is_some_and(|id| source_ids.contains(id));
        if in_group || in_container {
            footprint.insert(element.id.clone());
        }
    }
    footprint
}

/// A copy restyled as a lint warning. Placeholder tags are kept so a second
/// run recognizes them instead of materializing duplicates; unclassified
/// elements lose their (unusable) tag.
fn warning_element(element: &Element, keep_tag: bool) -> Element {
    let styled = element
        .clone()
        .with_stroke(WARNING_COLOR, 2.0, StrokeStyle::Dotted)
        .with_locked(true);
    if keep_tag { styled } else { styled.without_tag() }
}

pub fn lint(scene: &Scene, catalog: &Catalog) -> LintReport {
    let extracted = extract(scene);
    let formalized = formalize_extracted(&extracted, catalog);
    let footprint = classified_footprint(scene, &extracted);

    let mut elements = Vec::new();
    let mut diagnostics = Vec::new();

    for element in &scene.elements {
        if !footprint.contains(&element.id) {
            let message = format!("{} not formalized", element.kind);
            warn!(element = %element.id, "{message}");
            diagnostics.push(message);
            elements.push(warning_element(element, false));
        }
    }

    let captions = caption_by_group(&formalized.absent_services);
    for element in &formalized.absent_services {
        let caption = element
            .group_ids
            .iter()
            .find_map(|g| captions.get(g.as_str()))
            .copied()
            .unwrap_or_default();
        let message = format!("proto absent {caption}");
        warn!(element = %element.id, "{message}");
        diagnostics.push(message);
        elements.push(warning_element(element, true));
    }
    for element in &formalized.absent_domains {
        let name = match Tag::of(element) {
            Some(Tag::Domain { name: Some(name) }) => name,
            _ => String::new(),
        };
        let message = format!("proto domain absent {name}");
        warn!(element = %element.id, "{message}");
        diagnostics.push(message);
        elements.push(warning_element(element, true));
    }

    elements.extend(formalized.normalized);
    LintReport {
        elements,
        diagnostics,
    }
}

/// Rewrites the scene to the reconciled set: placeholders, canonical
/// re-projections, and unclassified elements passed through untouched.
pub fn format(scene: &Scene, catalog: &Catalog) -> Scene {
    let extracted = extract(scene);
    let formalized = formalize_extracted(&extracted, catalog);
    let footprint = classified_footprint(scene, &extracted);

    let mut elements = formalized.absent_services;
    elements.extend(formalized.absent_domains);
    elements.extend(formalized.normalized);
    elements.extend(
        scene
            .elements
            .iter()
            .filter(|el| !footprint.contains(&el.id))
            .cloned(),
    );

    Scene {
        elements,
        view: scene.view.clone(),
    }
}

/// Caption lookup through the shared group id, for placeholder elements that
/// do not carry the tag themselves (labels, glyphs).
fn caption_by_group(elements: &[Element]) -> HashMap<&str, &str> {
    let mut captions = HashMap::new();
    for element in elements {
        let caption = match element.tag.as_ref() {
            Some(tag) => tag.get("caption").and_then(|v| v.as_str()),
            None => None,
        };
        if let Some(caption) = caption {
            for group in &element.group_ids {
                captions.insert(group.as_str(), caption);
            }
        }
    }
    captions
}
