//! Structural comparison between two element collections.
//!
//! Identity is structural, not id-based: a replacement run assigns fresh ids
//! to logically-unchanged shapes, so comparing ids would report the whole
//! scene as changed.

use serde_json::json;

use crate::element::{Binding, Element};
use crate::extract::Tag;

/// Stroke used for overlay elements marking a removal.
const REMOVED_COLOR: &str = "#fcc2d7";
/// Stroke used for overlay elements marking an addition.
const ADDED_COLOR: &str = "#b2f2bb";

/// Same kind, same geometry, and for linear elements the same start and end
/// binding targets.
pub fn identical(a: &Element, b: &Element) -> bool {
    a.kind == b.kind
        && a.x == b.x
        && a.y == b.y
        && a.width == b.width
        && a.height == b.height
        && binding_target(&a.start_binding) == binding_target(&b.start_binding)
        && binding_target(&a.end_binding) == binding_target(&b.end_binding)
}

fn binding_target(binding: &Option<Binding>) -> Option<&str> {
    binding.as_ref().map(|b| b.element_id.as_str())
}

/// Three disjoint partitions of a pairwise structural scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffResult {
    /// Present in the old set with no structural match in the new one.
    pub removed: Vec<Element>,
    /// Present in the new set with no structural match in the old one.
    pub added: Vec<Element>,
    /// New-set elements with a structural match in the old set.
    pub matching: Vec<Element>,
}

impl DiffResult {
    pub fn is_unchanged(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Pairwise scan, quadratic in the element counts; fine at diagram scale.
/// Elements already carrying a diff-overlay tag are ignored on the new side
/// so that diffing an annotated scene does not double-count the overlay.
pub fn diff(old: &[Element], new: &[Element]) -> DiffResult {
    let new: Vec<&Element> = new
        .iter()
        .filter(|el| !Tag::is_diff_overlay(el))
        .collect();

    DiffResult {
        removed: old
            .iter()
            .filter(|o| !new.iter().any(|n| identical(n, o)))
            .cloned()
            .collect(),
        added: new
            .iter()
            .filter(|n| !old.iter().any(|o| identical(n, o)))
            .map(|el| (*el).clone())
            .collect(),
        matching: new
            .iter()
            .filter(|n| old.iter().any(|o| identical(n, o)))
            .map(|el| (*el).clone())
            .collect(),
    }
}

/// Renders a diff as one element list: matching elements untouched, removed
/// ones restyled as a locked dotted overlay, added ones recolored.
pub fn annotate(diff: &DiffResult) -> Vec<Element> {
    let mut elements = diff.matching.clone();
    elements.extend(diff.removed.iter().map(|el| {
        el.clone()
            .with_stroke(REMOVED_COLOR, 2.0, crate::element::StrokeStyle::Dotted)
            .with_locked(true)
            .with_tag(json!({ "type": "diff_note", "action": "removed" }))
    }));
    elements.extend(diff.added.iter().map(|el| {
        el.clone()
            .with_stroke(ADDED_COLOR, 2.0, el.stroke_style)
    }));
    elements
}
