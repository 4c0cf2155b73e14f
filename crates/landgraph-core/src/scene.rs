//! The scene: an ordered element collection plus opaque view state.

use crate::element::{Element, ElementKind};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Pan/zoom/selection state. Opaque to the engine except for selection,
/// which mutating operations clear on commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub zoom: f64,
    pub selected_element_ids: Vec<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            zoom: 1.0,
            selected_element_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub elements: Vec<Element>,
    #[serde(rename = "appState")]
    pub view: ViewState,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<Element>) -> Self {
        Self {
            elements,
            view: ViewState::default(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> HashSet<&str> {
        self.elements.iter().map(|el| el.id.as_str()).collect()
    }

    /// Frames (containers) present in the scene, by id.
    pub fn frames(&self) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(|el| el.kind == ElementKind::Frame)
    }

    /// Adjacency index: id -> indices of elements holding a weak reference to
    /// it. Built per operation; the element collection itself stays free of
    /// back-pointers.
    pub fn referencing_index(&self) -> HashMap<&str, Vec<usize>> {
        let mut index: HashMap<&str, Vec<usize>> = HashMap::new();
        let ids: Vec<&str> = self.elements.iter().map(|el| el.id.as_str()).collect();
        for (pos, element) in self.elements.iter().enumerate() {
            for &id in &ids {
                if element.id != id && element.references(id) {
                    index.entry(id).or_default().push(pos);
                }
            }
        }
        index
    }

    /// A copy with every weak reference that does not resolve inside this
    /// scene removed. Dangling references are never a hard failure; they are
    /// pruned on the next rewrite.
    pub fn prune_dangling(&self) -> Scene {
        let ids: HashSet<&str> = self.ids();
        let elements = self
            .elements
            .iter()
            .map(|element| {
                let mut el = element.clone();
                el.bound_elements.retain(|b| ids.contains(b.id.as_str()));
                if let Some(frame) = &el.frame_id {
                    if !ids.contains(frame.as_str()) {
                        el.frame_id = None;
                    }
                }
                if let Some(container) = &el.container_id {
                    if !ids.contains(container.as_str()) {
                        el.container_id = None;
                    }
                }
                if let Some(binding) = &el.start_binding {
                    if !ids.contains(binding.element_id.as_str()) {
                        el.start_binding = None;
                    }
                }
                if let Some(binding) = &el.end_binding {
                    if !ids.contains(binding.element_id.as_str()) {
                        el.end_binding = None;
                    }
                }
                el
            })
            .collect();
        Scene {
            elements,
            view: self.view.clone(),
        }
    }

    /// Same elements, selection cleared. Used by mutating operations when
    /// committing a rewritten scene.
    pub fn with_cleared_selection(mut self) -> Scene {
        self.view.selected_element_ids.clear();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Binding, BoundRef};

    #[test]
    fn prune_dangling_drops_unresolvable_refs_only() {
        let rect = Element::new(ElementKind::Rectangle, "rect")
            .with_bound(vec![BoundRef::text("label"), BoundRef::arrow("ghost")])
            .with_frame(Some("nowhere".into()));
        let label = Element::new(ElementKind::Text, "label").with_container(Some("rect".into()));
        let arrow = Element::new(ElementKind::Arrow, "arrow").with_endpoints(
            Some(Binding::to("rect")),
            Some(Binding::to("gone")),
            vec![],
        );
        let scene = Scene::from_elements(vec![rect, label, arrow]);

        let pruned = scene.prune_dangling();
        let rect = pruned.get("rect").unwrap();
        assert_eq!(rect.bound_elements, vec![BoundRef::text("label")]);
        assert_eq!(rect.frame_id, None);
        let arrow = pruned.get("arrow").unwrap();
        assert_eq!(arrow.start_binding, Some(Binding::to("rect")));
        assert_eq!(arrow.end_binding, None);
    }

    #[test]
    fn referencing_index_maps_targets_to_holders() {
        let rect = Element::new(ElementKind::Rectangle, "rect");
        let arrow = Element::new(ElementKind::Arrow, "arrow").with_endpoints(
            Some(Binding::to("rect")),
            None,
            vec![],
        );
        let label = Element::new(ElementKind::Text, "label").with_container(Some("rect".into()));
        let scene = Scene::from_elements(vec![rect, arrow, label]);

        let index = scene.referencing_index();
        let holders = index.get("rect").unwrap();
        assert_eq!(holders, &vec![1, 2]);
        assert!(!index.contains_key("arrow"));
    }

    #[test]
    fn scene_serde_round_trip() {
        let mut scene = Scene::from_elements(vec![Element::new(ElementKind::Frame, "dom")]);
        scene.view.zoom = 2.0;
        scene.view.selected_element_ids.push("dom".into());
        let json = serde_json::to_string(&scene).unwrap();
        let back: Scene = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scene);
    }
}
