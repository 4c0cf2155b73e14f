//! The generic drawable primitive.
//!
//! An [`Element`] carries no landscape semantics by itself; the only channel
//! back to a typed object is the free-form `tag` (serialized as `customData`
//! for compatibility with the embedded-scene format). Elements are immutable
//! values: "modify one field" goes through the `with_*` builders, which
//! return a fresh element and never touch one referenced elsewhere.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle,
    Text,
    Line,
    Arrow,
    Frame,
}

impl ElementKind {
    /// Line and arrow elements carry endpoint bindings and a point list.
    pub fn is_linear(self) -> bool {
        matches!(self, ElementKind::Line | ElementKind::Arrow)
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementKind::Rectangle => "rectangle",
            ElementKind::Text => "text",
            ElementKind::Line => "line",
            ElementKind::Arrow => "arrow",
            ElementKind::Frame => "frame",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundKind {
    Arrow,
    Text,
}

/// An ordered attachment reference (a label text or an incoming arrow).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundRef {
    #[serde(rename = "type")]
    pub kind: BoundKind,
    pub id: String,
}

impl BoundRef {
    pub fn arrow(id: impl Into<String>) -> Self {
        Self {
            kind: BoundKind::Arrow,
            id: id.into(),
        }
    }

    pub fn text(id: impl Into<String>) -> Self {
        Self {
            kind: BoundKind::Text,
            id: id.into(),
        }
    }
}

/// An arrow endpoint's weak reference to the element it is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub element_id: String,
}

impl Binding {
    pub fn to(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Element {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Weak reference to an enclosing frame, by id.
    pub frame_id: Option<String>,
    pub bound_elements: Vec<BoundRef>,
    pub group_ids: Vec<String>,
    /// Free-form annotation; the only semantic channel back to a typed object.
    #[serde(rename = "customData")]
    pub tag: Option<Value>,
    pub start_binding: Option<Binding>,
    pub end_binding: Option<Binding>,
    pub points: Vec<[f64; 2]>,
    pub stroke_color: String,
    pub background_color: String,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub opacity: f64,
    pub locked: bool,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<u32>,
    /// For label texts: the element this label lives inside.
    pub container_id: Option<String>,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: ElementKind::Rectangle,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            frame_id: None,
            bound_elements: Vec::new(),
            group_ids: Vec::new(),
            tag: None,
            start_binding: None,
            end_binding: None,
            points: Vec::new(),
            stroke_color: "#1e1e1e".to_string(),
            background_color: "transparent".to_string(),
            stroke_width: 1.0,
            stroke_style: StrokeStyle::Solid,
            opacity: 100.0,
            locked: false,
            text: None,
            font_size: None,
            font_family: None,
            container_id: None,
        }
    }
}

impl Element {
    pub fn new(kind: ElementKind, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            ..Self::default()
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_frame(mut self, frame_id: Option<String>) -> Self {
        self.frame_id = frame_id;
        self
    }

    pub fn with_groups(mut self, group_ids: Vec<String>) -> Self {
        self.group_ids = group_ids;
        self
    }

    pub fn with_tag(mut self, tag: Value) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn without_tag(mut self) -> Self {
        self.tag = None;
        self
    }

    pub fn with_bound(mut self, bound: Vec<BoundRef>) -> Self {
        self.bound_elements = bound;
        self
    }

    pub fn with_stroke(mut self, color: &str, width: f64, style: StrokeStyle) -> Self {
        self.stroke_color = color.to_string();
        self.stroke_width = width;
        self.stroke_style = style;
        self
    }

    pub fn with_background(mut self, color: &str) -> Self {
        self.background_color = color.to_string();
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn with_text(mut self, text: &str, font_size: f64, font_family: u32) -> Self {
        self.text = Some(text.to_string());
        self.font_size = Some(font_size);
        self.font_family = Some(font_family);
        self
    }

    pub fn with_container(mut self, container_id: Option<String>) -> Self {
        self.container_id = container_id;
        self
    }

    pub fn with_endpoints(
        mut self,
        start: Option<Binding>,
        end: Option<Binding>,
        points: Vec<[f64; 2]>,
    ) -> Self {
        self.start_binding = start;
        self.end_binding = end;
        self.points = points;
        self
    }

    /// Ids of arrows attached to this element.
    pub fn bound_arrow_ids(&self) -> impl Iterator<Item = &str> {
        self.bound_elements
            .iter()
            .filter(|b| b.kind == BoundKind::Arrow)
            .map(|b| b.id.as_str())
    }

    /// Ids of label texts attached to this element.
    pub fn bound_text_ids(&self) -> impl Iterator<Item = &str> {
        self.bound_elements
            .iter()
            .filter(|b| b.kind == BoundKind::Text)
            .map(|b| b.id.as_str())
    }

    /// Whether any of this element's weak references points at `id`.
    pub fn references(&self, id: &str) -> bool {
        self.bound_elements.iter().any(|b| b.id == id)
            || self.frame_id.as_deref() == Some(id)
            || self.container_id.as_deref() == Some(id)
            || self.start_binding.as_ref().is_some_and(|b| b.element_id == id)
            || self.end_binding.as_ref().is_some_and(|b| b.element_id == id)
    }

    /// A copy with every endpoint binding equal to `old_id` retargeted to `new_id`.
    pub fn rebind_endpoints(mut self, old_id: &str, new_id: &str) -> Self {
        if let Some(binding) = &mut self.start_binding {
            if binding.element_id == old_id {
                binding.element_id = new_id.to_string();
            }
        }
        if let Some(binding) = &mut self.end_binding {
            if binding.element_id == old_id {
                binding.element_id = new_id.to_string();
            }
        }
        self
    }

    /// A copy with every attachment entry referencing `old_id` retargeted to `new_id`.
    pub fn rebound_to(mut self, old_id: &str, new_id: &str) -> Self {
        for bound in &mut self.bound_elements {
            if bound.id == old_id {
                bound.id = new_id.to_string();
            }
        }
        self
    }
}
