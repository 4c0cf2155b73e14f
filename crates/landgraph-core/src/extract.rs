//! Recovers typed landscape objects from a tagged element set.
//!
//! Classification is strict: an element counts as a given variant only when
//! its tag kind matches and the variant's required fields are present.
//! Anything else stays unclassified and flows through rewrites untouched.

use serde::Deserialize;
use serde_json::Value;

use crate::element::{Element, ElementKind};
use crate::geom::{Point, point};
use crate::objects::{Comment, Domain, Note, ProtoService, Service};
use crate::scene::Scene;

/// Typed view of an element tag. Unknown kinds and tags missing required
/// fields fail to parse and leave the element unclassified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tag {
    Domain {
        name: Option<String>,
    },
    Service {
        caption: Option<String>,
        #[serde(rename = "groupId")]
        group_id: Option<String>,
    },
    ProtoService {
        caption: Option<String>,
        #[serde(rename = "groupId")]
        group_id: Option<String>,
    },
    Comment {
        text: Option<String>,
    },
    Note {
        text: Option<String>,
        #[serde(rename = "groupId")]
        group_id: Option<String>,
    },
    Call {
        text: Option<String>,
    },
    Method {
        caption: Option<String>,
        #[serde(rename = "groupId")]
        group_id: Option<String>,
    },
    DiffNote {
        action: Option<String>,
    },
}

impl Tag {
    /// Parses an element's raw tag value. Returns `None` for absent tags,
    /// unknown kinds, or malformed payloads; never panics.
    pub fn parse(raw: Option<&Value>) -> Option<Tag> {
        raw.and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn of(element: &Element) -> Option<Tag> {
        Tag::parse(element.tag.as_ref())
    }

    pub fn is_diff_overlay(element: &Element) -> bool {
        matches!(Tag::of(element), Some(Tag::DiffNote { .. }))
    }
}

/// A reconstructed object together with where its container element sits and
/// which element it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Recovered<T> {
    pub object: T,
    pub origin: Point,
    pub source_id: String,
}

/// Everything the classifier could recover from one scene. Call and Method
/// elements are replacement targets only and are never reconstructed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    pub domains: Vec<Recovered<Domain>>,
    pub services: Vec<Recovered<Service>>,
    pub proto_services: Vec<Recovered<ProtoService>>,
    pub comments: Vec<Recovered<Comment>>,
    pub notes: Vec<Recovered<Note>>,
}

pub fn extract(scene: &Scene) -> Extracted {
    let mut extracted = Extracted::default();
    for element in &scene.elements {
        let Some(tag) = Tag::of(element) else {
            continue;
        };
        let origin = point(element.x, element.y);
        match tag {
            Tag::Domain { name } => {
                extracted.domains.push(Recovered {
                    object: Domain::new(name.as_deref()),
                    origin,
                    source_id: element.id.clone(),
                });
            }
            Tag::Service { caption, group_id } => {
                if let Some(caption) = classified_caption(caption, group_id) {
                    extracted.services.push(Recovered {
                        object: Service::new(Some(&caption), parent_domain(scene, element)),
                        origin,
                        source_id: element.id.clone(),
                    });
                }
            }
            Tag::ProtoService { caption, group_id } => {
                if let Some(caption) = classified_caption(caption, group_id) {
                    extracted.proto_services.push(Recovered {
                        object: ProtoService::new(Some(&caption), parent_domain(scene, element)),
                        origin,
                        source_id: element.id.clone(),
                    });
                }
            }
            Tag::Comment { text } => {
                extracted.comments.push(Recovered {
                    object: Comment::new(text.as_deref()),
                    origin,
                    source_id: element.id.clone(),
                });
            }
            Tag::Note { text, .. } => {
                extracted.notes.push(Recovered {
                    object: Note::new(text.as_deref(), parent_domain(scene, element)),
                    origin,
                    source_id: element.id.clone(),
                });
            }
            Tag::Call { .. } | Tag::Method { .. } | Tag::DiffNote { .. } => {}
        }
    }
    extracted
}

/// Services need a non-empty caption and a group id before they count as
/// classified.
fn classified_caption(caption: Option<String>, group_id: Option<String>) -> Option<String> {
    match (caption, group_id) {
        (Some(caption), Some(group_id)) if !caption.is_empty() && !group_id.is_empty() => {
            Some(caption)
        }
        _ => None,
    }
}

/// Resolves an element's parent domain through its frame ref: the frame must
/// exist in the same scene and carry a domain tag.
fn parent_domain(scene: &Scene, element: &Element) -> Option<String> {
    let frame_id = element.frame_id.as_deref()?;
    let frame = scene
        .elements
        .iter()
        .find(|el| el.kind == ElementKind::Frame && el.id == frame_id)?;
    match Tag::of(frame) {
        Some(Tag::Domain { name }) => name.or_else(|| Some(frame.id.clone())),
        _ => None,
    }
}
