//! The revision content format: an SVG export with the full scene JSON
//! embedded base64 in a `<desc>` element. Loading a revision recovers the
//! scene from the metadata and discards the drawing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use landgraph_core::{ElementKind, Scene};

use crate::error::{Error, Result};

const PAYLOAD_PREFIX: &str = "payload-type:application/vnd.landgraph+json;base64,";
const MARGIN: f64 = 20.0;

/// Serializes a scene into a standalone SVG document carrying the scene as
/// embedded metadata. The drawing itself is a plain box-and-line rendering,
/// just enough for storage previews.
pub fn encode(scene: &Scene) -> Result<String> {
    let payload = BASE64.encode(serde_json::to_vec(scene)?);

    let (width, height) = bounds(scene);
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         viewBox=\"0 0 {width} {height}\">\n"
    ));
    svg.push_str(&format!("  <desc>{PAYLOAD_PREFIX}{payload}</desc>\n"));
    for element in &scene.elements {
        match element.kind {
            ElementKind::Rectangle | ElementKind::Frame => {
                svg.push_str(&format!(
                    "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" \
                     stroke=\"{}\"/>\n",
                    element.x, element.y, element.width, element.height, element.stroke_color
                ));
            }
            ElementKind::Line | ElementKind::Arrow => {
                svg.push_str(&format!(
                    "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\"/>\n",
                    element.x,
                    element.y,
                    element.x + element.width,
                    element.y + element.height,
                    element.stroke_color
                ));
            }
            ElementKind::Text => {
                let text = element.text.as_deref().unwrap_or_default();
                svg.push_str(&format!(
                    "  <text x=\"{}\" y=\"{}\">{}</text>\n",
                    element.x,
                    element.y,
                    escape_text(text)
                ));
            }
        }
    }
    svg.push_str("</svg>\n");
    Ok(svg)
}

/// Recovers the scene embedded in an SVG revision.
pub fn decode(content: &[u8]) -> Result<Scene> {
    let text = std::str::from_utf8(content).map_err(|_| Error::decode("content is not UTF-8"))?;
    let document =
        roxmltree::Document::parse(text).map_err(|e| Error::decode(format!("bad SVG: {e}")))?;
    let desc = document
        .descendants()
        .find(|node| node.has_tag_name("desc"))
        .and_then(|node| node.text())
        .ok_or_else(|| Error::decode("no scene metadata in SVG"))?;
    let payload = desc
        .trim()
        .strip_prefix(PAYLOAD_PREFIX)
        .ok_or_else(|| Error::decode("unrecognized metadata payload"))?;
    let bytes = BASE64
        .decode(payload)
        .map_err(|e| Error::decode(format!("bad base64 payload: {e}")))?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn bounds(scene: &Scene) -> (f64, f64) {
    let mut width = 0.0f64;
    let mut height = 0.0f64;
    for element in &scene.elements {
        width = width.max(element.x + element.width);
        height = height.max(element.y + element.height);
    }
    (width + MARGIN, height + MARGIN)
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
