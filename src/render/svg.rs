// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Image export of a single node as base64-encoded SVG.

use base64::Engine as _;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Document, NodeId, NodeKind, Paint, Rgba, SceneNode};
use crate::project::hex_color;
use crate::query::QueryError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SvgExport {
    pub node_id: String,
    pub format: String,
    pub width: u64,
    pub height: u64,
    /// Base64 of the SVG source.
    pub data: String,
}

/// Serialize a node's box geometry as an SVG image.
///
/// Container roots (`document`, `page`) are not exportable.
pub fn export_svg(document: &Document, node_id: &NodeId) -> Result<SvgExport, QueryError> {
    let node = document.node(node_id).ok_or_else(|| QueryError::not_found(node_id))?;
    if matches!(node.kind(), NodeKind::Document | NodeKind::Page) {
        return Err(QueryError::unsupported(node, "image export"));
    }

    let width = node.width().round().max(1.0) as u64;
    let height = node.height().round().max(1.0) as u64;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         viewBox=\"0 0 {width} {height}\">"
    );
    svg.push_str(&shape_markup(node, width, height));
    svg.push_str("</svg>");

    Ok(SvgExport {
        node_id: node_id.as_str().to_owned(),
        format: "svg".to_owned(),
        width,
        height,
        data: base64::engine::general_purpose::STANDARD.encode(svg),
    })
}

fn shape_markup(node: &SceneNode, width: u64, height: u64) -> String {
    let fill = fill_attribute(node.fills());
    match node.kind() {
        NodeKind::Ellipse => format!(
            "<ellipse cx=\"{cx}\" cy=\"{cy}\" rx=\"{rx}\" ry=\"{ry}\" fill=\"{fill}\"/>",
            cx = width / 2,
            cy = height / 2,
            rx = width / 2,
            ry = height / 2,
        ),
        NodeKind::Line => format!(
            "<line x1=\"0\" y1=\"{y}\" x2=\"{width}\" y2=\"{y}\" stroke=\"{stroke}\"/>",
            y = height / 2,
            stroke = stroke_attribute(node),
        ),
        NodeKind::Text => {
            let characters =
                node.text().map(|text| escape_text(text.characters())).unwrap_or_default();
            let size = node
                .text()
                .and_then(|text| text.font_size().resolved().copied())
                .unwrap_or(16.0);
            format!(
                "<text x=\"0\" y=\"{size}\" font-size=\"{size}\" fill=\"{fill}\">{characters}</text>"
            )
        }
        _ => format!(
            "<rect width=\"{width}\" height=\"{height}\" rx=\"{rx}\" fill=\"{fill}\"/>",
            rx = node.corner_radius(),
        ),
    }
}

fn fill_attribute(paints: &[Paint]) -> String {
    paints
        .iter()
        .find(|paint| paint.visible())
        .and_then(Paint::color)
        .map(hex_color)
        .unwrap_or_else(|| "none".to_owned())
}

fn stroke_attribute(node: &SceneNode) -> String {
    node.strokes()
        .iter()
        .find(|paint| paint.visible())
        .and_then(Paint::color)
        .map(hex_color)
        .unwrap_or_else(|| hex_color(Rgba::opaque(0.0, 0.0, 0.0)))
}

fn escape_text(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::demo_document;

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    fn decode(data: &str) -> String {
        let bytes =
            base64::engine::general_purpose::STANDARD.decode(data).expect("valid base64");
        String::from_utf8(bytes).expect("utf8 svg")
    }

    #[test]
    fn rectangle_exports_a_rect() {
        let document = demo_document();
        let export = export_svg(&document, &nid("3:3")).expect("export");
        assert_eq!(export.format, "svg");
        assert_eq!((export.width, export.height), (288, 160));
        let svg = decode(&export.data);
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains("<rect"));
        assert!(svg.contains("fill=\"#d9d9e0\""));
    }

    #[test]
    fn text_exports_escaped_characters() {
        let document = demo_document();
        let export = export_svg(&document, &nid("1:2")).expect("export");
        let svg = decode(&export.data);
        assert!(svg.contains(">Ship faster</text>"));
    }

    #[test]
    fn pages_are_not_exportable() {
        let document = demo_document();
        assert_eq!(
            export_svg(&document, &nid("0:1")).unwrap_err().code(),
            "unsupported_operation"
        );
    }
}
