// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! CSS declaration rendering for a single node.

use std::collections::BTreeMap;

use crate::model::{Document, EffectKind, LayoutMode, NodeId, NodeKind, PaintKind};
use crate::project::hex_color;
use crate::query::QueryError;

/// Render a node's visual attributes as CSS declarations.
///
/// Undefined for container roots (`document`, `page`), which have no
/// rendered box of their own.
pub fn render_css(
    document: &Document,
    node_id: &NodeId,
) -> Result<BTreeMap<String, String>, QueryError> {
    let node = document.node(node_id).ok_or_else(|| QueryError::not_found(node_id))?;
    if matches!(node.kind(), NodeKind::Document | NodeKind::Page) {
        return Err(QueryError::unsupported(node, "css rendering"));
    }

    let mut css = BTreeMap::new();
    let mut put = |key: &str, value: String| {
        let _ = css.insert(key.to_owned(), value);
    };

    if node.width() > 0.0 {
        put("width", format!("{}px", node.width().round() as i64));
    }
    if node.height() > 0.0 {
        put("height", format!("{}px", node.height().round() as i64));
    }
    if node.opacity() != 1.0 {
        put("opacity", format!("{}", node.opacity()));
    }
    if node.corner_radius() > 0.0 {
        put("border-radius", format!("{}px", node.corner_radius()));
    }

    if let Some(fill) = node.fills().iter().find(|paint| paint.visible()) {
        match (fill.kind(), fill.color()) {
            (PaintKind::Solid, Some(color)) => put("background", hex_color(color)),
            (PaintKind::LinearGradient | PaintKind::RadialGradient, _) => {
                let stops: Vec<String> = fill
                    .gradient_stops()
                    .iter()
                    .map(|stop| {
                        format!("{} {}%", hex_color(stop.color), (stop.position * 100.0).round())
                    })
                    .collect();
                let function = if fill.kind() == PaintKind::LinearGradient {
                    "linear-gradient"
                } else {
                    "radial-gradient"
                };
                put("background", format!("{function}({})", stops.join(", ")));
            }
            _ => {}
        }
    }

    if let Some(stroke) = node.strokes().iter().find(|paint| paint.visible()) {
        if let Some(color) = stroke.color() {
            let weight = if node.stroke_weight() > 0.0 { node.stroke_weight() } else { 1.0 };
            put("border", format!("{weight}px solid {}", hex_color(color)));
        }
    }

    if node.layout().mode != LayoutMode::None {
        put("display", "flex".to_owned());
        put(
            "flex-direction",
            match node.layout().mode {
                LayoutMode::Horizontal => "row".to_owned(),
                _ => "column".to_owned(),
            },
        );
        if node.layout().item_spacing > 0.0 {
            put("gap", format!("{}px", node.layout().item_spacing));
        }
        let padding = node.layout().padding;
        if !padding.is_zero() {
            put(
                "padding",
                format!(
                    "{}px {}px {}px {}px",
                    padding.top, padding.right, padding.bottom, padding.left
                ),
            );
        }
    }

    if let Some(text) = node.text() {
        if let Some(family) = text.font_family().resolved() {
            put("font-family", family.clone());
        }
        if let Some(size) = text.font_size().resolved() {
            put("font-size", format!("{size}px"));
        }
        if let Some(weight) = text.font_weight().resolved() {
            put("font-weight", format!("{weight}"));
        }
        if let Some(height) = text.line_height().resolved() {
            put("line-height", format!("{height}px"));
        }
    }

    for effect in node.effects().iter().filter(|effect| effect.visible()) {
        match effect.kind() {
            EffectKind::DropShadow | EffectKind::InnerShadow => {
                if let (Some(offset), Some(color)) = (effect.offset(), effect.color()) {
                    let inset = if effect.kind() == EffectKind::InnerShadow { "inset " } else { "" };
                    let spread = effect.spread().unwrap_or(0.0);
                    let _ = css.insert(
                        "box-shadow".to_owned(),
                        format!(
                            "{inset}{}px {}px {}px {}px {}",
                            offset.x,
                            offset.y,
                            effect.radius(),
                            spread,
                            hex_color(color)
                        ),
                    );
                }
            }
            EffectKind::LayerBlur => {
                let _ = css.insert("filter".to_owned(), format!("blur({}px)", effect.radius()));
            }
            EffectKind::BackgroundBlur => {
                let _ = css
                    .insert("backdrop-filter".to_owned(), format!("blur({}px)", effect.radius()));
            }
        }
    }

    Ok(css)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::demo_document;

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    #[test]
    fn auto_layout_frame_renders_flex() {
        let document = demo_document();
        let css = render_css(&document, &nid("1:1")).expect("css");
        assert_eq!(css.get("display").map(String::as_str), Some("flex"));
        assert_eq!(css.get("flex-direction").map(String::as_str), Some("column"));
        assert_eq!(css.get("gap").map(String::as_str), Some("16px"));
        assert_eq!(css.get("width").map(String::as_str), Some("960px"));
    }

    #[test]
    fn text_node_renders_font_metrics() {
        let document = demo_document();
        let css = render_css(&document, &nid("1:2")).expect("css");
        assert_eq!(css.get("font-family").map(String::as_str), Some("Inter"));
        assert_eq!(css.get("font-size").map(String::as_str), Some("32px"));
        assert_eq!(css.get("font-weight").map(String::as_str), Some("700"));
    }

    #[test]
    fn mixed_text_metrics_render_nothing() {
        let document = demo_document();
        let css = render_css(&document, &nid("1:3")).expect("css");
        assert!(css.get("font-size").is_none());
    }

    #[test]
    fn drop_shadow_renders_box_shadow() {
        let document = demo_document();
        let css = render_css(&document, &nid("3:1")).expect("css");
        assert_eq!(
            css.get("box-shadow").map(String::as_str),
            Some("0px 4px 8px 2px #00000040")
        );
    }

    #[test]
    fn pages_are_unsupported() {
        let document = demo_document();
        let err = render_css(&document, &nid("0:1")).unwrap_err();
        assert_eq!(err.code(), "unsupported_operation");
    }
}
