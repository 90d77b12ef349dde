// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Node projection: the compact, default-omitting view of a raw node.
//!
//! Identity fields (`id`, `name`, `type`) are always emitted; every other
//! attribute goes through [`ATTRIBUTE_RULES`], a declarative table where each
//! rule returns `Some(value)` only when the node departs from that
//! attribute's default. Projections are pure functions of the node: the same
//! unmutated node always serializes to byte-identical output.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::model::{Effect, LayoutMode, Paint, Rgba, SceneNode};

/// The compact view of one node used in all query responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Projection {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub attrs: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Projection>>,
}

struct AttributeRule {
    key: &'static str,
    project: fn(&SceneNode) -> Option<Value>,
}

/// One row per attribute; table order fixes serialization is irrelevant
/// because attributes land in an ordered map, but keeping the table flat
/// keeps the omission rules auditable in one place.
const ATTRIBUTE_RULES: &[AttributeRule] = &[
    AttributeRule { key: "visible", project: attr_visible },
    AttributeRule { key: "opacity", project: attr_opacity },
    AttributeRule { key: "width", project: attr_width },
    AttributeRule { key: "height", project: attr_height },
    AttributeRule { key: "corner_radius", project: attr_corner_radius },
    AttributeRule { key: "layout_mode", project: attr_layout_mode },
    AttributeRule { key: "primary_axis_align", project: attr_primary_axis_align },
    AttributeRule { key: "counter_axis_align", project: attr_counter_axis_align },
    AttributeRule { key: "padding", project: attr_padding },
    AttributeRule { key: "item_spacing", project: attr_item_spacing },
    AttributeRule { key: "fills", project: attr_fills },
    AttributeRule { key: "strokes", project: attr_strokes },
    AttributeRule { key: "stroke_weight", project: attr_stroke_weight },
    AttributeRule { key: "effects", project: attr_effects },
    AttributeRule { key: "characters", project: attr_characters },
    AttributeRule { key: "font_family", project: attr_font_family },
    AttributeRule { key: "font_size", project: attr_font_size },
    AttributeRule { key: "font_weight", project: attr_font_weight },
    AttributeRule { key: "line_height", project: attr_line_height },
];

/// Project one node without children or child count.
pub fn project(node: &SceneNode) -> Projection {
    let mut attrs = BTreeMap::new();
    for rule in ATTRIBUTE_RULES {
        if let Some(value) = (rule.project)(node) {
            let _ = attrs.insert(rule.key.to_owned(), value);
        }
    }
    Projection {
        id: node.id().as_str().to_owned(),
        name: node.name().to_owned(),
        kind: node.kind().label().to_owned(),
        attrs,
        child_count: None,
        children: None,
    }
}

/// Project one node plus its child count, still without the subtree.
pub fn project_with_child_count(node: &SceneNode) -> Projection {
    let mut projection = project(node);
    projection.child_count = Some(node.child_count());
    projection
}

/// Project a node and recursively its children, `depth` levels down.
///
/// At `depth == 0` the node carries a child count but no `children` field;
/// deeper levels are silently truncated.
pub fn project_tree(node: &SceneNode, depth: u64) -> Projection {
    let mut projection = project_with_child_count(node);
    if depth > 0 {
        projection.children = Some(
            node.children().iter().map(|child| project_tree(child, depth - 1)).collect(),
        );
    }
    projection
}

fn attr_visible(node: &SceneNode) -> Option<Value> {
    if node.visible() {
        None
    } else {
        Some(Value::Bool(false))
    }
}

fn attr_opacity(node: &SceneNode) -> Option<Value> {
    if node.opacity() == 1.0 {
        None
    } else {
        Some(json!(node.opacity()))
    }
}

fn attr_width(node: &SceneNode) -> Option<Value> {
    rounded_size(node.width())
}

fn attr_height(node: &SceneNode) -> Option<Value> {
    rounded_size(node.height())
}

fn attr_corner_radius(node: &SceneNode) -> Option<Value> {
    if node.corner_radius() > 0.0 {
        Some(json!(node.corner_radius()))
    } else {
        None
    }
}

fn uses_layout(node: &SceneNode) -> bool {
    node.layout().mode != LayoutMode::None
}

fn attr_layout_mode(node: &SceneNode) -> Option<Value> {
    match node.layout().mode {
        LayoutMode::None => None,
        LayoutMode::Horizontal => Some(json!("horizontal")),
        LayoutMode::Vertical => Some(json!("vertical")),
    }
}

fn attr_primary_axis_align(node: &SceneNode) -> Option<Value> {
    if !uses_layout(node) {
        return None;
    }
    let align = node.layout().primary_axis_align;
    (align != Default::default()).then(|| json!(align.label()))
}

fn attr_counter_axis_align(node: &SceneNode) -> Option<Value> {
    if !uses_layout(node) {
        return None;
    }
    let align = node.layout().counter_axis_align;
    (align != Default::default()).then(|| json!(align.label()))
}

fn attr_padding(node: &SceneNode) -> Option<Value> {
    if !uses_layout(node) || node.layout().padding.is_zero() {
        return None;
    }
    let padding = node.layout().padding;
    Some(json!([padding.top, padding.right, padding.bottom, padding.left]))
}

fn attr_item_spacing(node: &SceneNode) -> Option<Value> {
    if !uses_layout(node) || node.layout().item_spacing == 0.0 {
        return None;
    }
    Some(json!(node.layout().item_spacing))
}

fn attr_fills(node: &SceneNode) -> Option<Value> {
    paint_list(node.fills())
}

fn attr_strokes(node: &SceneNode) -> Option<Value> {
    paint_list(node.strokes())
}

fn attr_stroke_weight(node: &SceneNode) -> Option<Value> {
    if paint_list(node.strokes()).is_none() || node.stroke_weight() == 0.0 {
        return None;
    }
    Some(json!(node.stroke_weight()))
}

fn attr_effects(node: &SceneNode) -> Option<Value> {
    let effects: Vec<Value> =
        node.effects().iter().filter(|effect| effect.visible()).map(effect_value).collect();
    if effects.is_empty() {
        None
    } else {
        Some(Value::Array(effects))
    }
}

fn attr_characters(node: &SceneNode) -> Option<Value> {
    node.text().map(|text| json!(text.characters()))
}

fn attr_font_family(node: &SceneNode) -> Option<Value> {
    node.text()?.font_family().resolved().map(|family| json!(family))
}

fn attr_font_size(node: &SceneNode) -> Option<Value> {
    node.text()?.font_size().resolved().map(|size| json!(size))
}

fn attr_font_weight(node: &SceneNode) -> Option<Value> {
    node.text()?.font_weight().resolved().map(|weight| json!(weight))
}

fn attr_line_height(node: &SceneNode) -> Option<Value> {
    node.text()?.line_height().resolved().map(|height| json!(height))
}

fn rounded_size(value: f64) -> Option<Value> {
    if value > 0.0 {
        Some(json!(value.round() as i64))
    } else {
        None
    }
}

fn paint_list(paints: &[Paint]) -> Option<Value> {
    let visible: Vec<Value> =
        paints.iter().filter(|paint| paint.visible()).map(paint_value).collect();
    if visible.is_empty() {
        None
    } else {
        Some(Value::Array(visible))
    }
}

fn paint_value(paint: &Paint) -> Value {
    let mut entry = serde_json::Map::new();
    let _ = entry.insert("type".to_owned(), json!(paint_kind_label(paint)));
    if let Some(color) = paint.color() {
        let _ = entry.insert("color".to_owned(), json!(hex_color(color)));
    }
    if !paint.gradient_stops().is_empty() {
        let stops: Vec<Value> = paint
            .gradient_stops()
            .iter()
            .map(|stop| json!({ "position": stop.position, "color": hex_color(stop.color) }))
            .collect();
        let _ = entry.insert("gradient_stops".to_owned(), Value::Array(stops));
    }
    Value::Object(entry)
}

fn paint_kind_label(paint: &Paint) -> &'static str {
    match paint.kind() {
        crate::model::PaintKind::Solid => "solid",
        crate::model::PaintKind::LinearGradient => "linear_gradient",
        crate::model::PaintKind::RadialGradient => "radial_gradient",
        crate::model::PaintKind::Image => "image",
    }
}

fn effect_value(effect: &Effect) -> Value {
    let mut entry = serde_json::Map::new();
    let _ = entry.insert("type".to_owned(), json!(effect_kind_label(effect)));
    if effect.radius() > 0.0 {
        let _ = entry.insert("radius".to_owned(), json!(effect.radius()));
    }
    if let Some(offset) = effect.offset() {
        let _ = entry.insert("offset".to_owned(), json!([offset.x, offset.y]));
    }
    if let Some(color) = effect.color() {
        let _ = entry.insert("color".to_owned(), json!(hex_color(color)));
    }
    if let Some(spread) = effect.spread() {
        if spread != 0.0 {
            let _ = entry.insert("spread".to_owned(), json!(spread));
        }
    }
    Value::Object(entry)
}

fn effect_kind_label(effect: &Effect) -> &'static str {
    match effect.kind() {
        crate::model::EffectKind::DropShadow => "drop_shadow",
        crate::model::EffectKind::InnerShadow => "inner_shadow",
        crate::model::EffectKind::LayerBlur => "layer_blur",
        crate::model::EffectKind::BackgroundBlur => "background_blur",
    }
}

/// `#rrggbb`, with an `aa` suffix only when the color is not fully opaque.
pub fn hex_color(color: Rgba) -> String {
    let mut hex = format!("#{:02x}{:02x}{:02x}", channel(color.r), channel(color.g), channel(color.b));
    if color.a < 1.0 {
        hex.push_str(&format!("{:02x}", channel(color.a)));
    }
    hex
}

fn channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
