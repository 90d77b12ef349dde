// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! A built-in demo document, used by `--demo` and shared across tests.

use super::document::{Document, PaintStyleDef, StyleCatalog, TextStyleDef, Variable, VariableValue};
use super::ids::NodeId;
use super::node::{
    Effect, EffectOffset, Layout, NodeKind, Padding, Paint, Reaction, Rgba, SceneNode, TextStyle,
};

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("fixture node id")
}

fn card(frame_id: &str, name: &str, title_id: &str, image_id: &str) -> SceneNode {
    SceneNode::new(nid(frame_id), name, NodeKind::Frame)
        .with_size(320.0, 240.0)
        .with_corner_radius(12.0)
        .with_layout(
            Layout::vertical().with_padding(Padding::uniform(16.0)).with_item_spacing(12.0),
        )
        .with_fills(vec![Paint::solid(Rgba::opaque(1.0, 1.0, 1.0))])
        .with_effects(vec![Effect::drop_shadow(
            8.0,
            EffectOffset { x: 0.0, y: 4.0 },
            Rgba::new(0.0, 0.0, 0.0, 0.25),
            Some(2.0),
        )])
        .with_children(vec![
            SceneNode::new(nid(title_id), "Card Title", NodeKind::Text)
                .with_size(288.0, 24.0)
                .with_text(TextStyle::uniform("Spotlight", "Inter", 18.0, 600, 24.0)),
            SceneNode::new(nid(image_id), "Card Image", NodeKind::Rectangle)
                .with_size(288.0, 160.0)
                .with_corner_radius(8.0)
                .with_fills(vec![Paint::solid(Rgba::opaque(0.85, 0.85, 0.88))]),
        ])
}

fn button_variant(id: &str, name: &str, fill: Rgba) -> SceneNode {
    SceneNode::new(nid(id), name, NodeKind::Component)
        .with_size(120.0, 40.0)
        .with_corner_radius(8.0)
        .with_layout(
            Layout::horizontal().with_padding(Padding::uniform(12.0)).with_item_spacing(8.0),
        )
        .with_fills(vec![Paint::solid(fill)])
}

/// A two-page document exercising every engine surface: auto-layout, text
/// (resolved and mixed), a variant group, generic auto-names, a repeated
/// card structure, reactions, variables, and published styles.
pub fn demo_document() -> Document {
    let hero = SceneNode::new(nid("1:1"), "Hero", NodeKind::Frame)
        .with_size(960.0, 480.0)
        .with_layout(
            Layout::vertical().with_padding(Padding::uniform(32.0)).with_item_spacing(16.0),
        )
        .with_fills(vec![Paint::solid(Rgba::opaque(0.07, 0.09, 0.15))])
        .with_reactions(vec![Reaction::new("on_click", "navigate", Some(nid("2:1")))])
        .with_children(vec![
            SceneNode::new(nid("1:2"), "Title", NodeKind::Text)
                .with_size(400.0, 40.0)
                .with_text(TextStyle::uniform("Ship faster", "Inter", 32.0, 700, 40.0)),
            SceneNode::new(nid("1:3"), "Subtitle", NodeKind::Text)
                .with_size(400.0, 24.0)
                .with_text(TextStyle::with_mixed_metrics("Progressive inspection for large scenes")),
        ]);

    let button_set = SceneNode::new(nid("2:1"), "Button", NodeKind::ComponentSet)
        .with_size(420.0, 60.0)
        .with_children(vec![
            button_variant("2:2", "State=Default", Rgba::opaque(0.20, 0.40, 1.0)),
            button_variant("2:3", "State=Hover", Rgba::opaque(0.12, 0.30, 0.85)),
            button_variant("2:4", "State=Disabled", Rgba::opaque(0.65, 0.67, 0.72)),
        ]);

    let autonamed = SceneNode::new(nid("4:1"), "Frame 47", NodeKind::Frame)
        .with_size(100.0, 100.0)
        .with_children(vec![SceneNode::new(nid("4:2"), "Rectangle 12", NodeKind::Rectangle)
            .with_size(80.0, 80.0)
            .with_fills(vec![Paint::solid(Rgba::opaque(0.9, 0.3, 0.3))])]);

    let page_one = SceneNode::new(nid("0:1"), "Landing", NodeKind::Page).with_children(vec![
        hero,
        button_set,
        card("3:1", "Card", "3:2", "3:3"),
        card("3:4", "Card Copy", "3:5", "3:6"),
        autonamed,
    ]);

    let page_two = SceneNode::new(nid("0:2"), "Archive", NodeKind::Page).with_children(vec![
        SceneNode::new(nid("5:1"), "Old Hero", NodeKind::Frame)
            .with_size(960.0, 480.0)
            .with_visible(false),
    ]);

    let root = SceneNode::new(nid("0:0"), "Demo", NodeKind::Document)
        .with_children(vec![page_one, page_two]);

    let mut document = Document::new(root)
        .expect("fixture document")
        .with_variables(vec![
            Variable {
                id: "v:1".to_owned(),
                name: "color.primary".to_owned(),
                collection: "core".to_owned(),
                value: VariableValue::Color { color: Rgba::opaque(0.20, 0.40, 1.0) },
            },
            Variable {
                id: "v:2".to_owned(),
                name: "spacing.m".to_owned(),
                collection: "core".to_owned(),
                value: VariableValue::Number { value: 16.0 },
            },
            Variable {
                id: "v:3".to_owned(),
                name: "feature.dark_mode".to_owned(),
                collection: "flags".to_owned(),
                value: VariableValue::Boolean { value: true },
            },
        ])
        .with_styles(StyleCatalog {
            paint_styles: vec![PaintStyleDef {
                id: "s:1".to_owned(),
                name: "Brand/Primary".to_owned(),
                paint: Paint::solid(Rgba::opaque(0.20, 0.40, 1.0)),
            }],
            text_styles: vec![TextStyleDef {
                id: "s:2".to_owned(),
                name: "Heading/L".to_owned(),
                font_family: "Inter".to_owned(),
                font_size: 32.0,
                font_weight: 700,
            }],
        });
    document.set_selection(vec![nid("1:1")]);
    document
}
