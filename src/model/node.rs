// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Raw scene-graph node types as the host document holds them.
//!
//! Everything here is the *input* side of the engine; the compact,
//! default-omitting view lives in [`crate::project`].

use std::fmt;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ids::NodeId;

/// The structural type of a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Document,
    Page,
    Frame,
    Group,
    Component,
    ComponentSet,
    Instance,
    Rectangle,
    Ellipse,
    Line,
    Vector,
    Text,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Page => "page",
            Self::Frame => "frame",
            Self::Group => "group",
            Self::Component => "component",
            Self::ComponentSet => "component_set",
            Self::Instance => "instance",
            Self::Rectangle => "rectangle",
            Self::Ellipse => "ellipse",
            Self::Line => "line",
            Self::Vector => "vector",
            Self::Text => "text",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "document" => Some(Self::Document),
            "page" => Some(Self::Page),
            "frame" => Some(Self::Frame),
            "group" => Some(Self::Group),
            "component" => Some(Self::Component),
            "component_set" => Some(Self::ComponentSet),
            "instance" => Some(Self::Instance),
            "rectangle" => Some(Self::Rectangle),
            "ellipse" => Some(Self::Ellipse),
            "line" => Some(Self::Line),
            "vector" => Some(Self::Vector),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A value that may be unresolved because the host reports a range of mixed
/// sub-values (e.g. a text node using several font sizes at once).
///
/// Serialized as the underlying value, or as `{"mixed": true}` for the
/// sentinel; projections omit mixed values rather than guessing.
#[derive(Debug, Clone, PartialEq)]
pub enum Mixed<T> {
    Value(T),
    Mixed,
}

impl<T> Mixed<T> {
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Mixed => None,
        }
    }
}

impl<T: Serialize> Serialize for Mixed<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(value) => value.serialize(serializer),
            Self::Mixed => serde_json::json!({ "mixed": true }).serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Mixed<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        if raw.get("mixed").and_then(serde_json::Value::as_bool) == Some(true) {
            return Ok(Self::Mixed);
        }
        serde_json::from_value(raw).map(Self::Value).map_err(serde::de::Error::custom)
    }
}

/// An RGBA color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "default_alpha")]
    pub a: f64,
}

impl Rgba {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }
}

fn default_alpha() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaintKind {
    Solid,
    LinearGradient,
    RadialGradient,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GradientStop {
    pub position: f64,
    pub color: Rgba,
}

/// One fill or stroke entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Paint {
    kind: PaintKind,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    color: Option<Rgba>,
    #[serde(default)]
    gradient_stops: Vec<GradientStop>,
}

impl Paint {
    pub fn solid(color: Rgba) -> Self {
        Self { kind: PaintKind::Solid, visible: true, color: Some(color), gradient_stops: Vec::new() }
    }

    pub fn linear_gradient(stops: Vec<GradientStop>) -> Self {
        Self { kind: PaintKind::LinearGradient, visible: true, color: None, gradient_stops: stops }
    }

    pub fn image() -> Self {
        Self { kind: PaintKind::Image, visible: true, color: None, gradient_stops: Vec::new() }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn kind(&self) -> PaintKind {
        self.kind
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn color(&self) -> Option<Rgba> {
        self.color
    }

    pub fn gradient_stops(&self) -> &[GradientStop] {
        &self.gradient_stops
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    DropShadow,
    InnerShadow,
    LayerBlur,
    BackgroundBlur,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectOffset {
    pub x: f64,
    pub y: f64,
}

/// One visual effect entry (shadow or blur).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    kind: EffectKind,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    radius: f64,
    #[serde(default)]
    offset: Option<EffectOffset>,
    #[serde(default)]
    color: Option<Rgba>,
    #[serde(default)]
    spread: Option<f64>,
}

impl Effect {
    pub fn drop_shadow(radius: f64, offset: EffectOffset, color: Rgba, spread: Option<f64>) -> Self {
        Self {
            kind: EffectKind::DropShadow,
            visible: true,
            radius,
            offset: Some(offset),
            color: Some(color),
            spread,
        }
    }

    pub fn layer_blur(radius: f64) -> Self {
        Self {
            kind: EffectKind::LayerBlur,
            visible: true,
            radius,
            offset: None,
            color: None,
            spread: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn offset(&self) -> Option<EffectOffset> {
        self.offset
    }

    pub fn color(&self) -> Option<Rgba> {
        self.color
    }

    pub fn spread(&self) -> Option<f64> {
        self.spread
    }
}

/// Directional auto-layout configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    #[default]
    None,
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AxisAlign {
    #[default]
    Min,
    Center,
    Max,
    SpaceBetween,
}

impl AxisAlign {
    pub fn label(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Center => "center",
            Self::Max => "max",
            Self::SpaceBetween => "space_between",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Self { top: value, right: value, bottom: value, left: value }
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Layout {
    #[serde(default)]
    pub mode: LayoutMode,
    #[serde(default)]
    pub primary_axis_align: AxisAlign,
    #[serde(default)]
    pub counter_axis_align: AxisAlign,
    #[serde(default)]
    pub padding: Padding,
    #[serde(default)]
    pub item_spacing: f64,
}

impl Layout {
    pub fn horizontal() -> Self {
        Self { mode: LayoutMode::Horizontal, ..Self::default() }
    }

    pub fn vertical() -> Self {
        Self { mode: LayoutMode::Vertical, ..Self::default() }
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_item_spacing(mut self, item_spacing: f64) -> Self {
        self.item_spacing = item_spacing;
        self
    }

    pub fn with_alignment(mut self, primary: AxisAlign, counter: AxisAlign) -> Self {
        self.primary_axis_align = primary;
        self.counter_axis_align = counter;
        self
    }
}

/// Text content and font metrics of a text node.
///
/// Metrics are [`Mixed`] because the host reports a sentinel when a node mixes
/// several values in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    characters: String,
    font_family: Mixed<String>,
    font_size: Mixed<f64>,
    font_weight: Mixed<u32>,
    line_height: Mixed<f64>,
}

impl TextStyle {
    pub fn uniform(
        characters: impl Into<String>,
        font_family: impl Into<String>,
        font_size: f64,
        font_weight: u32,
        line_height: f64,
    ) -> Self {
        Self {
            characters: characters.into(),
            font_family: Mixed::Value(font_family.into()),
            font_size: Mixed::Value(font_size),
            font_weight: Mixed::Value(font_weight),
            line_height: Mixed::Value(line_height),
        }
    }

    pub fn with_mixed_metrics(characters: impl Into<String>) -> Self {
        Self {
            characters: characters.into(),
            font_family: Mixed::Mixed,
            font_size: Mixed::Mixed,
            font_weight: Mixed::Mixed,
            line_height: Mixed::Mixed,
        }
    }

    pub fn characters(&self) -> &str {
        &self.characters
    }

    pub fn font_family(&self) -> &Mixed<String> {
        &self.font_family
    }

    pub fn font_size(&self) -> &Mixed<f64> {
        &self.font_size
    }

    pub fn font_weight(&self) -> &Mixed<u32> {
        &self.font_weight
    }

    pub fn line_height(&self) -> &Mixed<f64> {
        &self.line_height
    }
}

/// A prototyping trigger/action pair recorded on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    trigger: String,
    action: ReactionAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionAction {
    kind: String,
    #[serde(default)]
    destination: Option<NodeId>,
}

impl Reaction {
    pub fn new(
        trigger: impl Into<String>,
        action_kind: impl Into<String>,
        destination: Option<NodeId>,
    ) -> Self {
        Self {
            trigger: trigger.into(),
            action: ReactionAction { kind: action_kind.into(), destination },
        }
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    pub fn action_kind(&self) -> &str {
        &self.action.kind
    }

    pub fn destination(&self) -> Option<&NodeId> {
        self.action.destination.as_ref()
    }
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

/// One raw node of the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    id: NodeId,
    name: String,
    kind: NodeKind,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default = "default_opacity")]
    opacity: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
    #[serde(default)]
    corner_radius: f64,
    #[serde(default)]
    layout: Layout,
    #[serde(default)]
    fills: Vec<Paint>,
    #[serde(default)]
    strokes: Vec<Paint>,
    #[serde(default)]
    stroke_weight: f64,
    #[serde(default)]
    effects: Vec<Effect>,
    #[serde(default)]
    text: Option<TextStyle>,
    #[serde(default)]
    reactions: Vec<Reaction>,
    #[serde(default)]
    children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(id: NodeId, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            visible: true,
            opacity: 1.0,
            width: 0.0,
            height: 0.0,
            corner_radius: 0.0,
            layout: Layout::default(),
            fills: Vec::new(),
            strokes: Vec::new(),
            stroke_weight: 0.0,
            effects: Vec::new(),
            text: None,
            reactions: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_corner_radius(mut self, corner_radius: f64) -> Self {
        self.corner_radius = corner_radius;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_fills(mut self, fills: Vec<Paint>) -> Self {
        self.fills = fills;
        self
    }

    pub fn with_strokes(mut self, strokes: Vec<Paint>, stroke_weight: f64) -> Self {
        self.strokes = strokes;
        self.stroke_weight = stroke_weight;
        self
    }

    pub fn with_effects(mut self, effects: Vec<Effect>) -> Self {
        self.effects = effects;
        self
    }

    pub fn with_text(mut self, text: TextStyle) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_reactions(mut self, reactions: Vec<Reaction>) -> Self {
        self.reactions = reactions;
        self
    }

    pub fn with_children(mut self, children: Vec<SceneNode>) -> Self {
        self.children = children;
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn corner_radius(&self) -> f64 {
        self.corner_radius
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn fills(&self) -> &[Paint] {
        &self.fills
    }

    pub fn strokes(&self) -> &[Paint] {
        &self.strokes
    }

    pub fn stroke_weight(&self) -> f64 {
        self.stroke_weight
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn text(&self) -> Option<&TextStyle> {
        self.text.as_ref()
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    pub fn child_count(&self) -> u64 {
        self.children.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    #[test]
    fn node_kind_labels_round_trip() {
        for kind in [
            NodeKind::Document,
            NodeKind::Page,
            NodeKind::Frame,
            NodeKind::Group,
            NodeKind::Component,
            NodeKind::ComponentSet,
            NodeKind::Instance,
            NodeKind::Rectangle,
            NodeKind::Ellipse,
            NodeKind::Line,
            NodeKind::Vector,
            NodeKind::Text,
        ] {
            assert_eq!(NodeKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(NodeKind::from_label("sticker"), None);
    }

    #[test]
    fn mixed_serializes_value_transparently() {
        let value: Mixed<f64> = Mixed::Value(16.0);
        assert_eq!(serde_json::to_value(&value).expect("serialize"), serde_json::json!(16.0));
    }

    #[test]
    fn mixed_sentinel_round_trips() {
        let sentinel: Mixed<String> = Mixed::Mixed;
        let raw = serde_json::to_value(&sentinel).expect("serialize");
        assert_eq!(raw, serde_json::json!({ "mixed": true }));
        let back: Mixed<String> = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(back, Mixed::Mixed);
    }

    #[test]
    fn scene_node_defaults_apply_on_deserialize() {
        let node: SceneNode = serde_json::from_value(serde_json::json!({
            "id": "1:1",
            "name": "Hero",
            "kind": "frame",
        }))
        .expect("deserialize");
        assert!(node.visible());
        assert_eq!(node.opacity(), 1.0);
        assert!(node.fills().is_empty());
        assert_eq!(node.layout().mode, LayoutMode::None);
    }

    #[test]
    fn scene_node_builder_sets_fields() {
        let node = SceneNode::new(nid("1:2"), "Card", NodeKind::Frame)
            .with_size(320.0, 200.0)
            .with_layout(Layout::vertical().with_item_spacing(8.0))
            .with_fills(vec![Paint::solid(Rgba::opaque(1.0, 1.0, 1.0))]);
        assert_eq!(node.width(), 320.0);
        assert_eq!(node.layout().mode, LayoutMode::Vertical);
        assert_eq!(node.fills().len(), 1);
    }
}
