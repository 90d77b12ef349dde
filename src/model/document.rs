// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The scene document the sandbox runtime serves queries against.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ids::NodeId;
use super::node::{NodeKind, Paint, Rgba, SceneNode};

/// A named design variable, raw as the host stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Variable {
    pub id: String,
    pub name: String,
    pub collection: String,
    pub value: VariableValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VariableValue {
    Color { color: Rgba },
    Number { value: f64 },
    Text { value: String },
    Boolean { value: bool },
}

/// A reusable paint style published in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PaintStyleDef {
    pub id: String,
    pub name: String,
    pub paint: Paint,
}

/// A reusable text style published in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextStyleDef {
    pub id: String,
    pub name: String,
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct StyleCatalog {
    #[serde(default)]
    pub paint_styles: Vec<PaintStyleDef>,
    #[serde(default)]
    pub text_styles: Vec<TextStyleDef>,
}

impl StyleCatalog {
    pub fn is_empty(&self) -> bool {
        self.paint_styles.is_empty() && self.text_styles.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    RootIsNotDocument,
    NoPages,
    UnknownPage(String),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootIsNotDocument => f.write_str("document root must be a document node"),
            Self::NoPages => f.write_str("document must contain at least one page"),
            Self::UnknownPage(id) => write!(f, "document has no page with id '{id}'"),
        }
    }
}

impl std::error::Error for DocumentError {}

/// The whole scene graph plus document-level catalogs and the shared
/// key-value store annotations persist into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    root: SceneNode,
    current_page_id: NodeId,
    #[serde(default)]
    selection: Vec<NodeId>,
    #[serde(default)]
    variables: Vec<Variable>,
    #[serde(default)]
    styles: StyleCatalog,
    #[serde(default)]
    shared_data: BTreeMap<String, BTreeMap<String, String>>,
}

impl Document {
    /// Build a document around a root node of kind [`NodeKind::Document`]
    /// whose children are the pages; the first page becomes current.
    pub fn new(root: SceneNode) -> Result<Self, DocumentError> {
        if root.kind() != NodeKind::Document {
            return Err(DocumentError::RootIsNotDocument);
        }
        let first_page = root
            .children()
            .iter()
            .find(|child| child.kind() == NodeKind::Page)
            .ok_or(DocumentError::NoPages)?;
        let current_page_id = first_page.id().clone();
        Ok(Self {
            root,
            current_page_id,
            selection: Vec::new(),
            variables: Vec::new(),
            styles: StyleCatalog::default(),
            shared_data: BTreeMap::new(),
        })
    }

    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_styles(mut self, styles: StyleCatalog) -> Self {
        self.styles = styles;
        self
    }

    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    pub fn pages(&self) -> impl Iterator<Item = &SceneNode> {
        self.root.children().iter().filter(|child| child.kind() == NodeKind::Page)
    }

    pub fn current_page_id(&self) -> &NodeId {
        &self.current_page_id
    }

    pub fn current_page(&self) -> &SceneNode {
        self.pages()
            .find(|page| page.id() == &self.current_page_id)
            .unwrap_or(&self.root)
    }

    pub fn set_current_page(&mut self, page_id: NodeId) -> Result<(), DocumentError> {
        if !self.pages().any(|page| page.id() == &page_id) {
            return Err(DocumentError::UnknownPage(page_id.into_string()));
        }
        self.current_page_id = page_id;
        Ok(())
    }

    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: Vec<NodeId>) {
        self.selection = selection;
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn styles(&self) -> &StyleCatalog {
        &self.styles
    }

    /// Resolve a node anywhere in the graph, the root included.
    pub fn node(&self, node_id: &NodeId) -> Option<&SceneNode> {
        find_node(&self.root, node_id)
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.node(node_id).is_some()
    }

    /// Pre-order walk of a subtree, the subtree root first.
    pub fn subtree(&self, node_id: &NodeId) -> Option<Vec<&SceneNode>> {
        let start = self.node(node_id)?;
        let mut nodes = Vec::new();
        collect_subtree(start, &mut nodes);
        Some(nodes)
    }

    pub fn shared_get(&self, namespace: &str, key: &str) -> Option<&str> {
        self.shared_data.get(namespace)?.get(key).map(String::as_str)
    }

    pub fn shared_set(&mut self, namespace: &str, key: impl Into<String>, value: impl Into<String>) {
        let _ = self
            .shared_data
            .entry(namespace.to_owned())
            .or_default()
            .insert(key.into(), value.into());
    }
}

fn find_node<'a>(node: &'a SceneNode, node_id: &NodeId) -> Option<&'a SceneNode> {
    if node.id() == node_id {
        return Some(node);
    }
    node.children().iter().find_map(|child| find_node(child, node_id))
}

fn collect_subtree<'a>(node: &'a SceneNode, into: &mut Vec<&'a SceneNode>) {
    into.push(node);
    for child in node.children() {
        collect_subtree(child, into);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    fn two_page_document() -> Document {
        let root = SceneNode::new(nid("0:0"), "Document", NodeKind::Document).with_children(vec![
            SceneNode::new(nid("0:1"), "Page 1", NodeKind::Page).with_children(vec![
                SceneNode::new(nid("1:1"), "Hero", NodeKind::Frame).with_children(vec![
                    SceneNode::new(nid("1:2"), "Title", NodeKind::Text),
                ]),
            ]),
            SceneNode::new(nid("0:2"), "Page 2", NodeKind::Page),
        ]);
        Document::new(root).expect("document")
    }

    #[test]
    fn new_rejects_non_document_root() {
        let root = SceneNode::new(nid("0:0"), "Oops", NodeKind::Frame);
        assert_eq!(Document::new(root), Err(DocumentError::RootIsNotDocument));
    }

    #[test]
    fn new_rejects_pageless_root() {
        let root = SceneNode::new(nid("0:0"), "Document", NodeKind::Document);
        assert_eq!(Document::new(root), Err(DocumentError::NoPages));
    }

    #[test]
    fn first_page_becomes_current() {
        let document = two_page_document();
        assert_eq!(document.current_page_id().as_str(), "0:1");
    }

    #[test]
    fn set_current_page_validates_id() {
        let mut document = two_page_document();
        document.set_current_page(nid("0:2")).expect("switch page");
        assert_eq!(document.current_page().name(), "Page 2");
        assert!(document.set_current_page(nid("9:9")).is_err());
    }

    #[test]
    fn node_lookup_descends_the_graph() {
        let document = two_page_document();
        assert_eq!(document.node(&nid("1:2")).map(SceneNode::name), Some("Title"));
        assert!(document.node(&nid("7:7")).is_none());
    }

    #[test]
    fn subtree_walk_is_preorder() {
        let document = two_page_document();
        let names: Vec<&str> =
            document.subtree(&nid("0:1")).expect("subtree").iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["Page 1", "Hero", "Title"]);
    }

    #[test]
    fn shared_store_round_trips() {
        let mut document = two_page_document();
        assert!(document.shared_get("proteus", "1:1").is_none());
        document.shared_set("proteus", "1:1", "{\"states\":[]}");
        assert_eq!(document.shared_get("proteus", "1:1"), Some("{\"states\":[]}"));
    }
}
