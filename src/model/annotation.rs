// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Author-supplied state annotations persisted in the document's shared store.
//!
//! The store itself is opaque key-value data owned by the host document; this
//! module only fixes the namespace and the JSON shape written under it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::document::Document;
use super::ids::NodeId;

/// Namespace under which annotation blobs live in the shared store, keyed by
/// node id. Survives independently of any bridge process.
pub const ANNOTATION_NAMESPACE: &str = "proteus";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StateTransition {
    pub from: String,
    pub to: String,
    pub trigger: String,
}

/// Explicit state/transition metadata written by an author.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Annotation {
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub transitions: Vec<StateTransition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Annotation {
    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.transitions.is_empty() && self.notes.is_none()
    }
}

/// Read the stored annotation for a node. Unparseable content is treated as
/// absent, never as an error.
pub fn read_annotation(document: &Document, node_id: &NodeId) -> Option<Annotation> {
    let raw = document.shared_get(ANNOTATION_NAMESPACE, node_id.as_str())?;
    serde_json::from_str(raw).ok()
}

/// Persist an annotation for a node, replacing any previous one.
pub fn write_annotation(document: &mut Document, node_id: &NodeId, annotation: &Annotation) {
    let raw = serde_json::to_string(annotation).expect("serialize annotation");
    document.shared_set(ANNOTATION_NAMESPACE, node_id.as_str(), raw);
}
