// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over a scene document.
//!
//! Every operation here is a pure function of the document; results that can
//! grow with document size are capped at [`MAX_RESULTS`] entries (with the
//! true total reported), except linting, which is intentionally exhaustive.

pub mod children;
pub mod diff;
pub mod infer;
pub mod lint;
pub mod repeated;
pub mod search;
pub mod similar;

use std::fmt;

use crate::model::{Document, NodeId, SceneNode};

/// Cap applied to search/similarity/repetition result lists.
pub const MAX_RESULTS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    NotFound { node_id: String },
    Unsupported { node_id: String, kind: String, operation: String },
    InvalidInput { message: String },
    InvalidPayload { message: String },
}

impl QueryError {
    pub fn not_found(node_id: &NodeId) -> Self {
        Self::NotFound { node_id: node_id.as_str().to_owned() }
    }

    pub fn unsupported(node: &SceneNode, operation: &str) -> Self {
        Self::Unsupported {
            node_id: node.id().as_str().to_owned(),
            kind: node.kind().label().to_owned(),
            operation: operation.to_owned(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput { message: message.into() }
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload { message: message.into() }
    }

    /// Stable machine-readable code, used verbatim on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Unsupported { .. } => "unsupported_operation",
            Self::InvalidInput { .. } => "invalid_params",
            Self::InvalidPayload { .. } => "invalid_payload",
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { node_id } => write!(f, "no node with id '{node_id}'"),
            Self::Unsupported { node_id, kind, operation } => {
                write!(f, "{operation} is not supported for '{node_id}' (kind {kind})")
            }
            Self::InvalidInput { message } | Self::InvalidPayload { message } => {
                f.write_str(message)
            }
        }
    }
}

impl std::error::Error for QueryError {}

/// Resolve an optional scope to its pre-order node list; defaults to the
/// document's current page, the scope root included.
pub fn scope_nodes<'a>(
    document: &'a Document,
    scope_id: Option<&NodeId>,
) -> Result<Vec<&'a SceneNode>, QueryError> {
    let scope_id = match scope_id {
        Some(scope_id) => scope_id.clone(),
        None => document.current_page_id().clone(),
    };
    document.subtree(&scope_id).ok_or_else(|| QueryError::not_found(&scope_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::demo_document;

    #[test]
    fn scope_defaults_to_the_current_page() {
        let document = demo_document();
        let nodes = scope_nodes(&document, None).expect("scope");
        assert_eq!(nodes[0].name(), "Landing");
        assert!(nodes.iter().any(|n| n.name() == "Hero"));
        assert!(nodes.iter().all(|n| n.name() != "Old Hero"));
    }

    #[test]
    fn unknown_scope_is_not_found() {
        let document = demo_document();
        let scope = NodeId::new("9:9").expect("node id");
        assert_eq!(
            scope_nodes(&document, Some(&scope)),
            Err(QueryError::NotFound { node_id: "9:9".to_owned() })
        );
    }
}
