// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Bounded-depth expansion of a subtree into projections.

use crate::model::{Document, NodeId, NodeKind};
use crate::project::{project_tree, Projection};

use super::QueryError;

pub const MIN_DEPTH: u64 = 1;
pub const MAX_DEPTH: u64 = 10;
pub const DEFAULT_DEPTH: u64 = 1;

/// Project the children of a node, recursing `depth` levels.
///
/// Children at levels below `depth` carry a `children` field; children at
/// level `depth` do not — deeper levels are silently truncated. The document
/// root is not traversable and resolves as not-found.
pub fn get_children(
    document: &Document,
    node_id: &NodeId,
    depth: u64,
) -> Result<Vec<Projection>, QueryError> {
    if !(MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
        return Err(QueryError::invalid_input(format!(
            "depth must be between {MIN_DEPTH} and {MAX_DEPTH}, got {depth}"
        )));
    }

    let node = document.node(node_id).ok_or_else(|| QueryError::not_found(node_id))?;
    if node.kind() == NodeKind::Document {
        return Err(QueryError::not_found(node_id));
    }

    Ok(node.children().iter().map(|child| project_tree(child, depth - 1)).collect())
}
