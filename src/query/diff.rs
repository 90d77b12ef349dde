// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Field-level diff between two projected nodes.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Document, NodeId};
use crate::project::{project_with_child_count, Projection};

use super::QueryError;

/// The two sides of one differing field; a side missing the field is `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiffSides {
    pub a: Value,
    pub b: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NodeDiff {
    pub differences: BTreeMap<String, DiffSides>,
    pub difference_count: u64,
}

/// Compare two nodes field by field over their projections (child counts
/// included, subtrees not). Identity (`id`) is excluded; every other key in
/// the union of both attribute sets participates, and identical keys are
/// omitted entirely. Symmetric up to which side is labeled `a` vs `b`.
pub fn compare(document: &Document, id_a: &NodeId, id_b: &NodeId) -> Result<NodeDiff, QueryError> {
    let node_a = document.node(id_a).ok_or_else(|| QueryError::not_found(id_a))?;
    let node_b = document.node(id_b).ok_or_else(|| QueryError::not_found(id_b))?;

    let fields_a = comparable_fields(&project_with_child_count(node_a));
    let fields_b = comparable_fields(&project_with_child_count(node_b));

    let keys: BTreeSet<&String> = fields_a.keys().chain(fields_b.keys()).collect();
    let mut differences = BTreeMap::new();
    for key in keys {
        let a = fields_a.get(key).cloned().unwrap_or(Value::Null);
        let b = fields_b.get(key).cloned().unwrap_or(Value::Null);
        if a != b {
            let _ = differences.insert(key.clone(), DiffSides { a, b });
        }
    }

    let difference_count = differences.len() as u64;
    Ok(NodeDiff { differences, difference_count })
}

fn comparable_fields(projection: &Projection) -> BTreeMap<String, Value> {
    let mut fields = projection.attrs.clone();
    let _ = fields.insert("name".to_owned(), Value::String(projection.name.clone()));
    let _ = fields.insert("type".to_owned(), Value::String(projection.kind.clone()));
    if let Some(child_count) = projection.child_count {
        let _ = fields.insert("child_count".to_owned(), Value::from(child_count));
    }
    fields
}
