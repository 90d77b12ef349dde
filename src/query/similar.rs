// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Attribute-overlap similarity between same-type nodes.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Document, NodeId, NodeKind, SceneNode};
use crate::project::project;

use super::{QueryError, MAX_RESULTS};

pub const DEFAULT_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SimilarMatch {
    pub node_id: String,
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SimilarMatches {
    pub matches: Vec<SimilarMatch>,
    pub total_matches: u64,
}

/// Find nodes of the same structural type whose non-identity attribute sets
/// overlap with the target's at ratio `threshold` or better.
///
/// Score = equal keys / union keys over the childless projections; an empty
/// union is never a match (two bare nodes are incomparable). Results are sorted
/// by descending score and capped at [`MAX_RESULTS`]; the total before the
/// cap is always reported.
pub fn find_similar(
    document: &Document,
    node_id: &NodeId,
    threshold: f64,
) -> Result<SimilarMatches, QueryError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(QueryError::invalid_input(format!(
            "threshold must be between 0 and 1, got {threshold}"
        )));
    }

    let target = document.node(node_id).ok_or_else(|| QueryError::not_found(node_id))?;
    let target_attrs = project(target).attrs;

    let mut matches: Vec<SimilarMatch> = candidates(document, target)
        .into_iter()
        .filter_map(|candidate| {
            let score = similarity(&target_attrs, &project(candidate).attrs)?;
            (score >= threshold).then(|| SimilarMatch {
                node_id: candidate.id().as_str().to_owned(),
                name: candidate.name().to_owned(),
                score,
            })
        })
        .collect();

    matches.sort_by(|left, right| {
        right
            .score
            .partial_cmp(&left.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| left.node_id.cmp(&right.node_id))
    });

    let total_matches = matches.len() as u64;
    matches.truncate(MAX_RESULTS);
    Ok(SimilarMatches { matches, total_matches })
}

/// Same-type nodes in the target's page (all pages for a page-level target),
/// the target itself excluded.
fn candidates<'a>(document: &'a Document, target: &SceneNode) -> Vec<&'a SceneNode> {
    let scope_root = match target.kind() {
        NodeKind::Document | NodeKind::Page => document.root(),
        _ => document
            .pages()
            .find(|page| {
                document
                    .subtree(page.id())
                    .is_some_and(|nodes| nodes.iter().any(|n| n.id() == target.id()))
            })
            .unwrap_or(document.root()),
    };

    document
        .subtree(scope_root.id())
        .unwrap_or_default()
        .into_iter()
        .filter(|node| node.kind() == target.kind() && node.id() != target.id())
        .collect()
}

/// `None` when the key union is empty: two bare nodes are not comparable and
/// never a match, whatever the threshold.
fn similarity(a: &BTreeMap<String, Value>, b: &BTreeMap<String, Value>) -> Option<f64> {
    let union: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
    if union.is_empty() {
        return None;
    }
    let equal = union.iter().filter(|key| a.get(**key) == b.get(**key)).count();
    Some(equal as f64 / union.len() as f64)
}
