// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Name/type search over a scope, ranked by fuzzy match quality.

use std::cmp::Ordering;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Document, NodeId, NodeKind};

use super::{QueryError, MAX_RESULTS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchMatch {
    pub node_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Fuzzy rank in `0..=100`; absent when no name query was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchMatches {
    pub matches: Vec<SearchMatch>,
    pub total_matches: u64,
}

/// Search a scope (default: current page) by case-insensitive name substring
/// and/or node kind. With a name query, results are ranked by
/// `rapidfuzz` ratio; without one, document order is kept. Capped at
/// [`MAX_RESULTS`] with the true total reported.
pub fn search_nodes(
    document: &Document,
    query: Option<&str>,
    kind: Option<NodeKind>,
    scope_id: Option<&NodeId>,
) -> Result<SearchMatches, QueryError> {
    if query.is_none() && kind.is_none() {
        return Err(QueryError::invalid_input("search needs a name query or a node kind"));
    }

    let needle = query.map(str::to_lowercase);
    let mut matches: Vec<SearchMatch> = super::scope_nodes(document, scope_id)?
        .into_iter()
        .filter(|node| kind.map_or(true, |kind| node.kind() == kind))
        .filter(|node| {
            needle.as_ref().map_or(true, |needle| node.name().to_lowercase().contains(needle))
        })
        .map(|node| SearchMatch {
            node_id: node.id().as_str().to_owned(),
            name: node.name().to_owned(),
            kind: node.kind().label().to_owned(),
            score: query.map(|query| rapidfuzz::fuzz::ratio(query.chars(), node.name().chars())),
        })
        .collect();

    if query.is_some() {
        matches.sort_by(|left, right| {
            right
                .score
                .partial_cmp(&left.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| left.node_id.cmp(&right.node_id))
        });
    }

    let total_matches = matches.len() as u64;
    matches.truncate(MAX_RESULTS);
    Ok(SearchMatches { matches, total_matches })
}
