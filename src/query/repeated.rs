// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Detection of repeated container structures — componentization candidates.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Document, NodeId, NodeKind, SceneNode};

use super::{QueryError, MAX_RESULTS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RepeatedGroup {
    /// Name of the first occurrence, as a human handle for the group.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u64,
    pub node_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RepeatedGroups {
    pub groups: Vec<RepeatedGroup>,
    pub total_groups: u64,
}

/// Group containers in the scope (default: current page) by structural
/// signature — the shape of the kind tree, names ignored — and report every
/// signature occurring at least twice. Groups are sorted by descending
/// occurrence count and capped at [`MAX_RESULTS`].
pub fn find_repeated(
    document: &Document,
    scope_id: Option<&NodeId>,
) -> Result<RepeatedGroups, QueryError> {
    let nodes = super::scope_nodes(document, scope_id)?;

    let mut by_signature: BTreeMap<String, Vec<&SceneNode>> = BTreeMap::new();
    for node in nodes {
        if node.children().is_empty()
            || matches!(node.kind(), NodeKind::Document | NodeKind::Page)
        {
            continue;
        }
        by_signature.entry(signature(node)).or_default().push(node);
    }

    let mut groups: Vec<RepeatedGroup> = by_signature
        .into_values()
        .filter(|occurrences| occurrences.len() >= 2)
        .map(|occurrences| RepeatedGroup {
            name: occurrences[0].name().to_owned(),
            kind: occurrences[0].kind().label().to_owned(),
            count: occurrences.len() as u64,
            node_ids: occurrences.iter().map(|n| n.id().as_str().to_owned()).collect(),
        })
        .collect();

    groups.sort_by(|left, right| {
        right.count.cmp(&left.count).then_with(|| left.node_ids.cmp(&right.node_ids))
    });

    let total_groups = groups.len() as u64;
    groups.truncate(MAX_RESULTS);
    Ok(RepeatedGroups { groups, total_groups })
}

fn signature(node: &SceneNode) -> String {
    let children: Vec<String> = node.children().iter().map(signature).collect();
    format!("{}({})", node.kind().label(), children.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::demo_document;

    #[test]
    fn twin_cards_form_one_group() {
        let document = demo_document();
        let result = find_repeated(&document, None).expect("repeated");
        let card_group = result
            .groups
            .iter()
            .find(|group| group.node_ids.contains(&"3:1".to_owned()))
            .expect("card group");
        assert_eq!(card_group.count, 2);
        assert_eq!(card_group.node_ids, vec!["3:1", "3:4"]);
        assert_eq!(card_group.name, "Card");
    }

    #[test]
    fn leaves_and_pages_are_ignored() {
        let document = demo_document();
        let result = find_repeated(&document, None).expect("repeated");
        for group in &result.groups {
            assert_ne!(group.kind, "page");
            assert_ne!(group.kind, "rectangle");
        }
    }

    #[test]
    fn unique_structures_report_no_group() {
        let document = demo_document();
        let scope = NodeId::new("1:1").expect("node id");
        let result = find_repeated(&document, Some(&scope)).expect("repeated");
        assert_eq!(result.total_groups, 0);
    }
}
