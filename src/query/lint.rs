// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Lint pass over node names.
//!
//! Flags names still carrying the host's auto-generated counter pattern
//! (`Frame 47`, `Rectangle 12`, ...). Unlike search and similarity this pass
//! is exhaustive: the full issue list is returned uncapped.

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Document, NodeId};

use super::QueryError;

pub const ISSUE_GENERIC_NAME: &str = "generic-name";

/// Category keywords in match order; the first matching pattern wins and a
/// node is flagged at most once.
const GENERIC_NAME_CATEGORIES: &[&str] = &[
    "Frame",
    "Group",
    "Rectangle",
    "Ellipse",
    "Line",
    "Vector",
    "Text",
    "Component",
    "Instance",
    "Page",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LintIssue {
    pub node_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub issue: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LintReport {
    pub issues: Vec<LintIssue>,
    pub scanned: u64,
}

/// Scan every node in the scope (default: current page) for generic names.
pub fn lint_names(document: &Document, scope_id: Option<&NodeId>) -> Result<LintReport, QueryError> {
    let nodes = super::scope_nodes(document, scope_id)?;
    let patterns = generic_name_patterns();

    let mut issues = Vec::new();
    for node in &nodes {
        let Some(category) = patterns
            .iter()
            .find_map(|(category, pattern)| pattern.is_match(node.name()).then_some(*category))
        else {
            continue;
        };
        issues.push(LintIssue {
            node_id: node.id().as_str().to_owned(),
            name: node.name().to_owned(),
            kind: node.kind().label().to_owned(),
            issue: ISSUE_GENERIC_NAME.to_owned(),
            suggestion: format!(
                "Rename '{}' to describe its content instead of the default {} counter",
                node.name(),
                category.to_lowercase(),
            ),
        });
    }

    Ok(LintReport { scanned: nodes.len() as u64, issues })
}

fn generic_name_patterns() -> Vec<(&'static str, Regex)> {
    GENERIC_NAME_CATEGORIES
        .iter()
        .map(|category| {
            let pattern = Regex::new(&format!(r"^{category}\s+\d+$")).expect("valid lint pattern");
            (*category, pattern)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::demo_document;
    use rstest::rstest;

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    #[rstest]
    #[case("Frame 47", true)]
    #[case("Group 3", true)]
    #[case("Vector  12", true)]
    #[case("Hero Frame", false)]
    #[case("Frame47", false)]
    #[case("Frame 47b", false)]
    #[case("frame 47", false)]
    fn generic_patterns_match_exactly(#[case] name: &str, #[case] flagged: bool) {
        let matched = generic_name_patterns()
            .iter()
            .any(|(_, pattern)| pattern.is_match(name));
        assert_eq!(matched, flagged, "name: {name}");
    }

    #[test]
    fn flags_default_counter_names_only() {
        let document = demo_document();
        let report = lint_names(&document, None).expect("lint");
        let flagged: Vec<&str> = report.issues.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(flagged, vec!["Frame 47", "Rectangle 12"]);
        assert!(report.issues.iter().all(|i| i.issue == ISSUE_GENERIC_NAME));
    }

    #[test]
    fn descriptive_names_pass() {
        use crate::model::{NodeKind, SceneNode};
        let root = SceneNode::new(nid("0:0"), "Doc", NodeKind::Document).with_children(vec![
            SceneNode::new(nid("0:1"), "Page", NodeKind::Page).with_children(vec![
                SceneNode::new(nid("1:1"), "Hero Frame", NodeKind::Frame),
                SceneNode::new(nid("1:2"), "Frame 47", NodeKind::Frame),
                SceneNode::new(nid("1:3"), "Frame47", NodeKind::Frame),
                SceneNode::new(nid("1:4"), "Frame 47b", NodeKind::Frame),
            ]),
        ]);
        let document = Document::new(root).expect("document");
        let report = lint_names(&document, None).expect("lint");
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].node_id, "1:2");
        assert_eq!(report.scanned, 5);
    }

    #[test]
    fn scanned_counts_the_whole_scope() {
        let document = demo_document();
        let report = lint_names(&document, None).expect("lint");
        let page_size = document.subtree(document.current_page_id()).expect("subtree").len();
        assert_eq!(report.scanned, page_size as u64);
    }

    #[test]
    fn scope_narrows_the_scan() {
        let document = demo_document();
        let scope = nid("1:1");
        let report = lint_names(&document, Some(&scope)).expect("lint");
        assert!(report.issues.is_empty());
        assert_eq!(report.scanned, 3);
    }
}
