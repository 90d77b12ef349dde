// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire frames and operation payload types shared by the bridge, the sandbox
//! dispatcher, and the orchestrator-facing tool surface.
//!
//! One WebSocket text frame carries one JSON object: a [`Command`] outbound,
//! a [`ResponseFrame`] inbound. Correlation ids travel as strings.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Annotation, StyleCatalog, Variable};
use crate::project::Projection;
use crate::query::diff::DiffSides;
use crate::query::infer::InferredStateMachine;
use crate::query::lint::LintIssue;
use crate::query::repeated::RepeatedGroup;
use crate::query::search::SearchMatch;
use crate::query::similar::SimilarMatch;

pub const RESPONSE_FRAME_TYPE: &str = "response";

/// One outbound command to the sandbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub id: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Structured error carried inside a response; exactly one of
/// `result`/`error` is present on the frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// One inbound response from the sandbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFrame {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl ResponseFrame {
    pub fn ok(id: impl Into<String>, result: Value) -> Self {
        Self {
            id: id.into(),
            kind: RESPONSE_FRAME_TYPE.to_owned(),
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: RESPONSE_FRAME_TYPE.to_owned(),
            result: None,
            error: Some(ErrorBody { code: code.into(), message: message.into() }),
        }
    }
}

// ─── Operation parameters ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PageFramesParams {
    /// Page to list; defaults to the current page.
    pub page_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChildrenParams {
    pub node_id: String,
    /// Expansion depth, `1..=10`; defaults to 1.
    pub depth: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NodeParams {
    pub node_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Case-insensitive name substring.
    pub query: Option<String>,
    /// Structural kind label, e.g. `frame` or `text`.
    pub node_kind: Option<String>,
    /// Subtree to search; defaults to the current page.
    pub scope_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompareParams {
    pub node_a: String,
    pub node_b: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SimilarParams {
    pub node_id: String,
    /// Minimum attribute-overlap ratio in `0..=1`; defaults to 0.7.
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScopeParams {
    /// Subtree to scan; defaults to the current page.
    pub scope_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnnotationWriteParams {
    pub node_id: String,
    pub annotation: Annotation,
}

// ─── Operation results ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PageSummary {
    pub id: String,
    pub name: String,
    pub child_count: u64,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PagesResult {
    pub pages: Vec<PageSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FramesResult {
    pub page_id: String,
    pub frames: Vec<Projection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SelectionResult {
    pub nodes: Vec<Projection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChildrenResult {
    pub node_id: String,
    pub depth: u64,
    pub children: Vec<Projection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VariantsResult {
    pub node_id: String,
    pub variants: Vec<Projection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchResult {
    pub matches: Vec<SearchMatch>,
    pub total_matches: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NodeDetailResult {
    pub node: Projection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CssResult {
    pub node_id: String,
    pub css: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TokensResult {
    /// Collection → token name → resolved value.
    pub collections: BTreeMap<String, BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VariablesResult {
    pub variables: Vec<Variable>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StylesResult {
    pub styles: StyleCatalog,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompareResult {
    pub node_a: String,
    pub node_b: String,
    pub differences: BTreeMap<String, DiffSides>,
    pub difference_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RepeatedResult {
    pub groups: Vec<RepeatedGroup>,
    pub total_groups: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SimilarResult {
    pub node_id: String,
    pub matches: Vec<SimilarMatch>,
    pub total_matches: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InferResult {
    pub node_id: String,
    pub machine: InferredStateMachine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LintResult {
    pub issues: Vec<LintIssue>,
    pub scanned: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnnotationReadResult {
    pub node_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnnotationWriteResult {
    pub node_id: String,
    pub stored: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_omits_absent_params() {
        let command = Command { id: "1".to_owned(), method: "get_pages".to_owned(), params: None };
        let raw = serde_json::to_value(&command).expect("serialize");
        assert_eq!(raw, serde_json::json!({ "id": "1", "method": "get_pages" }));
    }

    #[test]
    fn response_frames_tag_their_type() {
        let ok = ResponseFrame::ok("7", serde_json::json!({ "pages": [] }));
        let raw = serde_json::to_value(&ok).expect("serialize");
        assert_eq!(raw.get("type"), Some(&serde_json::json!("response")));
        assert!(raw.get("error").is_none());

        let err = ResponseFrame::err("7", "not_found", "no node with id '9:9'");
        let raw = serde_json::to_value(&err).expect("serialize");
        assert!(raw.get("result").is_none());
        assert_eq!(
            raw.get("error"),
            Some(&serde_json::json!({ "code": "not_found", "message": "no node with id '9:9'" }))
        );
    }

    #[test]
    fn frames_round_trip() {
        let frame = ResponseFrame::ok("42", serde_json::json!([1, 2, 3]));
        let text = serde_json::to_string(&frame).expect("serialize");
        let back: ResponseFrame = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, frame);
    }
}
