// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! End-to-end coverage: every tool travels MCP → bridge → loopback WebSocket
//! → sandbox dispatch → engine and back.

use super::*;

use std::time::Duration;

use rmcp::handler::server::wrapper::Parameters;
use tokio::task::JoinHandle;

use crate::model::fixtures::demo_document;
use crate::model::{Annotation, StateTransition};
use crate::sandbox::SandboxRuntime;

struct Harness {
    bridge: Bridge,
    server: ProteusMcp,
    _sandbox: JoinHandle<()>,
}

impl Harness {
    async fn start() -> Self {
        let bridge = Bridge::new();
        let listener =
            tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.expect("bind listener");
        let port = listener.local_addr().expect("local addr").port();
        let _ = tokio::spawn(bridge.clone().listen(listener));

        let sandbox = tokio::spawn(async move {
            let mut runtime = SandboxRuntime::new(demo_document());
            let _ = runtime.run(&format!("ws://127.0.0.1:{port}")).await;
        });

        for _ in 0..200 {
            if bridge.is_connected() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(bridge.is_connected(), "sandbox never connected");

        Self { server: ProteusMcp::new(bridge.clone()), bridge, _sandbox: sandbox }
    }
}

fn node_params(node_id: &str) -> Parameters<NodeParams> {
    Parameters(NodeParams { node_id: node_id.to_owned() })
}

#[tokio::test]
async fn pages_list_travels_the_full_stack() {
    let harness = Harness::start().await;
    let Json(result) = harness.server.scene_pages().await.expect("pages");
    let names: Vec<&str> = result.pages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Landing", "Archive"]);
    assert!(result.pages[0].current);
    assert_eq!(harness.bridge.pending_count(), 0);
}

#[tokio::test]
async fn children_truncate_at_the_requested_depth() {
    let harness = Harness::start().await;
    let Json(result) = harness
        .server
        .node_children(Parameters(ChildrenParams { node_id: "0:1".to_owned(), depth: Some(2) }))
        .await
        .expect("children");
    let hero = result.children.iter().find(|c| c.name == "Hero").expect("hero");
    let grandchildren = hero.children.as_ref().expect("grandchildren");
    assert!(grandchildren.iter().all(|gc| gc.children.is_none()));
}

#[tokio::test]
async fn self_comparison_is_empty() {
    let harness = Harness::start().await;
    let Json(result) = harness
        .server
        .node_compare(Parameters(CompareParams {
            node_a: "2:2".to_owned(),
            node_b: "2:2".to_owned(),
        }))
        .await
        .expect("compare");
    assert_eq!(result.difference_count, 0);
    assert!(result.differences.is_empty());
}

#[tokio::test]
async fn strict_similarity_finds_only_the_twin() {
    let harness = Harness::start().await;
    let Json(result) = harness
        .server
        .node_similar(Parameters(SimilarParams {
            node_id: "3:3".to_owned(),
            threshold: Some(1.0),
        }))
        .await
        .expect("similar");
    assert_eq!(result.total_matches, 1);
    assert_eq!(result.matches[0].node_id, "3:6");
}

#[tokio::test]
async fn lint_flags_generic_names_only() {
    let harness = Harness::start().await;
    let Json(result) =
        harness.server.scene_lint_names(Parameters(ScopeParams::default())).await.expect("lint");
    let names: Vec<&str> = result.issues.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Frame 47", "Rectangle 12"]);
    assert!(!names.contains(&"Hero"));
}

#[tokio::test]
async fn variant_names_infer_the_conventional_machine() {
    let harness = Harness::start().await;
    let Json(result) =
        harness.server.node_infer_states(node_params("2:1")).await.expect("infer");
    assert!(result.machine.states.contains(&"Default".to_owned()));
    assert!(result.machine.states.contains(&"Hover".to_owned()));
    assert_eq!(result.machine.confidence, 0.4);
    assert!(result
        .machine
        .transitions
        .iter()
        .any(|t| t.from == "Default" && t.to == "Hover"));
}

#[tokio::test]
async fn annotations_round_trip_and_raise_inference_confidence() {
    let harness = Harness::start().await;

    let Json(read) = harness.server.annotation_get(node_params("2:1")).await.expect("read");
    assert!(read.annotation.is_none());

    let annotation = Annotation {
        states: vec!["Loading".to_owned()],
        transitions: vec![StateTransition {
            from: "Default".to_owned(),
            to: "Loading".to_owned(),
            trigger: "submit".to_owned(),
        }],
        notes: Some("authored".to_owned()),
    };
    let Json(written) = harness
        .server
        .annotation_set(Parameters(AnnotationWriteParams {
            node_id: "2:1".to_owned(),
            annotation: annotation.clone(),
        }))
        .await
        .expect("write");
    assert!(written.stored);

    let Json(read) = harness.server.annotation_get(node_params("2:1")).await.expect("read");
    assert_eq!(read.annotation, Some(annotation));

    let Json(inferred) =
        harness.server.node_infer_states(node_params("2:1")).await.expect("infer");
    assert!((inferred.machine.confidence - 0.7).abs() < 1e-9);
    assert!(inferred.machine.states.contains(&"Loading".to_owned()));
}

#[tokio::test]
async fn search_export_css_tokens_styles_all_answer() {
    let harness = Harness::start().await;

    let Json(search) = harness
        .server
        .scene_search(Parameters(SearchParams {
            query: Some("card".to_owned()),
            node_kind: None,
            scope_id: None,
        }))
        .await
        .expect("search");
    assert!(search.total_matches >= 2);

    let Json(export) = harness.server.node_export(node_params("3:3")).await.expect("export");
    assert_eq!(export.format, "svg");
    assert!(!export.data.is_empty());

    let Json(css) = harness.server.node_css(node_params("1:1")).await.expect("css");
    assert_eq!(css.css.get("display").map(String::as_str), Some("flex"));

    let Json(tokens) = harness.server.tokens_get().await.expect("tokens");
    assert!(tokens.collections.contains_key("core"));

    let Json(variables) = harness.server.variables_get().await.expect("variables");
    assert_eq!(variables.variables.len(), 3);

    let Json(styles) = harness.server.styles_get().await.expect("styles");
    assert_eq!(styles.styles.paint_styles[0].name, "Brand/Primary");

    let Json(repeated) = harness
        .server
        .scene_repeated(Parameters(ScopeParams::default()))
        .await
        .expect("repeated");
    assert_eq!(repeated.groups[0].count, 2);

    let Json(variants) = harness.server.node_variants(node_params("2:1")).await.expect("variants");
    assert_eq!(variants.variants.len(), 3);

    let Json(selection) = harness.server.scene_selection().await.expect("selection");
    assert_eq!(selection.nodes[0].name, "Hero");

    let Json(frames) = harness
        .server
        .scene_page_frames(Parameters(PageFramesParams::default()))
        .await
        .expect("frames");
    assert_eq!(frames.frames.len(), 5);

    let Json(detail) = harness.server.node_get(node_params("1:2")).await.expect("detail");
    assert_eq!(detail.node.kind, "text");
}

#[tokio::test]
async fn sandbox_errors_surface_as_structured_tool_errors() {
    let harness = Harness::start().await;

    let err = harness.server.node_get(node_params("9:9")).await.err().unwrap();
    assert!(err.message.contains("no node with id '9:9'"));

    let err = harness.server.node_css(node_params("0:1")).await.err().unwrap();
    assert!(err.message.contains("not supported"));

    let err = harness.server.node_variants(node_params("1:1")).await.err().unwrap();
    assert!(err.message.contains("not a variant group"));
}
