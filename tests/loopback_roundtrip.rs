// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Black-box round trip over a real loopback socket using only the public
//! crate API: host bridge on one side, sandbox runtime on the other.

use std::time::Duration;

use serde_json::json;

use proteus::bridge::Bridge;
use proteus::model::fixtures::demo_document;
use proteus::sandbox::SandboxRuntime;

async fn start_pair() -> Bridge {
    let bridge = Bridge::new();
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.expect("bind listener");
    let port = listener.local_addr().expect("local addr").port();
    let _ = tokio::spawn(bridge.clone().listen(listener));

    let _ = tokio::spawn(async move {
        let mut runtime = SandboxRuntime::new(demo_document());
        let _ = runtime.run(&format!("ws://127.0.0.1:{port}")).await;
    });

    for _ in 0..200 {
        if bridge.is_connected() {
            return bridge;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("sandbox never connected");
}

#[tokio::test]
async fn concurrent_queries_multiplex_over_one_channel() {
    let bridge = start_pair().await;

    let pages = bridge.send("get_pages", None);
    let lint = bridge.send("lint_names", None);
    let children = bridge.send("get_children", Some(json!({ "node_id": "0:1", "depth": 2 })));
    let (pages, lint, children) = tokio::join!(pages, lint, children);

    let pages = pages.expect("pages");
    assert_eq!(pages["pages"][0]["name"], json!("Landing"));

    let lint = lint.expect("lint");
    assert_eq!(lint["issues"][0]["name"], json!("Frame 47"));

    let children = children.expect("children");
    assert_eq!(children["depth"], json!(2));

    assert_eq!(bridge.pending_count(), 0);
}

#[tokio::test]
async fn identical_projection_requests_are_deterministic() {
    let bridge = start_pair().await;

    let first = bridge
        .send("get_node", Some(json!({ "node_id": "1:1" })))
        .await
        .expect("first projection");
    let second = bridge
        .send("get_node", Some(json!({ "node_id": "1:1" })))
        .await
        .expect("second projection");
    assert_eq!(
        serde_json::to_string(&first).expect("serialize"),
        serde_json::to_string(&second).expect("serialize")
    );
}

#[tokio::test]
async fn sandbox_side_failures_stay_structured() {
    let bridge = start_pair().await;

    let err = bridge
        .send("get_children", Some(json!({ "node_id": "0:1", "depth": 40 })))
        .await
        .unwrap_err();
    match err {
        proteus::bridge::BridgeError::Remote { code, message } => {
            assert_eq!(code, "invalid_params");
            assert!(message.contains("depth"));
        }
        other => panic!("expected a remote error, got {other:?}"),
    }

    let err = bridge.send("warp_reality", None).await.unwrap_err();
    match err {
        proteus::bridge::BridgeError::Remote { code, .. } => assert_eq!(code, "unknown_method"),
        other => panic!("expected a remote error, got {other:?}"),
    }
}
