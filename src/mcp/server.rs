// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::bridge::{Bridge, BridgeError};
use crate::protocol::{
    AnnotationReadResult, AnnotationWriteParams, AnnotationWriteResult, ChildrenParams,
    ChildrenResult, CompareParams, CompareResult, CssResult, FramesResult, InferResult, LintResult,
    NodeDetailResult, NodeParams, PageFramesParams, PagesResult, RepeatedResult, ScopeParams,
    SearchParams, SearchResult, SelectionResult, SimilarParams, SimilarResult, StylesResult,
    TokensResult, VariablesResult, VariantsResult,
};
use crate::render::SvgExport;

/// Orchestrator-facing tool server over one [`Bridge`].
#[derive(Clone)]
pub struct ProteusMcp {
    bridge: Bridge,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ProteusMcp {
    pub fn new(bridge: Bridge) -> Self {
        Self { bridge, tool_router: Self::tool_router() }
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<T, ErrorData> {
        let result = self.bridge.send(method, params).await.map_err(bridge_error)?;
        decode_result(method, result)
    }

    fn params_value<P: serde::Serialize>(params: P) -> Option<Value> {
        Some(serde_json::to_value(params).expect("serialize tool params"))
    }

    /// List the document's top-level groupings (pages); start here, then walk
    /// down with `scene.page_frames` and `node.children`.
    #[tool(name = "scene.pages")]
    async fn scene_pages(&self) -> Result<Json<PagesResult>, ErrorData> {
        Ok(Json(self.call("get_pages", None).await?))
    }

    /// List a page's direct children as compact projections; defaults to the
    /// current page.
    #[tool(name = "scene.page_frames")]
    async fn scene_page_frames(
        &self,
        params: Parameters<PageFramesParams>,
    ) -> Result<Json<FramesResult>, ErrorData> {
        Ok(Json(self.call("get_page_frames", Self::params_value(params.0)).await?))
    }

    /// Project the nodes currently selected in the host application.
    #[tool(name = "scene.selection")]
    async fn scene_selection(&self) -> Result<Json<SelectionResult>, ErrorData> {
        Ok(Json(self.call("get_selection", None).await?))
    }

    /// Expand a subtree to a bounded depth (1..=10); children at the requested
    /// depth are truncated, not errored.
    #[tool(name = "node.children")]
    async fn node_children(
        &self,
        params: Parameters<ChildrenParams>,
    ) -> Result<Json<ChildrenResult>, ErrorData> {
        Ok(Json(self.call("get_children", Self::params_value(params.0)).await?))
    }

    /// List the members of a variant group; fails as not-found on any other
    /// node kind.
    #[tool(name = "node.variants")]
    async fn node_variants(
        &self,
        params: Parameters<NodeParams>,
    ) -> Result<Json<VariantsResult>, ErrorData> {
        Ok(Json(self.call("get_variants", Self::params_value(params.0)).await?))
    }

    /// Search a scope by name substring and/or node kind; capped at 20
    /// matches with the true total reported.
    #[tool(name = "scene.search")]
    async fn scene_search(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<Json<SearchResult>, ErrorData> {
        Ok(Json(self.call("search_nodes", Self::params_value(params.0)).await?))
    }

    /// Full default-omitting projection of one node, child count included.
    #[tool(name = "node.get")]
    async fn node_get(
        &self,
        params: Parameters<NodeParams>,
    ) -> Result<Json<NodeDetailResult>, ErrorData> {
        Ok(Json(self.call("get_node", Self::params_value(params.0)).await?))
    }

    /// Render a node's visual attributes as CSS declarations.
    #[tool(name = "node.css")]
    async fn node_css(
        &self,
        params: Parameters<NodeParams>,
    ) -> Result<Json<CssResult>, ErrorData> {
        Ok(Json(self.call("get_css", Self::params_value(params.0)).await?))
    }

    /// Export a node as a base64-encoded SVG image.
    #[tool(name = "node.export")]
    async fn node_export(
        &self,
        params: Parameters<NodeParams>,
    ) -> Result<Json<SvgExport>, ErrorData> {
        Ok(Json(self.call("export_node", Self::params_value(params.0)).await?))
    }

    /// Design tokens: variables resolved per collection.
    #[tool(name = "tokens.get")]
    async fn tokens_get(&self) -> Result<Json<TokensResult>, ErrorData> {
        Ok(Json(self.call("get_tokens", None).await?))
    }

    /// Raw document variables, unresolved.
    #[tool(name = "variables.get")]
    async fn variables_get(&self) -> Result<Json<VariablesResult>, ErrorData> {
        Ok(Json(self.call("get_variables", None).await?))
    }

    /// The document's published style catalog.
    #[tool(name = "styles.get")]
    async fn styles_get(&self) -> Result<Json<StylesResult>, ErrorData> {
        Ok(Json(self.call("get_styles", None).await?))
    }

    /// Field-level diff between two nodes; identical fields are omitted, so
    /// comparing a node to itself yields an empty map.
    #[tool(name = "node.compare")]
    async fn node_compare(
        &self,
        params: Parameters<CompareParams>,
    ) -> Result<Json<CompareResult>, ErrorData> {
        Ok(Json(self.call("compare_nodes", Self::params_value(params.0)).await?))
    }

    /// Find repeated container structures in a scope — componentization
    /// candidates.
    #[tool(name = "scene.repeated")]
    async fn scene_repeated(
        &self,
        params: Parameters<ScopeParams>,
    ) -> Result<Json<RepeatedResult>, ErrorData> {
        Ok(Json(self.call("find_repeated", Self::params_value(params.0)).await?))
    }

    /// Find same-type nodes whose attributes overlap the target's at the
    /// given threshold (default 0.7).
    #[tool(name = "node.similar")]
    async fn node_similar(
        &self,
        params: Parameters<SimilarParams>,
    ) -> Result<Json<SimilarResult>, ErrorData> {
        Ok(Json(self.call("find_similar", Self::params_value(params.0)).await?))
    }

    /// Infer a confidence-scored interaction state machine from variant
    /// names, reactions, and any stored annotation.
    #[tool(name = "node.infer_states")]
    async fn node_infer_states(
        &self,
        params: Parameters<NodeParams>,
    ) -> Result<Json<InferResult>, ErrorData> {
        Ok(Json(self.call("infer_states", Self::params_value(params.0)).await?))
    }

    /// Exhaustively lint a scope for generic auto-generated names; the issue
    /// list is never capped.
    #[tool(name = "scene.lint_names")]
    async fn scene_lint_names(
        &self,
        params: Parameters<ScopeParams>,
    ) -> Result<Json<LintResult>, ErrorData> {
        Ok(Json(self.call("lint_names", Self::params_value(params.0)).await?))
    }

    /// Read the stored state annotation for a node, if any.
    #[tool(name = "annotation.get")]
    async fn annotation_get(
        &self,
        params: Parameters<NodeParams>,
    ) -> Result<Json<AnnotationReadResult>, ErrorData> {
        Ok(Json(self.call("get_annotation", Self::params_value(params.0)).await?))
    }

    /// Persist a state annotation on a node; malformed payloads are rejected,
    /// never partially stored.
    #[tool(name = "annotation.set")]
    async fn annotation_set(
        &self,
        params: Parameters<AnnotationWriteParams>,
    ) -> Result<Json<AnnotationWriteResult>, ErrorData> {
        Ok(Json(self.call("set_annotation", Self::params_value(params.0)).await?))
    }
}

#[tool_handler]
impl ServerHandler for ProteusMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Proteus scene inspection server (tools: scene.pages, scene.page_frames, scene.selection, scene.search, scene.repeated, scene.lint_names, node.children, node.variants, node.get, node.css, node.export, node.compare, node.similar, node.infer_states, tokens.get, variables.get, styles.get, annotation.get, annotation.set). Requires a live sandbox connection on the channel port."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// Bridge-error mapping and result decoding for MCP tool handlers.
include!("server/helpers.rs");

#[cfg(test)]
mod e2e;
