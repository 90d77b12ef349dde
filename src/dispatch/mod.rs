// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Sandbox-side method dispatch.
//!
//! Inbound method names resolve to a [`Method`] variant and are handled with
//! an exhaustive match; every failure becomes a structured `{code, message}`
//! error rather than crashing the sandbox loop. Nothing here touches the
//! network — the runtime in [`crate::sandbox`] owns the socket.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::model::{
    read_annotation, write_annotation, Annotation, Document, NodeId, NodeKind, VariableValue,
};
use crate::project::{hex_color, project_with_child_count};
use crate::protocol::{
    AnnotationReadResult, AnnotationWriteResult, ChildrenParams, ChildrenResult, CompareParams,
    CompareResult, CssResult, ErrorBody, FramesResult, InferResult, LintResult, NodeDetailResult,
    NodeParams, PageFramesParams, PageSummary, PagesResult, RepeatedResult, ScopeParams,
    SearchParams, SearchResult, SelectionResult, SimilarParams, SimilarResult, StylesResult,
    TokensResult, VariablesResult, VariantsResult,
};
use crate::query::children::{get_children, DEFAULT_DEPTH};
use crate::query::diff::compare;
use crate::query::infer::infer_states;
use crate::query::lint::lint_names;
use crate::query::repeated::find_repeated;
use crate::query::search::search_nodes;
use crate::query::similar::{find_similar, DEFAULT_THRESHOLD};
use crate::query::QueryError;
use crate::render::{export_svg, render_css};

/// Every operation the sandbox understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GetPages,
    GetPageFrames,
    GetSelection,
    GetChildren,
    GetVariants,
    SearchNodes,
    GetNode,
    GetCss,
    ExportNode,
    GetTokens,
    GetVariables,
    GetStyles,
    CompareNodes,
    FindRepeated,
    FindSimilar,
    InferStates,
    LintNames,
    GetAnnotation,
    SetAnnotation,
}

impl Method {
    pub const ALL: &'static [Method] = &[
        Method::GetPages,
        Method::GetPageFrames,
        Method::GetSelection,
        Method::GetChildren,
        Method::GetVariants,
        Method::SearchNodes,
        Method::GetNode,
        Method::GetCss,
        Method::ExportNode,
        Method::GetTokens,
        Method::GetVariables,
        Method::GetStyles,
        Method::CompareNodes,
        Method::FindRepeated,
        Method::FindSimilar,
        Method::InferStates,
        Method::LintNames,
        Method::GetAnnotation,
        Method::SetAnnotation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::GetPages => "get_pages",
            Self::GetPageFrames => "get_page_frames",
            Self::GetSelection => "get_selection",
            Self::GetChildren => "get_children",
            Self::GetVariants => "get_variants",
            Self::SearchNodes => "search_nodes",
            Self::GetNode => "get_node",
            Self::GetCss => "get_css",
            Self::ExportNode => "export_node",
            Self::GetTokens => "get_tokens",
            Self::GetVariables => "get_variables",
            Self::GetStyles => "get_styles",
            Self::CompareNodes => "compare_nodes",
            Self::FindRepeated => "find_repeated",
            Self::FindSimilar => "find_similar",
            Self::InferStates => "infer_states",
            Self::LintNames => "lint_names",
            Self::GetAnnotation => "get_annotation",
            Self::SetAnnotation => "set_annotation",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|method| method.name() == name)
    }
}

/// Route one inbound command against the document.
pub fn dispatch(
    document: &mut Document,
    method_name: &str,
    params: Option<Value>,
) -> Result<Value, ErrorBody> {
    let Some(method) = Method::parse(method_name) else {
        return Err(ErrorBody {
            code: "unknown_method".to_owned(),
            message: format!("unknown method '{method_name}'"),
        });
    };

    match method {
        Method::GetPages => ok(pages(document)),
        Method::GetPageFrames => {
            let params: PageFramesParams = optional_params(params)?;
            ok(page_frames(document, params)?)
        }
        Method::GetSelection => ok(selection(document)),
        Method::GetChildren => {
            let params: ChildrenParams = required_params(params)?;
            let node_id = parse_node_id(&params.node_id)?;
            let depth = params.depth.unwrap_or(DEFAULT_DEPTH);
            let children = get_children(document, &node_id, depth)?;
            ok(ChildrenResult { node_id: node_id.into_string(), depth, children })
        }
        Method::GetVariants => {
            let params: NodeParams = required_params(params)?;
            ok(variants(document, &parse_node_id(&params.node_id)?)?)
        }
        Method::SearchNodes => {
            let params: SearchParams = optional_params(params)?;
            ok(search(document, params)?)
        }
        Method::GetNode => {
            let params: NodeParams = required_params(params)?;
            let node_id = parse_node_id(&params.node_id)?;
            let node =
                document.node(&node_id).ok_or_else(|| QueryError::not_found(&node_id))?;
            ok(NodeDetailResult { node: project_with_child_count(node) })
        }
        Method::GetCss => {
            let params: NodeParams = required_params(params)?;
            let node_id = parse_node_id(&params.node_id)?;
            let css = render_css(document, &node_id)?;
            ok(CssResult { node_id: node_id.into_string(), css })
        }
        Method::ExportNode => {
            let params: NodeParams = required_params(params)?;
            ok(export_svg(document, &parse_node_id(&params.node_id)?)?)
        }
        Method::GetTokens => ok(tokens(document)),
        Method::GetVariables => {
            ok(VariablesResult { variables: document.variables().to_vec() })
        }
        Method::GetStyles => ok(StylesResult { styles: document.styles().clone() }),
        Method::CompareNodes => {
            let params: CompareParams = required_params(params)?;
            let node_a = parse_node_id(&params.node_a)?;
            let node_b = parse_node_id(&params.node_b)?;
            let diff = compare(document, &node_a, &node_b)?;
            ok(CompareResult {
                node_a: node_a.into_string(),
                node_b: node_b.into_string(),
                differences: diff.differences,
                difference_count: diff.difference_count,
            })
        }
        Method::FindRepeated => {
            let params: ScopeParams = optional_params(params)?;
            let scope = parse_scope(params.scope_id.as_deref())?;
            let result = find_repeated(document, scope.as_ref())?;
            ok(RepeatedResult { groups: result.groups, total_groups: result.total_groups })
        }
        Method::FindSimilar => {
            let params: SimilarParams = required_params(params)?;
            let node_id = parse_node_id(&params.node_id)?;
            let threshold = params.threshold.unwrap_or(DEFAULT_THRESHOLD);
            let result = find_similar(document, &node_id, threshold)?;
            ok(SimilarResult {
                node_id: node_id.into_string(),
                matches: result.matches,
                total_matches: result.total_matches,
            })
        }
        Method::InferStates => {
            let params: NodeParams = required_params(params)?;
            let node_id = parse_node_id(&params.node_id)?;
            let machine = infer_states(document, &node_id)?;
            ok(InferResult { node_id: node_id.into_string(), machine })
        }
        Method::LintNames => {
            let params: ScopeParams = optional_params(params)?;
            let scope = parse_scope(params.scope_id.as_deref())?;
            let report = lint_names(document, scope.as_ref())?;
            ok(LintResult { issues: report.issues, scanned: report.scanned })
        }
        Method::GetAnnotation => {
            let params: NodeParams = required_params(params)?;
            let node_id = parse_node_id(&params.node_id)?;
            if !document.contains(&node_id) {
                return Err(QueryError::not_found(&node_id).into());
            }
            let annotation = read_annotation(document, &node_id);
            ok(AnnotationReadResult { node_id: node_id.into_string(), annotation })
        }
        Method::SetAnnotation => {
            let params: RawAnnotationWrite = required_params(params)?;
            let node_id = parse_node_id(&params.node_id)?;
            if !document.contains(&node_id) {
                return Err(QueryError::not_found(&node_id).into());
            }
            let annotation: Annotation =
                serde_json::from_value(params.annotation).map_err(|err| {
                    ErrorBody {
                        code: "invalid_payload".to_owned(),
                        message: format!("annotation does not parse: {err}"),
                    }
                })?;
            write_annotation(document, &node_id, &annotation);
            ok(AnnotationWriteResult { node_id: node_id.into_string(), stored: true })
        }
    }
}

/// Raw write payload; the annotation body is validated separately so garbage
/// surfaces as `invalid_payload`, not a generic parameter error.
#[derive(Debug, Deserialize)]
struct RawAnnotationWrite {
    node_id: String,
    annotation: Value,
}

fn pages(document: &Document) -> PagesResult {
    PagesResult {
        pages: document
            .pages()
            .map(|page| PageSummary {
                id: page.id().as_str().to_owned(),
                name: page.name().to_owned(),
                child_count: page.child_count(),
                current: page.id() == document.current_page_id(),
            })
            .collect(),
    }
}

fn page_frames(document: &Document, params: PageFramesParams) -> Result<FramesResult, ErrorBody> {
    let page_id = match params.page_id.as_deref() {
        Some(raw) => parse_node_id(raw)?,
        None => document.current_page_id().clone(),
    };
    let page = document.node(&page_id).ok_or_else(|| QueryError::not_found(&page_id))?;
    if page.kind() != NodeKind::Page {
        return Err(ErrorBody {
            code: "not_found".to_owned(),
            message: format!("'{page_id}' is not a page"),
        });
    }
    Ok(FramesResult {
        page_id: page_id.into_string(),
        frames: page.children().iter().map(project_with_child_count).collect(),
    })
}

fn selection(document: &Document) -> SelectionResult {
    SelectionResult {
        nodes: document
            .selection()
            .iter()
            .filter_map(|node_id| document.node(node_id))
            .map(project_with_child_count)
            .collect(),
    }
}

fn variants(document: &Document, node_id: &NodeId) -> Result<VariantsResult, ErrorBody> {
    let node = document.node(node_id).ok_or_else(|| QueryError::not_found(node_id))?;
    if node.kind() != NodeKind::ComponentSet {
        return Err(ErrorBody {
            code: "not_found".to_owned(),
            message: format!("'{node_id}' is not a variant group"),
        });
    }
    Ok(VariantsResult {
        node_id: node_id.as_str().to_owned(),
        variants: node.children().iter().map(project_with_child_count).collect(),
    })
}

fn search(document: &Document, params: SearchParams) -> Result<SearchResult, ErrorBody> {
    let kind = match params.node_kind.as_deref() {
        Some(label) => Some(NodeKind::from_label(label).ok_or_else(|| ErrorBody {
            code: "invalid_params".to_owned(),
            message: format!("unknown node kind '{label}'"),
        })?),
        None => None,
    };
    let scope = parse_scope(params.scope_id.as_deref())?;
    let result = search_nodes(document, params.query.as_deref(), kind, scope.as_ref())?;
    Ok(SearchResult { matches: result.matches, total_matches: result.total_matches })
}

fn tokens(document: &Document) -> TokensResult {
    let mut collections: std::collections::BTreeMap<
        String,
        std::collections::BTreeMap<String, Value>,
    > = std::collections::BTreeMap::new();
    for variable in document.variables() {
        let value = match &variable.value {
            VariableValue::Color { color } => Value::String(hex_color(*color)),
            VariableValue::Number { value } => serde_json::json!(value),
            VariableValue::Text { value } => Value::String(value.clone()),
            VariableValue::Boolean { value } => Value::Bool(*value),
        };
        let _ = collections
            .entry(variable.collection.clone())
            .or_default()
            .insert(variable.name.clone(), value);
    }
    TokensResult { collections }
}

fn parse_node_id(raw: &str) -> Result<NodeId, ErrorBody> {
    NodeId::new(raw).map_err(|err| ErrorBody {
        code: "invalid_params".to_owned(),
        message: format!("invalid node id '{raw}': {err}"),
    })
}

fn parse_scope(raw: Option<&str>) -> Result<Option<NodeId>, ErrorBody> {
    raw.map(parse_node_id).transpose()
}

fn required_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, ErrorBody> {
    let params = params.ok_or_else(|| ErrorBody {
        code: "invalid_params".to_owned(),
        message: "params are required for this method".to_owned(),
    })?;
    serde_json::from_value(params).map_err(|err| ErrorBody {
        code: "invalid_params".to_owned(),
        message: format!("invalid params: {err}"),
    })
}

fn optional_params<T: DeserializeOwned + Default>(params: Option<Value>) -> Result<T, ErrorBody> {
    match params {
        Some(params) => serde_json::from_value(params).map_err(|err| ErrorBody {
            code: "invalid_params".to_owned(),
            message: format!("invalid params: {err}"),
        }),
        None => Ok(T::default()),
    }
}

fn ok<T: serde::Serialize>(result: T) -> Result<Value, ErrorBody> {
    Ok(serde_json::to_value(result).expect("serialize dispatch result"))
}

impl From<QueryError> for ErrorBody {
    fn from(err: QueryError) -> Self {
        Self { code: err.code().to_owned(), message: err.to_string() }
    }
}
