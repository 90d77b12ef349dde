// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Heuristic state-machine inference.
//!
//! Three independently weighted evidence sources combine additively: variant
//! naming decomposition (0.4), the node's reaction graph (0.3), and a
//! persisted annotation (0.3). Confidence is the sum of the weights of the
//! sources that actually contributed, forced to 0 when no state was found.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{read_annotation, Document, NodeId, NodeKind, SceneNode, StateTransition};

use super::QueryError;

pub const WEIGHT_VARIANT_NAMES: f64 = 0.4;
pub const WEIGHT_REACTIONS: f64 = 0.3;
pub const WEIGHT_ANNOTATION: f64 = 0.3;

pub const SOURCE_VARIANT_NAMES: &str = "variant-names";
pub const SOURCE_REACTIONS: &str = "reactions";
pub const SOURCE_ANNOTATION: &str = "annotation";

/// Canonical interaction states recognized (case-insensitively) in variant
/// values; conventional transition pairs are synthesized between them.
const CANONICAL_STATES: &[&str] = &["default", "hover", "active", "pressed", "focus", "disabled"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InferredStateMachine {
    pub states: Vec<String>,
    pub transitions: Vec<StateTransition>,
    pub confidence: f64,
    pub sources: Vec<String>,
    pub open_questions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_approach: Option<String>,
}

/// Infer a best-effort interaction state machine for a node.
pub fn infer_states(
    document: &Document,
    node_id: &NodeId,
) -> Result<InferredStateMachine, QueryError> {
    let node = document.node(node_id).ok_or_else(|| QueryError::not_found(node_id))?;

    let mut states: Vec<String> = Vec::new();
    let mut transitions: Vec<StateTransition> = Vec::new();
    let mut sources: Vec<String> = Vec::new();
    let mut confidence = 0.0;

    if decompose_variant_names(node, &mut states, &mut transitions) {
        confidence += WEIGHT_VARIANT_NAMES;
        sources.push(SOURCE_VARIANT_NAMES.to_owned());
    }
    if extract_reactions(document, node, &mut states, &mut transitions) {
        confidence += WEIGHT_REACTIONS;
        sources.push(SOURCE_REACTIONS.to_owned());
    }
    let annotation_contributed = merge_annotation(document, node_id, &mut states, &mut transitions);
    if annotation_contributed {
        confidence += WEIGHT_ANNOTATION;
        sources.push(SOURCE_ANNOTATION.to_owned());
    }

    if states.is_empty() {
        confidence = 0.0;
    }

    let mut open_questions = Vec::new();
    if !states.is_empty() && transitions.is_empty() {
        open_questions.push(
            "States were identified but no transitions could be derived; \
             which interactions connect them?"
                .to_owned(),
        );
    }
    if !annotation_contributed {
        open_questions.push(
            "No usable annotation is stored for this node; writing one would \
             replace heuristics with authored intent."
                .to_owned(),
        );
    }

    let suggested_approach = (!states.is_empty()).then(|| {
        if states.len() <= 3 && transitions.len() <= 4 {
            format!(
                "A single state variable covers this ({} states, {} transitions).",
                states.len(),
                transitions.len()
            )
        } else {
            format!(
                "Model this as a structured state machine with explicit transition \
                 handling ({} states, {} transitions).",
                states.len(),
                transitions.len()
            )
        }
    });

    Ok(InferredStateMachine {
        states,
        transitions,
        confidence,
        sources,
        open_questions,
        suggested_approach,
    })
}

/// Source 1: parse variant-group child names as comma-separated `key=value`
/// pairs; distinct values become candidate states, and conventional pairs are
/// synthesized between the canonical states actually observed.
fn decompose_variant_names(
    node: &SceneNode,
    states: &mut Vec<String>,
    transitions: &mut Vec<StateTransition>,
) -> bool {
    if node.kind() != NodeKind::ComponentSet {
        return false;
    }

    for child in node.children() {
        for segment in child.name().split(',') {
            let Some((_, value)) = segment.split_once('=') else {
                continue;
            };
            let value = value.trim();
            if !value.is_empty() {
                push_state(states, value);
            }
        }
    }

    let canonical: Vec<&String> = states
        .iter()
        .filter(|state| CANONICAL_STATES.contains(&state.to_lowercase().as_str()))
        .collect();
    if canonical.len() >= 2 {
        let find = |wanted: &[&str]| {
            canonical
                .iter()
                .find(|state| wanted.contains(&state.to_lowercase().as_str()))
                .map(|state| (*state).clone())
        };
        let default = find(&["default"]);
        let hover = find(&["hover"]);
        let active = find(&["active", "pressed"]);
        let focus = find(&["focus"]);

        let mut pair = |from: &Option<String>, to: &Option<String>, out: &str, back: &str| {
            if let (Some(from), Some(to)) = (from, to) {
                transitions.push(StateTransition {
                    from: from.clone(),
                    to: to.clone(),
                    trigger: out.to_owned(),
                });
                transitions.push(StateTransition {
                    from: to.clone(),
                    to: from.clone(),
                    trigger: back.to_owned(),
                });
            }
        };
        pair(&default, &hover, "pointer-enter", "pointer-leave");
        pair(&hover, &active, "press", "release");
        pair(&default, &focus, "focus", "blur");
    }

    !states.is_empty()
}

/// Source 2: each recorded trigger/action pair becomes an edge from the
/// node's own name to the action's destination, `unknown` when undeclared.
fn extract_reactions(
    document: &Document,
    node: &SceneNode,
    states: &mut Vec<String>,
    transitions: &mut Vec<StateTransition>,
) -> bool {
    if node.reactions().is_empty() {
        return false;
    }

    for reaction in node.reactions() {
        let to = match reaction.destination() {
            Some(destination) => document
                .node(destination)
                .map(|target| target.name().to_owned())
                .unwrap_or_else(|| destination.as_str().to_owned()),
            None => "unknown".to_owned(),
        };
        push_state(states, node.name());
        push_state(states, &to);
        transitions.push(StateTransition {
            from: node.name().to_owned(),
            to,
            trigger: format!("{} ({})", reaction.trigger(), reaction.action_kind()),
        });
    }
    true
}

/// Source 3: union in a stored annotation's states and append its transitions
/// verbatim. Unparseable content is treated as absent, never fatal.
fn merge_annotation(
    document: &Document,
    node_id: &NodeId,
    states: &mut Vec<String>,
    transitions: &mut Vec<StateTransition>,
) -> bool {
    let Some(annotation) = read_annotation(document, node_id) else {
        return false;
    };
    if annotation.states.is_empty() && annotation.transitions.is_empty() {
        return false;
    }
    for state in &annotation.states {
        push_state(states, state);
    }
    transitions.extend(annotation.transitions);
    true
}

fn push_state(states: &mut Vec<String>, state: &str) {
    if !states.iter().any(|existing| existing == state) {
        states.push(state.to_owned());
    }
}
