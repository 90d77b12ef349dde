// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scene document model.
//!
//! Documents hold a tree of heterogeneous visual nodes plus document-level
//! catalogs (variables, styles) and the shared annotation store.

pub mod annotation;
pub mod document;
pub mod fixtures;
pub mod ids;
pub mod node;

pub use annotation::{read_annotation, write_annotation, Annotation, StateTransition, ANNOTATION_NAMESPACE};
pub use document::{
    Document, DocumentError, PaintStyleDef, StyleCatalog, TextStyleDef, Variable, VariableValue,
};
pub use ids::{NodeId, NodeIdError};
pub use node::{
    AxisAlign, Effect, EffectKind, EffectOffset, GradientStop, Layout, LayoutMode, Mixed, NodeKind,
    Padding, Paint, PaintKind, Reaction, ReactionAction, Rgba, SceneNode, TextStyle,
};
