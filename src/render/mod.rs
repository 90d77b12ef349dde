// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Alternative renderings of a single node: CSS declarations and SVG export.

pub mod css;
pub mod svg;

pub use css::render_css;
pub use svg::{export_svg, SvgExport};
