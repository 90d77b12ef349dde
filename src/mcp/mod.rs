// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Model Context Protocol (MCP) server surface.
//!
//! Every tool is a thin, schema-validated wrapper that forwards the matching
//! method over the correlation bridge and decodes the sandbox's reply.

mod server;

pub use server::ProteusMcp;
