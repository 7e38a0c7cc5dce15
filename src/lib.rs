// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! usd-mcp: USD stage inspection over MCP.
//!
//! A [`cache::StageCache`] memoizes opened stages by canonical file path; [`engine`] is the seam
//! to whatever opens them, with a bundled outline reader for `.usda` text layers.

pub mod cache;
pub mod engine;
pub mod format;
pub mod mcp;
pub mod model;
pub mod query;
pub mod render;
