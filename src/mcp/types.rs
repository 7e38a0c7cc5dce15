// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::cache::CacheEntryInfo;
use crate::query::{HierarchyNode, PrimDetail, PrimListing, PropertyInfo, StageInfo};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct StageLoadParams {
    /// Path to a `.usd`, `.usda`, `.usdc` or `.usdz` file.
    pub file_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StageLoadResponse {
    pub file_path: String,
    pub stage: StageInfo,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct StageHierarchyParams {
    pub file_path: String,
    /// Maximum depth below the pseudo-root; -1 (the default) means unlimited.
    pub max_depth: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StageHierarchyResponse {
    pub file_path: String,
    pub max_depth: i64,
    pub total_prims: u64,
    pub hierarchy: HierarchyNode,
    /// Indented text rendering of `hierarchy`.
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PrimTargetParams {
    pub file_path: String,
    /// Absolute prim path, e.g. `/World/Geom/sphere`.
    pub prim_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PrimInspectResponse {
    pub file_path: String,
    pub prim: PrimDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PrimPropertiesResponse {
    pub file_path: String,
    pub prim_path: String,
    pub property_count: u64,
    pub properties: Vec<PropertyInfo>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PrimListParams {
    pub file_path: String,
    /// Exact prim type name to keep, e.g. `Sphere` or `Xform`.
    pub prim_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PrimFindParams {
    pub file_path: String,
    /// Prim name to match exactly.
    pub name_pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PrimListResponse {
    pub file_path: String,
    pub count: u64,
    pub prims: Vec<PrimListing>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CacheRemoveParams {
    pub file_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheRemoveResponse {
    pub file_path: String,
    pub removed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearResponse {
    pub cleared: u64,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CacheInfoResponse {
    pub count: u64,
    /// Configured LRU bound; absent when the cache is unbounded.
    pub capacity: Option<u64>,
    pub entries: BTreeMap<String, CacheEntryInfo>,
}
