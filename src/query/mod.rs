// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over opened stages.
//!
//! Queries turn a [`Stage`] into the serializable views returned by the MCP tools. Prim
//! enumeration always follows the default traversal predicate; direct lookups by path see every
//! authored prim.

mod types;

pub use types::{
    DefaultPrimInfo, HierarchyNode, PrimDetail, PrimInfo, PrimListing, PropertyInfo, StageInfo,
};

use crate::model::{Prim, PrimPath, PrimPathError, Stage};

/// `max_depth` value meaning "no limit".
pub const UNLIMITED_DEPTH: i64 = -1;

const SUGGESTION_LIMIT: usize = 3;
const SUGGESTION_MIN_RATIO: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    InvalidPrimPath(#[from] PrimPathError),
    #[error("Prim not found at path: {0}")]
    PrimNotFound(String),
    #[error("max_depth must be -1 (unlimited) or a non-negative integer")]
    InvalidMaxDepth(i64),
}

pub fn stage_info(stage: &Stage) -> StageInfo {
    let metadata = stage.metadata();
    let default_prim = stage.default_prim().map(|prim| DefaultPrimInfo {
        path: prim.path().to_string(),
        name: prim.name().to_owned(),
        type_name: prim.type_name().to_owned(),
    });

    StageInfo {
        root_layer_identifier: stage.identifier().to_owned(),
        root_layer_display_name: stage.display_name().to_owned(),
        layer_count: stage.layer_count() as u64,
        prim_count: stage.traverse().count() as u64,
        has_default_prim: default_prim.is_some(),
        default_prim,
        time_codes_per_second: stage.time_codes_per_second(),
        start_time_code: metadata.start_time_code,
        end_time_code: metadata.end_time_code,
        up_axis: metadata.up_axis.clone(),
        meters_per_unit: metadata.meters_per_unit,
        sub_layers: metadata.sub_layers.clone(),
        doc: metadata.doc.clone(),
    }
}

/// Prim tree below the pseudo-root, cut off after `max_depth` levels.
///
/// The pseudo-root is depth 0. Nodes at the limit report how many children were left out.
pub fn hierarchy(stage: &Stage, max_depth: i64) -> Result<HierarchyNode, QueryError> {
    if max_depth < UNLIMITED_DEPTH {
        return Err(QueryError::InvalidMaxDepth(max_depth));
    }
    let limit = u64::try_from(max_depth).ok();
    Ok(hierarchy_node(stage, stage.pseudo_root(), limit, 0))
}

fn hierarchy_node(stage: &Stage, prim: &Prim, limit: Option<u64>, depth: u64) -> HierarchyNode {
    let prim_info = PrimInfo::from_prim(stage, prim);
    if limit.is_some_and(|limit| depth >= limit) {
        let omitted = stage.children(prim).count() as u64;
        return HierarchyNode {
            prim: prim_info,
            children: Vec::new(),
            omitted_children: (omitted > 0).then_some(omitted),
        };
    }

    let children = stage
        .children(prim)
        .map(|child| hierarchy_node(stage, child, limit, depth + 1))
        .collect();
    HierarchyNode { prim: prim_info, children, omitted_children: None }
}

/// Every traversed prim, optionally restricted to one exact type name.
pub fn list_prims(stage: &Stage, prim_type: Option<&str>) -> Vec<PrimListing> {
    let prim_type = prim_type.filter(|prim_type| !prim_type.is_empty());
    stage
        .traverse()
        .filter(|prim| prim_type.is_none_or(|prim_type| prim.type_name() == prim_type))
        .map(|prim| listing(stage, prim))
        .collect()
}

/// Traversed prims whose name equals `name` exactly.
pub fn find_prims_by_name(stage: &Stage, name: &str) -> Vec<PrimListing> {
    stage
        .traverse()
        .filter(|prim| prim.name() == name)
        .map(|prim| listing(stage, prim))
        .collect()
}

pub fn inspect_prim(stage: &Stage, prim_path: &str) -> Result<PrimDetail, QueryError> {
    let prim = lookup(stage, prim_path)?;
    let properties = prim.properties().iter().map(PropertyInfo::from).collect::<Vec<_>>();
    let children =
        stage.children(prim).map(|child| PrimInfo::from_prim(stage, child)).collect::<Vec<_>>();

    Ok(PrimDetail {
        prim: PrimInfo::from_prim(stage, prim),
        parent: stage.parent(prim).map(|parent| PrimInfo::from_prim(stage, parent)),
        child_count: children.len() as u64,
        children,
        property_count: properties.len() as u64,
        properties,
    })
}

pub fn prim_properties(stage: &Stage, prim_path: &str) -> Result<Vec<PropertyInfo>, QueryError> {
    let prim = lookup(stage, prim_path)?;
    Ok(prim.properties().iter().map(PropertyInfo::from).collect())
}

/// Authored prim paths that look like `prim_path`, best match first.
pub fn similar_prim_paths(stage: &Stage, prim_path: &str) -> Vec<String> {
    let mut scored = stage
        .authored_prims()
        .map(|prim| {
            let candidate = prim.path().as_str();
            (rapidfuzz::fuzz::ratio(prim_path.chars(), candidate.chars()), candidate)
        })
        .filter(|(ratio, _)| *ratio >= SUGGESTION_MIN_RATIO)
        .collect::<Vec<_>>();
    scored.sort_by(|(a_ratio, a_path), (b_ratio, b_path)| {
        b_ratio.total_cmp(a_ratio).then_with(|| a_path.cmp(b_path))
    });
    scored.into_iter().take(SUGGESTION_LIMIT).map(|(_, path)| path.to_owned()).collect()
}

fn lookup<'a>(stage: &'a Stage, prim_path: &str) -> Result<&'a Prim, QueryError> {
    let path = PrimPath::new(prim_path)?;
    stage.prim_at_path(&path).ok_or_else(|| QueryError::PrimNotFound(prim_path.to_owned()))
}

fn listing(stage: &Stage, prim: &Prim) -> PrimListing {
    PrimListing {
        prim: PrimInfo::from_prim(stage, prim),
        property_count: prim.properties().len() as u64,
        child_count: stage.children(prim).count() as u64,
    }
}
