// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Prim, Property, Stage};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DefaultPrimInfo {
    pub path: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StageInfo {
    pub root_layer_identifier: String,
    pub root_layer_display_name: String,
    pub layer_count: u64,
    pub prim_count: u64,
    pub has_default_prim: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_prim: Option<DefaultPrimInfo>,
    pub time_codes_per_second: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_code: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_code: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meters_per_unit: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_layers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// Summary of one prim as reported by every prim-returning tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PrimInfo {
    pub path: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub specifier: String,
    pub is_active: bool,
    pub is_defined: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub instanceable: bool,
    pub has_authored_references: bool,
    pub has_authored_payloads: bool,
}

impl PrimInfo {
    pub fn from_prim(stage: &Stage, prim: &Prim) -> Self {
        Self {
            path: prim.path().to_string(),
            name: prim.name().to_owned(),
            type_name: prim.type_name().to_owned(),
            specifier: prim.specifier().to_string(),
            is_active: prim.is_active(),
            is_defined: stage.is_defined(prim),
            kind: prim.kind().map(str::to_owned),
            instanceable: prim.is_instanceable(),
            has_authored_references: prim.has_authored_references(),
            has_authored_payloads: prim.has_authored_payloads(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyInfo {
    Attribute {
        name: String,
        value_type: String,
        is_custom: bool,
        variability: String,
        has_value: bool,
        has_authored_value: bool,
        /// Authored default as source text.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        has_time_samples: bool,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        connections: Vec<String>,
    },
    Relationship {
        name: String,
        is_custom: bool,
        has_authored_targets: bool,
        targets: Vec<String>,
    },
}

impl PropertyInfo {
    pub fn name(&self) -> &str {
        match self {
            Self::Attribute { name, .. } | Self::Relationship { name, .. } => name,
        }
    }
}

impl From<&Property> for PropertyInfo {
    fn from(property: &Property) -> Self {
        match property {
            Property::Attribute(attr) => Self::Attribute {
                name: attr.name.to_string(),
                value_type: attr.type_name.to_string(),
                is_custom: attr.custom,
                variability: attr.variability.as_str().to_owned(),
                has_value: attr.has_value(),
                has_authored_value: attr.default_value.is_some() || attr.has_time_samples,
                value: attr.default_value.clone().filter(|value| value != "None"),
                has_time_samples: attr.has_time_samples,
                connections: attr.connections.clone(),
            },
            Property::Relationship(rel) => Self::Relationship {
                name: rel.name.to_string(),
                is_custom: rel.custom,
                has_authored_targets: !rel.targets.is_empty(),
                targets: rel.targets.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PrimListing {
    #[serde(flatten)]
    pub prim: PrimInfo,
    pub property_count: u64,
    pub child_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PrimDetail {
    #[serde(flatten)]
    pub prim: PrimInfo,
    /// `None` for the pseudo-root.
    pub parent: Option<PrimInfo>,
    pub children: Vec<PrimInfo>,
    pub child_count: u64,
    pub properties: Vec<PropertyInfo>,
    pub property_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HierarchyNode {
    #[serde(flatten)]
    pub prim: PrimInfo,
    pub children: Vec<HierarchyNode>,
    /// Children left out because the depth limit was reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omitted_children: Option<u64>,
}

impl HierarchyNode {
    /// Number of nodes in this subtree, including itself.
    pub fn count(&self) -> u64 {
        1 + self.children.iter().map(HierarchyNode::count).sum::<u64>()
    }
}
