// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    Medium,
    LargeDeep,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::LargeDeep => "large_deep",
        }
    }

    /// (groups, prims per group, nesting depth per prim)
    fn shape(self) -> (usize, usize, usize) {
        match self {
            Self::Small => (2, 8, 1),
            Self::Medium => (16, 32, 2),
            Self::LargeDeep => (32, 64, 4),
        }
    }
}

/// A text layer with `groups * per_group * depth` geometry prims under `/World`.
pub fn usda(case: Case) -> String {
    let (groups, per_group, depth) = case.shape();
    let mut out = String::from(
        "#usda 1.0\n(\n    defaultPrim = \"World\"\n    upAxis = \"Y\"\n    metersPerUnit = 0.01\n)\n\n",
    );
    out.push_str("def Xform \"World\" (\n    kind = \"assembly\"\n)\n{\n");
    for group in 0..groups {
        let _ = writeln!(out, "    def Scope \"group_{group}\"\n    {{");
        for item in 0..per_group {
            push_nested(&mut out, group, item, depth, 2);
        }
        out.push_str("    }\n");
    }
    out.push_str("}\n");
    out
}

fn push_nested(out: &mut String, group: usize, item: usize, depth: usize, indent: usize) {
    let pad = "    ".repeat(indent);
    let type_name = if depth > 1 { "Xform" } else { "Sphere" };
    let _ = writeln!(out, "{pad}def {type_name} \"prim_{group}_{item}_{depth}\"\n{pad}{{");
    let _ = writeln!(out, "{pad}    double radius = {}.5", item % 7);
    let _ = writeln!(out, "{pad}    float3 xformOp:translate = ({item}, {group}, {depth})");
    let _ = writeln!(out, "{pad}    uniform token[] xformOpOrder = [\"xformOp:translate\"]");
    let _ = writeln!(out, "{pad}    rel material:binding = </World/Looks/m_{}>", item % 4);
    if depth > 1 {
        push_nested(out, group, item, depth - 1, indent + 1);
    }
    let _ = writeln!(out, "{pad}}}");
}

pub fn prim_count(case: Case) -> u64 {
    let (groups, per_group, depth) = case.shape();
    (groups * per_group * depth) as u64
}

/// Writes `count` small scene files into `dir` and returns their paths.
pub fn write_scenes(dir: &std::path::Path, count: usize) -> Vec<String> {
    (0..count)
        .map(|index| {
            let path: PathBuf = dir.join(format!("scene_{index}.usda"));
            std::fs::write(&path, usda(Case::Small)).expect("write scene");
            path.to_str().expect("utf-8 path").to_owned()
        })
        .collect()
}
