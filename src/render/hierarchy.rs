// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write as _;

use crate::query::HierarchyNode;

const INDENT: &str = "  ";

/// Renders a hierarchy as indented text, one prim per line.
///
/// ```text
/// / (Root)
///   World [Xform] (/World)
///     ... (2 children - depth limit reached)
/// ```
pub fn render_hierarchy_text(root: &HierarchyNode) -> String {
    let mut lines = Vec::new();
    push_node(root, 0, &mut lines);
    lines.join("\n")
}

fn push_node(node: &HierarchyNode, depth: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);
    let prim = &node.prim;

    let mut line = indent.clone();
    if prim.path == "/" {
        line.push_str("/ (Root)");
    } else {
        let _ = write!(line, "{} [{}] ({})", prim.name, prim.type_name, prim.path);
    }
    if !prim.is_active {
        line.push_str(" (inactive)");
    }
    lines.push(line);

    for child in &node.children {
        push_node(child, depth + 1, lines);
    }
    if let Some(omitted) = node.omitted_children {
        lines.push(format!("{indent}{INDENT}... ({omitted} children - depth limit reached)"));
    }
}

#[cfg(test)]
mod tests {
    use super::render_hierarchy_text;
    use crate::format::usda::parse_usda;
    use crate::query::{hierarchy, UNLIMITED_DEPTH};

    const SCENE: &str = r#"#usda 1.0
def Xform "World"
{
    def Sphere "ball" {}
    def Scope "Looks"
    {
        def Material "Red" {}
    }
}
def "untyped" {}
"#;

    #[test]
    fn renders_unlimited_tree_with_two_space_indent() {
        let stage = parse_usda(SCENE, "/scenes/render.usda").unwrap();
        let tree = hierarchy(&stage, UNLIMITED_DEPTH).unwrap();

        assert_eq!(
            render_hierarchy_text(&tree),
            [
                "/ (Root)",
                "  World [Xform] (/World)",
                "    ball [Sphere] (/World/ball)",
                "    Looks [Scope] (/World/Looks)",
                "      Red [Material] (/World/Looks/Red)",
                "  untyped [] (/untyped)",
            ]
            .join("\n")
        );
    }

    #[test]
    fn depth_limit_line_counts_hidden_children() {
        let stage = parse_usda(SCENE, "/scenes/render.usda").unwrap();
        let tree = hierarchy(&stage, 1).unwrap();

        assert_eq!(
            render_hierarchy_text(&tree),
            [
                "/ (Root)",
                "  World [Xform] (/World)",
                "    ... (2 children - depth limit reached)",
                "  untyped [] (/untyped)",
            ]
            .join("\n")
        );
    }

    #[test]
    fn inactive_root_is_marked() {
        let stage = parse_usda(SCENE, "/scenes/render.usda").unwrap();
        let mut tree = hierarchy(&stage, 0).unwrap();
        tree.prim.is_active = false;

        assert_eq!(
            render_hierarchy_text(&tree),
            "/ (Root) (inactive)\n  ... (2 children - depth limit reached)"
        );
    }
}
