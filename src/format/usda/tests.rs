// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::*;
use crate::model::{PrimPath, Property, Specifier, Stage, Variability};

fn parse(src: &str) -> Stage {
    parse_usda(src, "/scenes/test.usda").expect("parse")
}

fn path(raw: &str) -> PrimPath {
    raw.parse().expect("prim path")
}

const KITCHEN: &str = r#"#usda 1.0
(
    defaultPrim = "World"
    doc = """Kitchen set
with a comment"""
    metersPerUnit = 0.01
    upAxis = "Z"
    startTimeCode = 1
    endTimeCode = 240
    framesPerSecond = 30
    subLayers = [
        @./lighting.usda@,
        @./layout.usda@
    ]
    customLayerData = {
        string creator = "hand"
    }
)

def Xform "World" (
    kind = "assembly"
)
{
    def Sphere "ball" (
        prepend references = @./ball.usda@</Ball>
    )
    {
        double radius = 1.5
        double radius.timeSamples = {
            1: 1.5,
            24: 2.0,
        }
        color3f[] primvars:displayColor = [(1, 0, 0)] (
            interpolation = "constant"
        )
        uniform token[] xformOpOrder = ["xformOp:translate"]
        float3 xformOp:translate = (0, -1.25e-1, 0)
        rel material:binding = </World/Looks/Red>
    }

    def Scope "Looks"
    {
        def Material "Red"
        {
            token outputs:surface.connect = </World/Looks/Red/Shader.outputs:surface>
        }
    }

    def Xform "hidden" (
        active = false
    )
    {
        def Cube "inside" {}
    }

    def Xform "variant_holder" (
        variants = {
            string shape = "round"
        }
        prepend variantSets = "shape"
    )
    {
        variantSet "shape" = {
            "round" {
                def Sphere "round_geo" {}
            }
        }
    }
}

class Xform "_proto"
{
    def Mesh "shape" {}
}

over "Patch"
{
    custom string note = "patched"
}
"#;

#[test]
fn layer_metadata_is_read() {
    let stage = parse(KITCHEN);
    let metadata = stage.metadata();
    assert_eq!(metadata.default_prim.as_deref(), Some("World"));
    assert_eq!(metadata.doc.as_deref(), Some("Kitchen set\nwith a comment"));
    assert_eq!(metadata.meters_per_unit, Some(0.01));
    assert_eq!(metadata.up_axis.as_deref(), Some("Z"));
    assert_eq!(metadata.start_time_code, Some(1.0));
    assert_eq!(metadata.end_time_code, Some(240.0));
    assert_eq!(metadata.frames_per_second, Some(30.0));
    assert_eq!(metadata.sub_layers, vec!["./lighting.usda", "./layout.usda"]);
    assert_eq!(stage.layer_count(), 3);
    assert_eq!(stage.time_codes_per_second(), 30.0);
}

#[test]
fn prim_outline_and_specifiers() {
    let stage = parse(KITCHEN);
    let world = stage.prim_at_path(&path("/World")).unwrap();
    assert_eq!(world.type_name(), "Xform");
    assert_eq!(world.kind(), Some("assembly"));
    assert_eq!(world.specifier(), Specifier::Def);

    let names = world
        .child_ids()
        .iter()
        .map(|id| stage.prim(*id).name())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["ball", "Looks", "hidden", "variant_holder"]);

    assert_eq!(stage.prim_at_path(&path("/_proto")).unwrap().specifier(), Specifier::Class);
    let patch = stage.prim_at_path(&path("/Patch")).unwrap();
    assert_eq!(patch.specifier(), Specifier::Over);
    assert_eq!(patch.type_name(), "");
}

#[test]
fn variant_bodies_are_skipped() {
    let stage = parse(KITCHEN);
    assert!(stage.prim_at_path(&path("/World/variant_holder")).is_some());
    assert!(stage.prim_at_path(&path("/World/variant_holder/round_geo")).is_none());
}

#[test]
fn prim_metadata_flags() {
    let stage = parse(KITCHEN);
    let ball = stage.prim_at_path(&path("/World/ball")).unwrap();
    assert!(ball.has_authored_references());
    assert!(!ball.has_authored_payloads());

    let hidden = stage.prim_at_path(&path("/World/hidden")).unwrap();
    assert!(!hidden.is_active());
}

#[test]
fn traversal_follows_default_predicate() {
    let stage = parse(KITCHEN);
    let visited = stage.traverse().map(|prim| prim.path().as_str()).collect::<Vec<_>>();
    assert_eq!(
        visited,
        vec![
            "/World",
            "/World/ball",
            "/World/Looks",
            "/World/Looks/Red",
            "/World/variant_holder",
        ]
    );
}

#[test]
fn attribute_declarations_merge_and_keep_source_text() {
    let stage = parse(KITCHEN);
    let ball = stage.prim_at_path(&path("/World/ball")).unwrap();

    let Some(Property::Attribute(radius)) = ball.property("radius") else {
        panic!("radius attribute missing");
    };
    assert_eq!(radius.type_name, "double");
    assert_eq!(radius.default_value.as_deref(), Some("1.5"));
    assert!(radius.has_time_samples);
    assert_eq!(ball.properties().iter().filter(|prop| prop.name() == "radius").count(), 1);

    let Some(Property::Attribute(color)) = ball.property("primvars:displayColor") else {
        panic!("displayColor missing");
    };
    assert_eq!(color.type_name, "color3f[]");
    assert_eq!(color.default_value.as_deref(), Some("[(1, 0, 0)]"));

    let Some(Property::Attribute(order)) = ball.property("xformOpOrder") else {
        panic!("xformOpOrder missing");
    };
    assert_eq!(order.variability, Variability::Uniform);

    let Some(Property::Attribute(translate)) = ball.property("xformOp:translate") else {
        panic!("translate missing");
    };
    assert_eq!(translate.default_value.as_deref(), Some("(0, -1.25e-1, 0)"));
}

#[test]
fn relationships_and_connections_keep_targets() {
    let stage = parse(KITCHEN);
    let ball = stage.prim_at_path(&path("/World/ball")).unwrap();
    let Some(Property::Relationship(binding)) = ball.property("material:binding") else {
        panic!("binding missing");
    };
    assert_eq!(binding.targets, vec!["/World/Looks/Red"]);

    let red = stage.prim_at_path(&path("/World/Looks/Red")).unwrap();
    let Some(Property::Attribute(surface)) = red.property("outputs:surface") else {
        panic!("surface output missing");
    };
    assert_eq!(surface.connections, vec!["/World/Looks/Red/Shader.outputs:surface"]);
    assert!(!surface.has_value());
}

#[test]
fn custom_properties_are_flagged() {
    let stage = parse(KITCHEN);
    let patch = stage.prim_at_path(&path("/Patch")).unwrap();
    let note = patch.property("note").unwrap();
    assert!(note.is_custom());
}

#[test]
fn relationship_list_ops_add_and_delete_targets() {
    let stage = parse(
        r#"#usda 1.0
def "a"
{
    rel targets = [</x>, </y>]
    append rel targets = </z>
    delete rel targets = </x>
}
"#,
    );
    let prim = stage.prim_at_path(&path("/a")).unwrap();
    let Some(Property::Relationship(rel)) = prim.property("targets") else {
        panic!("targets missing");
    };
    assert_eq!(rel.targets, vec!["/y", "/z"]);
}

#[test]
fn deleted_or_blocked_arcs_do_not_count() {
    let stage = parse(
        r#"#usda 1.0
def "a" (
    delete references = @./x.usda@
    payload = None
)
{
}
def "b" (
    append payload = @./heavy.usda@
)
{
}
"#,
    );
    let a = stage.prim_at_path(&path("/a")).unwrap();
    assert!(!a.has_authored_references());
    assert!(!a.has_authored_payloads());
    assert!(stage.prim_at_path(&path("/b")).unwrap().has_authored_payloads());
}

#[test]
fn repeated_prim_statements_merge() {
    let stage = parse(
        r#"#usda 1.0
over "World"
{
    def "a" {}
}
def Xform "World"
{
    def "b" {}
}
"#,
    );
    let world = stage.prim_at_path(&path("/World")).unwrap();
    assert_eq!(world.specifier(), Specifier::Def);
    assert_eq!(world.type_name(), "Xform");
    assert_eq!(world.child_ids().len(), 2);
    assert_eq!(stage.authored_prims().count(), 3);
}

#[test]
fn reorder_statements_are_skipped() {
    let stage = parse(
        r#"#usda 1.0
def "World"
{
    reorder nameChildren = ["b", "a"]
    def "a" {}
    def "b" {}
}
"#,
    );
    assert_eq!(stage.prim_at_path(&path("/World")).unwrap().child_ids().len(), 2);
}

#[test]
fn bare_string_in_layer_metadata_is_the_doc() {
    let stage = parse("#usda 1.0\n(\n    \"just a comment\"\n)\n");
    assert_eq!(stage.metadata().doc.as_deref(), Some("just a comment"));
    assert_eq!(stage.authored_prims().count(), 0);
}

#[test]
fn missing_header_is_rejected() {
    let err = parse_usda("def \"a\" {}\n", "/x.usda").unwrap_err();
    assert_eq!(err, UsdaParseError::new(1, UsdaParseErrorKind::MissingHeader));
    assert_eq!(err.to_string(), "line 1: missing `#usda` header");
}

#[test]
fn unclosed_prim_body_reports_eof() {
    let err = parse_usda("#usda 1.0\ndef \"a\"\n{\n    def \"b\" {\n", "/x.usda").unwrap_err();
    assert!(matches!(err.kind, UsdaParseErrorKind::UnexpectedEof { .. }));
}

#[test]
fn invalid_prim_name_is_rejected_with_line() {
    let err = parse_usda("#usda 1.0\n\ndef \"bad name\" {}\n", "/x.usda").unwrap_err();
    assert_eq!(err.line, 3);
    assert_eq!(err.kind, UsdaParseErrorKind::InvalidPrimName { name: "bad name".to_owned() });
}

#[test]
fn stray_top_level_token_is_rejected() {
    let err = parse_usda("#usda 1.0\nfloat x = 1\n", "/x.usda").unwrap_err();
    assert_eq!(err.line, 2);
    assert!(matches!(err.kind, UsdaParseErrorKind::UnexpectedToken { .. }));
}

#[test]
fn mismatched_brackets_are_rejected() {
    let err = parse_usda("#usda 1.0\ndef \"a\"\n{\n    int[] x = [1, 2)\n}\n", "/x.usda")
        .unwrap_err();
    assert_eq!(err.line, 4);
}

fn nested_layer(levels: usize, closed: bool) -> String {
    let mut src = String::from("#usda 1.0\n");
    for _ in 0..levels {
        src.push_str("def \"a\" {\n");
    }
    if closed {
        src.push_str(&"}\n".repeat(levels));
    }
    src
}

#[test]
fn nesting_up_to_the_limit_parses() {
    let stage = parse_usda(&nested_layer(MAX_PRIM_DEPTH, true), "/x.usda").unwrap();
    assert_eq!(stage.authored_prims().count(), MAX_PRIM_DEPTH);
}

#[test]
fn nesting_past_the_limit_is_an_error() {
    let err = parse_usda(&nested_layer(MAX_PRIM_DEPTH + 1, true), "/x.usda").unwrap_err();
    assert_eq!(err.line, MAX_PRIM_DEPTH + 2);
    assert_eq!(err.kind, UsdaParseErrorKind::NestingTooDeep { limit: MAX_PRIM_DEPTH });
    assert_eq!(err.to_string(), "line 514: prims nested deeper than 512 levels");
}

#[test]
fn pathologically_deep_layer_fails_without_overflowing() {
    let err = parse_usda(&nested_layer(50_000, false), "/x.usda").unwrap_err();
    assert!(matches!(err.kind, UsdaParseErrorKind::NestingTooDeep { .. }));
}
