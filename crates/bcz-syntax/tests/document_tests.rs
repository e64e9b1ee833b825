//! Tests for the JSON program document format.

use crate::document::parse_program_json;
use crate::{DocumentError, NodeData};
use bcz_common::Span;

#[test]
fn lowers_existing_resource_declaration() {
    let tree = parse_program_json(
        "main.bcz",
        r#"[
          { "kind": "param", "name": "p" },
          { "kind": "resource", "name": "acct", "existing": true,
            "type": "Microsoft.Storage/storageAccounts@2021-04-01",
            "body": { "kind": "object", "properties": {
              "name": { "kind": "ident", "name": "p" } } } }
        ]"#,
    )
    .expect("document should lower");

    let decls = tree.program_declarations();
    assert_eq!(decls.len(), 2);
    match tree.arena.data(decls[1]) {
        Some(NodeData::ResourceDeclaration {
            name,
            type_reference,
            existing,
            ..
        }) => {
            assert_eq!(name.name, "acct");
            assert_eq!(type_reference, "Microsoft.Storage/storageAccounts@2021-04-01");
            assert!(*existing);
        }
        other => panic!("expected resource, got {other:?}"),
    }
}

#[test]
fn explicit_spans_are_kept() {
    let tree = parse_program_json(
        "main.bcz",
        r#"[ { "kind": "output", "name": "o", "span": [0, 20],
               "value": { "kind": "int", "value": 1, "span": [15, 16] } } ]"#,
    )
    .expect("document should lower");

    let output = tree.program_declarations()[0];
    assert_eq!(tree.arena.span(output), Span::new(0, 20));
    let value = tree.arena.children(output)[0];
    assert_eq!(tree.arena.span(value), Span::new(15, 16));
}

#[test]
fn string_parts_become_interpolation() {
    let tree = parse_program_json(
        "main.bcz",
        r#"[ { "kind": "var", "name": "v",
               "value": { "kind": "string",
                 "parts": ["st-", { "kind": "ident", "name": "suffix" }] } } ]"#,
    )
    .expect("document should lower");

    let var = tree.program_declarations()[0];
    let value = tree.arena.children(var)[0];
    match tree.arena.data(value) {
        Some(NodeData::String {
            segments,
            expressions,
        }) => {
            assert_eq!(segments, &["st-".to_string(), String::new()]);
            assert_eq!(expressions.len(), 1);
        }
        other => panic!("expected string, got {other:?}"),
    }
}

#[test]
fn string_with_value_and_parts_is_rejected() {
    let err = parse_program_json(
        "main.bcz",
        r#"[ { "kind": "var", "name": "v",
               "value": { "kind": "string", "value": "x", "parts": ["y"] } } ]"#,
    )
    .expect_err("ambiguous string must fail");
    assert!(matches!(err, DocumentError::AmbiguousString { .. }));
}

#[test]
fn unknown_kind_is_a_json_error() {
    let err = parse_program_json("main.bcz", r#"[ { "kind": "lambda" } ]"#)
        .expect_err("unknown kind must fail");
    assert!(matches!(err, DocumentError::Json(_)));
}

#[test]
fn ternary_uses_then_and_else_keys() {
    let tree = parse_program_json(
        "main.bcz",
        r#"[ { "kind": "var", "name": "v", "value": {
               "kind": "ternary",
               "condition": { "kind": "bool", "value": true },
               "then": { "kind": "int", "value": 1 },
               "else": { "kind": "null" } } } ]"#,
    )
    .expect("document should lower");
    let var = tree.program_declarations()[0];
    let value = tree.arena.children(var)[0];
    assert!(matches!(tree.arena.data(value), Some(NodeData::Ternary { .. })));
}

#[test]
fn module_outputs_are_lowered_in_declared_order() {
    let tree = parse_program_json(
        "main.bcz",
        r#"[ { "kind": "module", "name": "stg", "path": "./storage.bcz",
               "body": { "kind": "object", "properties": {} },
               "outputs": [
                 { "name": "endpoint" },
                 { "name": "acct", "resource": "Microsoft.Storage/storageAccounts@2021-04-01" } ] } ]"#,
    )
    .expect("document should lower");

    match tree.arena.data(tree.program_declarations()[0]) {
        Some(NodeData::ModuleDeclaration { outputs, .. }) => {
            let names: Vec<&str> = outputs.iter().map(|o| o.name.name.as_str()).collect();
            assert_eq!(names, vec!["endpoint", "acct"]);
            assert_eq!(outputs[0].resource_type, None);
            assert_eq!(
                outputs[1].resource_type.as_deref(),
                Some("Microsoft.Storage/storageAccounts@2021-04-01")
            );
        }
        other => panic!("expected module, got {other:?}"),
    }
}
