//! Tests for `SemanticModel` queries and `ResourceTypeResolver`.

use bcz_common::limits::MAX_RESOURCE_ACCESS_DEPTH;
use bcz_common::{DiagnosticCategory, diagnostic_codes};
use bcz_syntax::{NodeIndex, SyntaxBuilder, SyntaxTree};

use crate::catalog::ResourceTypeCatalog;
use crate::model::{SemanticModel, SymbolInfo};
use crate::types::RESOURCE_NAME_PROPERTY;

const STORAGE: &str = "Microsoft.Storage/storageAccounts@2021-04-01";

struct Fixture {
    tree: SyntaxTree,
    plain: NodeIndex,
    parenthesized: NodeIndex,
    indexed: NodeIndex,
    bare_collection: NodeIndex,
    nested: NodeIndex,
    param_ref: NodeIndex,
    keys_call: NodeIndex,
    concat_call: NodeIndex,
}

/// `acct` is existing with a runtime name, `coll` an existing collection
/// named from a runtime list,
/// `fresh` a new resource with a nested `blobs` child.
fn fixture() -> Fixture {
    let mut b = SyntaxBuilder::new("main.bcz");
    let p = b.param("p", None);

    let id = b.string("/x");
    let runtime_name = b.call("reference", vec![id]);
    let acct_body = b.object(vec![("name", runtime_name)]);
    let acct = b.resource("acct", STORAGE, true, acct_body);

    let list_id = b.string("/names");
    let list = b.call("reference", vec![list_id]);
    let names = b.property(list, "names");
    let item = b.ident("n");
    let coll_item = b.object(vec![("name", item)]);
    let coll_loop = b.for_loop("n", None, names, coll_item);
    let coll = b.resource("coll", STORAGE, true, coll_loop);

    let blob_name = b.string("default");
    let blob_body = b.object(vec![("name", blob_name)]);
    let blobs = b.resource("blobs", "blobServices", false, blob_body);
    let fresh_name = b.string("fresh");
    let fresh_body = b.object(vec![("name", fresh_name)]);
    let fresh = b.resource_with_children("fresh", STORAGE, false, fresh_body, vec![blobs]);

    let plain = b.ident("acct");
    let acct_ref = b.ident("acct");
    let parenthesized = b.paren(acct_ref);
    let coll_ref = b.ident("coll");
    let zero = b.int(0);
    let indexed = b.index(coll_ref, zero);
    let bare_collection = b.ident("coll");
    let fresh_ref = b.ident("fresh");
    let nested = b.resource_access(fresh_ref, "blobs");
    let param_ref = b.ident("p");
    let keys_base = b.ident("acct");
    let keys_call = b.instance_call(keys_base, "listKeys", vec![]);
    let s = b.string("a");
    let concat_call = b.call("concat", vec![s]);

    let value = b.array(vec![
        plain,
        parenthesized,
        indexed,
        bare_collection,
        nested,
        param_ref,
        keys_call,
        concat_call,
    ]);
    let out = b.output("all", value);
    let tree = b.finish(vec![p, acct, coll, fresh, out]);
    Fixture {
        tree,
        plain,
        parenthesized,
        indexed,
        bare_collection,
        nested,
        param_ref,
        keys_call,
        concat_call,
    }
}

#[test]
fn resolves_identifiers_parentheses_and_collection_indexing() {
    let f = fixture();
    let model = SemanticModel::build(&f.tree, &ResourceTypeCatalog::builtin()).expect("model");
    let resolver = model.resource_type_resolver();
    let acct = model.lookup_symbol("acct");
    let coll = model.lookup_symbol("coll");

    let plain = resolver.try_resolve_resource_or_module(f.plain).expect("plain");
    assert_eq!(Some(plain.symbol_id), acct);
    let paren = resolver
        .try_resolve_resource_or_module(f.parenthesized)
        .expect("parenthesized");
    assert_eq!(Some(paren.symbol_id), acct);
    let indexed = resolver.try_resolve_resource_or_module(f.indexed).expect("indexed");
    assert_eq!(Some(indexed.symbol_id), coll);

    assert!(resolver.try_resolve_resource_or_module(f.bare_collection).is_none());
    assert!(resolver.try_resolve_resource_or_module(f.param_ref).is_none());
    assert!(resolver.try_resolve_resource_or_module(f.keys_call).is_none());
}

#[test]
fn resolves_nested_resource_access() {
    let f = fixture();
    let model = SemanticModel::build(&f.tree, &ResourceTypeCatalog::builtin()).expect("model");
    let resolved = model
        .resource_type_resolver()
        .try_resolve_resource_or_module(f.nested)
        .expect("nested");
    assert_eq!(resolved.symbol.name, "blobs");
    assert_eq!(
        resolved.body.name(),
        "Microsoft.Storage/storageAccounts/blobServices@2021-04-01"
    );
    assert!(!resolved.is_runtime_constrained());
}

#[test]
fn runtime_constrained_only_for_existing_runtime_named_resources() {
    let f = fixture();
    let model = SemanticModel::build(&f.tree, &ResourceTypeCatalog::builtin()).expect("model");
    let resolver = model.resource_type_resolver();
    assert!(resolver.resolve_runtime_constrained(f.plain).is_some());
    assert!(resolver.resolve_runtime_constrained(f.indexed).is_some());
    assert!(resolver.resolve_runtime_constrained(f.nested).is_none());
}

#[test]
fn accessible_members_list_readable_properties_and_plain_functions() {
    let f = fixture();
    let model = SemanticModel::build(&f.tree, &ResourceTypeCatalog::builtin()).expect("model");
    let resolved = model
        .resource_type_resolver()
        .resolve_runtime_constrained(f.plain)
        .expect("constrained");
    assert_eq!(
        resolved.accessible_properties(),
        vec!["id", "type", "apiVersion", "location", "name"]
    );
    assert!(resolved.accessible_functions().is_empty());
    assert_eq!(
        resolved
            .accessible_properties()
            .iter()
            .filter(|p| p.as_str() == RESOURCE_NAME_PROPERTY)
            .count(),
        1
    );
}

#[test]
fn symbol_info_covers_declarations_and_functions() {
    let f = fixture();
    let model = SemanticModel::build(&f.tree, &ResourceTypeCatalog::builtin()).expect("model");

    match model.get_symbol_info(f.plain) {
        Some(SymbolInfo::Declared { symbol, .. }) => assert_eq!(symbol.name, "acct"),
        other => panic!("expected declared symbol, got {other:?}"),
    }
    let keys = model
        .get_symbol_info(f.keys_call)
        .and_then(|info| info.as_function())
        .expect("instance function");
    assert_eq!(keys.name, "listKeys");
    assert!(keys.flags.requires_inlining());

    let concat = model
        .get_symbol_info(f.concat_call)
        .and_then(|info| info.as_function())
        .expect("builtin function");
    assert!(!concat.flags.requires_inlining());
    assert!(model.get_symbol_info(f.indexed).is_none());
}

#[test]
fn unknown_resource_types_get_a_generic_body_and_a_warning() {
    let mut b = SyntaxBuilder::new("main.bcz");
    let name = b.string("w");
    let body = b.object(vec![("name", name)]);
    let widget = b.resource("widget", "Contoso.Widgets/gadgets@2020-01-01", false, body);
    let tree = b.finish(vec![widget]);

    let model = SemanticModel::build(&tree, &ResourceTypeCatalog::builtin()).expect("model");
    let diagnostics = model.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, diagnostic_codes::RESOURCE_TYPE_HAS_NO_TYPES);
    assert_eq!(diagnostics[0].category, DiagnosticCategory::Warning);
    assert!(diagnostics[0]
        .message_text
        .contains("Contoso.Widgets/gadgets@2020-01-01"));

    let id = model.symbol_for_declaration(widget).expect("symbol");
    assert!(model.body_type(id).and_then(|t| t.property("properties")).is_some());
}

#[test]
fn modules_get_an_opaque_body() {
    let mut b = SyntaxBuilder::new("main.bcz");
    let name = b.string("deploy");
    let body = b.object(vec![("name", name)]);
    let module = b.module("mod", "./child.bcz", body);
    let tree = b.finish(vec![module]);

    let model = SemanticModel::build(&tree, &ResourceTypeCatalog::builtin()).expect("model");
    let id = model.symbol_for_declaration(module).expect("symbol");
    let body = model.body_type(id).expect("module body");
    assert!(body.property("outputs").is_some());
    assert!(body.method_resolver().is_empty());
    assert!(model.diagnostics().is_empty());
}

#[test]
fn module_output_chains_resolve_to_the_output_resource() {
    let mut b = SyntaxBuilder::new("main.bcz");
    let body = b.object(vec![]);
    let stg = b.module_with_outputs("stg", "./storage.bcz", body, &[("acct", Some(STORAGE))]);
    let module = b.ident("stg");
    let outputs = b.property(module, "outputs");
    let by_dot = b.property(outputs, "acct");
    let module = b.ident("stg");
    let outputs = b.property(module, "Outputs");
    let key = b.string("acct");
    let by_index = b.index(outputs, key);
    let module = b.ident("stg");
    let outputs = b.property(module, "outputs");
    let missing = b.property(outputs, "other");
    let module = b.ident("stg");
    let not_outputs = b.property(module, "acct");
    let keys = b.instance_call(by_dot, "listKeys", vec![]);
    let value = b.array(vec![by_index, missing, not_outputs, keys]);
    let out = b.output("o", value);
    let tree = b.finish(vec![stg, out]);

    let model = SemanticModel::build(&tree, &ResourceTypeCatalog::builtin()).expect("model");
    let resolver = model.resource_type_resolver();
    let module_id = model.lookup_symbol("stg").expect("module");
    let acct = model.bound().lookup_module_output(module_id, "acct");

    let resolved = resolver.try_resolve_resource_or_module(by_dot).expect("by dot");
    assert_eq!(Some(resolved.symbol_id), acct);
    assert!(resolved.is_runtime_constrained());
    assert_eq!(
        resolver.try_resolve_resource_or_module(by_index).map(|r| r.symbol_id),
        acct
    );
    assert!(resolver.try_resolve_resource_or_module(missing).is_none());
    assert!(resolver.try_resolve_resource_or_module(not_outputs).is_none());
    assert!(matches!(
        model.get_symbol_info(keys),
        Some(SymbolInfo::Function(overload)) if overload.name == "listKeys"
    ));
}

#[test]
fn resolution_gives_up_past_the_hop_limit() {
    let build = |depth: usize| {
        let mut b = SyntaxBuilder::new("main.bcz");
        let name = b.string("stg");
        let body = b.object(vec![("name", name)]);
        let acct = b.resource("acct", STORAGE, false, body);
        let mut expr = b.ident("acct");
        for _ in 0..depth {
            expr = b.paren(expr);
        }
        let out = b.output("o", expr);
        (b.finish(vec![acct, out]), expr)
    };

    let (tree, shallow) = build(MAX_RESOURCE_ACCESS_DEPTH - 1);
    let model = SemanticModel::build(&tree, &ResourceTypeCatalog::builtin()).expect("model");
    assert!(model.resource_type_resolver().try_resolve_resource_or_module(shallow).is_some());

    let (tree, deep) = build(MAX_RESOURCE_ACCESS_DEPTH);
    let model = SemanticModel::build(&tree, &ResourceTypeCatalog::builtin()).expect("model");
    assert!(model.resource_type_resolver().try_resolve_resource_or_module(deep).is_none());
}
