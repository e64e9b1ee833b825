//! Tests for deploy-time constant analysis as seen through derived body types.

use bcz_syntax::{BinaryOperator, NodeIndex, SyntaxBuilder, SyntaxTree};

use crate::binder::Binder;
use crate::builtins::BuiltinFunctions;
use crate::catalog::ResourceTypeCatalog;
use crate::constant::DeployTimeAnalyzer;
use crate::model::SemanticModel;
use crate::types::RESOURCE_NAME_PROPERTY;

const STORAGE: &str = "Microsoft.Storage/storageAccounts@2021-04-01";

/// Declares `param p`, `var v` (from `var_value`) and an existing `acct`
/// whose name is `name_value`, then reports whether `acct.name` is readable.
fn existing_name_readable(
    build: impl FnOnce(&mut SyntaxBuilder) -> (Vec<NodeIndex>, NodeIndex),
) -> bool {
    let mut b = SyntaxBuilder::new("main.bcz");
    let (mut declarations, name_value) = build(&mut b);
    let body = b.object(vec![("name", name_value)]);
    let acct = b.resource("acct", STORAGE, true, body);
    declarations.push(acct);
    let tree = b.finish(declarations);
    name_flag(&tree, "acct")
}

fn name_flag(tree: &SyntaxTree, resource: &str) -> bool {
    let model = SemanticModel::build(tree, &ResourceTypeCatalog::builtin()).expect("model");
    let id = model.lookup_symbol(resource).expect("declared");
    model
        .body_type(id)
        .and_then(|body| body.property(RESOURCE_NAME_PROPERTY))
        .expect("name property")
        .flags
        .is_readable_at_deploy_time()
}

#[test]
fn string_literal_name_is_constant() {
    assert!(existing_name_readable(|b| (vec![], b.string("stg"))));
}

#[test]
fn parameter_and_interpolation_are_constant() {
    assert!(existing_name_readable(|b| {
        let p = b.param("p", None);
        let hole = b.ident("p");
        (vec![p], b.interpolated(&["stg-", ""], vec![hole]))
    }));
}

#[test]
fn deploy_time_function_calls_are_constant() {
    assert!(existing_name_readable(|b| {
        let group = b.call("resourceGroup", vec![]);
        let id = b.property(group, "id");
        let unique = b.call("uniqueString", vec![id]);
        let prefix = b.string("stg");
        (vec![], b.call("concat", vec![prefix, unique]))
    }));
}

#[test]
fn reference_function_is_not_constant() {
    assert!(!existing_name_readable(|b| {
        let id = b.string("/subscriptions/x");
        let reference = b.call("reference", vec![id]);
        (vec![], b.property(reference, "name"))
    }));
}

#[test]
fn list_family_function_is_not_constant() {
    assert!(!existing_name_readable(|b| {
        let id = b.string("/subscriptions/x");
        let version = b.string("2021-04-01");
        (vec![], b.call("listSecrets", vec![id, version]))
    }));
}

#[test]
fn variables_follow_their_value() {
    assert!(existing_name_readable(|b| {
        let value = b.string("stg");
        let v = b.var("v", value);
        (vec![v], b.ident("v"))
    }));
    assert!(!existing_name_readable(|b| {
        let id = b.string("/x");
        let value = b.call("reference", vec![id]);
        let v = b.var("v", value);
        (vec![v], b.ident("v"))
    }));
}

#[test]
fn operators_and_ternaries_combine_operands() {
    assert!(existing_name_readable(|b| {
        let p = b.param("p", None);
        let cond = b.ident("p");
        let yes = b.string("a");
        let no = b.string("b");
        (vec![p], b.ternary(cond, yes, no))
    }));
    assert!(!existing_name_readable(|b| {
        let left = b.string("a");
        let id = b.string("/x");
        let right = b.call("reference", vec![id]);
        (vec![], b.binary(BinaryOperator::Add, left, right))
    }));
}

#[test]
fn reading_a_readable_property_of_another_resource_is_constant() {
    let mut b = SyntaxBuilder::new("main.bcz");
    let other_name = b.string("other");
    let other_body = b.object(vec![("name", other_name)]);
    let other = b.resource("other", STORAGE, false, other_body);
    let base = b.ident("other");
    let name = b.property(base, "name");
    let body = b.object(vec![("name", name)]);
    let acct = b.resource("acct", STORAGE, true, body);
    let tree = b.finish(vec![other, acct]);
    assert!(name_flag(&tree, "acct"));
}

#[test]
fn reading_a_runtime_property_is_not_constant() {
    let mut b = SyntaxBuilder::new("main.bcz");
    let other_name = b.string("other");
    let other_body = b.object(vec![("name", other_name)]);
    let other = b.resource("other", STORAGE, false, other_body);
    let base = b.ident("other");
    let props = b.property(base, "properties");
    let name = b.property(props, "accountName");
    let body = b.object(vec![("name", name)]);
    let acct = b.resource("acct", STORAGE, true, body);
    let tree = b.finish(vec![other, acct]);
    assert!(!name_flag(&tree, "acct"));
}

#[test]
fn instance_calls_are_not_constant() {
    let mut b = SyntaxBuilder::new("main.bcz");
    let other_name = b.string("other");
    let other_body = b.object(vec![("name", other_name)]);
    let other = b.resource("other", STORAGE, false, other_body);
    let base = b.ident("other");
    let keys = b.instance_call(base, "listKeys", vec![]);
    let body = b.object(vec![("name", keys)]);
    let acct = b.resource("acct", STORAGE, true, body);
    let tree = b.finish(vec![other, acct]);
    assert!(!name_flag(&tree, "acct"));
}

#[test]
fn runtime_name_propagates_through_existing_chains() {
    let mut b = SyntaxBuilder::new("main.bcz");
    let id = b.string("/x");
    let runtime = b.call("reference", vec![id]);
    let first_body = b.object(vec![("name", runtime)]);
    let first = b.resource("first", STORAGE, true, first_body);
    let base = b.ident("first");
    let chained = b.property(base, "name");
    let second_body = b.object(vec![("name", chained)]);
    let second = b.resource("second", STORAGE, true, second_body);
    let tree = b.finish(vec![second, first]);
    assert!(!name_flag(&tree, "first"));
    assert!(!name_flag(&tree, "second"));
}

#[test]
fn runtime_scope_makes_identity_runtime() {
    let mut b = SyntaxBuilder::new("main.bcz");
    let name = b.string("stg");
    let id = b.string("/x");
    let scope = b.call("reference", vec![id]);
    let body = b.object(vec![("name", name), ("scope", scope)]);
    let acct = b.resource("acct", STORAGE, true, body);
    let tree = b.finish(vec![acct]);
    assert!(!name_flag(&tree, "acct"));
}

#[test]
fn nested_child_of_runtime_parent_is_runtime() {
    let mut b = SyntaxBuilder::new("main.bcz");
    let child_name = b.string("default");
    let child_body = b.object(vec![("name", child_name)]);
    let child = b.resource("blobs", "blobServices", true, child_body);
    let id = b.string("/x");
    let parent_name = b.call("reference", vec![id]);
    let parent_body = b.object(vec![("name", parent_name)]);
    let parent = b.resource_with_children("acct", STORAGE, true, parent_body, vec![child]);
    let tree = b.finish(vec![parent]);

    let model = SemanticModel::build(&tree, &ResourceTypeCatalog::builtin()).expect("model");
    let child_id = model.symbol_for_declaration(child).expect("child");
    let readable = model
        .body_type(child_id)
        .and_then(|body| body.property(RESOURCE_NAME_PROPERTY))
        .is_some_and(|p| p.flags.is_readable_at_deploy_time());
    assert!(!readable);
}

#[test]
fn explicit_parent_property_is_followed() {
    let mut b = SyntaxBuilder::new("main.bcz");
    let id = b.string("/x");
    let parent_name = b.call("reference", vec![id]);
    let parent_body = b.object(vec![("name", parent_name)]);
    let parent = b.resource("acct", STORAGE, true, parent_body);
    let child_name = b.string("default");
    let parent_ref = b.ident("acct");
    let child_body = b.object(vec![("parent", parent_ref), ("name", child_name)]);
    let child = b.resource(
        "blobs",
        "Microsoft.Storage/storageAccounts/blobServices@2021-04-01",
        true,
        child_body,
    );
    let tree = b.finish(vec![parent, child]);
    assert!(!name_flag(&tree, "blobs"));
}

#[test]
fn self_reference_is_not_constant() {
    let mut b = SyntaxBuilder::new("main.bcz");
    let base = b.ident("acct");
    let own_name = b.property(base, "name");
    let body = b.object(vec![("name", own_name)]);
    let acct = b.resource("acct", STORAGE, true, body);
    let tree = b.finish(vec![acct]);
    assert!(!name_flag(&tree, "acct"));
}

#[test]
fn variable_cycles_are_not_constant() {
    let mut b = SyntaxBuilder::new("main.bcz");
    let to_b = b.ident("b");
    let a = b.var("a", to_b);
    let to_a = b.ident("a");
    let var_b = b.var("b", to_a);
    let tree = b.finish(vec![a, var_b]);

    let builtins = BuiltinFunctions::standard();
    let bound = Binder::bind(&tree, &builtins).expect("bind");
    let catalog = ResourceTypeCatalog::builtin();
    let mut analyzer = DeployTimeAnalyzer::new(&tree, &bound, &catalog, &builtins);
    assert!(!analyzer.is_constant(to_b));
    assert!(!analyzer.is_constant(to_a));
}

#[test]
fn loop_locals_follow_the_iterated_source() {
    let mut b = SyntaxBuilder::new("main.bcz");
    let items = b.array(vec![]);
    let item = b.ident("x");
    let looped = b.for_loop("x", None, items, item);
    let id = b.string("/list");
    let list = b.call("reference", vec![id]);
    let runtime_items = b.property(list, "values");
    let runtime_item = b.ident("y");
    let index = b.ident("i");
    let pair = b.array(vec![runtime_item, index]);
    let runtime_loop = b.for_loop("y", Some("i"), runtime_items, pair);
    let out = b.output("o", looped);
    let out2 = b.output("r", runtime_loop);
    let tree = b.finish(vec![out, out2]);

    let builtins = BuiltinFunctions::standard();
    let bound = Binder::bind(&tree, &builtins).expect("bind");
    let catalog = ResourceTypeCatalog::builtin();
    let mut analyzer = DeployTimeAnalyzer::new(&tree, &bound, &catalog, &builtins);
    assert!(analyzer.is_constant(items));
    assert!(analyzer.is_constant(item));
    assert!(!analyzer.is_constant(looped));
    assert!(!analyzer.is_constant(runtime_item));
    assert!(analyzer.is_constant(index));
    assert!(!analyzer.is_constant(runtime_loop));
}

#[test]
fn existing_collection_named_by_parameter_loop_is_constant() {
    let mut b = SyntaxBuilder::new("main.bcz");
    let p = b.param("names", None);
    let names = b.ident("names");
    let item = b.ident("n");
    let body = b.object(vec![("name", item)]);
    let looped = b.for_loop("n", None, names, body);
    let coll = b.resource("coll", STORAGE, true, looped);
    let tree = b.finish(vec![p, coll]);
    assert!(name_flag(&tree, "coll"));
}

#[test]
fn module_resource_outputs_have_runtime_names() {
    let mut b = SyntaxBuilder::new("main.bcz");
    let name = b.string("storage");
    let body = b.object(vec![("name", name)]);
    let stg = b.module_with_outputs("stg", "./storage.bcz", body, &[("acct", Some(STORAGE))]);
    let tree = b.finish(vec![stg]);

    let model = SemanticModel::build(&tree, &ResourceTypeCatalog::builtin()).expect("model");
    let module = model.lookup_symbol("stg").expect("module");
    let acct = model.bound().lookup_module_output(module, "ACCT").expect("output resource");
    let name = model
        .body_type(acct)
        .and_then(|body| body.property(RESOURCE_NAME_PROPERTY))
        .expect("name property");
    assert!(!name.flags.is_readable_at_deploy_time());
    assert!(model.diagnostics().is_empty());
}
