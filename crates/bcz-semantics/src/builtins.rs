//! Namespace (non-instance) functions.

use bcz_common::identifier_eq;

use crate::flags::FunctionFlags;
use crate::types::FunctionOverload;

/// Functions that read deployed state and can only be emitted inline.
const RUNTIME_FUNCTIONS: &[&str] = &["reference", "list"];

/// Prefix of the `list*` family (`listKeys`, `listSecrets`, ...).
const LIST_FUNCTION_PREFIX: &str = "list";

const DEPLOY_TIME_FUNCTIONS: &[&str] = &[
    "any",
    "array",
    "base64",
    "bool",
    "concat",
    "contains",
    "createArray",
    "createObject",
    "deployment",
    "empty",
    "endsWith",
    "environment",
    "first",
    "format",
    "guid",
    "indexOf",
    "int",
    "intersection",
    "json",
    "last",
    "length",
    "managementGroup",
    "max",
    "min",
    "padLeft",
    "range",
    "replace",
    "resourceGroup",
    "resourceId",
    "skip",
    "split",
    "startsWith",
    "string",
    "subscription",
    "subscriptionResourceId",
    "substring",
    "take",
    "tenant",
    "tenantResourceId",
    "toLower",
    "toUpper",
    "trim",
    "union",
    "uniqueString",
    "uri",
];

/// Functions callable without a receiver.
#[derive(Clone, Debug)]
pub struct BuiltinFunctions {
    overloads: Vec<FunctionOverload>,
    list_family: FunctionOverload,
}

impl BuiltinFunctions {
    #[must_use]
    pub fn standard() -> Self {
        let mut overloads: Vec<FunctionOverload> = DEPLOY_TIME_FUNCTIONS
            .iter()
            .map(|name| FunctionOverload::new(*name, FunctionFlags::empty()))
            .collect();
        overloads.extend(
            RUNTIME_FUNCTIONS
                .iter()
                .map(|name| FunctionOverload::new(*name, FunctionFlags::REQUIRES_INLINING)),
        );
        Self {
            overloads,
            list_family: FunctionOverload::new("list*", FunctionFlags::REQUIRES_INLINING),
        }
    }

    /// Case-insensitive lookup. Any name in the `list*` family resolves to
    /// an inlining-required overload.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&FunctionOverload> {
        if let Some(found) = self.overloads.iter().find(|o| identifier_eq(&o.name, name)) {
            return Some(found);
        }
        let is_list_family = name.len() > LIST_FUNCTION_PREFIX.len()
            && name
                .get(..LIST_FUNCTION_PREFIX.len())
                .is_some_and(|prefix| identifier_eq(prefix, LIST_FUNCTION_PREFIX));
        is_list_family.then_some(&self.list_family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_requires_inlining() {
        let builtins = BuiltinFunctions::standard();
        assert!(builtins.lookup("reference").unwrap().flags.requires_inlining());
        assert!(builtins.lookup("REFERENCE").unwrap().flags.requires_inlining());
    }

    #[test]
    fn list_family_requires_inlining() {
        let builtins = BuiltinFunctions::standard();
        assert!(builtins.lookup("listKeys").unwrap().flags.requires_inlining());
        assert!(builtins.lookup("listSecrets").unwrap().flags.requires_inlining());
        assert!(builtins.lookup("list").unwrap().flags.requires_inlining());
    }

    #[test]
    fn string_functions_are_deploy_time() {
        let builtins = BuiltinFunctions::standard();
        assert!(!builtins.lookup("concat").unwrap().flags.requires_inlining());
        assert!(!builtins.lookup("uniqueString").unwrap().flags.requires_inlining());
        assert!(builtins.lookup("lambdaMap").is_none());
    }
}
