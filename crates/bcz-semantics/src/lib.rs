//! Semantic layer for the bcz compiler.
//!
//! - `flags` - property and function access flags
//! - `types` - object body types and method resolvers
//! - `catalog` - resource type catalog keyed by type reference
//! - `builtins` - namespace functions
//! - `symbols` - declared symbols
//! - `binder` - symbol declaration and reference binding
//! - `constant` - deploy-time constant analysis and body type derivation
//! - `resolver` - base expression to declaration resolution
//! - `model` - `SemanticModel`, the read-only view consumed by checkers

pub mod binder;
pub mod builtins;
pub mod catalog;
mod constant;
pub mod error;
pub mod flags;
pub mod model;
pub mod resolver;
pub mod symbols;
pub mod types;

pub use binder::{Binder, BoundProgram};
pub use builtins::BuiltinFunctions;
pub use catalog::{
    ResourceTypeCatalog, ResourceTypeDefinition, ResourceTypeReference, generic_resource_body,
    standard_resource_body,
};
pub use error::ModelError;
pub use flags::{FunctionFlags, PropertyFlags};
pub use model::{SemanticModel, SymbolInfo};
pub use resolver::{ResolvedAccess, ResourceTypeResolver, resolve_declared_target};
pub use symbols::{ModuleSymbol, ResourceSymbol, Symbol, SymbolArena, SymbolId, SymbolKind};
pub use types::{
    FunctionOverload, MODULE_OUTPUTS_PROPERTY, MethodResolver, ObjectType, RESOURCE_NAME_PROPERTY,
    TypeKind, TypeProperty,
};

#[cfg(test)]
#[path = "../tests/binder_tests.rs"]
mod binder_tests;
#[cfg(test)]
#[path = "../tests/constant_tests.rs"]
mod constant_tests;
#[cfg(test)]
#[path = "../tests/model_tests.rs"]
mod model_tests;
