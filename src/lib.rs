//! bcz: validation of member accesses on runtime-named existing resources
//! in declarative deployment programs.
//!
//! The workspace crates are re-exported under short names:
//!
//! - [`common`] - spans, line maps and diagnostics
//! - [`syntax`] - syntax tree, builder, visitor and JSON documents
//! - [`semantics`] - binder, resource types and the semantic model
//! - [`checker`] - validation passes
//!
//! [`compilation`] ties them together for one JSON compilation unit.

pub use bcz_checker as checker;
pub use bcz_common as common;
pub use bcz_semantics as semantics;
pub use bcz_syntax as syntax;

pub mod compilation;
pub mod tracing_config;

pub use compilation::{
    CompilationUnit, CompileOutput, LoadError, catalog_from_json, catalog_from_path, compile_unit,
};

#[cfg(test)]
#[path = "../tests/compilation_tests.rs"]
mod compilation_tests;
#[cfg(test)]
#[path = "../tests/tracing_config_tests.rs"]
mod tracing_config_tests;
