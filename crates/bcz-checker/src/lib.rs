//! Semantic validation passes for bcz programs.
//!
//! - `nested_runtime_access` - rejects member accesses on existing resources
//!   whose identity is only known at deployment time

pub mod nested_runtime_access;

pub use nested_runtime_access::{NestedRuntimeMemberAccessValidator, runtime_member_access_diagnostic};

use bcz_common::Diagnostic;
use bcz_semantics::SemanticModel;

/// Run every validation pass over `model` and collect the diagnostics.
#[must_use]
pub fn check_program(model: &SemanticModel<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    NestedRuntimeMemberAccessValidator::validate(model, &mut diagnostics);
    diagnostics
}

#[cfg(test)]
#[path = "../tests/nested_runtime_access_tests.rs"]
mod nested_runtime_access_tests;
