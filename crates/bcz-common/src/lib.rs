//! Common types and utilities for the bcz compiler.
//!
//! This crate provides foundational types used across all bcz crates:
//! - Source spans (`Span`)
//! - Line/column positions (`LineMap`, `Position`)
//! - Diagnostics and the diagnostic message table
//! - Compiler limits and thresholds

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Position types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Diagnostics shared by the binder and every checker pass
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticData, DiagnosticWriter, diagnostic_codes,
    diagnostic_messages, format_message,
};

// Centralized limits and thresholds
pub mod limits;

/// Identifier comparison used for every name lookup in the language.
///
/// Identifiers, property names and function names are compared without
/// regard to ASCII case.
#[must_use]
pub fn identifier_eq(left: &str, right: &str) -> bool {
    left.eq_ignore_ascii_case(right)
}

/// Normalized key for identifier-keyed maps.
#[must_use]
pub fn identifier_key(name: &str) -> String {
    name.to_ascii_lowercase()
}
