//! Centralized limits and thresholds for the bcz compiler.
//!
//! # Categories
//!
//! - **Stack Growth**: Red zone and segment size for deep tree walks
//! - **Recursion Depths**: Limits for analyses that follow references

// =============================================================================
// Stack Growth
// =============================================================================

/// Remaining stack below which a recursive tree walk allocates a new segment.
///
/// Used with `stacker::maybe_grow` by every pass that recurses over the
/// syntax tree, so arbitrarily nested expressions such as
/// `f(f(f(f(/* thousands of levels */))))` cannot overflow the native stack.
pub const STACK_RED_ZONE: usize = 64 * 1024;

/// Size of each stack segment allocated when the red zone is hit.
pub const STACK_GROWTH_SIZE: usize = 1024 * 1024;

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum number of variable hops followed by deploy-time constant analysis.
///
/// ```text
/// var a = b
/// var b = c
/// // ... hundreds of chained variables ...
/// resource r 'T' existing = { name: a }
/// ```
///
/// Past this depth the value is conservatively treated as runtime-only.
pub const MAX_CONSTANT_ANALYSIS_DEPTH: usize = 256;

/// Maximum hops (parentheses, indexing, `module.outputs.x`) followed when
/// resolving a member access base to its declaration.
pub const MAX_RESOURCE_ACCESS_DEPTH: usize = 64;
