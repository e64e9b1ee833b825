//! Internal invariant violations of the syntax tree handed to the model.
//!
//! These are not user errors: a well-formed front end never produces them.

use bcz_syntax::NodeIndex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("syntax tree root {root:?} is a `{found}` node, expected `program`")]
    RootNotProgram { root: NodeIndex, found: &'static str },
    #[error("node {node:?} is referenced but not allocated in the arena")]
    DanglingNode { node: NodeIndex },
    #[error("`{kind}` declaration {node:?} appears in expression position")]
    DeclarationInExpression { node: NodeIndex, kind: &'static str },
    #[error("`{kind}` node {node:?} appears in declaration position")]
    ExpressionInDeclaration { node: NodeIndex, kind: &'static str },
}
