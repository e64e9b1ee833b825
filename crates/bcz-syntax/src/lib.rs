//! Syntax tree for the bcz compiler.
//!
//! - `node` - `NodeData`, the closed set of declaration and expression kinds
//! - `arena` - `NodeArena` storage and `SyntaxTree`
//! - `builder` - `SyntaxBuilder` for constructing trees without a parser
//! - `visitor` - `SyntaxVisitor` depth-first traversal
//! - `document` - JSON document format lowered into an arena

pub mod arena;
pub mod builder;
pub mod document;
pub mod node;
pub mod visitor;

pub use arena::{NodeArena, NodeChildren, SyntaxTree};
pub use builder::SyntaxBuilder;
pub use document::{
    DeclarationDocument, DocumentError, ExpressionDocument, ModuleOutputDocument, lower_program,
    parse_program_json,
};
pub use node::{
    BinaryOperator, Identifier, ModuleOutput, Node, NodeData, NodeIndex, ObjectProperty,
    UnaryOperator,
};
pub use visitor::{SyntaxVisitor, walk_children, walk_node};

#[cfg(test)]
#[path = "../tests/builder_tests.rs"]
mod builder_tests;
#[cfg(test)]
#[path = "../tests/document_tests.rs"]
mod document_tests;
#[cfg(test)]
#[path = "../tests/visitor_tests.rs"]
mod visitor_tests;
