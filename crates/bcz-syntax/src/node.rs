//! Syntax node definitions.
//!
//! Nodes live in a [`NodeArena`](crate::NodeArena) and refer to each other by
//! [`NodeIndex`]. Declarations and expressions share one closed enum so every
//! pass can match exhaustively.

use bcz_common::Span;
use serde::{Deserialize, Serialize};

/// Index of a node inside its arena. Only meaningful for the arena that
/// allocated it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// An identifier together with its own span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "-")]
    Minus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    #[serde(rename = "||")]
    LogicalOr,
    #[serde(rename = "&&")]
    LogicalAnd,
    #[serde(rename = "==")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = "=~")]
    EqualsInsensitive,
    #[serde(rename = "!~")]
    NotEqualsInsensitive,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "%")]
    Modulo,
    #[serde(rename = "??")]
    Coalesce,
}

/// `key: value` entry of an object literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectProperty {
    pub key: Identifier,
    pub value: NodeIndex,
}

/// Output declared by a module's signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleOutput {
    pub name: Identifier,
    /// Type reference of the resource a resource-typed output returns.
    pub resource_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeData {
    // =========================================================================
    // Declarations
    // =========================================================================
    Program {
        declarations: Vec<NodeIndex>,
    },
    ParameterDeclaration {
        name: Identifier,
        default_value: Option<NodeIndex>,
    },
    VariableDeclaration {
        name: Identifier,
        value: NodeIndex,
    },
    /// `resource <name> '<type>' [existing] = <body>`. The body is an object,
    /// an `if` condition wrapping an object, or a `for` expression.
    ResourceDeclaration {
        name: Identifier,
        type_reference: String,
        existing: bool,
        body: NodeIndex,
        nested_resources: Vec<NodeIndex>,
    },
    ModuleDeclaration {
        name: Identifier,
        path: String,
        body: NodeIndex,
        outputs: Vec<ModuleOutput>,
    },
    OutputDeclaration {
        name: Identifier,
        value: NodeIndex,
    },

    // =========================================================================
    // Expressions
    // =========================================================================
    /// String literal, interpolated when `expressions` is non-empty.
    /// `segments.len() == expressions.len() + 1`.
    String {
        segments: Vec<String>,
        expressions: Vec<NodeIndex>,
    },
    Integer(i64),
    Boolean(bool),
    Null,
    VariableAccess {
        name: Identifier,
    },
    Array {
        items: Vec<NodeIndex>,
    },
    Object {
        properties: Vec<ObjectProperty>,
    },
    PropertyAccess {
        base: NodeIndex,
        property: Identifier,
    },
    ArrayAccess {
        base: NodeIndex,
        index: NodeIndex,
    },
    /// `base::name`
    ResourceAccess {
        base: NodeIndex,
        resource_name: Identifier,
    },
    FunctionCall {
        name: Identifier,
        arguments: Vec<NodeIndex>,
    },
    InstanceFunctionCall {
        base: NodeIndex,
        name: Identifier,
        arguments: Vec<NodeIndex>,
    },
    Parenthesized {
        expression: NodeIndex,
    },
    Unary {
        operator: UnaryOperator,
        expression: NodeIndex,
    },
    Binary {
        operator: BinaryOperator,
        left: NodeIndex,
        right: NodeIndex,
    },
    Ternary {
        condition: NodeIndex,
        true_expression: NodeIndex,
        false_expression: NodeIndex,
    },
    /// `[for <item>[, <index>] in <expression>: <body>]`
    For {
        item_name: Identifier,
        index_name: Option<Identifier>,
        expression: NodeIndex,
        body: NodeIndex,
    },
    /// `if (<condition>) <body>`
    IfCondition {
        condition: NodeIndex,
        body: NodeIndex,
    },
}

impl NodeData {
    /// Short kind name used in traces and error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            NodeData::Program { .. } => "program",
            NodeData::ParameterDeclaration { .. } => "param",
            NodeData::VariableDeclaration { .. } => "var",
            NodeData::ResourceDeclaration { .. } => "resource",
            NodeData::ModuleDeclaration { .. } => "module",
            NodeData::OutputDeclaration { .. } => "output",
            NodeData::String { .. } => "string",
            NodeData::Integer(_) => "int",
            NodeData::Boolean(_) => "bool",
            NodeData::Null => "null",
            NodeData::VariableAccess { .. } => "ident",
            NodeData::Array { .. } => "array",
            NodeData::Object { .. } => "object",
            NodeData::PropertyAccess { .. } => "property",
            NodeData::ArrayAccess { .. } => "index",
            NodeData::ResourceAccess { .. } => "resourceAccess",
            NodeData::FunctionCall { .. } => "call",
            NodeData::InstanceFunctionCall { .. } => "instanceCall",
            NodeData::Parenthesized { .. } => "paren",
            NodeData::Unary { .. } => "unary",
            NodeData::Binary { .. } => "binary",
            NodeData::Ternary { .. } => "ternary",
            NodeData::For { .. } => "for",
            NodeData::IfCondition { .. } => "if",
        }
    }

    #[must_use]
    pub const fn is_declaration(&self) -> bool {
        matches!(
            self,
            NodeData::Program { .. }
                | NodeData::ParameterDeclaration { .. }
                | NodeData::VariableDeclaration { .. }
                | NodeData::ResourceDeclaration { .. }
                | NodeData::ModuleDeclaration { .. }
                | NodeData::OutputDeclaration { .. }
        )
    }

    /// Declared identifier of a declaration node.
    #[must_use]
    pub const fn declared_name(&self) -> Option<&Identifier> {
        match self {
            NodeData::ParameterDeclaration { name, .. }
            | NodeData::VariableDeclaration { name, .. }
            | NodeData::ResourceDeclaration { name, .. }
            | NodeData::ModuleDeclaration { name, .. }
            | NodeData::OutputDeclaration { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Value of a string literal without interpolation holes.
    #[must_use]
    pub fn string_literal_value(&self) -> Option<&str> {
        match self {
            NodeData::String {
                segments,
                expressions,
            } if expressions.is_empty() => segments.first().map(String::as_str),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub span: Span,
    pub data: NodeData,
}
