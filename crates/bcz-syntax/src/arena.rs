//! Node storage.

use bcz_common::Span;
use smallvec::SmallVec;

use crate::node::{Node, NodeData, NodeIndex};

/// Child list returned by [`NodeArena::children`]; most nodes have few.
pub type NodeChildren = SmallVec<[NodeIndex; 4]>;

/// Flat storage for every node of one source file.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn alloc(&mut self, span: Span, data: NodeData) -> NodeIndex {
        let idx = NodeIndex(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node { span, data });
        idx
    }

    pub(crate) fn set_span(&mut self, idx: NodeIndex, span: Span) {
        if let Some(node) = self.nodes.get_mut(idx.as_usize()) {
            node.span = span;
        }
    }

    #[must_use]
    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(idx.as_usize())
    }

    #[must_use]
    pub fn data(&self, idx: NodeIndex) -> Option<&NodeData> {
        self.get(idx).map(|node| &node.data)
    }

    #[must_use]
    pub fn span(&self, idx: NodeIndex) -> Span {
        self.get(idx).map(|node| node.span).unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex(i as u32), node))
    }

    /// Direct children of `idx`, in source order.
    #[must_use]
    pub fn children(&self, idx: NodeIndex) -> NodeChildren {
        let mut out = NodeChildren::new();
        let Some(data) = self.data(idx) else {
            return out;
        };
        match data {
            NodeData::Program { declarations } => out.extend(declarations.iter().copied()),
            NodeData::ParameterDeclaration { default_value, .. } => {
                out.extend(default_value.iter().copied());
            }
            NodeData::VariableDeclaration { value, .. }
            | NodeData::OutputDeclaration { value, .. } => out.push(*value),
            NodeData::ResourceDeclaration {
                body,
                nested_resources,
                ..
            } => {
                out.push(*body);
                out.extend(nested_resources.iter().copied());
            }
            NodeData::ModuleDeclaration { body, .. } => out.push(*body),
            NodeData::String { expressions, .. } => out.extend(expressions.iter().copied()),
            NodeData::Integer(_)
            | NodeData::Boolean(_)
            | NodeData::Null
            | NodeData::VariableAccess { .. } => {}
            NodeData::Array { items } => out.extend(items.iter().copied()),
            NodeData::Object { properties } => out.extend(properties.iter().map(|p| p.value)),
            NodeData::PropertyAccess { base, .. } | NodeData::ResourceAccess { base, .. } => {
                out.push(*base);
            }
            NodeData::ArrayAccess { base, index } => {
                out.push(*base);
                out.push(*index);
            }
            NodeData::FunctionCall { arguments, .. } => out.extend(arguments.iter().copied()),
            NodeData::InstanceFunctionCall {
                base, arguments, ..
            } => {
                out.push(*base);
                out.extend(arguments.iter().copied());
            }
            NodeData::Parenthesized { expression } | NodeData::Unary { expression, .. } => {
                out.push(*expression);
            }
            NodeData::Binary { left, right, .. } => {
                out.push(*left);
                out.push(*right);
            }
            NodeData::Ternary {
                condition,
                true_expression,
                false_expression,
            } => {
                out.push(*condition);
                out.push(*true_expression);
                out.push(*false_expression);
            }
            NodeData::For {
                expression, body, ..
            } => {
                out.push(*expression);
                out.push(*body);
            }
            NodeData::IfCondition { condition, body } => {
                out.push(*condition);
                out.push(*body);
            }
        }
        out
    }
}

/// A parsed source file: its arena plus the program root.
#[derive(Clone, Debug)]
pub struct SyntaxTree {
    pub file_name: String,
    pub arena: NodeArena,
    pub root: NodeIndex,
}

impl SyntaxTree {
    #[must_use]
    pub fn program_declarations(&self) -> &[NodeIndex] {
        match self.arena.data(self.root) {
            Some(NodeData::Program { declarations }) => declarations,
            _ => &[],
        }
    }
}
