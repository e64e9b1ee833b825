//! Programmatic construction of syntax trees.
//!
//! The builder hands out synthetic, monotonically increasing spans: every
//! leaf gets its own range and composite nodes cover their children. Tests
//! and the document loader use it in place of a parser.

use bcz_common::Span;

use crate::arena::{NodeArena, SyntaxTree};
use crate::node::{
    BinaryOperator, Identifier, ModuleOutput, NodeData, NodeIndex, ObjectProperty, UnaryOperator,
};

pub struct SyntaxBuilder {
    file_name: String,
    arena: NodeArena,
    cursor: u32,
}

impl SyntaxBuilder {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            arena: NodeArena::new(),
            cursor: 0,
        }
    }

    #[must_use]
    pub const fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Finish the tree with `declarations` as the program body.
    #[must_use]
    pub fn finish(mut self, declarations: Vec<NodeIndex>) -> SyntaxTree {
        let span = self.cover(&declarations, Span::at(0));
        let root = self.arena.alloc(span, NodeData::Program { declarations });
        SyntaxTree {
            file_name: self.file_name,
            arena: self.arena,
            root,
        }
    }

    /// Override the span of an already allocated node.
    pub fn set_span(&mut self, idx: NodeIndex, span: Span) {
        self.arena.set_span(idx, span);
        self.cursor = self.cursor.max(span.end.saturating_add(1));
    }

    // =========================================================================
    // Span helpers
    // =========================================================================

    fn leaf_span(&mut self, width: usize) -> Span {
        let width = u32::try_from(width.max(1)).unwrap_or(u32::MAX / 2);
        let span = Span::new(self.cursor, self.cursor.saturating_add(width));
        self.cursor = span.end.saturating_add(1);
        span
    }

    fn cover(&self, children: &[NodeIndex], fallback: Span) -> Span {
        children
            .iter()
            .map(|&child| self.arena.span(child))
            .reduce(Span::cover)
            .map_or(fallback, |span| span.cover(fallback))
    }

    fn keyword(&mut self, text: &str) -> Span {
        self.leaf_span(text.len())
    }

    pub fn identifier(&mut self, name: &str) -> Identifier {
        let span = self.leaf_span(name.len());
        Identifier::new(name, span)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn string(&mut self, value: &str) -> NodeIndex {
        let span = self.leaf_span(value.len() + 2);
        self.arena.alloc(
            span,
            NodeData::String {
                segments: vec![value.to_string()],
                expressions: Vec::new(),
            },
        )
    }

    /// Interpolated string. `segments` must have one more entry than
    /// `expressions`; missing trailing segments are filled with `""`.
    pub fn interpolated(&mut self, segments: &[&str], expressions: Vec<NodeIndex>) -> NodeIndex {
        let mut segments: Vec<String> = segments.iter().map(|s| (*s).to_string()).collect();
        while segments.len() < expressions.len() + 1 {
            segments.push(String::new());
        }
        let open = self.leaf_span(1);
        let close = self.leaf_span(1);
        let span = self.cover(&expressions, open).cover(close);
        self.arena.alloc(
            span,
            NodeData::String {
                segments,
                expressions,
            },
        )
    }

    pub fn int(&mut self, value: i64) -> NodeIndex {
        let span = self.leaf_span(value.to_string().len());
        self.arena.alloc(span, NodeData::Integer(value))
    }

    pub fn boolean(&mut self, value: bool) -> NodeIndex {
        let span = self.leaf_span(if value { 4 } else { 5 });
        self.arena.alloc(span, NodeData::Boolean(value))
    }

    pub fn null(&mut self) -> NodeIndex {
        let span = self.leaf_span(4);
        self.arena.alloc(span, NodeData::Null)
    }

    pub fn ident(&mut self, name: &str) -> NodeIndex {
        let name = self.identifier(name);
        self.arena
            .alloc(name.span, NodeData::VariableAccess { name })
    }

    pub fn array(&mut self, items: Vec<NodeIndex>) -> NodeIndex {
        let open = self.leaf_span(1);
        let close = self.leaf_span(1);
        let span = self.cover(&items, open).cover(close);
        self.arena.alloc(span, NodeData::Array { items })
    }

    pub fn object(&mut self, properties: Vec<(&str, NodeIndex)>) -> NodeIndex {
        let open = self.leaf_span(1);
        let properties: Vec<ObjectProperty> = properties
            .into_iter()
            .map(|(key, value)| {
                let key = self.identifier(key);
                ObjectProperty { key, value }
            })
            .collect();
        let close = self.leaf_span(1);
        let values: Vec<NodeIndex> = properties.iter().map(|p| p.value).collect();
        let span = self.cover(&values, open).cover(close);
        self.arena.alloc(span, NodeData::Object { properties })
    }

    pub fn property(&mut self, base: NodeIndex, name: &str) -> NodeIndex {
        let property = self.identifier(name);
        let span = self.arena.span(base).cover(property.span);
        self.arena
            .alloc(span, NodeData::PropertyAccess { base, property })
    }

    pub fn index(&mut self, base: NodeIndex, index: NodeIndex) -> NodeIndex {
        let close = self.leaf_span(1);
        let span = self.cover(&[base, index], close);
        self.arena.alloc(span, NodeData::ArrayAccess { base, index })
    }

    pub fn resource_access(&mut self, base: NodeIndex, name: &str) -> NodeIndex {
        let resource_name = self.identifier(name);
        let span = self.arena.span(base).cover(resource_name.span);
        self.arena.alloc(
            span,
            NodeData::ResourceAccess {
                base,
                resource_name,
            },
        )
    }

    pub fn call(&mut self, name: &str, arguments: Vec<NodeIndex>) -> NodeIndex {
        let name = self.identifier(name);
        let close = self.leaf_span(1);
        let span = self.cover(&arguments, name.span).cover(close);
        self.arena
            .alloc(span, NodeData::FunctionCall { name, arguments })
    }

    pub fn instance_call(
        &mut self,
        base: NodeIndex,
        name: &str,
        arguments: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = self.identifier(name);
        let close = self.leaf_span(1);
        let span = self.cover(&arguments, name.span).cover(close);
        let span = span.cover(self.arena.span(base));
        self.arena.alloc(
            span,
            NodeData::InstanceFunctionCall {
                base,
                name,
                arguments,
            },
        )
    }

    pub fn paren(&mut self, expression: NodeIndex) -> NodeIndex {
        let close = self.leaf_span(1);
        let span = self.cover(&[expression], close);
        self.arena
            .alloc(span, NodeData::Parenthesized { expression })
    }

    pub fn unary(&mut self, operator: UnaryOperator, expression: NodeIndex) -> NodeIndex {
        let span = self.cover(&[expression], Span::at(self.arena.span(expression).start));
        self.arena
            .alloc(span, NodeData::Unary { operator, expression })
    }

    pub fn binary(
        &mut self,
        operator: BinaryOperator,
        left: NodeIndex,
        right: NodeIndex,
    ) -> NodeIndex {
        let span = self.cover(&[left, right], self.arena.span(left));
        self.arena.alloc(
            span,
            NodeData::Binary {
                operator,
                left,
                right,
            },
        )
    }

    pub fn ternary(
        &mut self,
        condition: NodeIndex,
        true_expression: NodeIndex,
        false_expression: NodeIndex,
    ) -> NodeIndex {
        let span = self.cover(
            &[condition, true_expression, false_expression],
            self.arena.span(condition),
        );
        self.arena.alloc(
            span,
            NodeData::Ternary {
                condition,
                true_expression,
                false_expression,
            },
        )
    }

    pub fn for_loop(
        &mut self,
        item_name: &str,
        index_name: Option<&str>,
        expression: NodeIndex,
        body: NodeIndex,
    ) -> NodeIndex {
        let keyword = self.keyword("for");
        let item_name = self.identifier(item_name);
        let index_name = index_name.map(|name| self.identifier(name));
        let close = self.leaf_span(1);
        let span = self.cover(&[expression, body], keyword).cover(close);
        self.arena.alloc(
            span,
            NodeData::For {
                item_name,
                index_name,
                expression,
                body,
            },
        )
    }

    pub fn if_condition(&mut self, condition: NodeIndex, body: NodeIndex) -> NodeIndex {
        let keyword = self.keyword("if");
        let span = self.cover(&[condition, body], keyword);
        self.arena
            .alloc(span, NodeData::IfCondition { condition, body })
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn param(&mut self, name: &str, default_value: Option<NodeIndex>) -> NodeIndex {
        let keyword = self.keyword("param");
        let name = self.identifier(name);
        let children: Vec<NodeIndex> = default_value.into_iter().collect();
        let span = self.cover(&children, keyword.cover(name.span));
        self.arena.alloc(
            span,
            NodeData::ParameterDeclaration {
                name,
                default_value,
            },
        )
    }

    pub fn var(&mut self, name: &str, value: NodeIndex) -> NodeIndex {
        let keyword = self.keyword("var");
        let name = self.identifier(name);
        let span = self.cover(&[value], keyword.cover(name.span));
        self.arena
            .alloc(span, NodeData::VariableDeclaration { name, value })
    }

    pub fn resource(
        &mut self,
        name: &str,
        type_reference: &str,
        existing: bool,
        body: NodeIndex,
    ) -> NodeIndex {
        self.resource_with_children(name, type_reference, existing, body, Vec::new())
    }

    pub fn resource_with_children(
        &mut self,
        name: &str,
        type_reference: &str,
        existing: bool,
        body: NodeIndex,
        nested_resources: Vec<NodeIndex>,
    ) -> NodeIndex {
        let keyword = self.keyword("resource");
        let name = self.identifier(name);
        let mut children = vec![body];
        children.extend(nested_resources.iter().copied());
        let span = self.cover(&children, keyword.cover(name.span));
        self.arena.alloc(
            span,
            NodeData::ResourceDeclaration {
                name,
                type_reference: type_reference.to_string(),
                existing,
                body,
                nested_resources,
            },
        )
    }

    pub fn module(&mut self, name: &str, path: &str, body: NodeIndex) -> NodeIndex {
        self.module_with_outputs(name, path, body, &[])
    }

    /// Module whose signature declares `outputs` as `(name, resource type)`.
    pub fn module_with_outputs(
        &mut self,
        name: &str,
        path: &str,
        body: NodeIndex,
        outputs: &[(&str, Option<&str>)],
    ) -> NodeIndex {
        let keyword = self.keyword("module");
        let name = self.identifier(name);
        let outputs = outputs
            .iter()
            .map(|&(output, resource_type)| ModuleOutput {
                name: self.identifier(output),
                resource_type: resource_type.map(str::to_string),
            })
            .collect();
        let span = self.cover(&[body], keyword.cover(name.span));
        self.arena.alloc(
            span,
            NodeData::ModuleDeclaration {
                name,
                path: path.to_string(),
                body,
                outputs,
            },
        )
    }

    pub fn output(&mut self, name: &str, value: NodeIndex) -> NodeIndex {
        let keyword = self.keyword("output");
        let name = self.identifier(name);
        let span = self.cover(&[value], keyword.cover(name.span));
        self.arena
            .alloc(span, NodeData::OutputDeclaration { name, value })
    }
}
