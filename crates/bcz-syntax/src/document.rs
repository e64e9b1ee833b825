//! JSON document format for syntax trees.
//!
//! Hosts without a parser (test fixtures, the command line driver) describe
//! a program as nested JSON objects tagged by `kind`:
//!
//! ```json
//! { "kind": "resource", "name": "acct", "existing": true,
//!   "type": "Microsoft.Storage/storageAccounts@2021-04-01",
//!   "body": { "kind": "object", "properties": {
//!     "name": { "kind": "call", "name": "reference", "args": [] } } } }
//! ```
//!
//! Every node accepts an optional `"span": [start, end]`; nodes without one
//! get synthetic spans from [`SyntaxBuilder`].

use bcz_common::Span;
use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::arena::SyntaxTree;
use crate::builder::SyntaxBuilder;
use crate::node::{BinaryOperator, NodeIndex, UnaryOperator};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid program document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("string literal at {span:?} has both `value` and `parts`")]
    AmbiguousString { span: Option<Span> },
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", deny_unknown_fields)]
pub enum DeclarationDocument {
    Param {
        name: String,
        #[serde(default)]
        default: Option<ExpressionDocument>,
        #[serde(default)]
        span: Option<Span>,
    },
    Var {
        name: String,
        value: ExpressionDocument,
        #[serde(default)]
        span: Option<Span>,
    },
    Resource {
        name: String,
        #[serde(rename = "type")]
        type_reference: String,
        #[serde(default)]
        existing: bool,
        body: ExpressionDocument,
        #[serde(default)]
        resources: Vec<DeclarationDocument>,
        #[serde(default)]
        span: Option<Span>,
    },
    Module {
        name: String,
        path: String,
        body: ExpressionDocument,
        /// Outputs of the referenced module's signature.
        #[serde(default)]
        outputs: Vec<ModuleOutputDocument>,
        #[serde(default)]
        span: Option<Span>,
    },
    Output {
        name: String,
        value: ExpressionDocument,
        #[serde(default)]
        span: Option<Span>,
    },
}

/// `{ "name": "acct", "resource": "Microsoft.Storage/storageAccounts@2021-04-01" }`;
/// `resource` is present only for resource-typed outputs.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleOutputDocument {
    pub name: String,
    #[serde(default)]
    pub resource: Option<String>,
}

/// One piece of an interpolated string: literal text or a hole.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum StringPart {
    Text(String),
    Expression(ExpressionDocument),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", deny_unknown_fields)]
pub enum ExpressionDocument {
    String {
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        parts: Vec<StringPart>,
        #[serde(default)]
        span: Option<Span>,
    },
    Int {
        value: i64,
        #[serde(default)]
        span: Option<Span>,
    },
    Bool {
        value: bool,
        #[serde(default)]
        span: Option<Span>,
    },
    Null {
        #[serde(default)]
        span: Option<Span>,
    },
    Ident {
        name: String,
        #[serde(default)]
        span: Option<Span>,
    },
    Array {
        #[serde(default)]
        items: Vec<ExpressionDocument>,
        #[serde(default)]
        span: Option<Span>,
    },
    Object {
        #[serde(default)]
        properties: IndexMap<String, ExpressionDocument>,
        #[serde(default)]
        span: Option<Span>,
    },
    Property {
        base: Box<ExpressionDocument>,
        name: String,
        #[serde(default)]
        span: Option<Span>,
    },
    Index {
        base: Box<ExpressionDocument>,
        index: Box<ExpressionDocument>,
        #[serde(default)]
        span: Option<Span>,
    },
    ResourceAccess {
        base: Box<ExpressionDocument>,
        name: String,
        #[serde(default)]
        span: Option<Span>,
    },
    Call {
        name: String,
        #[serde(default)]
        args: Vec<ExpressionDocument>,
        #[serde(default)]
        span: Option<Span>,
    },
    InstanceCall {
        base: Box<ExpressionDocument>,
        name: String,
        #[serde(default)]
        args: Vec<ExpressionDocument>,
        #[serde(default)]
        span: Option<Span>,
    },
    Paren {
        expression: Box<ExpressionDocument>,
        #[serde(default)]
        span: Option<Span>,
    },
    Unary {
        operator: UnaryOperator,
        expression: Box<ExpressionDocument>,
        #[serde(default)]
        span: Option<Span>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<ExpressionDocument>,
        right: Box<ExpressionDocument>,
        #[serde(default)]
        span: Option<Span>,
    },
    Ternary {
        condition: Box<ExpressionDocument>,
        #[serde(rename = "then")]
        true_expression: Box<ExpressionDocument>,
        #[serde(rename = "else")]
        false_expression: Box<ExpressionDocument>,
        #[serde(default)]
        span: Option<Span>,
    },
    For {
        item: String,
        #[serde(default)]
        index: Option<String>,
        expression: Box<ExpressionDocument>,
        body: Box<ExpressionDocument>,
        #[serde(default)]
        span: Option<Span>,
    },
    If {
        condition: Box<ExpressionDocument>,
        body: Box<ExpressionDocument>,
        #[serde(default)]
        span: Option<Span>,
    },
}

/// Parse a JSON array of declarations and lower it into a syntax tree.
pub fn parse_program_json(file_name: &str, json: &str) -> Result<SyntaxTree, DocumentError> {
    let declarations: Vec<DeclarationDocument> = serde_json::from_str(json)?;
    lower_program(file_name, &declarations)
}

/// Lower already deserialized declarations into a syntax tree.
pub fn lower_program(
    file_name: &str,
    declarations: &[DeclarationDocument],
) -> Result<SyntaxTree, DocumentError> {
    let mut lowering = Lowering {
        builder: SyntaxBuilder::new(file_name),
    };
    let mut roots = Vec::with_capacity(declarations.len());
    for declaration in declarations {
        roots.push(lowering.declaration(declaration)?);
    }
    let tree = lowering.builder.finish(roots);
    debug!(
        file = file_name,
        declarations = declarations.len(),
        nodes = tree.arena.len(),
        "lowered program"
    );
    Ok(tree)
}

struct Lowering {
    builder: SyntaxBuilder,
}

impl Lowering {
    fn spanned(&mut self, idx: NodeIndex, span: Option<Span>) -> NodeIndex {
        if let Some(span) = span {
            self.builder.set_span(idx, span);
        }
        idx
    }

    fn declaration(&mut self, doc: &DeclarationDocument) -> Result<NodeIndex, DocumentError> {
        let (idx, span) = match doc {
            DeclarationDocument::Param {
                name,
                default,
                span,
            } => {
                let default = default.as_ref().map(|d| self.expression(d)).transpose()?;
                (self.builder.param(name, default), *span)
            }
            DeclarationDocument::Var { name, value, span } => {
                let value = self.expression(value)?;
                (self.builder.var(name, value), *span)
            }
            DeclarationDocument::Resource {
                name,
                type_reference,
                existing,
                body,
                resources,
                span,
            } => {
                let body = self.expression(body)?;
                let mut nested = Vec::with_capacity(resources.len());
                for resource in resources {
                    nested.push(self.declaration(resource)?);
                }
                let idx = self.builder.resource_with_children(
                    name,
                    type_reference,
                    *existing,
                    body,
                    nested,
                );
                (idx, *span)
            }
            DeclarationDocument::Module {
                name,
                path,
                body,
                outputs,
                span,
            } => {
                let body = self.expression(body)?;
                let outputs: Vec<(&str, Option<&str>)> = outputs
                    .iter()
                    .map(|output| (output.name.as_str(), output.resource.as_deref()))
                    .collect();
                (
                    self.builder.module_with_outputs(name, path, body, &outputs),
                    *span,
                )
            }
            DeclarationDocument::Output { name, value, span } => {
                let value = self.expression(value)?;
                (self.builder.output(name, value), *span)
            }
        };
        Ok(self.spanned(idx, span))
    }

    fn expressions(&mut self, docs: &[ExpressionDocument]) -> Result<Vec<NodeIndex>, DocumentError> {
        docs.iter().map(|doc| self.expression(doc)).collect()
    }

    fn expression(&mut self, doc: &ExpressionDocument) -> Result<NodeIndex, DocumentError> {
        stacker::maybe_grow(
            bcz_common::limits::STACK_RED_ZONE,
            bcz_common::limits::STACK_GROWTH_SIZE,
            || self.expression_inner(doc),
        )
    }

    fn expression_inner(&mut self, doc: &ExpressionDocument) -> Result<NodeIndex, DocumentError> {
        let (idx, span) = match doc {
            ExpressionDocument::String { value, parts, span } => {
                (self.string(value.as_deref(), parts, *span)?, *span)
            }
            ExpressionDocument::Int { value, span } => (self.builder.int(*value), *span),
            ExpressionDocument::Bool { value, span } => (self.builder.boolean(*value), *span),
            ExpressionDocument::Null { span } => (self.builder.null(), *span),
            ExpressionDocument::Ident { name, span } => (self.builder.ident(name), *span),
            ExpressionDocument::Array { items, span } => {
                let items = self.expressions(items)?;
                (self.builder.array(items), *span)
            }
            ExpressionDocument::Object { properties, span } => {
                let mut lowered = Vec::with_capacity(properties.len());
                for (key, value) in properties {
                    lowered.push((key.as_str(), self.expression(value)?));
                }
                (self.builder.object(lowered), *span)
            }
            ExpressionDocument::Property { base, name, span } => {
                let base = self.expression(base)?;
                (self.builder.property(base, name), *span)
            }
            ExpressionDocument::Index { base, index, span } => {
                let base = self.expression(base)?;
                let index = self.expression(index)?;
                (self.builder.index(base, index), *span)
            }
            ExpressionDocument::ResourceAccess { base, name, span } => {
                let base = self.expression(base)?;
                (self.builder.resource_access(base, name), *span)
            }
            ExpressionDocument::Call { name, args, span } => {
                let args = self.expressions(args)?;
                (self.builder.call(name, args), *span)
            }
            ExpressionDocument::InstanceCall {
                base,
                name,
                args,
                span,
            } => {
                let base = self.expression(base)?;
                let args = self.expressions(args)?;
                (self.builder.instance_call(base, name, args), *span)
            }
            ExpressionDocument::Paren { expression, span } => {
                let expression = self.expression(expression)?;
                (self.builder.paren(expression), *span)
            }
            ExpressionDocument::Unary {
                operator,
                expression,
                span,
            } => {
                let expression = self.expression(expression)?;
                (self.builder.unary(*operator, expression), *span)
            }
            ExpressionDocument::Binary {
                operator,
                left,
                right,
                span,
            } => {
                let left = self.expression(left)?;
                let right = self.expression(right)?;
                (self.builder.binary(*operator, left, right), *span)
            }
            ExpressionDocument::Ternary {
                condition,
                true_expression,
                false_expression,
                span,
            } => {
                let condition = self.expression(condition)?;
                let true_expression = self.expression(true_expression)?;
                let false_expression = self.expression(false_expression)?;
                (
                    self.builder
                        .ternary(condition, true_expression, false_expression),
                    *span,
                )
            }
            ExpressionDocument::For {
                item,
                index,
                expression,
                body,
                span,
            } => {
                let expression = self.expression(expression)?;
                let body = self.expression(body)?;
                (
                    self.builder
                        .for_loop(item, index.as_deref(), expression, body),
                    *span,
                )
            }
            ExpressionDocument::If {
                condition,
                body,
                span,
            } => {
                let condition = self.expression(condition)?;
                let body = self.expression(body)?;
                (self.builder.if_condition(condition, body), *span)
            }
        };
        Ok(self.spanned(idx, span))
    }

    fn string(
        &mut self,
        value: Option<&str>,
        parts: &[StringPart],
        span: Option<Span>,
    ) -> Result<NodeIndex, DocumentError> {
        if parts.is_empty() {
            return Ok(self.builder.string(value.unwrap_or_default()));
        }
        if value.is_some() {
            return Err(DocumentError::AmbiguousString { span });
        }

        let mut segments: Vec<String> = vec![String::new()];
        let mut holes = Vec::new();
        for part in parts {
            match part {
                StringPart::Text(text) => {
                    if let Some(last) = segments.last_mut() {
                        last.push_str(text);
                    }
                }
                StringPart::Expression(expression) => {
                    holes.push(self.expression(expression)?);
                    segments.push(String::new());
                }
            }
        }
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        Ok(self.builder.interpolated(&segments, holes))
    }
}
