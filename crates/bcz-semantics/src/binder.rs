//! Binder: declares symbols and binds identifier references.
//!
//! Binding runs in two passes over the program. The first declares every
//! top-level symbol (and nested resources under their parent) so references
//! may point forward; the second walks every expression and records which
//! symbol each identifier and `parent::child` access denotes.

use bcz_common::limits::{STACK_GROWTH_SIZE, STACK_RED_ZONE};
use bcz_common::{Diagnostic, diagnostic_codes, diagnostic_messages, format_message, identifier_key};
use bcz_syntax::{Identifier, ModuleOutput, NodeData, NodeIndex, SyntaxTree};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::builtins::BuiltinFunctions;
use crate::catalog::ResourceTypeReference;
use crate::error::ModelError;
use crate::symbols::{ModuleSymbol, ResourceSymbol, Symbol, SymbolArena, SymbolId, SymbolKind};

type Scope = FxHashMap<String, SymbolId>;

/// Output of binding: the symbol table and the node → symbol mapping.
#[derive(Debug, Default)]
pub struct BoundProgram {
    pub symbols: SymbolArena,
    globals: Scope,
    outputs: Scope,
    children: FxHashMap<SymbolId, Scope>,
    module_outputs: FxHashMap<SymbolId, Scope>,
    node_symbols: FxHashMap<NodeIndex, SymbolId>,
    declaration_symbols: FxHashMap<NodeIndex, SymbolId>,
    pub diagnostics: Vec<Diagnostic>,
}

impl BoundProgram {
    /// Symbol an identifier or `parent::child` node is bound to.
    #[must_use]
    pub fn node_symbol(&self, node: NodeIndex) -> Option<SymbolId> {
        self.node_symbols.get(&node).copied()
    }

    /// Symbol declared by a declaration node.
    #[must_use]
    pub fn declaration_symbol(&self, declaration: NodeIndex) -> Option<SymbolId> {
        self.declaration_symbols.get(&declaration).copied()
    }

    #[must_use]
    pub fn lookup_global(&self, name: &str) -> Option<SymbolId> {
        self.globals.get(&identifier_key(name)).copied()
    }

    #[must_use]
    pub fn lookup_output(&self, name: &str) -> Option<SymbolId> {
        self.outputs.get(&identifier_key(name)).copied()
    }

    /// Nested resource `name` declared inside `parent`.
    #[must_use]
    pub fn lookup_child(&self, parent: SymbolId, name: &str) -> Option<SymbolId> {
        self.children
            .get(&parent)
            .and_then(|scope| scope.get(&identifier_key(name)))
            .copied()
    }

    /// Resource returned by the resource-typed output `name` of `module`.
    #[must_use]
    pub fn lookup_module_output(&self, module: SymbolId, name: &str) -> Option<SymbolId> {
        self.module_outputs
            .get(&module)
            .and_then(|scope| scope.get(&identifier_key(name)))
            .copied()
    }
}

pub struct Binder<'a> {
    tree: &'a SyntaxTree,
    builtins: &'a BuiltinFunctions,
    bound: BoundProgram,
    scopes: Vec<Scope>,
}

impl<'a> Binder<'a> {
    /// Bind every declaration of `tree`.
    pub fn bind(
        tree: &'a SyntaxTree,
        builtins: &'a BuiltinFunctions,
    ) -> Result<BoundProgram, ModelError> {
        let mut binder = Binder {
            tree,
            builtins,
            bound: BoundProgram::default(),
            scopes: Vec::new(),
        };

        let declarations = match tree.arena.data(tree.root) {
            Some(NodeData::Program { declarations }) => declarations,
            Some(other) => {
                return Err(ModelError::RootNotProgram {
                    root: tree.root,
                    found: other.kind_name(),
                });
            }
            None => return Err(ModelError::DanglingNode { node: tree.root }),
        };

        for &declaration in declarations {
            binder.declare(declaration, None)?;
        }
        for &declaration in declarations {
            binder.bind_declaration(declaration)?;
        }

        debug!(
            file = %tree.file_name,
            symbols = binder.bound.symbols.len(),
            bound_references = binder.bound.node_symbols.len(),
            diagnostics = binder.bound.diagnostics.len(),
            "binding finished"
        );
        Ok(binder.bound)
    }

    fn data(&self, idx: NodeIndex) -> Result<&'a NodeData, ModelError> {
        self.tree
            .arena
            .data(idx)
            .ok_or(ModelError::DanglingNode { node: idx })
    }

    fn error(&mut self, identifier: &Identifier, template: &str, code: u32) {
        let message = format_message(template, &[identifier.name.as_str()]);
        self.bound.diagnostics.push(Diagnostic::error(
            self.tree.file_name.as_str(),
            identifier.span,
            message,
            code,
        ));
    }

    // =========================================================================
    // Declaration pass
    // =========================================================================

    fn declare(&mut self, idx: NodeIndex, parent: Option<SymbolId>) -> Result<(), ModelError> {
        let data = self.data(idx)?;
        let (name, kind) = match data {
            NodeData::ParameterDeclaration { name, .. } => (name, SymbolKind::Parameter),
            NodeData::VariableDeclaration { name, .. } => (name, SymbolKind::Variable),
            NodeData::OutputDeclaration { name, .. } => (name, SymbolKind::Output),
            NodeData::ModuleDeclaration {
                name, path, body, ..
            } => {
                let is_collection = matches!(self.data(*body)?, NodeData::For { .. });
                (
                    name,
                    SymbolKind::Module(ModuleSymbol {
                        path: path.clone(),
                        is_collection,
                    }),
                )
            }
            NodeData::ResourceDeclaration {
                name,
                type_reference,
                existing,
                body,
                ..
            } => {
                let is_collection = matches!(self.data(*body)?, NodeData::For { .. });
                let type_reference = self.resolve_type_reference(type_reference, parent);
                (
                    name,
                    SymbolKind::Resource(ResourceSymbol {
                        type_reference,
                        is_existing: *existing,
                        is_collection,
                        parent,
                        module: None,
                    }),
                )
            }
            other => {
                return Err(ModelError::ExpressionInDeclaration {
                    node: idx,
                    kind: other.kind_name(),
                });
            }
        };

        let is_output = matches!(kind, SymbolKind::Output);
        let id = self.bound.symbols.alloc(Symbol {
            name: name.name.clone(),
            declaration: idx,
            kind,
        });
        self.bound.declaration_symbols.insert(idx, id);

        let key = identifier_key(&name.name);
        let scope = match parent {
            Some(parent) => self.bound.children.entry(parent).or_default(),
            None if is_output => &mut self.bound.outputs,
            None => &mut self.bound.globals,
        };
        if scope.contains_key(&key) {
            self.error(
                name,
                diagnostic_messages::IDENTIFIER_DECLARED_MULTIPLE_TIMES,
                diagnostic_codes::IDENTIFIER_DECLARED_MULTIPLE_TIMES,
            );
        } else {
            scope.insert(key, id);
        }
        debug!(name = %name.name, ?id, ?parent, "declared symbol");

        match data {
            NodeData::ResourceDeclaration {
                nested_resources, ..
            } => {
                for &nested in nested_resources {
                    self.declare(nested, Some(id))?;
                }
            }
            NodeData::ModuleDeclaration { outputs, .. } => {
                self.declare_module_outputs(idx, id, outputs);
            }
            _ => {}
        }
        Ok(())
    }

    /// Resource-typed outputs become existing resource symbols owned by the
    /// module; other outputs stay opaque values.
    fn declare_module_outputs(
        &mut self,
        declaration: NodeIndex,
        module: SymbolId,
        outputs: &[ModuleOutput],
    ) {
        for output in outputs {
            let Some(resource_type) = &output.resource_type else {
                continue;
            };
            let type_reference = self.resolve_type_reference(resource_type, None);
            let id = self.bound.symbols.alloc(Symbol {
                name: output.name.name.clone(),
                declaration,
                kind: SymbolKind::Resource(ResourceSymbol {
                    type_reference,
                    is_existing: true,
                    is_collection: false,
                    parent: None,
                    module: Some(module),
                }),
            });
            let scope = self.bound.module_outputs.entry(module).or_default();
            let key = identifier_key(&output.name.name);
            if scope.contains_key(&key) {
                self.error(
                    &output.name,
                    diagnostic_messages::IDENTIFIER_DECLARED_MULTIPLE_TIMES,
                    diagnostic_codes::IDENTIFIER_DECLARED_MULTIPLE_TIMES,
                );
            } else {
                scope.insert(key, id);
            }
            trace!(output = %output.name.name, ?module, ?id, "declared module output resource");
        }
    }

    fn resolve_type_reference(
        &self,
        text: &str,
        parent: Option<SymbolId>,
    ) -> ResourceTypeReference {
        let Some(reference) = ResourceTypeReference::parse(text) else {
            return ResourceTypeReference {
                type_segments: vec![text.to_string()],
                api_version: None,
            };
        };
        let parent_reference = parent
            .and_then(|id| self.bound.symbols.get(id))
            .and_then(Symbol::as_resource)
            .map(|resource| &resource.type_reference);
        match parent_reference {
            Some(parent_reference) if reference.is_relative() => {
                reference.qualify_child(parent_reference)
            }
            _ => reference,
        }
    }

    // =========================================================================
    // Reference pass
    // =========================================================================

    fn bind_declaration(&mut self, idx: NodeIndex) -> Result<(), ModelError> {
        match self.data(idx)? {
            NodeData::ResourceDeclaration {
                body,
                nested_resources,
                ..
            } => {
                let scope = self
                    .bound
                    .declaration_symbol(idx)
                    .and_then(|id| self.bound.children.get(&id))
                    .cloned()
                    .unwrap_or_default();
                self.scopes.push(scope);
                let result = self.bind_expression(*body).and_then(|()| {
                    nested_resources
                        .iter()
                        .try_for_each(|&nested| self.bind_declaration(nested))
                });
                self.scopes.pop();
                result
            }
            NodeData::ParameterDeclaration { default_value, .. } => match default_value {
                Some(value) => self.bind_expression(*value),
                None => Ok(()),
            },
            NodeData::VariableDeclaration { value, .. }
            | NodeData::OutputDeclaration { value, .. } => self.bind_expression(*value),
            NodeData::ModuleDeclaration { body, .. } => self.bind_expression(*body),
            other => Err(ModelError::ExpressionInDeclaration {
                node: idx,
                kind: other.kind_name(),
            }),
        }
    }

    fn lookup(&self, name: &str) -> Option<SymbolId> {
        let key = identifier_key(name);
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&key).copied())
            .or_else(|| self.bound.globals.get(&key).copied())
    }

    fn bind_expression(&mut self, idx: NodeIndex) -> Result<(), ModelError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            self.bind_expression_inner(idx)
        })
    }

    fn bind_expression_inner(&mut self, idx: NodeIndex) -> Result<(), ModelError> {
        let data = self.data(idx)?;
        if data.is_declaration() {
            return Err(ModelError::DeclarationInExpression {
                node: idx,
                kind: data.kind_name(),
            });
        }

        match data {
            NodeData::VariableAccess { name } => {
                if let Some(id) = self.lookup(&name.name) {
                    trace!(name = %name.name, ?id, "bound identifier");
                    self.bound.node_symbols.insert(idx, id);
                } else {
                    self.error(
                        name,
                        diagnostic_messages::THE_NAME_DOES_NOT_EXIST,
                        diagnostic_codes::THE_NAME_DOES_NOT_EXIST,
                    );
                }
                Ok(())
            }
            NodeData::ResourceAccess {
                base,
                resource_name,
            } => {
                self.bind_expression(*base)?;
                let child = self
                    .bound
                    .node_symbol(*base)
                    .and_then(|parent| self.bound.lookup_child(parent, &resource_name.name));
                if let Some(id) = child {
                    self.bound.node_symbols.insert(idx, id);
                } else {
                    self.error(
                        resource_name,
                        diagnostic_messages::THE_NAME_DOES_NOT_EXIST,
                        diagnostic_codes::THE_NAME_DOES_NOT_EXIST,
                    );
                }
                Ok(())
            }
            NodeData::For {
                item_name,
                index_name,
                expression,
                body,
            } => {
                self.bind_expression(*expression)?;
                let mut scope = Scope::default();
                let locals = std::iter::once((item_name, false))
                    .chain(index_name.iter().map(|index| (index, true)));
                for (local, is_index) in locals {
                    let id = self.bound.symbols.alloc(Symbol {
                        name: local.name.clone(),
                        declaration: idx,
                        kind: SymbolKind::LocalVariable {
                            source: idx,
                            is_index,
                        },
                    });
                    scope.insert(identifier_key(&local.name), id);
                }
                self.scopes.push(scope);
                let result = self.bind_expression(*body);
                self.scopes.pop();
                result
            }
            NodeData::FunctionCall { name, arguments } => {
                if self.builtins.lookup(&name.name).is_none() {
                    self.error(
                        name,
                        diagnostic_messages::THE_NAME_DOES_NOT_EXIST,
                        diagnostic_codes::THE_NAME_DOES_NOT_EXIST,
                    );
                }
                arguments
                    .iter()
                    .try_for_each(|&argument| self.bind_expression(argument))
            }
            _ => self
                .tree
                .arena
                .children(idx)
                .into_iter()
                .try_for_each(|child| self.bind_expression(child)),
        }
    }
}
