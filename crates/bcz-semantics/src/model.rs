//! The semantic model: a bound program plus derived body types.

use std::sync::Arc;

use bcz_common::Diagnostic;
use bcz_syntax::{NodeArena, NodeData, NodeIndex, SyntaxTree};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::binder::{Binder, BoundProgram};
use crate::builtins::BuiltinFunctions;
use crate::catalog::ResourceTypeCatalog;
use crate::constant::DeployTimeAnalyzer;
use crate::error::ModelError;
use crate::resolver::{ResourceTypeResolver, resolve_declared_target};
use crate::symbols::{Symbol, SymbolId};
use crate::types::{FunctionOverload, ObjectType};

/// What a node refers to.
#[derive(Clone, Copy, Debug)]
pub enum SymbolInfo<'m> {
    /// A declared symbol (parameter, variable, resource, module, loop local).
    Declared { id: SymbolId, symbol: &'m Symbol },
    /// A builtin function or an instance function of a body type.
    Function(&'m FunctionOverload),
}

impl<'m> SymbolInfo<'m> {
    #[must_use]
    pub const fn as_function(&self) -> Option<&'m FunctionOverload> {
        match self {
            SymbolInfo::Function(overload) => Some(overload),
            SymbolInfo::Declared { .. } => None,
        }
    }
}

/// Read-only semantic view of one compiled program.
pub struct SemanticModel<'t> {
    tree: &'t SyntaxTree,
    bound: BoundProgram,
    bodies: FxHashMap<SymbolId, Arc<ObjectType>>,
    builtins: BuiltinFunctions,
    diagnostics: Vec<Diagnostic>,
}

impl<'t> SemanticModel<'t> {
    /// Bind `tree` and derive the body type of every resource and module.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %tree.file_name))]
    pub fn build(tree: &'t SyntaxTree, catalog: &ResourceTypeCatalog) -> Result<Self, ModelError> {
        let builtins = BuiltinFunctions::standard();
        let mut bound = Binder::bind(tree, &builtins)?;

        let (bodies, body_diagnostics) =
            DeployTimeAnalyzer::new(tree, &bound, catalog, &builtins).finish();

        let mut diagnostics = std::mem::take(&mut bound.diagnostics);
        diagnostics.extend(body_diagnostics);
        diagnostics.sort_by_key(|d| (d.start, d.code));

        debug!(
            bodies = bodies.len(),
            diagnostics = diagnostics.len(),
            "semantic model built"
        );
        Ok(Self {
            tree,
            bound,
            bodies,
            builtins,
            diagnostics,
        })
    }

    #[must_use]
    pub const fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    #[must_use]
    pub fn arena(&self) -> &'t NodeArena {
        &self.tree.arena
    }

    #[must_use]
    pub fn root(&self) -> NodeIndex {
        self.tree.root
    }

    #[must_use]
    pub fn file_name(&self) -> &'t str {
        &self.tree.file_name
    }

    #[must_use]
    pub const fn bound(&self) -> &BoundProgram {
        &self.bound
    }

    #[must_use]
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.bound.symbols.get(id)
    }

    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.bound.symbols.iter()
    }

    /// Symbol declared by the top-level or nested declaration `declaration`.
    #[must_use]
    pub fn symbol_for_declaration(&self, declaration: NodeIndex) -> Option<SymbolId> {
        self.bound.declaration_symbol(declaration)
    }

    /// Symbol declared under `name` at program level.
    #[must_use]
    pub fn lookup_symbol(&self, name: &str) -> Option<SymbolId> {
        self.bound.lookup_global(name)
    }

    /// Body type of a resource or module declaration.
    #[must_use]
    pub fn body_type(&self, id: SymbolId) -> Option<&ObjectType> {
        self.bodies.get(&id).map(AsRef::as_ref)
    }

    #[must_use]
    pub const fn builtins(&self) -> &BuiltinFunctions {
        &self.builtins
    }

    /// Binder and body derivation diagnostics, ordered by position.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn get_symbol_info(&self, node: NodeIndex) -> Option<SymbolInfo<'_>> {
        match self.arena().data(node)? {
            NodeData::VariableAccess { .. } | NodeData::ResourceAccess { .. } => {
                let id = self.bound.node_symbol(node)?;
                let symbol = self.symbol(id)?;
                Some(SymbolInfo::Declared { id, symbol })
            }
            NodeData::FunctionCall { name, .. } => {
                self.builtins.lookup(&name.name).map(SymbolInfo::Function)
            }
            NodeData::InstanceFunctionCall { base, name, .. } => {
                let target = resolve_declared_target(self.arena(), &self.bound, *base)?;
                self.body_type(target)?
                    .method_resolver()
                    .find(&name.name)
                    .map(SymbolInfo::Function)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn resource_type_resolver(&self) -> ResourceTypeResolver<'_> {
        ResourceTypeResolver::new(self)
    }
}
