//! Resolution of base expressions to resource and module declarations.

use bcz_common::identifier_eq;
use bcz_common::limits::MAX_RESOURCE_ACCESS_DEPTH;
use bcz_syntax::{NodeArena, NodeData, NodeIndex};
use tracing::trace;

use crate::binder::BoundProgram;
use crate::model::SemanticModel;
use crate::symbols::{Symbol, SymbolId};
use crate::types::{MODULE_OUTPUTS_PROPERTY, ObjectType, RESOURCE_NAME_PROPERTY};

/// Resolve `expr` to the resource or module declaration it denotes.
///
/// Accepted shapes:
/// - an identifier or `parent::child` bound to a non-collection declaration
/// - `base[index]` where `base` is bound to a collection declaration
/// - `module.outputs.name` or `module.outputs['name']` where `name` is a
///   resource-typed output of the module `module` resolves to
/// - any of the above wrapped in parentheses
pub fn resolve_declared_target(
    arena: &NodeArena,
    bound: &BoundProgram,
    expr: NodeIndex,
) -> Option<SymbolId> {
    resolve_target(arena, bound, expr, 0)
}

fn resolve_target(
    arena: &NodeArena,
    bound: &BoundProgram,
    expr: NodeIndex,
    mut hops: usize,
) -> Option<SymbolId> {
    let mut current = expr;
    loop {
        if hops >= MAX_RESOURCE_ACCESS_DEPTH {
            trace!(?expr, "resource access chain too deep");
            return None;
        }
        hops += 1;
        match arena.data(current)? {
            NodeData::Parenthesized { expression } => current = *expression,
            NodeData::VariableAccess { .. } | NodeData::ResourceAccess { .. } => {
                let id = bound.node_symbol(current)?;
                let symbol = bound.symbols.get(id)?;
                return (symbol.is_resource_or_module() && !symbol.is_collection()).then_some(id);
            }
            NodeData::PropertyAccess { base, property } => {
                return module_output(arena, bound, *base, &property.name, hops);
            }
            NodeData::ArrayAccess { base, index } => {
                let output = arena.data(*index).and_then(NodeData::string_literal_value);
                if let Some(id) =
                    output.and_then(|output| module_output(arena, bound, *base, output, hops))
                {
                    return Some(id);
                }
                if !matches!(
                    arena.data(*base)?,
                    NodeData::VariableAccess { .. } | NodeData::ResourceAccess { .. }
                ) {
                    return None;
                }
                let id = bound.node_symbol(*base)?;
                let symbol = bound.symbols.get(id)?;
                return (symbol.is_resource_or_module() && symbol.is_collection()).then_some(id);
            }
            _ => return None,
        }
    }
}

/// `outputs_expr` must be `<module>.outputs`; returns the resource behind
/// the module's output `name`.
fn module_output(
    arena: &NodeArena,
    bound: &BoundProgram,
    outputs_expr: NodeIndex,
    name: &str,
    hops: usize,
) -> Option<SymbolId> {
    let NodeData::PropertyAccess { base, property } = arena.data(outputs_expr)? else {
        return None;
    };
    if !identifier_eq(&property.name, MODULE_OUTPUTS_PROPERTY) {
        return None;
    }
    let module = resolve_target(arena, bound, *base, hops)?;
    if bound.symbols.get(module)?.as_module().is_none() {
        return None;
    }
    bound.lookup_module_output(module, name)
}

/// A resolved declaration together with its body type.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedAccess<'m> {
    pub symbol_id: SymbolId,
    pub symbol: &'m Symbol,
    pub body: &'m ObjectType,
}

impl ResolvedAccess<'_> {
    /// An existing resource whose `name` cannot be computed before deployment.
    #[must_use]
    pub fn is_runtime_constrained(&self) -> bool {
        self.symbol.is_existing_resource()
            && self
                .body
                .property(RESOURCE_NAME_PROPERTY)
                .is_some_and(|name| !name.flags.is_readable_at_deploy_time())
    }

    /// Properties readable on the resource, in declared order, with `name`
    /// listed exactly once.
    #[must_use]
    pub fn accessible_properties(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .body
            .properties()
            .filter(|p| {
                p.flags.is_readable_at_deploy_time()
                    && !identifier_eq(&p.name, RESOURCE_NAME_PROPERTY)
            })
            .map(|p| p.name.clone())
            .collect();
        names.push(RESOURCE_NAME_PROPERTY.to_string());
        names
    }

    /// Instance functions that do not require inlining, in declared order.
    #[must_use]
    pub fn accessible_functions(&self) -> Vec<String> {
        self.body
            .method_resolver()
            .overloads()
            .filter(|f| !f.flags.requires_inlining())
            .map(|f| f.name.clone())
            .collect()
    }
}

/// Body type queries over a finished semantic model.
#[derive(Clone, Copy)]
pub struct ResourceTypeResolver<'m> {
    model: &'m SemanticModel<'m>,
}

impl<'m> ResourceTypeResolver<'m> {
    #[must_use]
    pub const fn new(model: &'m SemanticModel<'m>) -> Self {
        Self { model }
    }

    pub fn try_resolve_resource_or_module(&self, expr: NodeIndex) -> Option<ResolvedAccess<'m>> {
        let symbol_id = resolve_declared_target(self.model.arena(), self.model.bound(), expr)?;
        let symbol = self.model.symbol(symbol_id)?;
        let body = self.model.body_type(symbol_id)?;
        Some(ResolvedAccess {
            symbol_id,
            symbol,
            body,
        })
    }

    /// Resolve `expr` and keep the result only if it is runtime-constrained.
    pub fn resolve_runtime_constrained(&self, expr: NodeIndex) -> Option<ResolvedAccess<'m>> {
        let resolved = self.try_resolve_resource_or_module(expr)?;
        let constrained = resolved.is_runtime_constrained();
        trace!(
            ?expr,
            symbol = %resolved.symbol.name,
            constrained,
            "resolved member access base"
        );
        constrained.then_some(resolved)
    }
}
