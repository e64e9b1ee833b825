//! Deploy-time constant analysis and body type derivation.
//!
//! Whether an existing resource's `name` is readable before deployment
//! depends on whether its identity expressions are constant, and constant
//! analysis of a property read depends on the target's body type. Both are
//! therefore computed lazily by one analyzer with shared memo tables.
//!
//! Any reference cycle evaluates to "not constant". Constant-ness is a
//! conjunction over subexpressions, so every member of a cycle is
//! non-constant and the memoized answers stay consistent.

use std::sync::Arc;

use bcz_common::limits::{MAX_CONSTANT_ANALYSIS_DEPTH, STACK_GROWTH_SIZE, STACK_RED_ZONE};
use bcz_common::{Diagnostic, diagnostic_codes, diagnostic_messages, format_message, identifier_eq};
use bcz_syntax::{NodeData, NodeIndex, ObjectProperty, SyntaxTree};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::binder::BoundProgram;
use crate::builtins::BuiltinFunctions;
use crate::catalog::{ResourceTypeCatalog, generic_resource_body};
use crate::flags::PropertyFlags;
use crate::resolver::resolve_declared_target;
use crate::symbols::{ResourceSymbol, SymbolId, SymbolKind};
use crate::types::{MODULE_OUTPUTS_PROPERTY, ObjectType, RESOURCE_NAME_PROPERTY, TypeKind};

const SCOPE_PROPERTY: &str = "scope";
const PARENT_PROPERTY: &str = "parent";

pub(crate) struct DeployTimeAnalyzer<'a> {
    tree: &'a SyntaxTree,
    bound: &'a BoundProgram,
    catalog: &'a ResourceTypeCatalog,
    builtins: &'a BuiltinFunctions,
    constants: FxHashMap<NodeIndex, bool>,
    constants_in_progress: FxHashSet<NodeIndex>,
    identities: FxHashMap<SymbolId, bool>,
    identities_in_progress: FxHashSet<SymbolId>,
    bodies: FxHashMap<SymbolId, Arc<ObjectType>>,
    bodies_in_progress: FxHashSet<SymbolId>,
    depth: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> DeployTimeAnalyzer<'a> {
    pub(crate) fn new(
        tree: &'a SyntaxTree,
        bound: &'a BoundProgram,
        catalog: &'a ResourceTypeCatalog,
        builtins: &'a BuiltinFunctions,
    ) -> Self {
        Self {
            tree,
            bound,
            catalog,
            builtins,
            constants: FxHashMap::default(),
            constants_in_progress: FxHashSet::default(),
            identities: FxHashMap::default(),
            identities_in_progress: FxHashSet::default(),
            bodies: FxHashMap::default(),
            bodies_in_progress: FxHashSet::default(),
            depth: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Derive the body type of every resource and module declaration.
    pub(crate) fn finish(
        mut self,
    ) -> (FxHashMap<SymbolId, Arc<ObjectType>>, Vec<Diagnostic>) {
        let declared: Vec<SymbolId> = self
            .bound
            .symbols
            .iter()
            .filter(|(_, symbol)| symbol.is_resource_or_module())
            .map(|(id, _)| id)
            .collect();
        for id in declared {
            self.body_type(id);
        }
        (self.bodies, self.diagnostics)
    }

    // =========================================================================
    // Body types
    // =========================================================================

    pub(crate) fn body_type(&mut self, id: SymbolId) -> Option<Arc<ObjectType>> {
        if let Some(body) = self.bodies.get(&id) {
            return Some(Arc::clone(body));
        }
        if self.bodies_in_progress.contains(&id) {
            return None;
        }
        let symbol = self.bound.symbols.get(id)?;
        let body = match &symbol.kind {
            SymbolKind::Resource(resource) => {
                self.bodies_in_progress.insert(id);
                let body = self.resource_body(id, resource);
                self.bodies_in_progress.remove(&id);
                Arc::new(body)
            }
            SymbolKind::Module(module) => Arc::new(module_body(&module.path)),
            _ => return None,
        };
        self.bodies.insert(id, Arc::clone(&body));
        Some(body)
    }

    fn resource_body(&mut self, id: SymbolId, resource: &ResourceSymbol) -> ObjectType {
        let mut body = match self.catalog.lookup(&resource.type_reference) {
            Some(body) => ObjectType::clone(&body),
            None => {
                self.report_unknown_type(id, resource);
                generic_resource_body(&resource.type_reference)
            }
        };
        if !resource.is_existing {
            return body;
        }

        // A body without `name` has no identity to constrain.
        let readable = self.identity_is_constant(id);
        if let Some(name) = body.property_mut(RESOURCE_NAME_PROPERTY) {
            name.flags
                .set(PropertyFlags::READABLE_AT_DEPLOY_TIME, readable);
        }
        debug!(?id, type_reference = %resource.type_reference, readable, "derived existing resource body");
        body
    }

    fn report_unknown_type(&mut self, id: SymbolId, resource: &ResourceSymbol) {
        let Some(symbol) = self.bound.symbols.get(id) else {
            return;
        };
        let span = match self.tree.arena.data(symbol.declaration) {
            Some(NodeData::ResourceDeclaration { name, .. }) => name.span,
            Some(NodeData::ModuleDeclaration { outputs, .. }) => outputs
                .iter()
                .find(|output| output.name.name == symbol.name)
                .map_or_else(|| self.tree.arena.span(symbol.declaration), |o| o.name.span),
            _ => self.tree.arena.span(symbol.declaration),
        };
        let type_reference = resource.type_reference.to_string();
        self.diagnostics.push(Diagnostic::warning(
            self.tree.file_name.as_str(),
            span,
            format_message(
                diagnostic_messages::RESOURCE_TYPE_HAS_NO_TYPES,
                &[type_reference.as_str()],
            ),
            diagnostic_codes::RESOURCE_TYPE_HAS_NO_TYPES,
        ));
    }

    /// Whether the name, scope and parent of a resource are all known
    /// before deployment.
    fn identity_is_constant(&mut self, id: SymbolId) -> bool {
        if let Some(&known) = self.identities.get(&id) {
            return known;
        }
        if !self.identities_in_progress.insert(id) {
            trace!(?id, "identity cycle");
            return false;
        }
        let result = self.compute_identity(id);
        self.identities_in_progress.remove(&id);
        self.identities.insert(id, result);
        result
    }

    fn compute_identity(&mut self, id: SymbolId) -> bool {
        let Some(symbol) = self.bound.symbols.get(id) else {
            return false;
        };
        let Some(resource) = symbol.as_resource() else {
            return false;
        };
        // Module outputs are only known once the module has deployed.
        if resource.module.is_some() {
            return false;
        }
        let nesting_parent = resource.parent;
        let Some(NodeData::ResourceDeclaration { body, .. }) =
            self.tree.arena.data(symbol.declaration)
        else {
            return false;
        };
        let Some(properties) = self.body_properties(*body) else {
            return false;
        };

        let Some(name) = find_property(properties, RESOURCE_NAME_PROPERTY) else {
            return false;
        };
        if !self.is_constant(name) {
            return false;
        }
        if let Some(scope) = find_property(properties, SCOPE_PROPERTY) {
            if !self.is_constant(scope) {
                return false;
            }
        }

        let explicit_parent = find_property(properties, PARENT_PROPERTY)
            .and_then(|value| resolve_declared_target(&self.tree.arena, self.bound, value));
        match explicit_parent.or(nesting_parent) {
            Some(parent) => self.parent_name_readable(parent),
            None => true,
        }
    }

    fn parent_name_readable(&mut self, parent: SymbolId) -> bool {
        self.body_type(parent)
            .and_then(|body| {
                body.property(RESOURCE_NAME_PROPERTY)
                    .map(|p| p.flags.is_readable_at_deploy_time())
            })
            .unwrap_or(false)
    }

    /// Properties of a declaration body, looking through `for` and `if`.
    fn body_properties(&self, body: NodeIndex) -> Option<&'a [ObjectProperty]> {
        let arena = &self.tree.arena;
        let mut current = body;
        loop {
            match arena.data(current)? {
                NodeData::Object { properties } => return Some(properties),
                NodeData::For { body, .. } | NodeData::IfCondition { body, .. } => current = *body,
                _ => return None,
            }
        }
    }

    // =========================================================================
    // Constant expressions
    // =========================================================================

    /// Whether `expr` can be evaluated before any resource is deployed.
    pub(crate) fn is_constant(&mut self, expr: NodeIndex) -> bool {
        if let Some(&known) = self.constants.get(&expr) {
            return known;
        }
        if self.depth >= MAX_CONSTANT_ANALYSIS_DEPTH {
            trace!(?expr, "constant analysis depth exceeded");
            return false;
        }
        if !self.constants_in_progress.insert(expr) {
            return false;
        }
        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            self.compute_constant(expr)
        });
        self.depth -= 1;
        self.constants_in_progress.remove(&expr);
        self.constants.insert(expr, result);
        result
    }

    fn all_constant(&mut self, exprs: &[NodeIndex]) -> bool {
        exprs.iter().all(|&expr| self.is_constant(expr))
    }

    fn compute_constant(&mut self, expr: NodeIndex) -> bool {
        let Some(data) = self.tree.arena.data(expr) else {
            return false;
        };
        match data {
            NodeData::Integer(_) | NodeData::Boolean(_) | NodeData::Null => true,
            NodeData::String { expressions, .. } => self.all_constant(expressions),
            NodeData::Array { items } => self.all_constant(items),
            NodeData::Object { properties } => properties
                .iter()
                .all(|property| self.is_constant(property.value)),
            NodeData::VariableAccess { .. } => self.reference_is_constant(expr),
            NodeData::PropertyAccess { base, property } => {
                self.member_is_constant(*base, Some(property.name.as_str()))
            }
            NodeData::ArrayAccess { base, index } => {
                match resolve_declared_target(&self.tree.arena, self.bound, *base) {
                    Some(target) => {
                        let property = self
                            .tree
                            .arena
                            .data(*index)
                            .and_then(NodeData::string_literal_value);
                        self.readable_on(target, property)
                    }
                    None => self.is_constant(*base) && self.is_constant(*index),
                }
            }
            NodeData::FunctionCall { name, arguments } => {
                let callable = self
                    .builtins
                    .lookup(&name.name)
                    .is_some_and(|overload| !overload.flags.requires_inlining());
                callable && self.all_constant(arguments)
            }
            NodeData::Parenthesized { expression } => self.is_constant(*expression),
            NodeData::Unary { expression, .. } => self.is_constant(*expression),
            NodeData::Binary { left, right, .. } => {
                self.is_constant(*left) && self.is_constant(*right)
            }
            NodeData::Ternary {
                condition,
                true_expression,
                false_expression,
            } => {
                self.is_constant(*condition)
                    && self.is_constant(*true_expression)
                    && self.is_constant(*false_expression)
            }
            // Bare resource references, instance calls, loops, conditions
            // and declarations.
            _ => false,
        }
    }

    fn reference_is_constant(&mut self, expr: NodeIndex) -> bool {
        let Some(symbol) = self
            .bound
            .node_symbol(expr)
            .and_then(|id| self.bound.symbols.get(id))
        else {
            return false;
        };
        match &symbol.kind {
            SymbolKind::Parameter => true,
            SymbolKind::Variable => match self.tree.arena.data(symbol.declaration) {
                Some(NodeData::VariableDeclaration { value, .. }) => self.is_constant(*value),
                _ => false,
            },
            // The index is always known; the item is known when the
            // iterated collection is.
            SymbolKind::LocalVariable { is_index: true, .. } => true,
            SymbolKind::LocalVariable { source, .. } => match self.tree.arena.data(*source) {
                Some(NodeData::For { expression, .. }) => self.is_constant(*expression),
                _ => false,
            },
            _ => false,
        }
    }

    fn member_is_constant(&mut self, base: NodeIndex, property: Option<&str>) -> bool {
        match resolve_declared_target(&self.tree.arena, self.bound, base) {
            Some(target) => self.readable_on(target, property),
            None => self.is_constant(base),
        }
    }

    fn readable_on(&mut self, target: SymbolId, property: Option<&str>) -> bool {
        let Some(property) = property else {
            return false;
        };
        self.body_type(target)
            .and_then(|body| {
                body.property(property)
                    .map(|p| p.flags.is_readable_at_deploy_time())
            })
            .unwrap_or(false)
    }
}

fn find_property(properties: &[ObjectProperty], name: &str) -> Option<NodeIndex> {
    properties
        .iter()
        .find(|property| identifier_eq(&property.key.name, name))
        .map(|property| property.value)
}

/// Body of a module declaration. The `outputs` object is only known after
/// deployment; resource-typed outputs are resolved as their own symbols.
fn module_body(path: &str) -> ObjectType {
    ObjectType::new(path)
        .with_property(
            RESOURCE_NAME_PROPERTY,
            TypeKind::String,
            PropertyFlags::REQUIRED
                | PropertyFlags::DEPLOY_TIME_CONSTANT
                | PropertyFlags::READABLE_AT_DEPLOY_TIME,
        )
        .with_property(
            MODULE_OUTPUTS_PROPERTY,
            TypeKind::Object,
            PropertyFlags::READ_ONLY,
        )
}
