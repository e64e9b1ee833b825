//! Member access on existing resources with runtime identity.
//!
//! When the `name` of an existing resource depends on values produced during
//! deployment, the compiler cannot emit a static reference to it. Only the
//! properties readable at deployment start (and `name` itself) may be read,
//! and instance functions requiring inlining may not be called. Indexing
//! with an interpolated string is always rejected because the property it
//! selects is unknown.

use bcz_common::diagnostics::to_quoted_list;
use bcz_common::{
    Diagnostic, DiagnosticData, DiagnosticWriter, Span, diagnostic_codes, diagnostic_messages,
    format_message, identifier_eq,
};
use bcz_semantics::{RESOURCE_NAME_PROPERTY, ResolvedAccess, ResourceTypeResolver, SemanticModel};
use bcz_syntax::{Identifier, NodeArena, NodeData, NodeIndex, SyntaxVisitor, walk_children};
use tracing::trace;

pub struct NestedRuntimeMemberAccessValidator<'m, W> {
    model: &'m SemanticModel<'m>,
    resolver: ResourceTypeResolver<'m>,
    writer: W,
}

impl<'m, W: DiagnosticWriter> NestedRuntimeMemberAccessValidator<'m, W> {
    /// Walk the whole program and write a diagnostic for every rejected
    /// member access.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %model.file_name()))]
    pub fn validate(model: &'m SemanticModel<'m>, writer: W) {
        let mut validator = Self {
            model,
            resolver: model.resource_type_resolver(),
            writer,
        };
        validator.visit_node(model.arena(), model.root());
    }

    fn file_name(&self) -> &'m str {
        self.model.file_name()
    }

    /// Property reads are allowed for `name` and for properties readable
    /// at deployment start. Properties missing from the body type are not.
    fn check_property(&mut self, resolved: &ResolvedAccess<'_>, property: &str, span: Span) {
        if identifier_eq(property, RESOURCE_NAME_PROPERTY) {
            return;
        }
        let readable = resolved
            .body
            .property(property)
            .is_some_and(|p| p.flags.is_readable_at_deploy_time());
        trace!(property, readable, "checked runtime resource property");
        if !readable {
            self.report(resolved, span);
        }
    }

    fn report(&mut self, resolved: &ResolvedAccess<'_>, span: Span) {
        let diagnostic = runtime_member_access_diagnostic(self.file_name(), span, resolved);
        self.writer.write(diagnostic);
    }
}

impl<W: DiagnosticWriter> SyntaxVisitor for NestedRuntimeMemberAccessValidator<'_, W> {
    fn visit_array_access(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        base: NodeIndex,
        index: NodeIndex,
    ) {
        if let Some(resolved) = self.resolver.resolve_runtime_constrained(base) {
            match arena.data(index) {
                Some(NodeData::String {
                    segments,
                    expressions,
                }) if expressions.is_empty() => {
                    let property = segments.first().map_or("", String::as_str);
                    self.check_property(&resolved, property, arena.span(idx));
                }
                Some(NodeData::String { .. }) => self.report(&resolved, arena.span(idx)),
                _ => {}
            }
        }
        walk_children(self, arena, idx);
    }

    fn visit_property_access(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        base: NodeIndex,
        property: &Identifier,
    ) {
        if let Some(resolved) = self.resolver.resolve_runtime_constrained(base) {
            if resolved.symbol.is_existing_resource() {
                self.check_property(&resolved, &property.name, arena.span(idx));
            }
        }
        walk_children(self, arena, idx);
    }

    fn visit_instance_function_call(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        base: NodeIndex,
        name: &Identifier,
        _arguments: &[NodeIndex],
    ) {
        if let Some(resolved) = self.resolver.resolve_runtime_constrained(base) {
            if resolved.symbol.is_existing_resource() {
                let requires_inlining = self
                    .model
                    .get_symbol_info(idx)
                    .and_then(|info| info.as_function())
                    .map(|function| function.flags.requires_inlining());
                trace!(function = %name.name, ?requires_inlining, "checked runtime resource call");
                if requires_inlining == Some(true) {
                    self.report(&resolved, arena.span(idx));
                }
            }
        }
        walk_children(self, arena, idx);
    }
}

/// Build the diagnostic for a rejected access to `resolved` at `span`.
///
/// The payload lists what may still be used: readable properties in
/// declared order with `name` exactly once, then the instance functions
/// that do not require inlining.
#[must_use]
pub fn runtime_member_access_diagnostic(
    file: &str,
    span: Span,
    resolved: &ResolvedAccess<'_>,
) -> Diagnostic {
    let resource_name = resolved.symbol.name.clone();
    let accessible_properties = resolved.accessible_properties();
    let accessible_functions = resolved.accessible_functions();

    let properties_clause = if accessible_properties.is_empty() {
        String::new()
    } else {
        format_message(
            diagnostic_messages::ACCESSIBLE_PROPERTIES_CLAUSE,
            &[
                resource_name.as_str(),
                to_quoted_list(&accessible_properties).as_str(),
            ],
        )
    };
    let functions_clause = if accessible_functions.is_empty() {
        String::new()
    } else {
        format_message(
            diagnostic_messages::ACCESSIBLE_FUNCTIONS_CLAUSE,
            &[
                resource_name.as_str(),
                to_quoted_list(&accessible_functions).as_str(),
            ],
        )
    };
    let message = format_message(
        diagnostic_messages::NESTED_RUNTIME_PROPERTY_ACCESS_NOT_SUPPORTED,
        &[properties_clause.as_str(), functions_clause.as_str()],
    );

    Diagnostic::error(
        file,
        span,
        message,
        diagnostic_codes::NESTED_RUNTIME_PROPERTY_ACCESS_NOT_SUPPORTED,
    )
    .with_data(DiagnosticData::NestedRuntimeMemberAccess {
        resource_name,
        accessible_properties,
        accessible_functions,
    })
}
