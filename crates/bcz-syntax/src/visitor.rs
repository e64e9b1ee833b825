//! Depth-first syntax tree traversal.
//!
//! [`SyntaxVisitor`] dispatches the member-access shapes to dedicated hooks
//! and walks every other node kind through [`walk_children`]. Hooks that are
//! overridden must call [`walk_children`] themselves to keep descending.

use bcz_common::limits::{STACK_GROWTH_SIZE, STACK_RED_ZONE};

use crate::arena::NodeArena;
use crate::node::{Identifier, NodeData, NodeIndex};

pub trait SyntaxVisitor {
    fn visit_node(&mut self, arena: &NodeArena, idx: NodeIndex) {
        walk_node(self, arena, idx);
    }

    /// `base[index]`
    fn visit_array_access(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        _base: NodeIndex,
        _index: NodeIndex,
    ) {
        walk_children(self, arena, idx);
    }

    /// `base.property`
    fn visit_property_access(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        _base: NodeIndex,
        _property: &Identifier,
    ) {
        walk_children(self, arena, idx);
    }

    /// `base.name(arguments)`
    fn visit_instance_function_call(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        _base: NodeIndex,
        _name: &Identifier,
        _arguments: &[NodeIndex],
    ) {
        walk_children(self, arena, idx);
    }
}

/// Dispatch `idx` to the matching hook of `visitor`.
pub fn walk_node<V: SyntaxVisitor + ?Sized>(visitor: &mut V, arena: &NodeArena, idx: NodeIndex) {
    let Some(data) = arena.data(idx) else {
        return;
    };
    match data {
        NodeData::ArrayAccess { base, index } => {
            visitor.visit_array_access(arena, idx, *base, *index);
        }
        NodeData::PropertyAccess { base, property } => {
            visitor.visit_property_access(arena, idx, *base, property);
        }
        NodeData::InstanceFunctionCall {
            base,
            name,
            arguments,
        } => {
            visitor.visit_instance_function_call(arena, idx, *base, name, arguments);
        }
        _ => walk_children(visitor, arena, idx),
    }
}

/// Visit every direct child of `idx` in source order.
pub fn walk_children<V: SyntaxVisitor + ?Sized>(
    visitor: &mut V,
    arena: &NodeArena,
    idx: NodeIndex,
) {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
        for child in arena.children(idx) {
            visitor.visit_node(arena, child);
        }
    });
}
