//! Declared symbols.

use bcz_syntax::NodeIndex;

use crate::catalog::ResourceTypeReference;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// A `resource` declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceSymbol {
    pub type_reference: ResourceTypeReference,
    /// References infrastructure not created by this deployment.
    pub is_existing: bool,
    /// Declared with a `for` loop body.
    pub is_collection: bool,
    /// Enclosing resource for nested declarations.
    pub parent: Option<SymbolId>,
    /// Module whose resource-typed output returns this resource.
    pub module: Option<SymbolId>,
}

/// A `module` declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleSymbol {
    pub path: String,
    pub is_collection: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Parameter,
    Variable,
    Output,
    /// Loop item or index variable; `source` is the `for` node.
    LocalVariable { source: NodeIndex, is_index: bool },
    Resource(ResourceSymbol),
    Module(ModuleSymbol),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    /// Display identifier as declared.
    pub name: String,
    pub declaration: NodeIndex,
    pub kind: SymbolKind,
}

impl Symbol {
    #[must_use]
    pub const fn as_resource(&self) -> Option<&ResourceSymbol> {
        match &self.kind {
            SymbolKind::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_module(&self) -> Option<&ModuleSymbol> {
        match &self.kind {
            SymbolKind::Module(module) => Some(module),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_existing_resource(&self) -> bool {
        matches!(
            &self.kind,
            SymbolKind::Resource(ResourceSymbol {
                is_existing: true,
                ..
            })
        )
    }

    #[must_use]
    pub const fn is_resource_or_module(&self) -> bool {
        matches!(self.kind, SymbolKind::Resource(_) | SymbolKind::Module(_))
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        match &self.kind {
            SymbolKind::Resource(resource) => resource.is_collection,
            SymbolKind::Module(module) => module.is_collection,
            _ => false,
        }
    }

    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self.kind {
            SymbolKind::Parameter => "param",
            SymbolKind::Variable => "var",
            SymbolKind::Output => "output",
            SymbolKind::LocalVariable { .. } => "local",
            SymbolKind::Resource(_) => "resource",
            SymbolKind::Module(_) => "module",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(u32::try_from(self.symbols.len()).unwrap_or(u32::MAX));
        self.symbols.push(symbol);
        id
    }

    #[must_use]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.as_usize())
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| (SymbolId(i as u32), symbol))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
