//! Object and body types.
//!
//! A resource or module body type is an [`ObjectType`]: an insertion-ordered,
//! case-insensitive property map plus a [`MethodResolver`] for instance
//! functions. Declared order is preserved because diagnostics list the
//! accessible members in that order.

use bcz_common::{identifier_eq, identifier_key};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::flags::{FunctionFlags, PropertyFlags};

/// Name of the identity property every resource body carries.
pub const RESOURCE_NAME_PROPERTY: &str = "name";

/// Property of a module body holding the module's outputs.
pub const MODULE_OUTPUTS_PROPERTY: &str = "outputs";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    #[default]
    Any,
    String,
    Int,
    Bool,
    Null,
    Array,
    Object,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeProperty {
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_kind: TypeKind,
    #[serde(default)]
    pub flags: PropertyFlags,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionOverload {
    pub name: String,
    #[serde(default)]
    pub flags: FunctionFlags,
}

impl FunctionOverload {
    pub fn new(name: impl Into<String>, flags: FunctionFlags) -> Self {
        Self {
            name: name.into(),
            flags,
        }
    }
}

/// Instance functions available on a body type, in declared order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MethodResolver {
    function_overloads: Vec<FunctionOverload>,
}

impl MethodResolver {
    /// Case-insensitive lookup by function name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&FunctionOverload> {
        self.function_overloads
            .iter()
            .find(|overload| identifier_eq(&overload.name, name))
    }

    pub fn overloads(&self) -> impl Iterator<Item = &FunctionOverload> {
        self.function_overloads.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.function_overloads.is_empty()
    }

    fn push(&mut self, overload: FunctionOverload) {
        if let Some(existing) = self
            .function_overloads
            .iter_mut()
            .find(|o| identifier_eq(&o.name, &overload.name))
        {
            *existing = overload;
        } else {
            self.function_overloads.push(overload);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ObjectTypeDocument", into = "ObjectTypeDocument")]
pub struct ObjectType {
    name: String,
    /// Keyed by the normalized identifier; values keep the declared spelling.
    properties: IndexMap<String, TypeProperty>,
    methods: MethodResolver,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: IndexMap::new(),
            methods: MethodResolver::default(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, name: &str, type_kind: TypeKind, flags: PropertyFlags) -> Self {
        self.insert_property(TypeProperty {
            name: name.to_string(),
            type_kind,
            flags,
        });
        self
    }

    #[must_use]
    pub fn with_function(mut self, name: &str, flags: FunctionFlags) -> Self {
        self.methods.push(FunctionOverload::new(name, flags));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert or replace a property. Replacing keeps the original position.
    pub fn insert_property(&mut self, property: TypeProperty) {
        self.properties
            .insert(identifier_key(&property.name), property);
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&TypeProperty> {
        self.properties.get(&identifier_key(name))
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut TypeProperty> {
        self.properties.get_mut(&identifier_key(name))
    }

    /// Properties in declared order.
    pub fn properties(&self) -> impl Iterator<Item = &TypeProperty> {
        self.properties.values()
    }

    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub const fn method_resolver(&self) -> &MethodResolver {
        &self.methods
    }
}

/// Serialized shape of an object type.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct ObjectTypeDocument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    properties: Vec<TypeProperty>,
    #[serde(default)]
    functions: Vec<FunctionOverload>,
}

impl From<ObjectTypeDocument> for ObjectType {
    fn from(doc: ObjectTypeDocument) -> Self {
        let mut object = ObjectType::new(doc.name);
        for property in doc.properties {
            object.insert_property(property);
        }
        for function in doc.functions {
            object.methods.push(function);
        }
        object
    }
}

impl From<ObjectType> for ObjectTypeDocument {
    fn from(object: ObjectType) -> Self {
        Self {
            name: object.name,
            properties: object.properties.into_values().collect(),
            functions: object.methods.function_overloads,
        }
    }
}
