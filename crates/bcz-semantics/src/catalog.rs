//! Resource type catalog.
//!
//! Maps fully qualified resource type references
//! (`Microsoft.Storage/storageAccounts@2021-04-01`) to their body types.
//! Lookups compare references case-insensitively.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::flags::{FunctionFlags, PropertyFlags};
use crate::types::{ObjectType, RESOURCE_NAME_PROPERTY, TypeKind};

/// Parsed `<namespace>/<type>[/<child>...]@<apiVersion>` reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceTypeReference {
    pub type_segments: Vec<String>,
    pub api_version: Option<String>,
}

impl ResourceTypeReference {
    /// Parse a type reference. Returns `None` for empty segments.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let (types, api_version) = match text.split_once('@') {
            Some((types, version)) if !version.is_empty() => (types, Some(version.to_string())),
            Some(_) => return None,
            None => (text, None),
        };
        let type_segments: Vec<String> = types.split('/').map(str::to_string).collect();
        if type_segments.iter().any(String::is_empty) {
            return None;
        }
        Some(Self {
            type_segments,
            api_version,
        })
    }

    /// Whether the reference names only a child type segment (`blobServices`)
    /// and must be completed from the enclosing resource.
    #[must_use]
    pub fn is_relative(&self) -> bool {
        self.type_segments.len() == 1
    }

    /// Complete a relative child reference from its parent's reference.
    #[must_use]
    pub fn qualify_child(&self, parent: &ResourceTypeReference) -> Self {
        let mut type_segments = parent.type_segments.clone();
        type_segments.extend(self.type_segments.iter().cloned());
        Self {
            type_segments,
            api_version: self
                .api_version
                .clone()
                .or_else(|| parent.api_version.clone()),
        }
    }

    /// Normalized catalog key.
    #[must_use]
    pub fn key(&self) -> String {
        self.to_string().to_ascii_lowercase()
    }
}

impl fmt::Display for ResourceTypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_segments.join("/"))?;
        if let Some(version) = &self.api_version {
            write!(f, "@{version}")?;
        }
        Ok(())
    }
}

/// One catalog entry as it appears in a catalog document.
#[derive(Clone, Debug, Deserialize)]
pub struct ResourceTypeDefinition {
    #[serde(rename = "type")]
    pub type_reference: String,
    pub body: ObjectType,
}

#[derive(Clone, Debug, Default)]
pub struct ResourceTypeCatalog {
    types: FxHashMap<String, Arc<ObjectType>>,
}

impl ResourceTypeCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A small catalog of well-known types.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.insert(
            "Microsoft.Storage/storageAccounts@2021-04-01",
            standard_resource_body("Microsoft.Storage/storageAccounts@2021-04-01")
                .with_property("kind", TypeKind::String, PropertyFlags::REQUIRED)
                .with_property("sku", TypeKind::Object, PropertyFlags::REQUIRED)
                .with_property("properties", TypeKind::Object, PropertyFlags::empty())
                .with_function("listKeys", FunctionFlags::REQUIRES_INLINING)
                .with_function("listAccountSas", FunctionFlags::REQUIRES_INLINING)
                .with_function("listServiceSas", FunctionFlags::REQUIRES_INLINING),
        );
        catalog.insert(
            "Microsoft.Storage/storageAccounts/blobServices@2021-04-01",
            standard_resource_body("Microsoft.Storage/storageAccounts/blobServices@2021-04-01")
                .with_property("properties", TypeKind::Object, PropertyFlags::empty()),
        );
        catalog.insert(
            "Microsoft.KeyVault/vaults@2019-09-01",
            standard_resource_body("Microsoft.KeyVault/vaults@2019-09-01")
                .with_property("properties", TypeKind::Object, PropertyFlags::REQUIRED)
                .with_function("getSecret", FunctionFlags::MODULE_SECURE_PARAMETER_ONLY),
        );
        catalog.insert(
            "Microsoft.Web/sites@2021-02-01",
            standard_resource_body("Microsoft.Web/sites@2021-02-01")
                .with_property("kind", TypeKind::String, PropertyFlags::empty())
                .with_property("properties", TypeKind::Object, PropertyFlags::empty())
                .with_function("listPublishingCredentials", FunctionFlags::REQUIRES_INLINING),
        );
        catalog
    }

    pub fn insert(&mut self, type_reference: &str, body: ObjectType) {
        let key = ResourceTypeReference::parse(type_reference)
            .map_or_else(|| type_reference.to_ascii_lowercase(), |r| r.key());
        self.types.insert(key, Arc::new(body));
    }

    /// Merge `other` into `self`; entries of `other` win.
    pub fn extend(&mut self, other: ResourceTypeCatalog) {
        self.types.extend(other.types);
    }

    pub fn extend_definitions(&mut self, definitions: Vec<ResourceTypeDefinition>) {
        for definition in definitions {
            self.insert(&definition.type_reference, definition.body);
        }
    }

    #[must_use]
    pub fn lookup(&self, reference: &ResourceTypeReference) -> Option<Arc<ObjectType>> {
        self.types.get(&reference.key()).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Properties every resource body carries.
#[must_use]
pub fn standard_resource_body(name: &str) -> ObjectType {
    let identity = PropertyFlags::READ_ONLY
        | PropertyFlags::DEPLOY_TIME_CONSTANT
        | PropertyFlags::READABLE_AT_DEPLOY_TIME;
    ObjectType::new(name)
        .with_property("id", TypeKind::String, identity)
        .with_property(
            RESOURCE_NAME_PROPERTY,
            TypeKind::String,
            PropertyFlags::REQUIRED
                | PropertyFlags::DEPLOY_TIME_CONSTANT
                | PropertyFlags::READABLE_AT_DEPLOY_TIME,
        )
        .with_property("type", TypeKind::String, identity)
        .with_property("apiVersion", TypeKind::String, identity)
        .with_property(
            "location",
            TypeKind::String,
            PropertyFlags::READABLE_AT_DEPLOY_TIME,
        )
        .with_property("tags", TypeKind::Object, PropertyFlags::empty())
}

/// Body used for types missing from the catalog.
#[must_use]
pub fn generic_resource_body(reference: &ResourceTypeReference) -> ObjectType {
    standard_resource_body(&reference.to_string()).with_property(
        "properties",
        TypeKind::Object,
        PropertyFlags::empty(),
    )
}
