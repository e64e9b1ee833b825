//! Compilation units: the JSON input format and the per-unit pipeline.
//!
//! A unit carries a file name, optional source text (used only to render
//! line/column locations), inline resource type definitions and the program
//! as declaration documents. Compiling a unit binds it, derives body types
//! and runs every checker pass.

use std::path::{Path, PathBuf};

use bcz_checker::check_program;
use bcz_common::Diagnostic;
use bcz_semantics::{ModelError, ResourceTypeCatalog, ResourceTypeDefinition, SemanticModel};
use bcz_syntax::{DeclarationDocument, DocumentError, lower_program};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid compilation unit JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid program document: {0}")]
    Document(#[from] DocumentError),
    #[error("malformed syntax tree: {0}")]
    Model(#[from] ModelError),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompilationUnit {
    pub file: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub types: Vec<ResourceTypeDefinition>,
    pub program: Vec<DeclarationDocument>,
}

impl CompilationUnit {
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let text = read(path)?;
        Self::from_json(&text)
    }

    /// Builtin types, then this unit's inline types, then `overrides`.
    #[must_use]
    pub fn catalog(&self, overrides: Option<&ResourceTypeCatalog>) -> ResourceTypeCatalog {
        let mut catalog = ResourceTypeCatalog::builtin();
        catalog.extend_definitions(self.types.clone());
        if let Some(overrides) = overrides {
            catalog.extend(overrides.clone());
        }
        catalog
    }
}

/// Result of compiling one unit.
#[derive(Clone, Debug)]
pub struct CompileOutput {
    pub file: String,
    pub source: Option<String>,
    /// Binder, type and checker diagnostics ordered by position.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutput {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Parse a resource type catalog document: a JSON array of
/// `{ "type": "...", "body": { ... } }` entries.
pub fn catalog_from_json(text: &str) -> Result<ResourceTypeCatalog, LoadError> {
    let definitions: Vec<ResourceTypeDefinition> = serde_json::from_str(text)?;
    let mut catalog = ResourceTypeCatalog::new();
    catalog.extend_definitions(definitions);
    Ok(catalog)
}

pub fn catalog_from_path(path: &Path) -> Result<ResourceTypeCatalog, LoadError> {
    catalog_from_json(&read(path)?)
}

/// Lower, bind and check one unit.
#[tracing::instrument(level = "debug", skip_all, fields(file = %unit.file))]
pub fn compile_unit(
    unit: &CompilationUnit,
    overrides: Option<&ResourceTypeCatalog>,
) -> Result<CompileOutput, LoadError> {
    let tree = lower_program(&unit.file, &unit.program)?;
    let catalog = unit.catalog(overrides);
    let model = SemanticModel::build(&tree, &catalog)?;

    let mut diagnostics = model.diagnostics().to_vec();
    diagnostics.extend(check_program(&model));
    diagnostics.sort_by_key(|d| d.start);
    debug!(nodes = tree.arena.len(), diagnostics = diagnostics.len(), "compiled unit");

    Ok(CompileOutput {
        file: unit.file.clone(),
        source: unit.source.clone(),
        diagnostics,
    })
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
