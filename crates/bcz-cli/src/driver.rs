//! Parallel validation of compilation units.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use bcz::semantics::ResourceTypeCatalog;
use bcz::{CompilationUnit, CompileOutput, catalog_from_path, compile_unit};

use crate::args::CliArgs;

/// Process exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_DIAGNOSTICS: i32 = 1;
pub const EXIT_FAILURE: i32 = 2;

/// A unit that could not be compiled at all.
#[derive(Debug)]
pub struct UnitFailure {
    pub path: PathBuf,
    pub error: anyhow::Error,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    /// Compiled units in input order.
    pub outputs: Vec<CompileOutput>,
    pub failures: Vec<UnitFailure>,
}

impl RunSummary {
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.outputs
            .iter()
            .flat_map(|output| &output.diagnostics)
            .filter(|d| d.is_error())
            .count()
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if !self.failures.is_empty() {
            EXIT_FAILURE
        } else if self.error_count() > 0 {
            EXIT_DIAGNOSTICS
        } else {
            EXIT_SUCCESS
        }
    }
}

/// Compile every input file. Failures of individual units are collected,
/// not propagated; only setup errors (catalog, thread pool) return `Err`.
pub fn run(args: &CliArgs) -> Result<RunSummary> {
    let overrides = match &args.types {
        Some(path) => Some(
            catalog_from_path(path)
                .with_context(|| format!("failed to load type catalog {}", path.display()))?,
        ),
        None => None,
    };

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = args.jobs {
        pool = pool.num_threads(jobs);
    }
    let pool = pool.build().context("failed to build worker pool")?;

    info!(files = args.files.len(), threads = pool.current_num_threads(), "validating");
    let results: Vec<(PathBuf, Result<CompileOutput>)> = pool.install(|| {
        args.files
            .par_iter()
            .map(|path| (path.clone(), compile_file(path, overrides.as_ref())))
            .collect()
    });

    let mut summary = RunSummary::default();
    for (path, result) in results {
        match result {
            Ok(output) => summary.outputs.push(output),
            Err(error) => summary.failures.push(UnitFailure { path, error }),
        }
    }
    debug!(
        compiled = summary.outputs.len(),
        failed = summary.failures.len(),
        errors = summary.error_count(),
        "validation finished"
    );
    Ok(summary)
}

fn compile_file(path: &Path, overrides: Option<&ResourceTypeCatalog>) -> Result<CompileOutput> {
    let unit = CompilationUnit::from_path(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    compile_unit(&unit, overrides).with_context(|| format!("failed to compile {}", unit.file))
}
