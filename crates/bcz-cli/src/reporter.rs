use colored::Colorize;
use serde::Serialize;

use bcz::CompileOutput;
use bcz::common::{Diagnostic, DiagnosticCategory, LineMap, Position};

use crate::driver::RunSummary;

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// Human readable report: one line per diagnostic plus failures.
    pub fn render_text(&self, summary: &RunSummary) -> String {
        let mut lines = Vec::new();
        for output in &summary.outputs {
            let line_map = output.source.as_deref().map(LineMap::build);
            for diagnostic in &output.diagnostics {
                lines.push(self.format_diagnostic(diagnostic, line_map.as_ref()));
            }
        }
        for failure in &summary.failures {
            let label = self.paint_category(DiagnosticCategory::Error);
            lines.push(format!("{}: {label}: {:#}", failure.path.display(), failure.error));
        }
        lines.join("\n")
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic, line_map: Option<&LineMap>) -> String {
        let location = match line_map {
            Some(map) => {
                let position = map.offset_to_position(diagnostic.start);
                format!(
                    "{}:{}:{}",
                    diagnostic.file,
                    position.line + 1,
                    position.character + 1
                )
            }
            None => format!("{}@{}", diagnostic.file, diagnostic.start),
        };
        let code = if self.color {
            diagnostic.code_string().bright_blue().to_string()
        } else {
            diagnostic.code_string()
        };
        format!(
            "{location} - {} {code}: {}",
            self.paint_category(diagnostic.category),
            diagnostic.message_text
        )
    }

    fn paint_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
        };
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDiagnostic<'a> {
    #[serde(flatten)]
    diagnostic: &'a Diagnostic,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonFailure {
    file: String,
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    diagnostics: Vec<JsonDiagnostic<'a>>,
    failures: Vec<JsonFailure>,
}

/// Machine readable report. Positions are zero-based and present only
/// for units that carry source text.
pub fn render_json(summary: &RunSummary) -> serde_json::Result<String> {
    let diagnostics = summary
        .outputs
        .iter()
        .flat_map(|output: &CompileOutput| {
            let line_map = output.source.as_deref().map(LineMap::build);
            output.diagnostics.iter().map(move |diagnostic| JsonDiagnostic {
                diagnostic,
                position: line_map
                    .as_ref()
                    .map(|map| map.offset_to_position(diagnostic.start)),
            })
        })
        .collect();
    let failures = summary
        .failures
        .iter()
        .map(|failure| JsonFailure {
            file: failure.path.display().to_string(),
            message: format!("{:#}", failure.error),
        })
        .collect();
    serde_json::to_string_pretty(&JsonReport {
        diagnostics,
        failures,
    })
}
