//! Diagnostic types and message lookup shared by the binder and checkers.
//!
//! Message templates live in `data.rs` and use `{0}`, `{1}`, ... placeholders
//! filled in by `format_message()`.

use serde::Serialize;

use crate::span::Span;

mod data;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes, diagnostic_messages};

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
}

/// Structured payload attached to diagnostics that carry more than text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DiagnosticData {
    /// A member of a runtime-named existing resource was accessed in a
    /// position that needs its value at the start of the deployment.
    #[serde(rename_all = "camelCase")]
    NestedRuntimeMemberAccess {
        resource_name: String,
        accessible_properties: Vec<String>,
        accessible_functions: Vec<String>,
    },
}

/// A compile diagnostic anchored to a source span.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<DiagnosticData>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub fn error(file: impl Into<String>, span: Span, message: impl Into<String>, code: u32) -> Self {
        Self::new(DiagnosticCategory::Error, file, span, message, code)
    }

    /// Create a new warning diagnostic.
    #[must_use]
    pub fn warning(
        file: impl Into<String>,
        span: Span,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self::new(DiagnosticCategory::Warning, file, span, message, code)
    }

    fn new(
        category: DiagnosticCategory,
        file: impl Into<String>,
        span: Span,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            file: file.into(),
            start: span.start,
            length: span.len(),
            message_text: message.into(),
            category,
            code,
            data: None,
        }
    }

    /// Attach a structured payload.
    #[must_use]
    pub fn with_data(mut self, data: DiagnosticData) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub const fn span(&self) -> Span {
        Span::new(self.start, self.start + self.length)
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.category, DiagnosticCategory::Error)
    }

    /// Display form of the code, e.g. `BCP307`.
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("BCP{:03}", self.code)
    }
}

/// Sink the passes write diagnostics into.
///
/// Each pass invocation gets its own writer; nothing here is shared between
/// compilations.
pub trait DiagnosticWriter {
    fn write(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticWriter for Vec<Diagnostic> {
    fn write(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<W: DiagnosticWriter + ?Sized> DiagnosticWriter for &mut W {
    fn write(&mut self, diagnostic: Diagnostic) {
        (**self).write(diagnostic);
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Render names as a comma separated list of quoted strings: `"a", "b"`.
#[must_use]
pub fn to_quoted_list<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|name| format!("\"{}\"", name.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_message_fills_positional_arguments() {
        let text = format_message(diagnostic_messages::THE_NAME_DOES_NOT_EXIST, &["acct"]);
        assert_eq!(text, "The name \"acct\" does not exist in the current context.");
    }

    #[test]
    fn every_code_has_a_template() {
        for code in [
            diagnostic_codes::IDENTIFIER_DECLARED_MULTIPLE_TIMES,
            diagnostic_codes::THE_NAME_DOES_NOT_EXIST,
            diagnostic_codes::RESOURCE_TYPE_HAS_NO_TYPES,
            diagnostic_codes::NESTED_RUNTIME_PROPERTY_ACCESS_NOT_SUPPORTED,
        ] {
            assert!(get_message_template(code).is_some(), "missing template for {code}");
        }
    }

    #[test]
    fn code_string_is_zero_padded() {
        let diag = Diagnostic::error("main.bcz", Span::new(0, 4), "x", 57);
        assert_eq!(diag.code_string(), "BCP057");
        assert_eq!(diag.span(), Span::new(0, 4));
    }

    #[test]
    fn vec_writer_collects() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        {
            let mut writer = &mut sink;
            writer.write(Diagnostic::warning("a", Span::at(1), "w", 81));
        }
        assert_eq!(sink.len(), 1);
        assert!(!sink[0].is_error());
    }

    #[test]
    fn quoted_list_joins_names() {
        assert_eq!(to_quoted_list(&["location", "name"]), "\"location\", \"name\"");
        assert_eq!(to_quoted_list::<&str>(&[]), "");
    }
}
