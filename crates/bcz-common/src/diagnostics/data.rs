//! Diagnostic message table.

use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const IDENTIFIER_DECLARED_MULTIPLE_TIMES: u32 = 28;
    pub const THE_NAME_DOES_NOT_EXIST: u32 = 57;
    pub const RESOURCE_TYPE_HAS_NO_TYPES: u32 = 81;
    pub const NESTED_RUNTIME_PROPERTY_ACCESS_NOT_SUPPORTED: u32 = 307;
}

pub mod diagnostic_messages {
    pub const IDENTIFIER_DECLARED_MULTIPLE_TIMES: &str =
        "Identifier \"{0}\" is declared multiple times. Remove or rename the duplicates.";
    pub const THE_NAME_DOES_NOT_EXIST: &str =
        "The name \"{0}\" does not exist in the current context.";
    pub const RESOURCE_TYPE_HAS_NO_TYPES: &str =
        "Resource type \"{0}\" does not have types available.";
    pub const NESTED_RUNTIME_PROPERTY_ACCESS_NOT_SUPPORTED: &str = "The expression cannot be evaluated, because the identifier properties of the referenced existing resource cannot be calculated at the start of the deployment. In this situation,{0}{1}";
    pub const ACCESSIBLE_PROPERTIES_CLAUSE: &str =
        " the accessible properties of \"{0}\" include {1}.";
    pub const ACCESSIBLE_FUNCTIONS_CLAUSE: &str =
        " The accessible functions of \"{0}\" include {1}.";
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::IDENTIFIER_DECLARED_MULTIPLE_TIMES,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::IDENTIFIER_DECLARED_MULTIPLE_TIMES,
    },
    DiagnosticMessage {
        code: diagnostic_codes::THE_NAME_DOES_NOT_EXIST,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::THE_NAME_DOES_NOT_EXIST,
    },
    DiagnosticMessage {
        code: diagnostic_codes::RESOURCE_TYPE_HAS_NO_TYPES,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::RESOURCE_TYPE_HAS_NO_TYPES,
    },
    DiagnosticMessage {
        code: diagnostic_codes::NESTED_RUNTIME_PROPERTY_ACCESS_NOT_SUPPORTED,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::NESTED_RUNTIME_PROPERTY_ACCESS_NOT_SUPPORTED,
    },
];
