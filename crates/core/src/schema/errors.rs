//! Error types for schema definition, field validation and computed fields.

use thiserror::Error;

/// A schema that is internally inconsistent. Raised before any prompting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    #[error("field name must not be empty")]
    EmptyFieldName,

    #[error("group '{group}' declares '{field}' more than once")]
    DuplicateField { group: String, field: String },

    #[error("field '{field}': invalid pattern '{pattern}': {message}")]
    InvalidPattern { field: String, pattern: String, message: String },

    #[error("field '{field}': default '{default}' is invalid: {source}")]
    InvalidDefault {
        field: String,
        default: String,
        #[source]
        source: ValidationError,
    },

    #[error("field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("group '{group}': computed field '{field}' references unknown field '{reference}'")]
    UnknownReference { group: String, field: String, reference: String },

    #[error("group '{group}': computed field '{field}' does not map {}", .missing.join(", "))]
    UnmappedEnumValues { group: String, field: String, missing: Vec<String> },

    #[error("group '{group}': computed field '{field}' {message}")]
    InvalidComputed { group: String, field: String, message: String },

    #[error("unknown group '{0}'")]
    UnknownGroup(String),

    #[error("group '{0}' extends itself")]
    InheritanceCycle(String),

    #[error("repeatable '{result}': {message}")]
    InvalidRepeatable { result: String, message: String },

    #[error("words marker on group '{group}': cannot spell out {}", .fields.join(", "))]
    InvalidDerivable { group: String, fields: Vec<String> },

    #[error("unit #{index}: {message}")]
    InvalidUnit { index: usize, message: String },

    #[error("schema declares no units")]
    NoUnits,
}

/// A single raw value rejected by its field. Recovered by asking again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("a value is required")]
    Required,

    #[error("'{value}' does not match the pattern {pattern}")]
    PatternMismatch { value: String, pattern: String },

    #[error("'{value}' is not a valid {expected}")]
    TypeMismatch { value: String, expected: &'static str },

    #[error("'{value}' is not one of: {}", .allowed.join(", "))]
    NotInEnum { value: String, allowed: Vec<String> },

    #[error("{value} is out of range: {reason}")]
    OutOfRange { value: String, reason: String },
}

/// A computed field could not be evaluated from the collected snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputationError {
    #[error("computed field '{field}' needs '{missing}', which was not collected")]
    MissingDependency { field: String, missing: String },

    #[error("computed field '{field}' has no mapping for '{value}'")]
    Unmapped { field: String, value: String },

    #[error("computed field '{field}' cannot add non-numeric '{operand}'")]
    NotNumeric { field: String, operand: String },
}
