//! Template engine error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Template '{0}' already registered")]
    Duplicate(String),

    #[error("Template document has no Name field")]
    Unnamed,

    #[error("Missing template parameter: {0}")]
    MissingParameter(String),

    #[error("Malformed parameter '{0}', expected key=value")]
    MalformedParameter(String),

    #[error("Unclosed placeholder in '{0}'")]
    UnclosedPlaceholder(String),

    #[error("Unsupported format spec '{spec}' for parameter '{name}'")]
    BadFormatSpec { name: String, spec: String },

    #[error("Generator failed: {0}")]
    Generator(String),

    #[error("Document still contains a generator node")]
    UnresolvedGenerator,
}

pub type Result<T> = std::result::Result<T, TemplateError>;
