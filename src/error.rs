//! @acp:module "Errors"
//! @acp:summary "Error taxonomy shared by loaders, renderer, writer and publisher"
//! @acp:domain cli
//! @acp:layer model
//!
//! QA findings are not errors: checks return violation lists so every problem
//! is reported at once. This enum covers the failures that stop an operation.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, PraepError>;

/// @acp:summary "Errors raised by library operations"
#[derive(Debug, Error)]
pub enum PraepError {
    /// Malformed YAML or JSON input
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Source pack lacking mandatory keys
    #[error("{} is missing mandatory keys: {}", path.display(), keys.join(", "))]
    MissingKeys { path: PathBuf, keys: Vec<String> },

    /// LLM provider or publishing endpoint failure
    #[error("{service} call failed: {message}")]
    ExternalService { service: String, message: String },

    /// Model output below the minimum length
    #[error("model returned {chars} characters, expected at least {min}")]
    ContentTooShort { chars: usize, min: usize },

    /// Template registration or rendering failure
    #[error("template error: {0}")]
    Template(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(String),
}

impl PraepError {
    /// Build a parse error for a file
    pub fn parse(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        PraepError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Build an external service error
    pub fn external(service: impl Into<String>, message: impl std::fmt::Display) -> Self {
        PraepError::ExternalService {
            service: service.into(),
            message: message.to_string(),
        }
    }
}

impl From<handlebars::RenderError> for PraepError {
    fn from(err: handlebars::RenderError) -> Self {
        PraepError::Template(err.to_string())
    }
}

impl From<handlebars::TemplateError> for PraepError {
    fn from(err: handlebars::TemplateError) -> Self {
        PraepError::Template(err.to_string())
    }
}
