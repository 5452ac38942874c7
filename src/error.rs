//! Error types for the Render Server core.
//!
//! Absence is not an error here: lookups return `Ok(None)` when a template,
//! context or composite file does not exist. The enums below cover the cases
//! that must surface to the caller.

use crate::context::ContextKind;
use thiserror::Error;

/// Template Store errors
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Invalid template {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Invalid template pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Template I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the inventory registry client
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Registry request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Registry responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed registry document: {0}")]
    Decode(String),
}

/// Context resolution errors
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Operation '{operation}' is not implemented for {kind} contexts")]
    Unsupported {
        kind: ContextKind,
        operation: &'static str,
    },

    #[error(transparent)]
    Transport(#[from] RegistryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Static topology errors
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("Failed to read topology {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse topology: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Node '{node}' has a non-scalar value for param '{key}'")]
    InvalidParam { node: String, key: String },
}

/// Facade and CLI errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        ApiError::Context(ContextError::Transport(err))
    }
}
