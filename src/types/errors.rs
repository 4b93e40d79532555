//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. The first
//! four variants are raised before any external call is made; `Upstream` is
//! only ever produced by the dispatcher's call boundary and is flattened into
//! a uniform failure message there.

use crate::api::ApiError;
use crate::tools::{Operation, Resource};
use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the payment tools core.
#[derive(Error, Debug)]
pub enum Error {
    /// Method is not present in the tool registry.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Tool requires an action the permission configuration does not grant.
    #[error("permission denied: {method} requires {resource}.{operation}")]
    PermissionDenied {
        method: String,
        resource: Resource,
        operation: Operation,
    },

    /// Raw parameters failed the tool's parameter schema.
    #[error("validation error: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Context merge could not supply a field the operation needs.
    #[error("missing required field: {0}")]
    MissingRequiredField(String),

    /// External collaborator call failed. Display is the caller-facing message.
    #[error("Failed to {operation}")]
    Upstream {
        operation: &'static str,
        #[source]
        source: ApiError,
    },

    /// Invalid configuration (catalog construction, config files).
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failures raised before the external collaborator is reached.
    pub fn is_pre_dispatch(&self) -> bool {
        matches!(
            self,
            Error::UnknownMethod(_)
                | Error::PermissionDenied { .. }
                | Error::Validation { .. }
                | Error::MissingRequiredField(_)
        )
    }

    /// Stable machine-readable code, used as a tracing field.
    pub fn code(&self) -> &'static str {
        match self {
            Error::UnknownMethod(_) => "unknown_method",
            Error::PermissionDenied { .. } => "permission_denied",
            Error::Validation { .. } => "validation_error",
            Error::MissingRequiredField(_) => "missing_required_field",
            Error::Upstream { .. } => "upstream_failure",
            Error::Config(_) => "config_error",
            Error::Serialization(_) => "serialization_error",
            Error::Io(_) => "io_error",
        }
    }
}

// Convenience constructors
impl Error {
    pub fn unknown_method(method: impl Into<String>) -> Self {
        Self::UnknownMethod(method.into())
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingRequiredField(field.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn upstream(operation: &'static str, source: ApiError) -> Self {
        Self::Upstream { operation, source }
    }
}
