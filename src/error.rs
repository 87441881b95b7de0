//! Error types for path-acl
//!
//! Configuration problems are errors and abort setup. Authorization denials
//! are ordinary [`Decision`](crate::access_control::Decision) values; the
//! only error form a denial takes is [`AccessDeniedError`], produced on request
//! by [`Acl::require`](crate::access_control::Acl::require).

use crate::access_control::DenyReason;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Access denied: {0}")]
    AccessDenied(#[from] AccessDeniedError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),
}

/// Configuration-related errors
///
/// Raised by role and resource registration as well as by the config loader.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Invalid role: '{role}' is not a registered role")]
    InvalidRole { role: String },

    #[error("Invalid methods for role '{role}': {reason}")]
    InvalidMethods { role: String, reason: String },

    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },
}

impl ConfigError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ConfigError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn invalid_role(role: impl Into<String>) -> Self {
        ConfigError::InvalidRole { role: role.into() }
    }

    pub fn invalid_methods(role: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidMethods {
            role: role.into(),
            reason: reason.into(),
        }
    }

    /// Prefix the error with the resource pattern it was raised for
    pub fn for_resource(self, pattern: &str) -> Self {
        match self {
            ConfigError::InvalidRole { .. } | ConfigError::InvalidMethods { .. } => {
                ConfigError::Invalid {
                    message: format!("resource '{}': {}", pattern, self),
                }
            }
            other => other,
        }
    }
}

/// A denied request, in error form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{method} {path}: {}", .reason.message())]
pub struct AccessDeniedError {
    pub path: String,
    pub method: String,
    pub reason: DenyReason,
}

impl AccessDeniedError {
    pub fn new(path: impl Into<String>, method: impl Into<String>, reason: DenyReason) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            reason,
        }
    }

    /// Whether the caller should be treated as not logged in rather than forbidden
    pub fn is_unauthenticated(&self) -> bool {
        self.reason == DenyReason::Unauthenticated
    }
}

/// HTTP server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid bind address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Invalid role header name '{name}': {reason}")]
    InvalidRoleHeader { name: String, reason: String },
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;
