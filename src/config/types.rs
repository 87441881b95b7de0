//! Configuration types for path-acl
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::access_control::PermissionSpec;
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Roles and resource permissions
    pub acl: AclConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Header carrying the caller's role, set by an authenticating proxy
    pub role_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 20390,
            role_header: "x-user-role".to_string(),
        }
    }
}

/// Access control configuration
///
/// ```toml
/// [acl]
/// roles = ["admin", "user"]
///
/// [[acl.resources]]
/// pattern = "/users/:param"
/// permissions = [
///     { role = "admin", methods = ["GET", "DELETE"] },
///     { role = "user", methods = ["get"] },
/// ]
/// ```
///
/// Resources are registered in the order they appear; the first matching
/// pattern decides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AclConfig {
    /// Valid roles
    pub roles: Vec<String>,

    /// Resource patterns and their permissions
    pub resources: Vec<ResourceConfig>,
}

/// One resource pattern with its per-role permissions
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceConfig {
    pub pattern: String,

    #[serde(default)]
    pub permissions: Vec<PermissionSpec>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
