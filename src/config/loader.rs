//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (PATH_ACL__*)
//! 2. Configuration file (TOML)
//! 3. Default values
//!
//! Roles and resources are validated by building an [`Acl`], so a config
//! that loads successfully always produces a usable ACL.

use crate::access_control::Acl;
use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "path-acl.toml",
    ".path-acl.toml",
    "~/.config/path-acl/config.toml",
    "/etc/path-acl/config.toml",
];

/// Prefix for environment overrides, e.g. `PATH_ACL__SERVER__PORT`
const ENV_PREFIX: &str = "PATH_ACL";

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // Defaults come from serde defaults on AppConfig

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // First existing default path wins
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // Double underscore (__) maps to nested keys (server.port).
    // acl.roles may be given as a comma-separated list.
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("acl.roles")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::Invalid {
            message: "server.port must be greater than 0".to_string(),
        });
    }

    if config.server.role_header.trim().is_empty() {
        return Err(ConfigError::Missing {
            field: "server.role_header".to_string(),
        });
    }

    for (index, resource) in config.acl.resources.iter().enumerate() {
        if resource.pattern.is_empty() {
            return Err(ConfigError::Missing {
                field: format!("acl.resources[{}].pattern", index),
            });
        }
    }

    // Registers every role and resource, surfacing invalid roles and methods
    Acl::from_config(&config.acl)?;

    Ok(())
}
