//! Access control types
//!
//! Core types used by the access control system.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// HTTP method that can be granted to a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
    Put,
}

impl Method {
    /// Get the method name as an upper-case string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Put => "PUT",
        }
    }

    /// Try to parse a method, ignoring case
    pub fn try_parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            "PATCH" => Some(Method::Patch),
            "DELETE" => Some(Method::Delete),
            "PUT" => Some(Method::Put),
            _ => None,
        }
    }

    /// Get all methods
    pub fn all() -> &'static [Method] {
        &[
            Method::Get,
            Method::Post,
            Method::Patch,
            Method::Delete,
            Method::Put,
        ]
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unvalidated permission, as supplied at registration time or read from config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSpec {
    /// Role the permission applies to
    pub role: String,

    /// Method names, any case
    #[serde(default)]
    pub methods: Vec<String>,
}

impl PermissionSpec {
    pub fn new<I, S>(role: impl Into<String>, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            role: role.into(),
            methods: methods.into_iter().map(Into::into).collect(),
        }
    }

    /// Normalize the method list into a non-empty set of known methods
    pub(crate) fn parse_methods(&self) -> Result<BTreeSet<Method>, ConfigError> {
        if self.methods.is_empty() {
            return Err(ConfigError::invalid_methods(
                &self.role,
                "method list must not be empty",
            ));
        }

        self.methods
            .iter()
            .map(|name| {
                Method::try_parse(name).ok_or_else(|| {
                    ConfigError::invalid_methods(&self.role, format!("unknown method '{}'", name))
                })
            })
            .collect()
    }
}

/// Validated permission: the methods a role may use on a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    role: String,
    methods: BTreeSet<Method>,
}

impl Permission {
    pub(crate) fn new(role: String, methods: BTreeSet<Method>) -> Self {
        Self { role, methods }
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn methods(&self) -> &BTreeSet<Method> {
        &self.methods
    }

    /// Check if this permission grants the given method
    pub fn allows(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }
}
