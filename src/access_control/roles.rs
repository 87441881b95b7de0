//! Role registry
//!
//! Holds the set of role identifiers that resource permissions may refer to.

use crate::error::ConfigError;
use std::collections::BTreeSet;

/// Set of valid role identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleRegistry {
    roles: BTreeSet<String>,
}

impl RoleRegistry {
    /// Create an empty registry (no role is valid)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of roles
    ///
    /// Fails if any role is empty or only whitespace.
    pub fn from_roles<I, S>(roles: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for role in roles {
            let role = role.into();
            if role.trim().is_empty() {
                return Err(ConfigError::invalid_input("role names must not be empty"));
            }
            set.insert(role);
        }
        Ok(Self { roles: set })
    }

    /// Replace the whole set of valid roles
    ///
    /// On failure the current set is left untouched.
    pub fn set_roles<I, S>(&mut self, roles: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self = Self::from_roles(roles)?;
        Ok(())
    }

    /// Check if a role is registered
    pub fn contains(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }
}
