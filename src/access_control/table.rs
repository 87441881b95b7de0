//! ACL table
//!
//! Ordered list of resource entries. Entries are only ever appended, and
//! lookups scan them in registration order so that a specific pattern
//! registered before a general one takes precedence.

use crate::access_control::patterns::PathPattern;
use crate::access_control::roles::RoleRegistry;
use crate::access_control::types::{Permission, PermissionSpec};
use crate::error::ConfigError;
use tracing::{debug, trace};

/// A path pattern together with the per-role permissions granted on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pattern: PathPattern,
    permissions: Vec<Permission>,
}

impl ResourceEntry {
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    /// Find the first permission declared for a role
    pub fn permission_for(&self, role: &str) -> Option<&Permission> {
        self.permissions.iter().find(|p| p.role() == role)
    }
}

/// Ordered collection of resource entries
#[derive(Debug, Clone, Default)]
pub struct AclTable {
    entries: Vec<ResourceEntry>,
}

impl AclTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource pattern with its permissions
    ///
    /// The whole batch is validated against `roles` before anything is
    /// stored; on error the table is unchanged. On success exactly one entry
    /// is appended, however many permissions the batch holds.
    pub fn add_resource(
        &mut self,
        pattern: &str,
        permissions: &[PermissionSpec],
        roles: &RoleRegistry,
    ) -> Result<(), ConfigError> {
        let validated = Self::validate(permissions, roles)?;

        self.entries.push(ResourceEntry {
            pattern: PathPattern::new(pattern),
            permissions: validated,
        });

        debug!(
            pattern,
            permissions = permissions.len(),
            entries = self.entries.len(),
            "Registered resource"
        );

        Ok(())
    }

    fn validate(
        permissions: &[PermissionSpec],
        roles: &RoleRegistry,
    ) -> Result<Vec<Permission>, ConfigError> {
        permissions
            .iter()
            .map(|spec| {
                if !roles.contains(&spec.role) {
                    return Err(ConfigError::invalid_role(&spec.role));
                }
                let methods = spec.parse_methods()?;
                Ok(Permission::new(spec.role.clone(), methods))
            })
            .collect()
    }

    /// Find the first entry whose pattern matches `path`
    pub fn lookup(&self, path: &str) -> Option<&ResourceEntry> {
        let found = self.entries.iter().find(|entry| entry.pattern.matches(path));
        match found {
            Some(entry) => trace!(path, pattern = %entry.pattern, "Matched resource"),
            None => trace!(path, "No resource matched"),
        }
        found
    }

    pub fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
