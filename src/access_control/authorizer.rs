//! Authorization decisions
//!
//! [`Acl`] owns a role registry and an ACL table and evaluates requests
//! against them. Evaluation runs in a fixed order and stops at the first
//! step that produces a denial:
//! 1. The request must carry a role
//! 2. A resource pattern must match the path
//! 3. The matched resource must declare a permission for the role
//! 4. That permission must include the request method

use crate::access_control::roles::RoleRegistry;
use crate::access_control::table::{AclTable, ResourceEntry};
use crate::access_control::types::{Method, PermissionSpec};
use crate::config::AclConfig;
use crate::error::{AccessDeniedError, ConfigError};
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

/// Why a request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DenyReason {
    /// No principal was resolved for the request
    Unauthenticated,
    /// No registered pattern matches the path
    NoPolicyForResource,
    /// The matched resource has no permission for the role
    RoleHasNoPolicy,
    /// The role's permission does not include the method
    MethodNotPermitted,
}

impl DenyReason {
    /// Machine-readable reason code
    pub const fn code(&self) -> &'static str {
        match self {
            DenyReason::Unauthenticated => "unauthenticated",
            DenyReason::NoPolicyForResource => "no-policy-for-resource",
            DenyReason::RoleHasNoPolicy => "role-has-no-policy",
            DenyReason::MethodNotPermitted => "method-not-permitted",
        }
    }

    /// Human-readable message suitable for a response body
    pub const fn message(&self) -> &'static str {
        match self {
            DenyReason::Unauthenticated => "User not authenticated",
            DenyReason::NoPolicyForResource => "No permissions have been setup for this resource.",
            DenyReason::RoleHasNoPolicy => {
                "Permissions for this resource do not exist for your role."
            }
            DenyReason::MethodNotPermitted => "Insufficient permissions to access this resource.",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Result of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Request is permitted
    Allow,
    /// Request is denied with a reason
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Decision::Deny(_))
    }

    pub fn reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(*reason),
        }
    }
}

/// A request to authorize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRequest<'a> {
    /// Request path, without query string
    pub path: &'a str,
    /// Method name, any case
    pub method: &'a str,
    /// Resolved role of the caller, `None` if unauthenticated
    pub role: Option<&'a str>,
}

impl<'a> AccessRequest<'a> {
    pub fn new(path: &'a str, method: &'a str, role: Option<&'a str>) -> Self {
        Self { path, method, role }
    }
}

/// Access control list: valid roles plus the resource table
#[derive(Debug, Clone, Default)]
pub struct Acl {
    roles: RoleRegistry,
    table: AclTable,
}

impl Acl {
    /// Create an empty ACL (every request is denied)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an ACL from configuration
    ///
    /// Roles are registered first, then resources in the order they appear.
    pub fn from_config(config: &AclConfig) -> Result<Self, ConfigError> {
        let mut acl = Self::new();
        acl.set_roles(config.roles.iter().cloned())?;

        for resource in &config.resources {
            acl.add_resource(&resource.pattern, &resource.permissions)
                .map_err(|e| e.for_resource(&resource.pattern))?;
        }

        debug!(
            roles = acl.roles.len(),
            resources = acl.table.len(),
            "Built ACL from configuration"
        );

        Ok(acl)
    }

    /// Replace the set of valid roles
    ///
    /// Entries already in the table are not re-validated.
    pub fn set_roles<I, S>(&mut self, roles: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.set_roles(roles)
    }

    /// Register a resource pattern and its per-role permissions
    pub fn add_resource(
        &mut self,
        pattern: &str,
        permissions: &[PermissionSpec],
    ) -> Result<(), ConfigError> {
        self.table.add_resource(pattern, permissions, &self.roles)
    }

    /// Find the first resource entry matching `path`
    pub fn lookup(&self, path: &str) -> Option<&ResourceEntry> {
        self.table.lookup(path)
    }

    /// Decide whether a request is permitted
    pub fn authorize(&self, request: &AccessRequest<'_>) -> Decision {
        debug!(
            path = request.path,
            method = request.method,
            role = ?request.role,
            "Checking access"
        );

        let Some(role) = request.role else {
            trace!("No principal on request");
            return Decision::Deny(DenyReason::Unauthenticated);
        };

        let Some(entry) = self.table.lookup(request.path) else {
            return Decision::Deny(DenyReason::NoPolicyForResource);
        };

        let Some(permission) = entry.permission_for(role) else {
            trace!(pattern = %entry.pattern(), role, "Role has no permission on resource");
            return Decision::Deny(DenyReason::RoleHasNoPolicy);
        };

        match Method::try_parse(request.method) {
            Some(method) if permission.allows(method) => Decision::Allow,
            _ => {
                trace!(
                    pattern = %entry.pattern(),
                    role,
                    method = request.method,
                    "Method not in role's permission"
                );
                Decision::Deny(DenyReason::MethodNotPermitted)
            }
        }
    }

    /// Authorize a request, returning an error if denied
    pub fn require(&self, request: &AccessRequest<'_>) -> Result<(), AccessDeniedError> {
        match self.authorize(request) {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(AccessDeniedError::new(
                request.path,
                request.method,
                reason,
            )),
        }
    }

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    pub fn table(&self) -> &AclTable {
        &self.table
    }
}
