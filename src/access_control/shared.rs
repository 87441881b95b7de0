//! Shared ACL handle
//!
//! Cloneable handle for serving requests concurrently. Registration takes
//! the write lock, so readers see the table either before or after a
//! registration and never a partially applied one.

use crate::access_control::authorizer::{AccessRequest, Acl, Decision};
use crate::access_control::types::PermissionSpec;
use crate::error::ConfigError;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe, cloneable handle to an [`Acl`]
#[derive(Debug, Clone, Default)]
pub struct SharedAcl {
    inner: Arc<RwLock<Acl>>,
}

impl SharedAcl {
    pub fn new(acl: Acl) -> Self {
        Self {
            inner: Arc::new(RwLock::new(acl)),
        }
    }

    // A panic while holding the lock cannot leave a half-appended entry,
    // so poisoned locks are recovered.

    fn write_acl(&self) -> RwLockWriteGuard<'_, Acl> {
        self.inner.write().unwrap_or_else(|poisoned| {
            tracing::warn!("acl lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Read access to the underlying ACL
    pub fn read(&self) -> RwLockReadGuard<'_, Acl> {
        self.inner.read().unwrap_or_else(|poisoned| {
            tracing::warn!("acl lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Replace the set of valid roles
    pub fn set_roles<I, S>(&self, roles: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.write_acl().set_roles(roles)
    }

    /// Register a resource pattern and its per-role permissions
    pub fn add_resource(
        &self,
        pattern: &str,
        permissions: &[PermissionSpec],
    ) -> Result<(), ConfigError> {
        self.write_acl().add_resource(pattern, permissions)
    }

    /// Decide whether a request is permitted
    pub fn authorize(&self, request: &AccessRequest<'_>) -> Decision {
        self.read().authorize(request)
    }
}

impl From<Acl> for SharedAcl {
    fn from(acl: Acl) -> Self {
        SharedAcl::new(acl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access_control::DenyReason;
    use std::thread;

    #[test]
    fn test_registration_visible_to_clones() {
        let shared = SharedAcl::default();
        let reader = shared.clone();

        shared.set_roles(["admin"]).unwrap();
        shared
            .add_resource("/a", &[PermissionSpec::new("admin", ["GET"])])
            .unwrap();

        assert!(
            reader
                .authorize(&AccessRequest::new("/a", "GET", Some("admin")))
                .is_allowed()
        );
    }

    #[test]
    fn test_failed_registration_leaves_table_unchanged() {
        let shared = SharedAcl::default();
        shared.set_roles(["admin"]).unwrap();

        let result = shared.add_resource(
            "/x",
            &[
                PermissionSpec::new("ghost", ["GET"]),
                PermissionSpec::new("admin", ["GET"]),
            ],
        );
        assert!(result.is_err());
        assert!(shared.read().table().is_empty());
    }

    #[test]
    fn test_concurrent_readers() {
        let mut acl = Acl::new();
        acl.set_roles(["admin", "user"]).unwrap();
        acl.add_resource("/items/:param", &[PermissionSpec::new("user", ["GET"])])
            .unwrap();
        let shared = SharedAcl::new(acl);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let path = format!("/items/{}", i);
                    for _ in 0..100 {
                        let allowed =
                            shared.authorize(&AccessRequest::new(&path, "GET", Some("user")));
                        assert!(allowed.is_allowed());

                        let denied =
                            shared.authorize(&AccessRequest::new(&path, "GET", Some("admin")));
                        assert_eq!(denied, Decision::Deny(DenyReason::RoleHasNoPolicy));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_registration_concurrent_with_readers() {
        let shared = SharedAcl::default();
        shared.set_roles(["admin"]).unwrap();

        let reader = {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let acl = shared.read();
                    // Every committed entry carries its complete permission list
                    for entry in acl.table().entries() {
                        assert_eq!(entry.permissions().len(), 2);
                    }
                }
            })
        };

        for i in 0..50 {
            shared
                .add_resource(
                    &format!("/r/{}", i),
                    &[
                        PermissionSpec::new("admin", ["GET"]),
                        PermissionSpec::new("admin", ["POST"]),
                    ],
                )
                .unwrap();
        }

        reader.join().unwrap();
        assert_eq!(shared.read().table().len(), 50);
    }
}
