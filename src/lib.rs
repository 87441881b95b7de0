//! Path-pattern access control
//!
//! Decides whether an authenticated caller may use an HTTP method on a path,
//! based on a table of resource patterns with per-role method permissions.
//!
//! ## Features
//!
//! - **Segment patterns** with `*`, `:param` and `:user` wildcards
//! - **First-match policy**: register specific patterns before general ones
//! - **Atomic registration**: a batch with any invalid permission is rejected whole
//! - **Axum middleware** mapping denials to `401`/`403` JSON responses
//! - **Flexible configuration** via TOML files and environment variables
//!
//! ## Decision Order
//!
//! ```text
//! no role → unauthenticated
//! no matching pattern → no-policy-for-resource
//! no permission for role → role-has-no-policy
//! method not granted → method-not-permitted
//! otherwise → allow
//! ```
//!
//! ## Example Configuration
//!
//! ```toml
//! [acl]
//! roles = ["admin", "user"]
//!
//! [[acl.resources]]
//! pattern = "/users/me"
//! permissions = [{ role = "user", methods = ["GET", "PATCH"] }]
//!
//! [[acl.resources]]
//! pattern = "/users/:param"
//! permissions = [{ role = "admin", methods = ["GET", "DELETE"] }]
//! ```
//!
//! ## Programmatic Setup
//!
//! ```
//! use path_acl::access_control::{AccessRequest, Acl, Decision, DenyReason, PermissionSpec};
//!
//! let mut acl = Acl::new();
//! acl.set_roles(["admin", "guest"]).unwrap();
//! acl.add_resource("/a", &[PermissionSpec::new("admin", ["get", "post"])]).unwrap();
//!
//! assert_eq!(acl.authorize(&AccessRequest::new("/a", "GET", Some("admin"))), Decision::Allow);
//! assert_eq!(
//!     acl.authorize(&AccessRequest::new("/a", "GET", Some("guest"))),
//!     Decision::Deny(DenyReason::RoleHasNoPolicy)
//! );
//! ```

pub mod access_control;
pub mod config;
pub mod error;
pub mod middleware;
pub mod server;

// Re-export main types
pub use access_control::{AccessRequest, Acl, Decision, DenyReason, SharedAcl};
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result};

/// Build the ACL described by `config` and serve it until shutdown
pub async fn run_server(config: &AppConfig) -> Result<()> {
    let acl = Acl::from_config(&config.acl)?;
    server::serve(&config.server, SharedAcl::new(acl)).await?;
    Ok(())
}
