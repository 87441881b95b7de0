//! Access control module
//!
//! Path-pattern access control with per-role method permissions.
//!
//! ## Model
//!
//! - A [`RoleRegistry`] holds the roles permissions may refer to.
//! - An [`AclTable`] holds resource entries: a [`PathPattern`] and the
//!   methods each role may use on it. Entries are scanned in registration
//!   order and the first matching pattern wins.
//! - [`Acl::authorize`] turns a request into a [`Decision`].
//!
//! ## Patterns
//!
//! Patterns are split on `/`. Empty segments and the tokens `*`, `:param`
//! and `:user` match any single segment; anything else must match exactly.
//! A pattern only matches paths with the same number of segments.
//!
//! ```text
//! /users/:param      matches /users/42, not /users or /users/42/extra
//! /users//profile    matches /users/42/profile
//! ```

pub mod authorizer;
pub mod patterns;
pub mod roles;
pub mod shared;
pub mod table;
pub mod types;

pub use authorizer::{AccessRequest, Acl, Decision, DenyReason};
pub use patterns::{PathPattern, Segment, WILDCARD_TOKENS};
pub use roles::RoleRegistry;
pub use shared::SharedAcl;
pub use table::{AclTable, ResourceEntry};
pub use types::{Method, Permission, PermissionSpec};
