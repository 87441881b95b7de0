//! Access control integration tests
//!
//! Covers:
//! - Role registration and replacement
//! - Resource registration (validation, atomicity, one entry per call)
//! - Path lookup (segment counts, wildcards, empty segments, first match)
//! - Decision evaluation order and reasons

use path_acl::access_control::{
    AccessRequest, Acl, Decision, DenyReason, Method, PermissionSpec, SharedAcl,
};
use path_acl::error::ConfigError;
use rstest::rstest;

// =============================================================================
// Test Helpers
// =============================================================================

fn acl_with_roles(roles: &[&str]) -> Acl {
    let mut acl = Acl::new();
    acl.set_roles(roles.iter().copied()).unwrap();
    acl
}

fn perm(role: &str, methods: &[&str]) -> PermissionSpec {
    PermissionSpec::new(role, methods.iter().copied())
}

fn matched_pattern(acl: &Acl, path: &str) -> Option<String> {
    acl.lookup(path).map(|e| e.pattern().as_str().to_string())
}

// =============================================================================
// 1. Registration
// =============================================================================

mod registration {
    use super::*;

    #[test]
    fn test_unknown_role_rejected_before_set_roles() {
        let mut acl = Acl::new();
        let err = acl
            .add_resource("/a", &[perm("admin", &["GET"])])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRole { .. }));
    }

    #[test]
    fn test_empty_methods_rejected() {
        let mut acl = acl_with_roles(&["admin"]);
        let err = acl.add_resource("/a", &[perm("admin", &[])]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMethods { .. }));
    }

    #[rstest]
    #[case("HEAD")]
    #[case("OPTIONS")]
    #[case("CONNECT")]
    #[case("")]
    #[case("GETS")]
    fn test_unknown_method_rejected(#[case] method: &str) {
        let mut acl = acl_with_roles(&["admin"]);
        let err = acl
            .add_resource("/a", &[perm("admin", &["GET", method])])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMethods { .. }));
    }

    #[test]
    fn test_bad_permission_first_commits_nothing() {
        let mut acl = acl_with_roles(&["admin"]);
        let result =
            acl.add_resource("/x", &[perm("ghost", &["GET"]), perm("admin", &["GET"])]);

        assert!(result.is_err());
        assert!(acl.table().is_empty());
        assert!(acl.lookup("/x").is_none());
    }

    #[test]
    fn test_bad_permission_last_commits_nothing() {
        let mut acl = acl_with_roles(&["admin"]);
        let result =
            acl.add_resource("/x", &[perm("admin", &["GET"]), perm("admin", &["YEET"])]);

        assert!(result.is_err());
        assert!(acl.table().is_empty());
    }

    #[test]
    fn test_failed_call_keeps_earlier_entries() {
        let mut acl = acl_with_roles(&["admin"]);
        acl.add_resource("/a", &[perm("admin", &["GET"])]).unwrap();
        assert!(acl.add_resource("/b", &[perm("nobody", &["GET"])]).is_err());

        assert_eq!(acl.table().len(), 1);
        assert_eq!(
            acl.authorize(&AccessRequest::new("/a", "GET", Some("admin"))),
            Decision::Allow
        );
    }

    #[test]
    fn test_many_permissions_make_one_entry() {
        let mut acl = acl_with_roles(&["admin", "user", "guest"]);
        acl.add_resource(
            "/a",
            &[
                perm("admin", &["GET", "POST", "DELETE"]),
                perm("user", &["GET", "POST"]),
                perm("guest", &["GET"]),
            ],
        )
        .unwrap();

        assert_eq!(acl.table().len(), 1);
        assert_eq!(acl.table().entries()[0].permissions().len(), 3);
    }

    #[test]
    fn test_methods_are_normalized() {
        let mut acl = acl_with_roles(&["admin"]);
        acl.add_resource("/a", &[perm("admin", &["get", "Post"])])
            .unwrap();

        let permission = acl.lookup("/a").unwrap().permission_for("admin").unwrap();
        let methods: Vec<Method> = permission.methods().iter().copied().collect();
        assert_eq!(methods, vec![Method::Get, Method::Post]);
    }

    #[test]
    fn test_lowercase_and_uppercase_registration_equivalent() {
        let mut lower = acl_with_roles(&["admin"]);
        lower
            .add_resource("/a", &[perm("admin", &["get", "post"])])
            .unwrap();
        let mut upper = acl_with_roles(&["admin"]);
        upper
            .add_resource("/a", &[perm("admin", &["GET", "POST"])])
            .unwrap();

        for method in ["GET", "POST", "PUT", "PATCH", "DELETE", "get"] {
            let request = AccessRequest::new("/a", method, Some("admin"));
            assert_eq!(lower.authorize(&request), upper.authorize(&request));
        }
    }

    #[test]
    fn test_set_roles_rejects_empty_role() {
        let mut acl = Acl::new();
        let err = acl.set_roles(["admin", ""]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInput { .. }));
        assert!(acl.roles().is_empty());
    }
}

// =============================================================================
// 2. Lookup
// =============================================================================

mod lookup {
    use super::*;

    fn acl_with_patterns(patterns: &[&str]) -> Acl {
        let mut acl = acl_with_roles(&["admin"]);
        for pattern in patterns {
            acl.add_resource(pattern, &[perm("admin", &["GET"])])
                .unwrap();
        }
        acl
    }

    #[rstest]
    #[case("/users/:param")]
    #[case("/users/*")]
    #[case("/users/:user")]
    #[case("/users/")]
    fn test_wildcard_slot(#[case] pattern: &str) {
        let acl = acl_with_patterns(&[pattern]);
        assert!(acl.lookup("/users/42").is_some());
        assert!(acl.lookup("/users/abc").is_some());
        assert!(acl.lookup("/users/42/extra").is_none());
        assert!(acl.lookup("/users").is_none());
    }

    #[test]
    fn test_empty_middle_segment() {
        let acl = acl_with_patterns(&["/users//profile"]);
        assert!(acl.lookup("/users/42/profile").is_some());
        assert!(acl.lookup("/users/someone-else/profile").is_some());
        assert!(acl.lookup("/users/42/settings").is_none());
        assert!(acl.lookup("/users/profile").is_none());
    }

    #[rstest]
    #[case("/*", "/a/b")]
    #[case("/*/*", "/a")]
    #[case("/*/*", "/a/b/c")]
    #[case("//", "/a/b/c")]
    #[case("/a/:param/c", "/a/b")]
    #[case("/a", "/a/")]
    fn test_segment_count_mismatch(#[case] pattern: &str, #[case] path: &str) {
        let acl = acl_with_patterns(&[pattern]);
        assert!(acl.lookup(path).is_none());
    }

    #[test]
    fn test_first_registered_wins() {
        let acl = acl_with_patterns(&["/users/:param", "/users/me"]);
        assert_eq!(
            matched_pattern(&acl, "/users/me").as_deref(),
            Some("/users/:param")
        );
    }

    #[test]
    fn test_specific_before_general() {
        let acl = acl_with_patterns(&["/users/me", "/users/:param", "/*/*"]);
        assert_eq!(
            matched_pattern(&acl, "/users/me").as_deref(),
            Some("/users/me")
        );
        assert_eq!(
            matched_pattern(&acl, "/users/7").as_deref(),
            Some("/users/:param")
        );
        assert_eq!(
            matched_pattern(&acl, "/groups/7").as_deref(),
            Some("/*/*")
        );
    }

    #[test]
    fn test_duplicate_patterns_first_wins() {
        let mut acl = acl_with_roles(&["admin", "user"]);
        acl.add_resource("/a", &[perm("admin", &["GET"])]).unwrap();
        acl.add_resource("/a", &[perm("user", &["GET"])]).unwrap();

        assert_eq!(acl.table().len(), 2);
        assert_eq!(
            acl.authorize(&AccessRequest::new("/a", "GET", Some("user"))),
            Decision::Deny(DenyReason::RoleHasNoPolicy)
        );
    }

    #[test]
    fn test_root_path() {
        let acl = acl_with_patterns(&["/"]);
        assert!(acl.lookup("/").is_some());
        assert!(acl.lookup("/a").is_some());
        assert!(acl.lookup("/a/b").is_none());
    }
}

// =============================================================================
// 3. Decisions
// =============================================================================

mod decisions {
    use super::*;

    fn admin_get_post_on_a() -> Acl {
        let mut acl = acl_with_roles(&["admin", "guest"]);
        acl.add_resource("/a", &[perm("admin", &["GET", "POST"])])
            .unwrap();
        acl
    }

    #[rstest]
    #[case("/a", "GET", Some("admin"), Decision::Allow)]
    #[case("/a", "POST", Some("admin"), Decision::Allow)]
    #[case("/a", "DELETE", Some("admin"), Decision::Deny(DenyReason::MethodNotPermitted))]
    #[case("/a", "GET", Some("guest"), Decision::Deny(DenyReason::RoleHasNoPolicy))]
    #[case("/b", "GET", Some("admin"), Decision::Deny(DenyReason::NoPolicyForResource))]
    #[case("/a", "GET", None, Decision::Deny(DenyReason::Unauthenticated))]
    fn test_decision_table(
        #[case] path: &str,
        #[case] method: &str,
        #[case] role: Option<&str>,
        #[case] expected: Decision,
    ) {
        let acl = admin_get_post_on_a();
        assert_eq!(acl.authorize(&AccessRequest::new(path, method, role)), expected);
    }

    #[test]
    fn test_role_not_in_registry_is_treated_like_any_other() {
        // The registry only guards registration; an unknown caller role has no policy
        let acl = admin_get_post_on_a();
        assert_eq!(
            acl.authorize(&AccessRequest::new("/a", "GET", Some("intruder"))),
            Decision::Deny(DenyReason::RoleHasNoPolicy)
        );
    }

    #[test]
    fn test_different_methods_per_role() {
        let mut acl = acl_with_roles(&["admin", "user"]);
        acl.add_resource(
            "/posts/:param",
            &[perm("admin", &["GET", "DELETE"]), perm("user", &["GET"])],
        )
        .unwrap();

        let check = |method: &str, role: &str| {
            acl.authorize(&AccessRequest::new("/posts/9", method, Some(role)))
        };
        assert_eq!(check("DELETE", "admin"), Decision::Allow);
        assert_eq!(check("GET", "user"), Decision::Allow);
        assert_eq!(
            check("DELETE", "user"),
            Decision::Deny(DenyReason::MethodNotPermitted)
        );
    }

    #[test]
    fn test_first_permission_for_role_is_used() {
        let mut acl = acl_with_roles(&["admin"]);
        acl.add_resource("/a", &[perm("admin", &["GET"]), perm("admin", &["POST"])])
            .unwrap();

        assert_eq!(
            acl.authorize(&AccessRequest::new("/a", "POST", Some("admin"))),
            Decision::Deny(DenyReason::MethodNotPermitted)
        );
    }

    #[test]
    fn test_first_matching_resource_is_final() {
        // A general pattern registered first shadows a later specific one,
        // even when only the later one grants the role access
        let mut acl = acl_with_roles(&["admin", "user"]);
        acl.add_resource("/users/:param", &[perm("admin", &["GET"])])
            .unwrap();
        acl.add_resource("/users/me", &[perm("user", &["GET"])])
            .unwrap();

        assert_eq!(
            acl.authorize(&AccessRequest::new("/users/me", "GET", Some("user"))),
            Decision::Deny(DenyReason::RoleHasNoPolicy)
        );
    }

    #[test]
    fn test_request_method_any_case() {
        let acl = admin_get_post_on_a();
        for method in ["get", "Get", "gEt", "GET"] {
            assert!(
                acl.authorize(&AccessRequest::new("/a", method, Some("admin")))
                    .is_allowed(),
                "method {}",
                method
            );
        }
    }

    #[test]
    fn test_require_reports_reason() {
        let acl = admin_get_post_on_a();
        let err = acl
            .require(&AccessRequest::new("/b", "GET", Some("admin")))
            .unwrap_err();
        assert_eq!(err.reason, DenyReason::NoPolicyForResource);
        assert_eq!(
            err.reason.message(),
            "No permissions have been setup for this resource."
        );
    }

    #[test]
    fn test_shared_acl_matches_owned_acl() {
        let acl = admin_get_post_on_a();
        let shared = SharedAcl::new(acl.clone());

        for (path, method, role) in [
            ("/a", "GET", Some("admin")),
            ("/a", "PUT", Some("admin")),
            ("/a", "GET", Some("guest")),
            ("/c", "GET", Some("admin")),
            ("/a", "GET", None),
        ] {
            let request = AccessRequest::new(path, method, role);
            assert_eq!(shared.authorize(&request), acl.authorize(&request));
        }
    }
}
