//! HTTP boundary
//!
//! Axum middleware that runs every request through a [`SharedAcl`].
//! Authentication is not done here: an upstream layer is expected to insert
//! a [`Principal`] into the request extensions. For deployments behind an
//! authenticating proxy, [`trusted_header_principal`] builds the principal
//! from a header the proxy sets.

use crate::access_control::{AccessRequest, Decision, DenyReason, SharedAcl};
use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderName, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, warn};

/// Authenticated caller, as resolved by an upstream layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub role: String,
}

impl Principal {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }
}

/// JSON body returned for denied requests
#[derive(Debug, Serialize)]
pub struct DenialBody {
    pub message: &'static str,
    pub reason: DenyReason,
}

/// Response for a denied request
///
/// Unauthenticated callers get `401`; every other denial is `403`.
pub fn denial_response(reason: DenyReason) -> Response {
    let status = match reason {
        DenyReason::Unauthenticated => StatusCode::UNAUTHORIZED,
        _ => StatusCode::FORBIDDEN,
    };

    (
        status,
        Json(DenialBody {
            message: reason.message(),
            reason,
        }),
    )
        .into_response()
}

/// Authorize the request against the ACL before passing it on
///
/// Use with `axum::middleware::from_fn_with_state(acl, acl_middleware)`.
pub async fn acl_middleware(
    State(acl): State<SharedAcl>,
    request: Request,
    next: Next,
) -> Response {
    let decision = {
        let role = request
            .extensions()
            .get::<Principal>()
            .map(|p| p.role.as_str());
        let access = AccessRequest::new(request.uri().path(), request.method().as_str(), role);
        acl.authorize(&access)
    };

    match decision {
        Decision::Allow => next.run(request).await,
        Decision::Deny(reason) => {
            warn!(
                path = request.uri().path(),
                method = %request.method(),
                reason = %reason,
                "Request denied"
            );
            denial_response(reason)
        }
    }
}

/// Header that carries the caller's role
#[derive(Debug, Clone)]
pub struct RoleHeader(pub HeaderName);

impl RoleHeader {
    pub fn new(name: &str) -> Result<Self, axum::http::header::InvalidHeaderName> {
        Ok(Self(HeaderName::try_from(name)?))
    }
}

/// Insert a [`Principal`] built from a trusted role header
///
/// The header is trusted as-is; only use this behind a proxy that
/// authenticates callers and strips the header from client input.
/// Missing, empty or non-UTF-8 values leave the request unauthenticated.
pub async fn trusted_header_principal(
    State(header): State<RoleHeader>,
    mut request: Request,
    next: Next,
) -> Response {
    let role = request
        .headers()
        .get(&header.0)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .map(str::to_string);

    match role {
        Some(role) => {
            debug!(role, "Resolved principal from header");
            request.extensions_mut().insert(Principal::new(role));
        }
        None => debug!(header = %header.0, "No role header on request"),
    }

    next.run(request).await
}
