//! HTTP server
//!
//! Serves an axum app in which every route except `/healthz` is guarded by
//! the ACL. Allowed requests are answered with a JSON echo of what was
//! authorized, which makes the server usable as a policy test bench or as
//! the template for a real service.

use crate::access_control::SharedAcl;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::middleware::{Principal, RoleHeader, acl_middleware, trusted_header_principal};
use axum::{
    Extension, Json, Router,
    http::{Method, Uri},
    middleware::from_fn_with_state,
    routing::get,
};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Body returned for an allowed request
#[derive(Debug, Serialize)]
struct Granted {
    path: String,
    method: String,
    role: String,
}

/// Build the application router
pub fn router(acl: SharedAcl, role_header: RoleHeader) -> Router {
    // Layers run outermost-last: the principal is resolved before the ACL check
    let guarded = Router::new()
        .fallback(granted)
        .layer(from_fn_with_state(acl, acl_middleware))
        .layer(from_fn_with_state(role_header, trusted_header_principal));

    Router::new()
        .route("/healthz", get(healthz))
        .fallback_service(guarded)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn granted(
    method: Method,
    uri: Uri,
    Extension(principal): Extension<Principal>,
) -> Json<Granted> {
    Json(Granted {
        path: uri.path().to_string(),
        method: method.to_string(),
        role: principal.role,
    })
}

/// Resolve the bind address from server config
pub fn bind_address(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
    let address = format!("{}:{}", config.host, config.port);
    address
        .parse()
        .map_err(|e: std::net::AddrParseError| ServerError::InvalidAddress {
            address,
            reason: e.to_string(),
        })
}

/// Run the server until Ctrl+C
pub async fn serve(config: &ServerConfig, acl: SharedAcl) -> Result<(), ServerError> {
    let bind = bind_address(config)?;
    let role_header =
        RoleHeader::new(&config.role_header).map_err(|e| ServerError::InvalidRoleHeader {
            name: config.role_header.clone(),
            reason: e.to_string(),
        })?;

    let app = router(acl, role_header);

    let listener = TcpListener::bind(bind).await?;
    info!(
        address = %listener.local_addr()?,
        role_header = %config.role_header,
        "ACL server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("ACL server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received shutdown signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(bind_address(&config).unwrap().port(), 8080);
    }

    #[test]
    fn test_bind_address_invalid_host() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            bind_address(&config),
            Err(ServerError::InvalidAddress { .. })
        ));
    }
}
