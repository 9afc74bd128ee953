//! HTTP evaluation surface
//!
//! Stateless: each request carries the snapshot it is judged against and
//! nothing is cached between requests. Decisions are advisory, for UI
//! hints; they do not replace enforcement by the system of record.
//!
//! Endpoints:
//!   GET  /health
//!   POST /v1/has-capability
//!   POST /v1/check-permission
//!   POST /v1/belongs-to-organization
//!   POST /v1/belongs-to-team
//!   POST /v1/is-global-admin

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::caps::Capability;
use crate::config::Config;
use crate::error::Result;
use crate::resolver::PermissionResolver;
use crate::snapshot::PrincipalPermissionSnapshot;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct HasCapabilityRequest {
    #[serde(default)]
    snapshot: Option<Value>,
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    organization_id: Option<String>,
    #[serde(default)]
    team_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CheckPermissionRequest {
    #[serde(default)]
    snapshot: Option<Value>,
    organization_name: String,
    #[serde(default)]
    team_name: Option<String>,
    #[serde(default)]
    required: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BelongsToOrganizationRequest {
    #[serde(default)]
    snapshot: Option<Value>,
    organization_name: String,
}

#[derive(Debug, Deserialize)]
struct BelongsToTeamRequest {
    #[serde(default)]
    snapshot: Option<Value>,
    organization_name: String,
    team_name: String,
}

#[derive(Debug, Deserialize)]
struct GlobalAdminRequest {
    #[serde(default)]
    snapshot: Option<Value>,
}

#[derive(Debug, Serialize)]
struct Decision {
    allowed: bool,
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
}

// ============================================================================
// Handlers
// ============================================================================

/// A snapshot that fails to load is treated as no snapshot at all
fn load_snapshot(raw: Option<Value>) -> Option<PrincipalPermissionSnapshot> {
    match raw {
        None | Some(Value::Null) => None,
        Some(value) => match PrincipalPermissionSnapshot::from_value(value) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(error = %e, "snapshot rejected; denying");
                None
            }
        },
    }
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn has_capability(Json(req): Json<HasCapabilityRequest>) -> Json<Decision> {
    let snapshot = load_snapshot(req.snapshot);
    let required = Capability::parse_lossy(&req.required);
    let allowed = PermissionResolver::from(snapshot.as_ref()).has_capability(
        &required,
        req.organization_id.as_deref(),
        req.team_id.as_deref(),
    );
    Json(Decision { allowed })
}

async fn check_permission(Json(req): Json<CheckPermissionRequest>) -> Json<Decision> {
    let snapshot = load_snapshot(req.snapshot);
    let required = Capability::parse_lossy(&req.required);
    let allowed = PermissionResolver::from(snapshot.as_ref()).check_permission(
        &req.organization_name,
        req.team_name.as_deref(),
        &required,
    );
    Json(Decision { allowed })
}

async fn belongs_to_organization(Json(req): Json<BelongsToOrganizationRequest>) -> Json<Decision> {
    let snapshot = load_snapshot(req.snapshot);
    let allowed = PermissionResolver::from(snapshot.as_ref()).belongs_to_organization(&req.organization_name);
    Json(Decision { allowed })
}

async fn belongs_to_team(Json(req): Json<BelongsToTeamRequest>) -> Json<Decision> {
    let snapshot = load_snapshot(req.snapshot);
    let allowed = PermissionResolver::from(snapshot.as_ref())
        .belongs_to_team(&req.organization_name, &req.team_name);
    Json(Decision { allowed })
}

async fn is_global_admin(Json(req): Json<GlobalAdminRequest>) -> Json<Decision> {
    let snapshot = load_snapshot(req.snapshot);
    let allowed = PermissionResolver::from(snapshot.as_ref()).is_global_admin();
    Json(Decision { allowed })
}

// ============================================================================
// Router
// ============================================================================

pub fn router(config: &Config) -> Router {
    let app = Router::new()
        .route("/health", get(health))
        .route("/v1/has-capability", post(has_capability))
        .route("/v1/check-permission", post(check_permission))
        .route("/v1/belongs-to-organization", post(belongs_to_organization))
        .route("/v1/belongs-to-team", post(belongs_to_team))
        .route("/v1/is-global-admin", post(is_global_admin))
        .layer(TraceLayer::new_for_http());

    if config.cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Bind and serve until the process is stopped
pub async fn serve(config: Config) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "capscope server listening");
    axum::serve(listener, router(&config)).await?;
    Ok(())
}
