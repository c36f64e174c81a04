//! HTTP handlers for the tenant and booking API surface.
//!
//! Handlers assume `tenant_middleware` has attached a `TenantContext`.
//! Permission checks live in `policy::with_permission`, not here.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use salongate_core::error::GateError;
use salongate_core::rbac::Permission;
use salongate_core::tenant::{is_passthrough_path, TenantConfig};

use crate::app_state::AppState;
use crate::context::tenant::{resolve_tenant_by_slug, TenantContext};

/// Client-visible error wrapper.
#[derive(Debug)]
pub struct ApiError(pub GateError);

impl From<GateError> for ApiError {
    fn from(e: GateError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let status =
            StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = json!({
            "error": code.as_str(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

/// Public view of a tenant. Domains stay internal.
#[derive(Debug, Serialize)]
pub struct TenantView {
    pub slug: String,
    pub name: String,
    pub route: String,
    pub api_base_url: String,
    pub default: bool,
}

impl From<&TenantConfig> for TenantView {
    fn from(t: &TenantConfig) -> Self {
        Self {
            slug: t.slug.clone(),
            name: t.name.clone(),
            route: t.route.clone(),
            api_base_url: t.api_base_url.clone(),
            default: t.default,
        }
    }
}

#[derive(Debug, Serialize)]
struct PermissionView {
    name: &'static str,
    resource: &'static str,
    display_name: &'static str,
}

impl From<Permission> for PermissionView {
    fn from(p: Permission) -> Self {
        Self {
            name: p.as_str(),
            resource: p.resource(),
            display_name: p.display_name(),
        }
    }
}

pub async fn current_tenant(Extension(ctx): Extension<TenantContext>) -> Json<Value> {
    Json(json!({
        "tenant": TenantView::from(ctx.tenant.as_ref()),
        "host": ctx.host,
        "matched": ctx.matched,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    #[serde(default)]
    pub path: Option<String>,
}

pub async fn tenant_route(
    Extension(ctx): Extension<TenantContext>,
    Query(q): Query<RouteQuery>,
) -> Json<Value> {
    let path = q.path.unwrap_or_else(|| "/".to_string());
    let passthrough = is_passthrough_path(&path);
    let rewritten = if passthrough {
        path.clone()
    } else {
        ctx.tenant.rewrite_path(&path)
    };

    Json(json!({
        "tenant": ctx.slug(),
        "path": path,
        "rewritten": rewritten,
        "passthrough": passthrough,
    }))
}

/// Caller's verified role and what it grants.
pub async fn me(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    headers: HeaderMap,
) -> Json<Value> {
    let authz = state.authorizer();
    let identity = authz.identify(&headers, &ctx.tenant);
    let permissions: Vec<PermissionView> = authz
        .table()
        .permissions_of(identity.role)
        .into_iter()
        .map(PermissionView::from)
        .collect();

    Json(json!({
        "tenant": ctx.slug(),
        "role": identity.role,
        "subject": identity.subject,
        "permissions": permissions,
    }))
}

pub async fn tenant_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<TenantView>, ApiError> {
    let tenant = resolve_tenant_by_slug(&state, &slug)?;
    Ok(Json(TenantView::from(tenant.as_ref())))
}

pub async fn list_bookings(Extension(ctx): Extension<TenantContext>) -> Json<Value> {
    // Bookings are served by the tenant backend; the gateway only scopes them.
    Json(json!({
        "tenant": ctx.slug(),
        "source": ctx.tenant.api_base_url,
        "bookings": [],
    }))
}

pub async fn create_booking(
    Extension(ctx): Extension<TenantContext>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if !body.is_object() {
        return Err(GateError::BadRequest("booking must be a json object".into()).into());
    }
    tracing::info!(tenant = %ctx.slug(), "booking accepted");
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "tenant": ctx.slug(),
            "status": "accepted",
            "booking": body,
        })),
    ))
}

pub async fn refund_payment(
    Extension(ctx): Extension<TenantContext>,
    Path(payment_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    tracing::info!(tenant = %ctx.slug(), %payment_id, "refund requested");
    (
        StatusCode::ACCEPTED,
        Json(json!({
            "tenant": ctx.slug(),
            "payment_id": payment_id,
            "status": "refund_requested",
        })),
    )
}
