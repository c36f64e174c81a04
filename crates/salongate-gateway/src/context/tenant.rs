use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::HOST, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use salongate_core::error::{GateError, Result};
use salongate_core::tenant::{normalize_host, TenantConfig};

use crate::app_state::AppState;

/// Tenant resolved for one request, attached as a request extension.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant: Arc<TenantConfig>,
    /// Normalized `Host` value ("" when absent).
    pub host: String,
    /// False when the default tenant was used as a fallback.
    pub matched: bool,
}

impl TenantContext {
    pub fn slug(&self) -> &str {
        &self.tenant.slug
    }

    /// Context set by [`tenant_middleware`], or resolved on the spot for
    /// routes mounted outside it.
    pub fn from_request(req: &Request, state: &AppState) -> Self {
        match req.extensions().get::<TenantContext>() {
            Some(ctx) => ctx.clone(),
            None => resolve_tenant(state, req.headers()),
        }
    }
}

fn host_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(HOST).and_then(|v| v.to_str().ok())
}

/// Resolve tenant from the `Host` header. Never fails.
pub fn resolve_tenant(state: &AppState, headers: &HeaderMap) -> TenantContext {
    let raw = host_header(headers);
    let tenants = state.tenants();
    let (tenant, matched) = match raw.and_then(|h| tenants.match_host(h)) {
        Some(t) => (Arc::clone(t), true),
        None => (Arc::clone(tenants.default_tenant()), false),
    };

    TenantContext {
        tenant,
        host: raw.map(normalize_host).unwrap_or_default(),
        matched,
    }
}

/// Explicit slug lookup; unknown slugs are a client-visible 404.
pub fn resolve_tenant_by_slug(state: &AppState, slug: &str) -> Result<Arc<TenantConfig>> {
    state
        .tenants()
        .resolve_by_slug(slug)
        .cloned()
        .ok_or_else(|| GateError::NotFound(format!("unknown tenant: {slug}")))
}

/// Attach a [`TenantContext`] to every request and tag the response with the
/// resolved tenant.
pub async fn tenant_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let ctx = resolve_tenant(&state, request.headers());
    let forwarded_host = request.headers().get(HOST).cloned();

    state.metrics().tenant_resolutions.inc(&[
        ("tenant", ctx.slug()),
        ("matched", if ctx.matched { "true" } else { "false" }),
    ]);
    tracing::debug!(tenant = %ctx.slug(), host = %ctx.host, matched = ctx.matched, "tenant resolved");

    let slug = ctx.slug().to_string();
    request.extensions_mut().insert(ctx);

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    if let Ok(v) = HeaderValue::from_str(&slug) {
        headers.insert("x-tenant", v);
    }
    if let Some(v) = forwarded_host {
        headers.insert("x-forwarded-host", v);
    }
    response
}
