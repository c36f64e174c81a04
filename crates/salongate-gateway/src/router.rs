//! Axum router wiring.
//!
//! Every route sits behind the tenant middleware; permission-gated routes
//! wrap their handler with `with_permission`.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use salongate_core::rbac::Permission;

use crate::context::tenant::tenant_middleware;
use crate::policy::with_permission;
use crate::transport::http;
use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .route("/v1/tenant", get(http::current_tenant))
        .route("/v1/tenant/route", get(http::tenant_route))
        .route("/v1/me", get(http::me))
        .route(
            "/v1/tenants/:slug",
            get(with_permission(Permission::SystemConfig, http::tenant_by_slug)),
        )
        .route(
            "/v1/bookings",
            get(with_permission(Permission::BookingsReadAll, http::list_bookings))
                .post(with_permission(Permission::BookingsCreate, http::create_booking)),
        )
        .route(
            "/v1/payments/:id/refund",
            post(with_permission(Permission::PaymentsRefund, http::refund_payment)),
        )
        .layer(middleware::from_fn_with_state(state.clone(), tenant_middleware))
        .with_state(state)
}
