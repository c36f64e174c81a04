//! `with_permission`: wraps an axum handler behind a permission gate.
//!
//! Allowed calls run the inner handler and return its response untouched.
//! Denied calls answer 403 with a [`Forbidden`] body and never reach it.

use std::future::Future;
use std::pin::Pin;

use axum::{
    extract::Request,
    handler::Handler,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use salongate_core::rbac::{Forbidden, Permission};

use crate::app_state::AppState;
use crate::context::tenant::TenantContext;

/// Handler gated on a single permission.
#[derive(Clone)]
pub struct Guarded<H> {
    permission: Permission,
    inner: H,
}

pub fn with_permission<H>(permission: Permission, handler: H) -> Guarded<H> {
    Guarded {
        permission,
        inner: handler,
    }
}

impl<H, T> Handler<T, AppState> for Guarded<H>
where
    H: Handler<T, AppState>,
{
    type Future = Pin<Box<dyn Future<Output = Response> + Send>>;

    fn call(self, req: Request, state: AppState) -> Self::Future {
        Box::pin(async move {
            let tenant = TenantContext::from_request(&req, &state);
            let decision = state
                .authorizer()
                .decide(req.headers(), &tenant.tenant, self.permission);

            if decision.is_allowed() {
                self.inner.call(req, state).await
            } else {
                forbidden_response(self.permission)
            }
        })
    }
}

pub fn forbidden_response(permission: Permission) -> Response {
    (StatusCode::FORBIDDEN, Json(Forbidden::missing(permission))).into_response()
}
