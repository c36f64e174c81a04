//! Shared fixtures for gateway integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use jsonwebtoken::get_current_timestamp;
use serde_json::Value;
use tower::ServiceExt;

use salongate_gateway::app_state::AppState;
use salongate_gateway::auth::{issue_session_token, SessionClaims};
use salongate_gateway::config::{self, Secrets};
use salongate_gateway::router::build_router;

pub const JWT_SECRET: &str = "test-jwt-secret";
pub const SERVICE_SECRET: &str = "test-internal-key";
pub const INSTYLE_HOST: &str = "WWW.InstyleHairBoutique.co.za:443";

pub const CONFIG: &str = r#"
version: 1
gateway:
  listen: "127.0.0.1:0"
auth:
  issuer: salongate
service_bypass:
  permissions: ["bookings:read_all", "bookings:create"]
tenants:
  - slug: platform
    name: AppointmentBooking.co.za
    domains: ["appointmentbooking.co.za", "www.appointmentbooking.co.za"]
    route: ""
    api_base_url: "https://api.appointmentbooking.co.za"
    default: true
  - slug: instylehairboutique
    name: InStyle Hair Boutique
    domains:
      - instylehairboutique.co.za
      - www.instylehairboutique.co.za
      - instyle-hair-boutique.co.za
    route: /instylehairboutique
    api_base_url: "https://api.appointmentbooking.co.za/tenants/instylehairboutique"
"#;

pub fn secrets() -> Secrets {
    Secrets {
        jwt_secret: Some(JWT_SECRET.into()),
        service_secret: Some(SERVICE_SECRET.into()),
    }
}

pub fn state_with(secrets: Secrets) -> AppState {
    let cfg = config::load_from_str(CONFIG).expect("fixture config must parse");
    AppState::with_secrets(cfg, secrets).expect("fixture state must build")
}

pub fn router() -> (Router, AppState) {
    let state = state_with(secrets());
    (build_router(state.clone()), state)
}

pub fn claims(role: &str, tenant: Option<&str>) -> SessionClaims {
    let now = get_current_timestamp();
    SessionClaims {
        sub: "user-42".into(),
        role: role.into(),
        tenant: tenant.map(str::to_string),
        iss: Some("salongate".into()),
        iat: Some(now),
        exp: now + 600,
    }
}

pub fn token(role: &str, tenant: Option<&str>) -> String {
    issue_session_token(JWT_SECRET, &claims(role, tenant)).unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub async fn send(app: &Router, req: Request<Body>) -> (Response<Body>, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let (parts, body) = res.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (Response::from_parts(parts, Body::empty()), json)
}

pub fn get(uri: &str, host: &str) -> axum::http::request::Builder {
    Request::builder().method("GET").uri(uri).header("host", host)
}

pub fn post(uri: &str, host: &str) -> axum::http::request::Builder {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("host", host)
        .header("content-type", "application/json")
}
