//! Policy layer (role table, service bypass, handler gating).
//!
//! Compiles the RBAC configuration into an [`Authorizer`] consulted per
//! request by [`with_permission`]-wrapped handlers.

pub mod engine;
pub mod guard;

pub use engine::{AccessDecision, Authorizer, ServiceBypass};
pub use guard::{forbidden_response, with_permission, Guarded};
