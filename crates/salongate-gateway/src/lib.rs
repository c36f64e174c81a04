//! salongate gateway library entry.
//!
//! This crate wires config, tenant resolution, identity, and the permission
//! gate into an axum HTTP stack. It is intended to be consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod auth;
pub mod config;
pub mod context;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod router;
pub mod transport;
