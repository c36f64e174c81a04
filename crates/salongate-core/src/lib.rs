//! salongate core: transport-agnostic tenant and access-control primitives.
//!
//! This crate defines the tenant table, the role/permission catalogue, and the
//! error surface shared by the gateway and any other consumer. It carries no
//! transport or runtime dependencies so the decision logic can be reused and
//! tested in isolation.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! Resolution and permission checks are total: a miss yields the default
//! tenant or `false`, never an error.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod rbac;
pub mod tenant;

/// Shared result type.
pub use error::{GateError, Result};
