//! Request context types shared across layers.
//!
//! `TenantContext` lets policy and handlers be tenant-aware without touching
//! the `Host` header themselves.

pub mod tenant;
