//! Top-level facade crate for salongate.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use salongate_core::*;
}

pub mod gateway {
    pub use salongate_gateway::*;
}
