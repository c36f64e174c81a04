//! Transport layer (HTTP).
//!
//! Request handlers and the client-facing error mapping.

pub mod http;
