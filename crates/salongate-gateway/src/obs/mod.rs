//! Lightweight in-process metrics.
//!
//! Counters are stored as atomics and rendered in Prometheus text format by
//! the `/metrics` handler.

pub mod metrics;
