//! HTTP middleware for request processing.
//!
//! Provides request tracing and request id propagation.

pub mod tracing;
