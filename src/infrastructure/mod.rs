//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Destination caching (Redis and no-op implementations)
//! - [`persistence`] - Link store implementations (in-memory and PostgreSQL)

pub mod cache;
pub mod persistence;
