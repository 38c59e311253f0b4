//! Link repository implementations.
//!
//! - [`MemoryLinkRepository`] - In-process store, used when no database is configured
//! - [`PgLinkRepository`] - PostgreSQL store built on SQLx

pub mod memory_link_repository;
pub mod pg_link_repository;

pub use memory_link_repository::MemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
