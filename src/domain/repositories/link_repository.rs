//! Repository trait for short link storage.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for short links.
///
/// The repository is the only owner of link records. Callers receive clones and can
/// only mutate a record through [`LinkRepository::increment_visit`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - In-process store
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Stores a new link.
    ///
    /// Linearizable with respect to uniqueness: of two concurrent inserts with the
    /// same code, at most one succeeds. The record is stored whole or not at all.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if the code is taken.
    /// Returns [`AppError::Storage`] on backend failures.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on backend failures.
    async fn find(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Atomically adds one to the visit count of `code`.
    ///
    /// Concurrent increments on the same code are all applied.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Storage`] on backend failures.
    async fn increment_visit(&self, code: &str) -> Result<(), AppError>;

    /// Returns true if a link with this code exists.
    async fn exists(&self, code: &str) -> Result<bool, AppError>;

    /// Counts stored links.
    async fn count(&self) -> Result<i64, AppError>;
}
