//! In-process link repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Link store backed by a sharded concurrent map.
///
/// Uniqueness is enforced through the map's entry API, which holds the shard lock
/// between the existence check and the write. Visit increments run under the
/// per-entry write guard. Guards are never held across an `.await`.
///
/// Data lives only as long as the process; used when no database is configured
/// and in tests.
#[derive(Debug, Default)]
pub struct MemoryLinkRepository {
    links: DashMap<String, Link>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        match self.links.entry(new_link.code.clone()) {
            Entry::Occupied(_) => Err(AppError::DuplicateCode {
                code: new_link.code,
            }),
            Entry::Vacant(slot) => {
                let link = new_link.into_link(Utc::now());
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn find(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.get(code).map(|entry| entry.value().clone()))
    }

    async fn increment_visit(&self, code: &str) -> Result<(), AppError> {
        let mut entry = self
            .links
            .get_mut(code)
            .ok_or_else(|| AppError::not_found(code))?;

        entry.visit_count = entry.visit_count.saturating_add(1);
        Ok(())
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.contains_key(code))
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.links.len() as i64)
    }
}
