//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A short code mapped to its destination URL.
///
/// `code`, `destination`, `created_at` and `expires_at` never change after creation.
/// `visit_count` only grows, and only through
/// [`crate::domain::repositories::LinkRepository::increment_visit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub code: String,
    pub destination: String,
    pub visit_count: u64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        code: String,
        destination: String,
        visit_count: u64,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            code,
            destination,
            visit_count,
            created_at,
            expires_at,
        }
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }

    /// Seconds left before expiry, `None` for links that never expire.
    pub fn remaining_ttl(&self) -> Option<u64> {
        self.expires_at
            .map(|e| (e - Utc::now()).num_seconds().max(0) as u64)
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub destination: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewLink {
    /// Materializes the stored record with a zero visit count.
    pub fn into_link(self, created_at: DateTime<Utc>) -> Link {
        Link::new(self.code, self.destination, 0, created_at, self.expires_at)
    }
}
