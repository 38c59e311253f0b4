//! DTOs for link details endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Link;

/// Stored state of a short link, including its visit count.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub code: String,
    pub destination: String,
    pub short_url: String,
    pub visit_count: u64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub expired: bool,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        let expired = link.is_expired();
        Self {
            code: link.code,
            destination: link.destination,
            short_url,
            visit_count: link.visit_count,
            created_at: link.created_at,
            expires_at: link.expires_at,
            expired,
        }
    }
}
