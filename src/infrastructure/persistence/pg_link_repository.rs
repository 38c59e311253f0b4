//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_code;

/// Row shape shared by every query returning a link.
#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    code: String,
    destination: String,
    visit_count: i64,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link::new(
            row.code,
            row.destination,
            u64::try_from(row.visit_count).unwrap_or(0),
            row.created_at,
            row.expires_at,
        )
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Uniqueness relies on the primary key of `links.code`; visit counting is a single
/// `UPDATE ... SET visit_count = visit_count + 1`, so no application-side
/// read-modify-write takes place.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (code, destination, expires_at)
            VALUES ($1, $2, $3)
            RETURNING code, destination, visit_count, created_at, expires_at
            "#,
        )
        .bind(&new_link.code)
        .bind(&new_link.destination)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on_code(&e) {
                AppError::DuplicateCode {
                    code: new_link.code.clone(),
                }
            } else {
                e.into()
            }
        })?;

        Ok(row.into())
    }

    async fn find(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT code, destination, visit_count, created_at, expires_at
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn increment_visit(&self, code: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE links SET visit_count = visit_count + 1 WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(code));
        }

        Ok(())
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM links WHERE code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
