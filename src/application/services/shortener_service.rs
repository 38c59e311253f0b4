//! Link creation service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, is_reserved};
use crate::utils::url_normalizer::{host_of, normalize_url};

/// Settings consumed by [`ShortenerService`].
#[derive(Debug, Clone)]
pub struct ShortenerSettings {
    /// Public base URL of the deployment; short URLs are `base_url + code`.
    pub base_url: Url,
    /// Schemes accepted for destinations, lower-case.
    pub allowed_schemes: Vec<String>,
    /// Reject destinations on the service's own host.
    pub reject_self_links: bool,
    /// Code candidates tried before giving up with [`AppError::GenerationExhausted`].
    pub max_attempts: usize,
}

impl ShortenerSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            allowed_schemes: vec!["http".to_string(), "https".to_string()],
            reject_self_links: true,
            max_attempts: 10,
        }
    }

    /// Lower-cased host of the base URL.
    pub fn service_host(&self) -> Option<String> {
        self.base_url.host_str().map(|h| h.to_ascii_lowercase())
    }
}

/// Creates short links.
///
/// Normalizes destinations, rejects links back to the service itself, and draws
/// codes from a [`CodeGenerator`] until the store accepts one.
pub struct ShortenerService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    generator: Arc<dyn CodeGenerator>,
    settings: ShortenerSettings,
}

impl<L: LinkRepository + ?Sized> ShortenerService<L> {
    /// Creates a new shortener service.
    pub fn new(
        link_repository: Arc<L>,
        generator: Arc<dyn CodeGenerator>,
        settings: ShortenerSettings,
    ) -> Self {
        Self {
            link_repository,
            generator,
            settings,
        }
    }

    pub fn settings(&self) -> &ShortenerSettings {
        &self.settings
    }

    /// Creates a short link that never expires.
    ///
    /// # Errors
    ///
    /// See [`Self::shorten_with_expiry`].
    pub async fn shorten(&self, raw_url: &str) -> Result<Link, AppError> {
        self.shorten_with_expiry(raw_url, None).await
    }

    /// Creates a short link, optionally expiring at `expires_at`.
    ///
    /// Every call mints a fresh code, even for a destination shortened before.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] if the URL cannot be normalized or uses a
    /// scheme outside the allow-list.
    /// Returns [`AppError::SelfReferential`] if the URL points at this service.
    /// Returns [`AppError::Validation`] if `expires_at` is not in the future.
    /// Returns [`AppError::GenerationExhausted`] if no free code was found.
    /// Returns [`AppError::Storage`] on store failures.
    pub async fn shorten_with_expiry(
        &self,
        raw_url: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        let destination = self.normalize_destination(raw_url)?;

        if let Some(expires_at) = expires_at
            && expires_at <= Utc::now()
        {
            return Err(AppError::bad_request(
                "Expiry time must be in the future",
                json!({ "expires_at": expires_at }),
            ));
        }

        self.create_with_unique_code(destination, expires_at).await
    }

    /// Normalizes a raw URL and applies the self-link policy.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] or [`AppError::SelfReferential`].
    pub fn normalize_destination(&self, raw_url: &str) -> Result<String, AppError> {
        let destination = normalize_url(raw_url, &self.settings.allowed_schemes)
            .map_err(|e| AppError::invalid_url(raw_url.trim(), e.to_string()))?;

        if self.settings.reject_self_links
            && let Some(service_host) = self.settings.service_host()
            && host_of(&destination).as_deref() == Some(service_host.as_str())
        {
            return Err(AppError::SelfReferential { url: destination });
        }

        Ok(destination)
    }

    /// Retrieves a link without counting a visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownCode`] if no link matches the code.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find(code)
            .await?
            .ok_or_else(|| AppError::unknown_code(code))
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!(
            "{}/{}",
            self.settings.base_url.as_str().trim_end_matches('/'),
            code
        )
    }

    /// Inserts the link under the first candidate code the store accepts.
    ///
    /// Reserved codes, codes found by the existence check and codes rejected by the
    /// store as duplicates all consume an attempt.
    async fn create_with_unique_code(
        &self,
        destination: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        let max_attempts = self.settings.max_attempts;
        let mut attempts = 0;

        while attempts < max_attempts {
            attempts += 1;

            let Some(code) = self.generator.next_code() else {
                warn!(attempts, "Code generator exhausted its code space");
                break;
            };

            if is_reserved(&code) {
                debug!(%code, attempts, "Skipping reserved code");
                continue;
            }

            if self.generator.needs_collision_check() && self.link_repository.exists(&code).await?
            {
                debug!(%code, attempts, "Code already taken");
                continue;
            }

            let new_link = NewLink {
                code,
                destination: destination.clone(),
                expires_at,
            };

            match self.link_repository.insert(new_link).await {
                Ok(link) => {
                    info!(code = %link.code, destination = %link.destination, "Link created");
                    return Ok(link);
                }
                Err(AppError::DuplicateCode { code }) => {
                    debug!(%code, attempts, "Lost insert race for code");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(attempts, "Failed to allocate a unique code");
        Err(AppError::GenerationExhausted { attempts })
    }
}
