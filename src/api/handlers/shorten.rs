//! Handler for link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "example.com/page",
///   "expires_at": "2030-01-01T00:00:00Z"  // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "code": "k7Qm2x",
///   "destination": "https://example.com/page",
///   "short_url": "https://s.example.com/k7Qm2x",
///   "created_at": "2026-01-01T12:00:00Z",
///   "expires_at": null
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request: malformed body, invalid or self-referential URL, expiry in the past
/// - 503 Service Unavailable: no free code could be allocated
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .shortener
        .shorten_with_expiry(&payload.url, payload.expires_at)
        .await?;

    let short_url = state.shortener.short_url(&link.code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse::new(link, short_url)),
    ))
}
