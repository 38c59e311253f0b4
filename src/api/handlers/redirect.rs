//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its destination.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Resolution, caching and visit counting happen in
/// [`Resolver::resolve`](crate::application::services::Resolver::resolve).
///
/// # Errors
///
/// - 404 Not Found: the code is unknown
/// - 410 Gone: the link has expired
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let destination = state.resolver.resolve(&code).await?;

    Ok(Redirect::temporary(&destination))
}
