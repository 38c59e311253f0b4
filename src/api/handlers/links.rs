//! Handler for link details endpoint.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::link::LinkResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the stored state of a short link without counting a visit.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown.
pub async fn link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.shortener.get_link(&code).await?;
    let short_url = state.shortener.short_url(&link.code);

    Ok(Json(LinkResponse::new(link, short_url)))
}
