//! Bills of Mortality endpoints

use axum::{extract::State, Json};
use tracing::{debug, instrument};

use crate::error::{ApiError, ApiResult};
use crate::models::{Christenings, ChristeningsByYear, Parish};
use crate::params::QueryParams;
use crate::server::AppState;

/// Page size when `limit` is not given
pub const DEFAULT_LIMIT: i64 = 25;

/// First row when `offset` is not given
pub const DEFAULT_OFFSET: i64 = 0;

/// Christenings for `start-year <= year < end-year`, ordered by count
///
/// `limit` and `offset` page through the ordering.
#[instrument(skip(state, params))]
pub async fn christenings_handler(
    State(state): State<AppState>,
    params: QueryParams,
) -> ApiResult<Json<Vec<ChristeningsByYear>>> {
    let start_year = params.required_int("start-year")?;
    let end_year = params.required_int("end-year")?;
    let limit = params.non_negative_or("limit", DEFAULT_LIMIT)?;
    let offset = params.non_negative_or("offset", DEFAULT_OFFSET)?;
    debug!(start_year, end_year, limit, offset, "querying christenings");

    let rows = state
        .store()
        .christenings(start_year, end_year, limit, offset)
        .await?;

    Ok(Json(rows))
}

/// Distinct christening descriptions
#[instrument(skip(state))]
pub async fn list_christenings_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Christenings>>> {
    let labels = state.store().christening_labels().await?;
    Ok(Json(labels))
}

/// Every parish, ordered by canonical name
#[instrument(skip(state))]
pub async fn parishes_handler(State(state): State<AppState>) -> Result<Json<Vec<Parish>>, ApiError> {
    Ok(Json(state.store().parishes().await?))
}
