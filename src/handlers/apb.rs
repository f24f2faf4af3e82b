//! American Public Bible endpoints
//!
//! - `GET /apb/verse-quotations?ref=...` - every dated quotation of a verse
//! - `GET /apb/verse-trend?ref=...&corpus=...` - yearly rate series of a verse
//!
//! # Error Handling
//!
//! - `400 Bad Request` - `ref` missing or repeated, `corpus` unknown or repeated
//! - `404 Not Found` - no quotations of the verse exist
//! - `500 Internal Server Error` - store failure

use axum::{extract::State, Json};
use tracing::{debug, instrument};

use crate::error::{ApiError, ApiResult};
use crate::models::{VerseQuotation, VerseTrendResponse};
use crate::params::QueryParams;
use crate::server::AppState;
use crate::trend::{corpus_series, Corpus};

/// Quotations of one verse in Chronicling America, ordered by date
///
/// Exactly one `ref` is accepted; a repeated `ref` is rejected instead of
/// silently using the first.
#[instrument(skip(state, params))]
pub async fn verse_quotations_handler(
    State(state): State<AppState>,
    params: QueryParams,
) -> ApiResult<Json<Vec<VerseQuotation>>> {
    let reference = params.exactly_one("ref")?;
    debug!(reference, "looking up verse quotations");

    let quotations = state.store().verse_quotations(reference).await?;
    if quotations.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(quotations))
}

/// Gap-filled yearly quotation rates of one verse
///
/// The series always spans the corpus window, so a verse with no data yields
/// a `200` of all-zero entries.
#[instrument(skip(state, params))]
pub async fn verse_trend_handler(
    State(state): State<AppState>,
    params: QueryParams,
) -> ApiResult<Json<VerseTrendResponse>> {
    let reference = params.exactly_one("ref")?;
    let corpus = match params.at_most_one("corpus")? {
        Some(raw) => raw.parse::<Corpus>()?,
        None => Corpus::default(),
    };
    debug!(reference, %corpus, "building verse trend");

    let rows = state.store().verse_rates(corpus, reference).await?;

    Ok(Json(VerseTrendResponse {
        reference: reference.to_string(),
        corpus: corpus.to_string(),
        trend: corpus_series(corpus, &rows),
    }))
}
