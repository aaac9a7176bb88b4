//! Search endpoint backed by the in-memory ranker.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use parisa_core::search::{normalize_query, rank};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::products::PublicProduct;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Longest query accepted, in characters.
pub const MAX_QUERY_CHARS: usize = 200;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchHit<'a> {
    pub product: PublicProduct<'a>,
    pub score: u32,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse<'a> {
    pub query: String,
    pub admissible: bool,
    pub count: usize,
    pub results: Vec<SearchHit<'a>>,
}

/// `GET /api/search?q=`
#[instrument(skip(state, params), fields(q = %params.q))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Response> {
    if params.q.chars().count() > MAX_QUERY_CHARS {
        return Err(AppError::BadRequest(format!(
            "query longer than {MAX_QUERY_CHARS} characters"
        )));
    }

    let query = normalize_query(&params.q);
    let catalog = state.catalog();

    if query.is_empty() {
        return Ok(Json(empty(query, true)).into_response());
    }
    if !state.query_validator().is_admissible(&query, catalog) {
        tracing::debug!(query = %query, "Inadmissible search query");
        return Ok(Json(empty(query, false)).into_response());
    }

    let results: Vec<SearchHit<'_>> = rank(&query, catalog)
        .into_iter()
        .map(|ranked| SearchHit {
            product: PublicProduct::from(ranked.product),
            score: ranked.score,
        })
        .collect();

    let response = SearchResponse {
        query,
        admissible: true,
        count: results.len(),
        results,
    };
    Ok(Json(response).into_response())
}

const fn empty(query: String, admissible: bool) -> SearchResponse<'static> {
    SearchResponse {
        query,
        admissible,
        count: 0,
        results: Vec::new(),
    }
}
