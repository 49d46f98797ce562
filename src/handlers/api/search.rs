use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::search::{SearchQuery, SearchStore};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub language: Option<String>,
}

/// GET /api/search - free-text search across pages and wiki articles.
/// Always answers `{"data": [...]}`; no matches is an empty array, never null.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiError> {
    let q = params.q.unwrap_or_default();
    if q.is_empty() {
        // Nothing to match; the store is never touched.
        return Ok(Json(json!({ "data": [] })));
    }

    let language = params
        .language
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| state.config.search.default_language.clone());

    let results = state.search.search(&SearchQuery::new(q, language)).await?;
    Ok(Json(json!({ "data": results })))
}
