//! Request handlers. Each one parses its filters and delegates to the
//! aggregators over the shared dataset.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;

use crate::analyzers::aggregate::{summarize, top_bairros};
use crate::analyzers::series::visits_by_year;
use crate::analyzers::table::build_table;
use crate::analyzers::types::{DeltaRow, RankedBairro, Summary};
use crate::analyzers::utility::parse_bairros;
use crate::api::AppState;
use crate::api::error::ApiError;

/// Raw query string filters; validated by the handlers.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub year: Option<String>,
    /// Comma-separated neighborhood names.
    pub bairros: Option<String>,
}

impl FilterQuery {
    /// An absent or empty `year` means no filter.
    fn year(&self) -> Result<Option<i32>, ApiError> {
        match self.year.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| ApiError::InvalidQuery {
                param: "year",
                value: raw.to_string(),
            }),
        }
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

pub async fn years(State(state): State<AppState>) -> Json<Vec<i32>> {
    Json(state.dataset.years().to_vec())
}

pub async fn neighborhoods(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.dataset.bairros().to_vec())
}

pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Summary>, ApiError> {
    Ok(Json(summarize(&state.dataset, query.year()?)))
}

pub async fn visits_per_year(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<BTreeMap<i32, u64>> {
    let bairros = parse_bairros(query.bairros.as_deref());
    Json(visits_by_year(&state.dataset, bairros.as_ref()))
}

pub async fn top_neighborhoods(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Vec<RankedBairro>>, ApiError> {
    Ok(Json(top_bairros(&state.dataset, query.year()?)))
}

pub async fn table(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Vec<DeltaRow>>, ApiError> {
    let year = query.year()?;
    let bairros = parse_bairros(query.bairros.as_deref());
    Ok(Json(build_table(&state.dataset, year, bairros.as_ref())))
}
