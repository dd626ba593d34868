use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use storage::{Database, EventKind};

use crate::error::WebError;

use super::services;

#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    pub kind: Option<EventKind>,
}

pub async fn get_round_results(
    State(db): State<Database>,
    Path((season, round)): Path<(i64, i64)>,
    Query(query): Query<ResultsQuery>,
) -> Result<Response, WebError> {
    let rows = services::round_results(db.pool(), season, round, query.kind).await?;
    Ok(Json(rows).into_response())
}
