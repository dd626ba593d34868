use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::Database;

use crate::error::WebError;

use super::services;

pub async fn get_driver_standings(
    State(db): State<Database>,
    Path(season): Path<i64>,
) -> Result<Response, WebError> {
    let standings = services::driver_standings(db.pool(), season).await?;
    Ok(Json(standings).into_response())
}

pub async fn get_team_standings(
    State(db): State<Database>,
    Path(season): Path<i64>,
) -> Result<Response, WebError> {
    let standings = services::team_standings(db.pool(), season).await?;
    Ok(Json(standings).into_response())
}

pub async fn get_seasons(State(db): State<Database>) -> Result<Response, WebError> {
    let seasons = services::seasons(db.pool()).await?;
    Ok(Json(seasons).into_response())
}
