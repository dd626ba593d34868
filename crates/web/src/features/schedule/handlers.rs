use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::Database;
use storage::error::StorageError;

use crate::error::WebError;

use super::services;

pub async fn get_season_schedule(
    State(db): State<Database>,
    Path(season): Path<i64>,
) -> Result<Response, WebError> {
    let entries = services::season_schedule(db.pool(), season).await?;
    if entries.is_empty() {
        return Err(WebError::Storage(StorageError::NotFound));
    }
    Ok(Json(entries).into_response())
}
