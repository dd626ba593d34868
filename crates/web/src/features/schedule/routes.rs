use axum::{Router, routing::get};
use storage::Database;

use super::handlers::get_season_schedule;

pub fn routes() -> Router<Database> {
    Router::new().route("/:season", get(get_season_schedule))
}
