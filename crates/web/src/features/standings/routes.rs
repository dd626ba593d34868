use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{get_driver_standings, get_seasons, get_team_standings};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/standings/:season", get(get_driver_standings))
        .route("/standings/:season/teams", get(get_team_standings))
        .route("/seasons", get(get_seasons))
}
