use axum::{Router, routing::get};
use storage::Database;

use super::handlers::get_round_results;

pub fn routes() -> Router<Database> {
    Router::new().route("/:season/:round", get(get_round_results))
}
