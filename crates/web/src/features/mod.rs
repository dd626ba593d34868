use axum::Router;
use storage::Database;

pub mod results;
pub mod schedule;
pub mod standings;

pub fn api_router() -> Router<Database> {
    Router::new()
        .nest("/api", standings::routes::routes())
        .nest("/api/schedule", schedule::routes::routes())
        .nest("/api/results", results::routes::routes())
}
