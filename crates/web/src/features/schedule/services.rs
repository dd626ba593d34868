use sqlx::SqlitePool;
use storage::{error::Result, models::ScheduleEntry, repository::ScheduleRepository};

/// All scheduled rounds for one season in round order, future rounds
/// included.
pub async fn season_schedule(pool: &SqlitePool, season: i64) -> Result<Vec<ScheduleEntry>> {
    ScheduleRepository::new(pool).list_season(season).await
}
