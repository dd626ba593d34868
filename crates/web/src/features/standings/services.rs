use sqlx::SqlitePool;
use storage::{
    error::Result,
    models::{DriverStanding, TeamStanding},
    repository::{DriverRepository, TeamRepository},
};

/// Cumulative driver standings for one season, ranked.
pub async fn driver_standings(pool: &SqlitePool, season: i64) -> Result<Vec<DriverStanding>> {
    DriverRepository::new(pool).season_standings(season).await
}

/// Cumulative constructor standings for one season, ranked.
pub async fn team_standings(pool: &SqlitePool, season: i64) -> Result<Vec<TeamStanding>> {
    TeamRepository::new(pool).season_standings(season).await
}

pub async fn seasons(pool: &SqlitePool) -> Result<Vec<i64>> {
    DriverRepository::new(pool).seasons().await
}
