use sqlx::SqlitePool;
use storage::{
    EventKind,
    error::Result,
    models::DriverRoundResult,
    repository::{DriverRepository, ScheduleRepository},
};

/// Stored rows for one round. Without a kind filter the full rows are
/// returned; `kind=sprint` narrows to drivers with a sprint
/// classification, `kind=race` to drivers classified in the main race.
///
/// The round must exist in the schedule, otherwise NotFound.
pub async fn round_results(
    pool: &SqlitePool,
    season: i64,
    round: i64,
    kind: Option<EventKind>,
) -> Result<Vec<DriverRoundResult>> {
    ScheduleRepository::new(pool).entry(season, round).await?;

    let rows = DriverRepository::new(pool).round_results(season, round).await?;
    let rows = match kind {
        None => rows,
        Some(EventKind::Sprint) => rows
            .into_iter()
            .filter(|r| r.sprint_position.is_some())
            .collect(),
        Some(EventKind::Race) => rows.into_iter().filter(|r| r.position.is_some()).collect(),
    };
    Ok(rows)
}
