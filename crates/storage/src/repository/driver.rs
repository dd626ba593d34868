use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{DriverEvent, DriverRoundResult, DriverStanding};
use crate::scoring::EventKind;

pub struct DriverRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DriverRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Idempotent, kind-scoped upsert of one driver's event record.
    ///
    /// A race upsert overwrites only the main-race columns and the shared
    /// attributes (team, number, color, nationality); a sprint upsert
    /// overwrites only the sprint columns and the shared attributes. So a
    /// later main-race ingestion never clobbers an already recorded sprint
    /// result for the same round, and vice versa.
    pub async fn upsert_event(
        &self,
        exec: impl sqlx::SqliteExecutor<'_>,
        season: i64,
        round: i64,
        kind: EventKind,
        event: &DriverEvent,
    ) -> Result<()> {
        let sql = match kind {
            EventKind::Race => {
                r#"
                INSERT INTO driver_standings
                    (season, round, driver_name, team,
                     points, sprint_points, total_points,
                     position, sprint_position,
                     qualifying_position, positions_gained, grid_position,
                     pit_stops, fastest_lap, laps, status,
                     driver_number, color, nationality)
                VALUES (?, ?, ?, ?, ?, 0, 0, ?, NULL, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(season, round, driver_name) DO UPDATE SET
                    team = excluded.team,
                    points = excluded.points,
                    position = excluded.position,
                    qualifying_position = excluded.qualifying_position,
                    positions_gained = excluded.positions_gained,
                    grid_position = excluded.grid_position,
                    pit_stops = excluded.pit_stops,
                    fastest_lap = excluded.fastest_lap,
                    laps = excluded.laps,
                    status = excluded.status,
                    driver_number = excluded.driver_number,
                    color = excluded.color,
                    nationality = excluded.nationality
                "#
            }
            EventKind::Sprint => {
                r#"
                INSERT INTO driver_standings
                    (season, round, driver_name, team,
                     points, sprint_points, total_points,
                     position, sprint_position,
                     qualifying_position, positions_gained, grid_position,
                     pit_stops, fastest_lap, laps, status,
                     driver_number, color, nationality)
                VALUES (?, ?, ?, ?, 0, ?, 0, NULL, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(season, round, driver_name) DO UPDATE SET
                    team = excluded.team,
                    sprint_points = excluded.sprint_points,
                    sprint_position = excluded.sprint_position,
                    driver_number = excluded.driver_number,
                    color = excluded.color,
                    nationality = excluded.nationality
                "#
            }
        };

        sqlx::query(sql)
            .bind(season)
            .bind(round)
            .bind(&event.driver_name)
            .bind(&event.team)
            .bind(event.points)
            .bind(event.position)
            .bind(event.qualifying_position)
            .bind(event.positions_gained)
            .bind(event.grid_position)
            .bind(event.pit_stops)
            .bind(event.fastest_lap)
            .bind(event.laps)
            .bind(&event.status)
            .bind(event.driver_number)
            .bind(&event.color)
            .bind(&event.nationality)
            .execute(exec)
            .await?;
        Ok(())
    }

    /// Cumulative season standings: summed race+sprint points per driver,
    /// team/number/color taken from the driver's latest round, dense-ranked
    /// by total points with participation and recency as tie breakers.
    pub async fn season_standings(&self, season: i64) -> Result<Vec<DriverStanding>> {
        let standings = sqlx::query_as::<_, DriverStanding>(
            r#"
            WITH latest AS (
                SELECT driver_name, team, driver_number, color, nationality,
                       MAX(round) AS latest_round
                FROM driver_standings
                WHERE season = ?
                GROUP BY driver_name
            ),
            cumulative AS (
                SELECT driver_name,
                       SUM(points) AS race_points,
                       SUM(sprint_points) AS sprint_points,
                       SUM(points) + SUM(sprint_points) AS total_points,
                       COUNT(DISTINCT round) AS rounds_counted,
                       MAX(round) AS latest_round
                FROM driver_standings
                WHERE season = ?
                GROUP BY driver_name
            )
            SELECT l.driver_name, l.team, l.driver_number, l.color, l.nationality,
                   c.race_points, c.sprint_points, c.total_points, c.rounds_counted,
                   DENSE_RANK() OVER (
                       ORDER BY c.total_points DESC,
                                c.rounds_counted DESC,
                                c.latest_round DESC
                   ) AS position
            FROM latest l
            JOIN cumulative c ON c.driver_name = l.driver_name
            ORDER BY position, c.total_points DESC
            "#,
        )
        .bind(season)
        .bind(season)
        .fetch_all(self.pool)
        .await?;
        Ok(standings)
    }

    /// All stored rows for one round, best classified first.
    pub async fn round_results(&self, season: i64, round: i64) -> Result<Vec<DriverRoundResult>> {
        let rows = sqlx::query_as::<_, DriverRoundResult>(
            r#"
            SELECT season, round, driver_name, team,
                   points, sprint_points, total_points,
                   position, sprint_position,
                   qualifying_position, positions_gained, grid_position,
                   pit_stops, fastest_lap, laps, status,
                   driver_number, color, nationality
            FROM driver_standings
            WHERE season = ? AND round = ?
            ORDER BY COALESCE(position, 99), COALESCE(sprint_position, 99), driver_name
            "#,
        )
        .bind(season)
        .bind(round)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Seasons with any event rows, newest first.
    pub async fn seasons(&self) -> Result<Vec<i64>> {
        let seasons = sqlx::query_scalar::<_, i64>(
            "SELECT DISTINCT season FROM driver_standings ORDER BY season DESC",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(seasons)
    }

    /// (rows with a sprint classification, highest sprint points) for one
    /// round. Drives the missing/zero-point sprint checks.
    pub async fn sprint_record_stats(&self, season: i64, round: i64) -> Result<(i64, i64)> {
        let stats = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(sprint_position), COALESCE(MAX(sprint_points), 0)
            FROM driver_standings
            WHERE season = ? AND round = ?
            "#,
        )
        .bind(season)
        .bind(round)
        .fetch_one(self.pool)
        .await?;
        Ok(stats)
    }
}
