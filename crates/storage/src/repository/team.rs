use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{TeamEvent, TeamStanding};
use crate::scoring::EventKind;

pub struct TeamRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TeamRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Kind-scoped upsert of one team's per-round aggregate. Sprint upserts
    /// only touch the sprint points column; the win/podium/fastest-lap
    /// counters belong to the main race.
    pub async fn upsert_event(
        &self,
        exec: impl sqlx::SqliteExecutor<'_>,
        season: i64,
        round: i64,
        kind: EventKind,
        event: &TeamEvent,
    ) -> Result<()> {
        let sql = match kind {
            EventKind::Race => {
                r#"
                INSERT INTO team_standings
                    (season, round, team, points, sprint_points, total_points,
                     wins, podiums, fastest_laps, color)
                VALUES (?, ?, ?, ?, 0, 0, ?, ?, ?, ?)
                ON CONFLICT(season, round, team) DO UPDATE SET
                    points = excluded.points,
                    wins = excluded.wins,
                    podiums = excluded.podiums,
                    fastest_laps = excluded.fastest_laps,
                    color = excluded.color
                "#
            }
            EventKind::Sprint => {
                r#"
                INSERT INTO team_standings
                    (season, round, team, points, sprint_points, total_points,
                     wins, podiums, fastest_laps, color)
                VALUES (?, ?, ?, 0, ?, 0, 0, 0, 0, ?)
                ON CONFLICT(season, round, team) DO UPDATE SET
                    sprint_points = excluded.sprint_points,
                    color = excluded.color
                "#
            }
        };

        let query = sqlx::query(sql)
            .bind(season)
            .bind(round)
            .bind(&event.team)
            .bind(event.points);
        let query = match kind {
            EventKind::Race => query
                .bind(event.wins)
                .bind(event.podiums)
                .bind(event.fastest_laps),
            EventKind::Sprint => query,
        };
        query.bind(&event.color).execute(exec).await?;
        Ok(())
    }

    /// Cumulative team standings for a season, dense-ranked by total points.
    pub async fn season_standings(&self, season: i64) -> Result<Vec<TeamStanding>> {
        let standings = sqlx::query_as::<_, TeamStanding>(
            r#"
            WITH latest AS (
                SELECT team, color, MAX(round) AS latest_round
                FROM team_standings
                WHERE season = ?
                GROUP BY team
            ),
            cumulative AS (
                SELECT team,
                       SUM(points) AS race_points,
                       SUM(sprint_points) AS sprint_points,
                       SUM(points) + SUM(sprint_points) AS total_points,
                       SUM(wins) AS wins,
                       SUM(podiums) AS podiums,
                       SUM(fastest_laps) AS fastest_laps,
                       MAX(round) AS latest_round
                FROM team_standings
                WHERE season = ?
                GROUP BY team
            )
            SELECT l.team, l.color,
                   c.race_points, c.sprint_points, c.total_points,
                   c.wins, c.podiums, c.fastest_laps,
                   DENSE_RANK() OVER (
                       ORDER BY c.total_points DESC, c.latest_round DESC
                   ) AS position
            FROM latest l
            JOIN cumulative c ON c.team = l.team
            ORDER BY position, c.total_points DESC
            "#,
        )
        .bind(season)
        .bind(season)
        .fetch_all(self.pool)
        .await?;
        Ok(standings)
    }
}
