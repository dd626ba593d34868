//! Season total maintenance.
//!
//! `total_points` is always a full recompute from the per-event rows, never
//! an in-place increment. Recomputation is therefore idempotent and immune
//! to re-ingestion and partial-failure double counting.

use std::collections::BTreeMap;

use sqlx::SqlitePool;

use crate::error::Result;

/// Rewrites `total_points` for every driver and team row of `season` as a
/// prefix sum of race + sprint points ordered by round.
pub async fn recompute_totals(pool: &SqlitePool, season: i64) -> Result<()> {
    let mut tx = pool.begin().await?;

    let driver_rows = sqlx::query_as::<_, (String, i64, i64)>(
        r#"
        SELECT driver_name, round, points + sprint_points
        FROM driver_standings
        WHERE season = ?
        ORDER BY driver_name, round
        "#,
    )
    .bind(season)
    .fetch_all(&mut *tx)
    .await?;

    for (identity, round, total) in prefix_sums(driver_rows) {
        sqlx::query(
            "UPDATE driver_standings SET total_points = ? WHERE season = ? AND round = ? AND driver_name = ?",
        )
        .bind(total)
        .bind(season)
        .bind(round)
        .bind(&identity)
        .execute(&mut *tx)
        .await?;
    }

    let team_rows = sqlx::query_as::<_, (String, i64, i64)>(
        r#"
        SELECT team, round, points + sprint_points
        FROM team_standings
        WHERE season = ?
        ORDER BY team, round
        "#,
    )
    .bind(season)
    .fetch_all(&mut *tx)
    .await?;

    for (identity, round, total) in prefix_sums(team_rows) {
        sqlx::query(
            "UPDATE team_standings SET total_points = ? WHERE season = ? AND round = ? AND team = ?",
        )
        .bind(total)
        .bind(season)
        .bind(round)
        .bind(&identity)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::debug!(season, "Recomputed season totals");
    Ok(())
}

/// Turns (identity, round, event points) rows into (identity, round,
/// cumulative points) with the sum running over rounds per identity.
fn prefix_sums(rows: Vec<(String, i64, i64)>) -> Vec<(String, i64, i64)> {
    let mut per_identity: BTreeMap<String, BTreeMap<i64, i64>> = BTreeMap::new();
    for (identity, round, pts) in rows {
        per_identity.entry(identity).or_default().insert(round, pts);
    }

    let mut out = Vec::new();
    for (identity, rounds) in per_identity {
        let mut running = 0;
        for (round, pts) in rounds {
            running += pts;
            out.push((identity.clone(), round, running));
        }
    }
    out
}
