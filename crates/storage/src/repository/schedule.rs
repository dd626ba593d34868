use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::{Result, StorageError};
use crate::models::ScheduleEntry;

pub struct ScheduleRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ScheduleRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Idempotent upsert of one calendar entry. Future rounds are stored
    /// too; only result ingestion is gated on the date.
    pub async fn upsert_entry(
        &self,
        exec: impl sqlx::SqliteExecutor<'_>,
        entry: &ScheduleEntry,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO race_schedule
                (season, round, name, date, country, is_sprint, qualifying_date, sprint_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(season, round) DO UPDATE SET
                name = excluded.name,
                date = excluded.date,
                country = excluded.country,
                is_sprint = excluded.is_sprint,
                qualifying_date = excluded.qualifying_date,
                sprint_date = excluded.sprint_date
            "#,
        )
        .bind(entry.season)
        .bind(entry.round)
        .bind(&entry.name)
        .bind(entry.date)
        .bind(&entry.country)
        .bind(entry.is_sprint)
        .bind(entry.qualifying_date)
        .bind(entry.sprint_date)
        .execute(exec)
        .await?;
        Ok(())
    }

    pub async fn list_season(&self, season: i64) -> Result<Vec<ScheduleEntry>> {
        let entries = sqlx::query_as::<_, ScheduleEntry>(
            r#"
            SELECT season, round, name, date, country, is_sprint, qualifying_date, sprint_date
            FROM race_schedule
            WHERE season = ?
            ORDER BY round
            "#,
        )
        .bind(season)
        .fetch_all(self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn entry(&self, season: i64, round: i64) -> Result<ScheduleEntry> {
        sqlx::query_as::<_, ScheduleEntry>(
            r#"
            SELECT season, round, name, date, country, is_sprint, qualifying_date, sprint_date
            FROM race_schedule
            WHERE season = ? AND round = ?
            "#,
        )
        .bind(season)
        .bind(round)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Rounds whose main event date is on or before `today`, in order.
    pub async fn completed_rounds(&self, season: i64, today: NaiveDate) -> Result<Vec<ScheduleEntry>> {
        let entries = sqlx::query_as::<_, ScheduleEntry>(
            r#"
            SELECT season, round, name, date, country, is_sprint, qualifying_date, sprint_date
            FROM race_schedule
            WHERE season = ? AND date <= ?
            ORDER BY round
            "#,
        )
        .bind(season)
        .bind(today)
        .fetch_all(self.pool)
        .await?;
        Ok(entries)
    }

    /// Completed rounds flagged as sprint weekends.
    pub async fn completed_sprint_rounds(
        &self,
        season: i64,
        today: NaiveDate,
    ) -> Result<Vec<ScheduleEntry>> {
        let entries = sqlx::query_as::<_, ScheduleEntry>(
            r#"
            SELECT season, round, name, date, country, is_sprint, qualifying_date, sprint_date
            FROM race_schedule
            WHERE season = ? AND is_sprint = 1 AND date <= ?
            ORDER BY round
            "#,
        )
        .bind(season)
        .bind(today)
        .fetch_all(self.pool)
        .await?;
        Ok(entries)
    }
}
