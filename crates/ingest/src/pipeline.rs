use std::collections::HashMap;

use chrono::Utc;
use storage::models::{DriverEvent, ScheduleEntry, TeamEvent, normalize_color};
use storage::repository::{DriverRepository, ScheduleRepository, TeamRepository};
use storage::services::totals::recompute_totals;
use storage::{Database, EventKind, identity, scoring};

use crate::Result;
use crate::traits::{RawResult, ResultsProvider};

/// Pulls per-event results from the telemetry provider and upserts them
/// into the standings store.
///
/// Provider fetches happen before the store's write lock is taken; only the
/// upsert sequence runs under it.
pub struct Pipeline<P: ResultsProvider> {
    db: Database,
    provider: P,
}

impl<P: ResultsProvider> Pipeline<P> {
    pub fn new(db: Database, provider: P) -> Self {
        Self { db, provider }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetches and upserts the full season calendar, future rounds
    /// included.
    pub async fn sync_schedule(&self, season: i64) -> Result<Vec<ScheduleEntry>> {
        let entries = self.provider.schedule(season).await?;
        let _guard = self.db.acquire_write().await;
        self.upsert_schedule_unlocked(&entries).await?;
        Ok(entries)
    }

    pub(crate) async fn upsert_schedule_unlocked(&self, entries: &[ScheduleEntry]) -> Result<()> {
        let schedule = ScheduleRepository::new(self.db.pool());
        let mut tx = self.db.pool().begin().await?;
        for entry in entries {
            schedule.upsert_entry(&mut *tx, entry).await?;
        }
        tx.commit().await?;
        tracing::info!(count = entries.len(), "Upserted schedule entries");
        Ok(())
    }

    /// Ingests every completed event of a season. A failure for one round
    /// is logged and skipped; it never aborts the other rounds.
    pub async fn ingest_season(&self, season: i64) -> Result<()> {
        let entries = self.sync_schedule(season).await?;
        let today = Utc::now().date_naive();

        for entry in entries.iter().filter(|e| e.is_completed(today)) {
            if entry.is_sprint {
                if let Err(err) = self.ingest_event(season, entry.round, EventKind::Sprint).await {
                    tracing::error!(round = entry.round, %err, "Skipping sprint for round");
                }
            }
            if let Err(err) = self.ingest_event(season, entry.round, EventKind::Race).await {
                tracing::error!(round = entry.round, %err, "Skipping race for round");
            }
        }
        Ok(())
    }

    /// Ingests one event of one round. A round whose date has not passed is
    /// a no-op (`Ok(false)`), not an error. Per-row failures are caught so
    /// one malformed row cannot keep the rest of the field out of the
    /// store.
    pub async fn ingest_event(&self, season: i64, round: i64, kind: EventKind) -> Result<bool> {
        let entry = ScheduleRepository::new(self.db.pool())
            .entry(season, round)
            .await?;
        let today = Utc::now().date_naive();
        if !entry.is_completed(today) {
            tracing::info!(season, round, %kind, "Event has not occurred yet, skipping");
            return Ok(false);
        }
        if kind == EventKind::Sprint && !entry.is_sprint {
            tracing::info!(season, round, "Round has no sprint, skipping");
            return Ok(false);
        }

        let rows = self.provider.results(season, round, kind).await?;
        if rows.is_empty() {
            tracing::warn!(season, round, %kind, "Provider returned no results");
            return Ok(false);
        }
        let qualifying = self.fetch_qualifying(season, round, kind).await;

        let _guard = self.db.acquire_write().await;
        self.upsert_event_rows_unlocked(season, round, kind, &rows, &qualifying, false)
            .await?;
        recompute_totals(self.db.pool(), season).await?;
        tracing::info!(season, round, %kind, drivers = rows.len(), "Ingested event");
        Ok(true)
    }

    /// Qualifying positions, keyed by canonical name. Best effort: absence
    /// degrades positions-gained to zero rather than failing the event.
    async fn fetch_qualifying(
        &self,
        season: i64,
        round: i64,
        kind: EventKind,
    ) -> HashMap<String, i64> {
        if kind != EventKind::Race {
            return HashMap::new();
        }
        match self.provider.qualifying_positions(season, round).await {
            Ok(positions) => positions
                .into_iter()
                .map(|(raw, pos)| (identity::resolve(&raw).to_string(), pos))
                .collect(),
            Err(err) => {
                tracing::warn!(season, round, %err, "Qualifying data unavailable");
                HashMap::new()
            }
        }
    }

    /// Upserts one event's rows and the folded team counters inside a
    /// single transaction. With `strict` set, any row failure aborts the
    /// whole transaction (used by repair); otherwise the failing row is
    /// logged and the rest of the field still lands.
    pub(crate) async fn upsert_event_rows_unlocked(
        &self,
        season: i64,
        round: i64,
        kind: EventKind,
        rows: &[RawResult],
        qualifying: &HashMap<String, i64>,
        strict: bool,
    ) -> Result<()> {
        let drivers = DriverRepository::new(self.db.pool());
        let teams = TeamRepository::new(self.db.pool());

        let mut tx = self.db.pool().begin().await?;
        let mut team_fold: HashMap<String, TeamEvent> = HashMap::new();

        for row in rows {
            let event = build_driver_event(row, kind, qualifying);
            match drivers.upsert_event(&mut *tx, season, round, kind, &event).await {
                Ok(()) => fold_team(&mut team_fold, row, &event),
                Err(err) if strict => {
                    tx.rollback().await?;
                    return Err(err.into());
                }
                Err(err) => {
                    tracing::error!(driver = %event.driver_name, %err, "Skipping malformed row");
                }
            }
        }

        for team_event in team_fold.values() {
            teams
                .upsert_event(&mut *tx, season, round, kind, team_event)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Resolves identity, scores the position, and derives the auxiliary
/// fields for one raw row. Missing auxiliary data gets neutral defaults.
pub(crate) fn build_driver_event(
    row: &RawResult,
    kind: EventKind,
    qualifying: &HashMap<String, i64>,
) -> DriverEvent {
    let canonical = identity::resolve(&row.driver_name).to_string();
    let qualifying_position = qualifying.get(canonical.as_str()).copied();
    let positions_gained = match (qualifying_position, row.position) {
        (Some(quali), Some(finish)) => quali - finish,
        _ => 0,
    };

    DriverEvent {
        nationality: identity::nationality(&canonical).map(str::to_string),
        color: normalize_color(row.team_color.as_deref()),
        points: scoring::points(row.position, kind),
        driver_name: canonical,
        team: row.team.clone(),
        driver_number: row.driver_number,
        position: row.position,
        qualifying_position,
        positions_gained,
        grid_position: row.grid_position,
        pit_stops: Some(row.pit_stops.unwrap_or(0)),
        fastest_lap: row.fastest_lap,
        laps: row.laps,
        status: row.status.clone(),
    }
}

fn fold_team(fold: &mut HashMap<String, TeamEvent>, row: &RawResult, event: &DriverEvent) {
    let entry = fold.entry(event.team.clone()).or_insert_with(|| TeamEvent {
        team: event.team.clone(),
        color: event.color.clone(),
        ..TeamEvent::default()
    });
    entry.points += event.points;
    if event.position == Some(1) {
        entry.wins += 1;
    }
    if matches!(event.position, Some(p) if p <= 3) {
        entry.podiums += 1;
    }
    if row.fastest_lap {
        entry.fastest_laps += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, position: Option<i64>) -> RawResult {
        RawResult {
            driver_name: name.to_string(),
            driver_number: Some(12),
            team: "Mercedes".to_string(),
            team_color: Some("27F4D2".to_string()),
            position,
            grid_position: Some(5),
            laps: Some(57),
            status: Some("Finished".to_string()),
            fastest_lap: false,
            pit_stops: None,
        }
    }

    #[test]
    fn event_resolves_identity_and_scores() {
        let mut quali = HashMap::new();
        quali.insert("Kimi Antonelli".to_string(), 6);

        let event = build_driver_event(&raw("Andrea Kimi Antonelli", Some(4)), EventKind::Race, &quali);
        assert_eq!(event.driver_name, "Kimi Antonelli");
        assert_eq!(event.points, 12);
        assert_eq!(event.qualifying_position, Some(6));
        assert_eq!(event.positions_gained, 2);
        assert_eq!(event.nationality.as_deref(), Some("Italian"));
        assert_eq!(event.color.as_deref(), Some("#27F4D2"));
        assert_eq!(event.pit_stops, Some(0));
    }

    #[test]
    fn missing_qualifying_degrades_to_zero_gain() {
        let event = build_driver_event(&raw("Kimi Antonelli", Some(4)), EventKind::Race, &HashMap::new());
        assert_eq!(event.positions_gained, 0);
        assert_eq!(event.qualifying_position, None);
    }

    #[test]
    fn unclassified_row_scores_zero() {
        let event = build_driver_event(&raw("Lance Stroll", None), EventKind::Race, &HashMap::new());
        assert_eq!(event.points, 0);
        assert_eq!(event.position, None);
    }

    #[test]
    fn team_fold_counts_wins_and_podiums() {
        let mut fold = HashMap::new();
        let quali = HashMap::new();
        for (name, pos) in [("George Russell", 1), ("Kimi Antonelli", 3)] {
            let row = raw(name, Some(pos));
            let event = build_driver_event(&row, EventKind::Race, &quali);
            fold_team(&mut fold, &row, &event);
        }
        let mercedes = &fold["Mercedes"];
        assert_eq!(mercedes.points, 25 + 15);
        assert_eq!(mercedes.wins, 1);
        assert_eq!(mercedes.podiums, 2);
    }
}
