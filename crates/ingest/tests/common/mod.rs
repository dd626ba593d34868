use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{Duration, Utc};
use ingest::{IngestError, RawResult, Result, ResultsProvider};
use storage::models::ScheduleEntry;
use storage::{Database, EventKind};

/// Scripted provider for pipeline tests. Result sets can be swapped and
/// rounds can be told to fail mid-season.
#[derive(Default)]
pub struct MockProvider {
    schedule: Mutex<Vec<ScheduleEntry>>,
    results: Mutex<HashMap<(i64, i64, EventKind), Vec<RawResult>>>,
    qualifying: Mutex<HashMap<(i64, i64), HashMap<String, i64>>>,
    failing_rounds: Mutex<HashSet<i64>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_round(&self, entry: ScheduleEntry) {
        self.schedule.lock().unwrap().push(entry);
    }

    pub fn set_results(&self, season: i64, round: i64, kind: EventKind, rows: Vec<RawResult>) {
        self.results
            .lock()
            .unwrap()
            .insert((season, round, kind), rows);
    }

    pub fn set_qualifying(&self, season: i64, round: i64, positions: HashMap<String, i64>) {
        self.qualifying
            .lock()
            .unwrap()
            .insert((season, round), positions);
    }

    pub fn fail_round(&self, round: i64) {
        self.failing_rounds.lock().unwrap().insert(round);
    }

    pub fn clear_failures(&self) {
        self.failing_rounds.lock().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl ResultsProvider for &MockProvider {
    async fn schedule(&self, season: i64) -> Result<Vec<ScheduleEntry>> {
        Ok(self
            .schedule
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.season == season)
            .cloned()
            .collect())
    }

    async fn results(&self, season: i64, round: i64, kind: EventKind) -> Result<Vec<RawResult>> {
        if self.failing_rounds.lock().unwrap().contains(&round) {
            return Err(IngestError::Provider(format!(
                "Simulated outage for round {round}"
            )));
        }
        Ok(self
            .results
            .lock()
            .unwrap()
            .get(&(season, round, kind))
            .cloned()
            .unwrap_or_default())
    }

    async fn qualifying_positions(
        &self,
        season: i64,
        round: i64,
    ) -> Result<HashMap<String, i64>> {
        Ok(self
            .qualifying
            .lock()
            .unwrap()
            .get(&(season, round))
            .cloned()
            .unwrap_or_default())
    }
}

pub fn past_round(season: i64, round: i64, is_sprint: bool) -> ScheduleEntry {
    let date = (Utc::now() - Duration::days(30 - round)).date_naive();
    ScheduleEntry {
        season,
        round,
        name: format!("Round {round} Grand Prix"),
        date,
        country: Some("Somewhere".to_string()),
        is_sprint,
        qualifying_date: Some(date - Duration::days(1)),
        sprint_date: is_sprint.then(|| date - Duration::days(1)),
    }
}

pub fn future_round(season: i64, round: i64) -> ScheduleEntry {
    let date = (Utc::now() + Duration::days(30)).date_naive();
    ScheduleEntry {
        season,
        round,
        name: format!("Round {round} Grand Prix"),
        date,
        country: None,
        is_sprint: false,
        qualifying_date: None,
        sprint_date: None,
    }
}

pub fn raw(name: &str, team: &str, position: Option<i64>) -> RawResult {
    RawResult {
        driver_name: name.to_string(),
        driver_number: Some(81),
        team: team.to_string(),
        team_color: Some("FF8000".to_string()),
        position,
        grid_position: position,
        laps: Some(57),
        status: Some("Finished".to_string()),
        fastest_lap: false,
        pit_stops: Some(2),
    }
}

pub async fn open_store(dir: &tempfile::TempDir) -> Database {
    let db = Database::connect(dir.path().join("standings.db"))
        .await
        .unwrap();
    db.create_tables().await.unwrap();
    db.write_schema_version().await.unwrap();
    db
}
