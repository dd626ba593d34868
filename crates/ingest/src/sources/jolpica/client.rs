use std::collections::HashMap;

use chrono::NaiveDate;
use storage::EventKind;
use storage::models::ScheduleEntry;

use super::models::{ApiResponse, Race, parse_i64};
use crate::error::{IngestError, Result};
use crate::traits::{RawResult, ResultsProvider};

const DEFAULT_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";

/// HTTP client for the Ergast-compatible telemetry API. Responses are
/// served from the provider's cache where available; a miss is just a
/// slower call.
pub struct JolpicaClient {
    base_url: String,
    client: reqwest::Client,
}

impl JolpicaClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn fetch(&self, path: &str) -> Result<ApiResponse> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let data = response.json::<ApiResponse>().await?;
        Ok(data)
    }

    fn first_race(response: ApiResponse) -> Option<Race> {
        response
            .mr_data
            .race_table
            .map(|t| t.races)
            .and_then(|mut races| {
                if races.is_empty() {
                    None
                } else {
                    Some(races.remove(0))
                }
            })
    }
}

impl Default for JolpicaClient {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| IngestError::Provider(format!("Bad date '{raw}': {e}")))
}

/// Current constructor liveries; the provider does not carry colors.
fn team_color(team: &str) -> Option<&'static str> {
    let color = match team {
        "McLaren" => "#FF8000",
        "Ferrari" => "#E80020",
        "Red Bull" | "Red Bull Racing" => "#3671C6",
        "Mercedes" => "#27F4D2",
        "Aston Martin" => "#229971",
        "Alpine" | "Alpine F1 Team" => "#0093CC",
        "Williams" => "#64C4FF",
        "RB F1 Team" | "Racing Bulls" => "#6692FF",
        "Sauber" | "Kick Sauber" => "#52E252",
        "Haas" | "Haas F1 Team" => "#B6BABD",
        _ => return None,
    };
    Some(color)
}

#[async_trait::async_trait]
impl ResultsProvider for JolpicaClient {
    async fn schedule(&self, season: i64) -> Result<Vec<ScheduleEntry>> {
        let response = self.fetch(&format!("{season}.json")).await?;
        let races = response
            .mr_data
            .race_table
            .map(|t| t.races)
            .unwrap_or_default();

        let mut entries = Vec::with_capacity(races.len());
        for race in races {
            let round = race
                .round
                .parse::<i64>()
                .map_err(|e| IngestError::Provider(format!("Bad round '{}': {e}", race.round)))?;
            let qualifying_date = match &race.qualifying {
                Some(session) => Some(parse_date(&session.date)?),
                None => None,
            };
            let sprint_date = match &race.sprint {
                Some(session) => Some(parse_date(&session.date)?),
                None => None,
            };
            entries.push(ScheduleEntry {
                season,
                round,
                name: race.race_name,
                date: parse_date(&race.date)?,
                country: race
                    .circuit
                    .and_then(|c| c.location)
                    .and_then(|l| l.country),
                is_sprint: sprint_date.is_some(),
                qualifying_date,
                sprint_date,
            });
        }
        Ok(entries)
    }

    async fn results(&self, season: i64, round: i64, kind: EventKind) -> Result<Vec<RawResult>> {
        let endpoint = match kind {
            EventKind::Race => "results",
            EventKind::Sprint => "sprint",
        };
        let response = self.fetch(&format!("{season}/{round}/{endpoint}.json")).await?;
        let Some(race) = Self::first_race(response) else {
            return Ok(Vec::new());
        };
        let rows = match kind {
            EventKind::Race => race.results,
            EventKind::Sprint => race.sprint_results,
        };

        // Pit counts come from the per-lap auxiliary endpoint; its absence
        // must never fail the event.
        let pit_counts = if kind == EventKind::Race {
            self.pit_stop_counts(season, round).await.unwrap_or_else(|err| {
                tracing::warn!(season, round, %err, "Pit stop data unavailable");
                HashMap::new()
            })
        } else {
            HashMap::new()
        };

        let results = rows
            .into_iter()
            .map(|row| {
                let pit_stops = pit_counts.get(&row.driver.driver_id).copied();
                RawResult {
                    driver_name: row.driver.full_name(),
                    driver_number: parse_i64(&row.driver.permanent_number),
                    team: row.constructor.name.clone(),
                    team_color: team_color(&row.constructor.name).map(str::to_string),
                    position: parse_i64(&row.position_text),
                    grid_position: parse_i64(&row.grid),
                    laps: parse_i64(&row.laps),
                    status: row.status,
                    fastest_lap: row
                        .fastest_lap
                        .as_ref()
                        .and_then(|fl| parse_i64(&fl.rank))
                        == Some(1),
                    pit_stops,
                }
            })
            .collect();
        Ok(results)
    }

    async fn qualifying_positions(
        &self,
        season: i64,
        round: i64,
    ) -> Result<HashMap<String, i64>> {
        let response = self.fetch(&format!("{season}/{round}/qualifying.json")).await?;
        let Some(race) = Self::first_race(response) else {
            return Ok(HashMap::new());
        };
        let positions = race
            .qualifying_results
            .into_iter()
            .filter_map(|row| {
                let position = parse_i64(&row.position)?;
                Some((row.driver.full_name(), position))
            })
            .collect();
        Ok(positions)
    }
}

impl JolpicaClient {
    async fn pit_stop_counts(&self, season: i64, round: i64) -> Result<HashMap<String, i64>> {
        let response = self.fetch(&format!("{season}/{round}/pitstops.json")).await?;
        let Some(race) = Self::first_race(response) else {
            return Ok(HashMap::new());
        };
        let mut counts: HashMap<String, i64> = HashMap::new();
        for stop in race.pit_stops {
            *counts.entry(stop.driver_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
