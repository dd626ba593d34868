//! Wire models for the Ergast-compatible telemetry API. Every numeric
//! field arrives as a string and is parsed at the boundary.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(rename = "MRData")]
    pub mr_data: MrData,
}

#[derive(Debug, Deserialize)]
pub struct MrData {
    #[serde(rename = "RaceTable")]
    pub race_table: Option<RaceTable>,
}

#[derive(Debug, Deserialize)]
pub struct RaceTable {
    #[serde(rename = "Races", default)]
    pub races: Vec<Race>,
}

#[derive(Debug, Deserialize)]
pub struct Race {
    pub round: String,
    #[serde(rename = "raceName")]
    pub race_name: String,
    pub date: String,
    #[serde(rename = "Circuit")]
    pub circuit: Option<Circuit>,
    #[serde(rename = "Qualifying")]
    pub qualifying: Option<SessionDate>,
    #[serde(rename = "Sprint")]
    pub sprint: Option<SessionDate>,
    #[serde(rename = "Results", default)]
    pub results: Vec<ResultRow>,
    #[serde(rename = "SprintResults", default)]
    pub sprint_results: Vec<ResultRow>,
    #[serde(rename = "QualifyingResults", default)]
    pub qualifying_results: Vec<QualifyingRow>,
    #[serde(rename = "PitStops", default)]
    pub pit_stops: Vec<PitStopRow>,
}

#[derive(Debug, Deserialize)]
pub struct Circuit {
    #[serde(rename = "Location")]
    pub location: Option<Location>,
}

#[derive(Debug, Deserialize)]
pub struct Location {
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionDate {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "positionText")]
    pub position_text: Option<String>,
    pub grid: Option<String>,
    pub laps: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "Driver")]
    pub driver: DriverInfo,
    #[serde(rename = "Constructor")]
    pub constructor: ConstructorInfo,
    #[serde(rename = "FastestLap")]
    pub fastest_lap: Option<FastestLap>,
}

#[derive(Debug, Deserialize)]
pub struct DriverInfo {
    #[serde(rename = "driverId")]
    pub driver_id: String,
    #[serde(rename = "givenName")]
    pub given_name: String,
    #[serde(rename = "familyName")]
    pub family_name: String,
    #[serde(rename = "permanentNumber")]
    pub permanent_number: Option<String>,
}

impl DriverInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

#[derive(Debug, Deserialize)]
pub struct ConstructorInfo {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct FastestLap {
    pub rank: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QualifyingRow {
    pub position: Option<String>,
    #[serde(rename = "Driver")]
    pub driver: DriverInfo,
}

#[derive(Debug, Deserialize)]
pub struct PitStopRow {
    #[serde(rename = "driverId")]
    pub driver_id: String,
}

pub(crate) fn parse_i64(value: &Option<String>) -> Option<i64> {
    value.as_deref().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_result_payload() {
        let json = r#"{
            "MRData": {
                "RaceTable": {
                    "Races": [{
                        "round": "2",
                        "raceName": "Chinese Grand Prix",
                        "date": "2025-03-23",
                        "Sprint": { "date": "2025-03-22" },
                        "Results": [{
                            "positionText": "1",
                            "grid": "1",
                            "laps": "56",
                            "status": "Finished",
                            "Driver": {
                                "driverId": "piastri",
                                "givenName": "Oscar",
                                "familyName": "Piastri",
                                "permanentNumber": "81"
                            },
                            "Constructor": { "name": "McLaren" },
                            "FastestLap": { "rank": "2" }
                        }]
                    }]
                }
            }
        }"#;
        let parsed: ApiResponse = serde_json::from_str(json).unwrap();
        let race = &parsed.mr_data.race_table.unwrap().races[0];
        assert_eq!(race.race_name, "Chinese Grand Prix");
        assert!(race.sprint.is_some());
        let row = &race.results[0];
        assert_eq!(row.driver.full_name(), "Oscar Piastri");
        assert_eq!(parse_i64(&row.position_text), Some(1));
        assert_eq!(parse_i64(&row.driver.permanent_number), Some(81));
    }

    #[test]
    fn retired_position_text_is_not_a_position() {
        assert_eq!(parse_i64(&Some("R".to_string())), None);
        assert_eq!(parse_i64(&None), None);
    }
}
