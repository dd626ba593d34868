use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Scored fields for one driver in one event of a round, keyed by
/// (season, round, canonical name, kind). The same row carries both the
/// main-race and sprint columns; an upsert for one kind never touches the
/// other kind's columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverEvent {
    /// Canonical driver name; raw provider spellings must be resolved
    /// before this struct is built.
    pub driver_name: String,
    pub team: String,
    pub driver_number: Option<i64>,
    pub color: Option<String>,
    pub nationality: Option<String>,
    pub position: Option<i64>,
    pub points: i64,
    pub qualifying_position: Option<i64>,
    pub positions_gained: i64,
    pub grid_position: Option<i64>,
    pub pit_stops: Option<i64>,
    pub fastest_lap: bool,
    pub laps: Option<i64>,
    pub status: Option<String>,
}

/// One driver's cumulative line in the season standings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DriverStanding {
    pub driver_name: String,
    pub team: String,
    pub driver_number: Option<i64>,
    pub color: Option<String>,
    pub nationality: Option<String>,
    pub race_points: i64,
    pub sprint_points: i64,
    pub total_points: i64,
    pub rounds_counted: i64,
    pub position: i64,
}

/// A full stored row for one (season, round, driver), as served to the
/// per-round results endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DriverRoundResult {
    pub season: i64,
    pub round: i64,
    pub driver_name: String,
    pub team: String,
    pub points: i64,
    pub sprint_points: i64,
    pub total_points: i64,
    pub position: Option<i64>,
    pub sprint_position: Option<i64>,
    pub qualifying_position: Option<i64>,
    pub positions_gained: i64,
    pub grid_position: Option<i64>,
    pub pit_stops: Option<i64>,
    pub fastest_lap: bool,
    pub laps: Option<i64>,
    pub status: Option<String>,
    pub driver_number: Option<i64>,
    pub color: Option<String>,
    pub nationality: Option<String>,
}
