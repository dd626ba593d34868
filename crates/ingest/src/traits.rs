use std::collections::HashMap;

use storage::EventKind;
use storage::models::ScheduleEntry;

use crate::Result;

/// One raw classification row for one competitor, as the telemetry
/// provider reports it. Names are raw; identity resolution happens in the
/// pipeline.
#[derive(Debug, Clone)]
pub struct RawResult {
    pub driver_name: String,
    pub driver_number: Option<i64>,
    pub team: String,
    pub team_color: Option<String>,
    /// Finishing position; `None` for unclassified/retired entries.
    pub position: Option<i64>,
    pub grid_position: Option<i64>,
    pub laps: Option<i64>,
    pub status: Option<String>,
    pub fastest_lap: bool,
    pub pit_stops: Option<i64>,
}

/// The external telemetry source. Implementations are black boxes; the
/// pipeline treats every call as fallible and slow.
#[async_trait::async_trait]
pub trait ResultsProvider: Send + Sync {
    /// Full calendar for a season, future rounds included.
    async fn schedule(&self, season: i64) -> Result<Vec<ScheduleEntry>>;

    /// Classification rows for one event of one round.
    async fn results(&self, season: i64, round: i64, kind: EventKind) -> Result<Vec<RawResult>>;

    /// Qualifying positions keyed by raw driver name. Best effort: an empty
    /// map is a valid answer and must not fail ingestion.
    async fn qualifying_positions(&self, season: i64, round: i64)
    -> Result<HashMap<String, i64>>;
}
