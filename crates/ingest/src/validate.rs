//! Detection and repair of partially ingested sprint data.

use std::fmt;

use chrono::Utc;
use storage::repository::{DriverRepository, ScheduleRepository};
use storage::services::totals::recompute_totals;
use storage::{Database, EventKind};

use crate::error::IngestError;
use crate::pipeline::Pipeline;
use crate::traits::ResultsProvider;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// A round flagged as a sprint weekend has no sprint classifications.
    MissingSprintResults,
    /// Sprint rows exist but every one scored zero points.
    ZeroPointSprint,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::MissingSprintResults => f.write_str("missing sprint results"),
            IssueKind::ZeroPointSprint => f.write_str("sprint results all scored zero"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub season: i64,
    pub round: i64,
    pub kind: IssueKind,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "season {} round {}: {}", self.season, self.round, self.kind)
    }
}

/// Scans every completed sprint round of the season for gaps.
pub async fn validate(db: &Database, season: i64) -> Result<Vec<Issue>> {
    let schedule = ScheduleRepository::new(db.pool());
    let drivers = DriverRepository::new(db.pool());
    let today = Utc::now().date_naive();

    let mut issues = Vec::new();
    for entry in schedule.completed_sprint_rounds(season, today).await? {
        let (sprint_rows, max_sprint_points) =
            drivers.sprint_record_stats(season, entry.round).await?;
        if sprint_rows == 0 {
            tracing::warn!(round = entry.round, race = %entry.name, "No sprint records found");
            issues.push(Issue {
                season,
                round: entry.round,
                kind: IssueKind::MissingSprintResults,
            });
        } else if max_sprint_points == 0 {
            tracing::warn!(round = entry.round, race = %entry.name, "No sprint points assigned");
            issues.push(Issue {
                season,
                round: entry.round,
                kind: IssueKind::ZeroPointSprint,
            });
        }
    }
    Ok(issues)
}

/// Re-derives one round's sprint data from the source inside a single
/// transaction: any row-level failure rolls the round back, and the round
/// is retried once before being left in its logged, unresolved state. A
/// half-written sprint is never visible to readers.
pub async fn repair<P: ResultsProvider>(pipeline: &Pipeline<P>, issue: &Issue) -> Result<()> {
    let Issue { season, round, .. } = *issue;
    let rows = pipeline
        .provider()
        .results(season, round, EventKind::Sprint)
        .await?;
    if rows.is_empty() {
        return Err(IngestError::Repair(format!(
            "Source has no sprint results for season {season} round {round}"
        )));
    }

    let db = pipeline.db();
    let _guard = db.acquire_write().await;
    let qualifying = Default::default();

    let mut attempts = 0;
    loop {
        attempts += 1;
        match pipeline
            .upsert_event_rows_unlocked(season, round, EventKind::Sprint, &rows, &qualifying, true)
            .await
        {
            Ok(()) => break,
            Err(err) if attempts < 2 => {
                tracing::warn!(season, round, %err, "Sprint repair failed, retrying");
            }
            Err(err) => return Err(err),
        }
    }

    recompute_totals(db.pool(), season).await?;
    tracing::info!(season, round, "Repaired sprint data");
    Ok(())
}

/// Full sweep: validate, repair what can be repaired, and report what is
/// left. Repair failures are logged per round, never fatal to the sweep.
pub async fn validate_and_repair<P: ResultsProvider>(
    pipeline: &Pipeline<P>,
    season: i64,
) -> Result<Vec<Issue>> {
    let issues = validate(pipeline.db(), season).await?;
    if issues.is_empty() {
        tracing::info!(season, "Sprint data validation successful");
        return Ok(issues);
    }

    for issue in &issues {
        tracing::info!(%issue, "Attempting repair");
        if let Err(err) = repair(pipeline, issue).await {
            tracing::error!(%issue, %err, "Repair failed");
        }
    }

    validate(pipeline.db(), season).await
}
