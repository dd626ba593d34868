//! Structural-drift handling: snapshot, destroy, recreate, replay.

use std::path::Path;

use chrono::Utc;
use storage::services::totals::recompute_totals;
use storage::{BackupCoordinator, EventKind};

use crate::Result;
use crate::pipeline::Pipeline;
use crate::traits::ResultsProvider;

/// Destroys and repopulates the store for `season`.
///
/// A snapshot is taken before anything is dropped and pruned only after the
/// whole replay succeeds. If the replay fails partway, the partially
/// rebuilt store is retained (season data is re-derivable from the source
/// on the next run), the snapshot is kept for an operator restore, and the
/// error is surfaced.
pub async fn rebuild<P: ResultsProvider>(
    pipeline: &Pipeline<P>,
    season: i64,
    backup_dir: &Path,
) -> Result<()> {
    let db = pipeline.db();

    // Exclusive access for the whole destroy-and-replay sequence.
    let _guard = db.acquire_write().await;

    let coordinator = BackupCoordinator::new(db.path(), backup_dir);
    let snapshot = if db.path().exists() {
        let stored_hash = db.read_schema_version().await?;
        db.checkpoint().await?;
        Some(coordinator.snapshot(stored_hash).await?)
    } else {
        None
    };

    tracing::info!(season, "Rebuilding standings store");
    db.drop_tables().await?;
    db.create_tables().await?;
    db.write_schema_version().await?;

    replay_season(pipeline, season).await?;
    recompute_totals(db.pool(), season).await?;

    if let Some(handle) = snapshot {
        coordinator.prune(&handle).await?;
    }
    tracing::info!(season, "Rebuild complete");
    Ok(())
}

/// Repopulates every completed event of the season. Unlike routine
/// ingestion this runs with the write lock already held, so it goes through
/// the pipeline's unlocked internals.
async fn replay_season<P: ResultsProvider>(pipeline: &Pipeline<P>, season: i64) -> Result<()> {
    let entries = pipeline.provider().schedule(season).await?;
    pipeline.upsert_schedule_unlocked(&entries).await?;

    let today = Utc::now().date_naive();
    for entry in entries.iter().filter(|e| e.is_completed(today)) {
        if entry.is_sprint {
            replay_event(pipeline, season, entry.round, EventKind::Sprint).await?;
        }
        replay_event(pipeline, season, entry.round, EventKind::Race).await?;
    }
    Ok(())
}

async fn replay_event<P: ResultsProvider>(
    pipeline: &Pipeline<P>,
    season: i64,
    round: i64,
    kind: EventKind,
) -> Result<()> {
    let rows = pipeline.provider().results(season, round, kind).await?;
    if rows.is_empty() {
        tracing::warn!(season, round, %kind, "No results to replay");
        return Ok(());
    }
    let qualifying = match kind {
        EventKind::Race => match pipeline.provider().qualifying_positions(season, round).await {
            Ok(map) => map
                .into_iter()
                .map(|(raw, pos)| (storage::identity::resolve(&raw).to_string(), pos))
                .collect(),
            Err(err) => {
                tracing::warn!(season, round, %err, "Qualifying data unavailable");
                Default::default()
            }
        },
        EventKind::Sprint => Default::default(),
    };
    pipeline
        .upsert_event_rows_unlocked(season, round, kind, &rows, &qualifying, false)
        .await?;
    tracing::info!(season, round, %kind, "Replayed event");
    Ok(())
}

/// The scheduled update entry point: rebuild when the schema guard says the
/// store is stale, otherwise ingest incrementally; then sweep for
/// partially ingested sprint data.
pub async fn run_update<P: ResultsProvider>(
    pipeline: &Pipeline<P>,
    season: i64,
    backup_dir: &Path,
) -> Result<()> {
    if pipeline.db().needs_rebuild(season).await? {
        rebuild(pipeline, season, backup_dir).await?;
    } else {
        pipeline.ingest_season(season).await?;
    }

    let unresolved = crate::validate::validate_and_repair(pipeline, season).await?;
    if !unresolved.is_empty() {
        tracing::warn!(count = unresolved.len(), "Unresolved data issues remain");
    }
    Ok(())
}
