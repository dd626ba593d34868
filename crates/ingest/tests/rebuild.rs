mod common;

use common::{MockProvider, open_store, past_round, raw};
use ingest::rebuild::{rebuild, run_update};
use ingest::Pipeline;
use storage::repository::{DriverRepository, ScheduleRepository};
use storage::{BackupCoordinator, Database, EventKind, schema};

fn seeded_provider() -> MockProvider {
    let provider = MockProvider::new();
    provider.add_round(past_round(2025, 1, false));
    provider.set_results(2025, 1, EventKind::Race, vec![
        raw("Carlos Sainz", "Williams", Some(1)),
        raw("Alexander Albon", "Williams", Some(2)),
    ]);
    provider
}

#[tokio::test]
async fn drift_triggers_rebuild_and_restamps_schema() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_store(&dir).await;
    let provider = seeded_provider();
    let pipeline = Pipeline::new(db.clone(), &provider);

    // An older structural definition left its hash behind.
    sqlx::query("DELETE FROM schema_version")
        .execute(db.pool())
        .await
        .unwrap();
    sqlx::query("INSERT INTO schema_version (hash) VALUES ('stale-definition-hash')")
        .execute(db.pool())
        .await
        .unwrap();
    assert!(db.needs_rebuild(2025).await.unwrap());

    run_update(&pipeline, 2025, &dir.path().join("backups"))
        .await
        .unwrap();

    assert_eq!(
        db.read_schema_version().await.unwrap(),
        Some(schema::schema_hash())
    );
    assert!(!db.needs_rebuild(2025).await.unwrap());

    let standings = DriverRepository::new(db.pool())
        .season_standings(2025)
        .await
        .unwrap();
    assert_eq!(standings.len(), 2);
    assert_eq!(standings[0].driver_name, "Carlos Sainz");

    // The guarding snapshot is pruned after a fully successful rebuild.
    let coordinator = BackupCoordinator::new(db.path(), dir.path().join("backups"));
    assert!(coordinator.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn rebuild_replays_completed_rounds() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_store(&dir).await;
    let provider = seeded_provider();
    provider.add_round(past_round(2025, 2, true));
    provider.set_results(2025, 2, EventKind::Sprint, vec![
        raw("Carlos Sainz", "Williams", Some(1)),
    ]);
    provider.set_results(2025, 2, EventKind::Race, vec![
        raw("Carlos Sainz", "Williams", Some(5)),
    ]);

    let pipeline = Pipeline::new(db.clone(), &provider);
    rebuild(&pipeline, 2025, &dir.path().join("backups"))
        .await
        .unwrap();

    let schedule = ScheduleRepository::new(db.pool());
    assert_eq!(schedule.list_season(2025).await.unwrap().len(), 2);

    let rows = DriverRepository::new(db.pool())
        .round_results(2025, 2)
        .await
        .unwrap();
    assert_eq!(rows[0].sprint_points, 8);
    assert_eq!(rows[0].points, 10);
    // 25 (round 1) + 8 + 10 = 43
    assert_eq!(rows[0].total_points, 43);
}

#[tokio::test]
async fn failed_rebuild_keeps_snapshot_and_restore_recovers_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let backups = dir.path().join("backups");
    let db_path;

    // Populate a healthy store, then flush and close it so the file is a
    // complete image.
    {
        let db = open_store(&dir).await;
        db_path = db.path().to_path_buf();
        let provider = seeded_provider();
        let pipeline = Pipeline::new(db.clone(), &provider);
        pipeline.ingest_season(2025).await.unwrap();
        {
            let _guard = db.acquire_write().await;
            db.checkpoint().await.unwrap();
        }
        db.close().await;
    }
    let before = std::fs::read(&db_path).unwrap();

    // Rebuild fails midway: the source goes down after the store has been
    // destroyed.
    let db = Database::connect(&db_path).await.unwrap();
    let provider = seeded_provider();
    provider.fail_round(1);
    let pipeline = Pipeline::new(db.clone(), &provider);
    let outcome = rebuild(&pipeline, 2025, &backups).await;
    assert!(outcome.is_err());
    db.close().await;

    // The guarding snapshot survived the failure.
    let coordinator = BackupCoordinator::new(&db_path, &backups);
    let metas = coordinator.list().await.unwrap();
    assert_eq!(metas.len(), 1);

    // Operator restore brings back the exact pre-rebuild bytes.
    coordinator.restore_latest().await.unwrap();
    let after = std::fs::read(&db_path).unwrap();
    assert_eq!(before, after);

    let restored = Database::connect(&db_path).await.unwrap();
    let standings = DriverRepository::new(restored.pool())
        .season_standings(2025)
        .await
        .unwrap();
    assert_eq!(standings.len(), 2);
}
