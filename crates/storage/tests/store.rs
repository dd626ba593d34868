use storage::models::{DriverEvent, ScheduleEntry, TeamEvent};
use storage::repository::{DriverRepository, ScheduleRepository, TeamRepository};
use storage::services::totals::recompute_totals;
use storage::{Database, EventKind, scoring, schema};

async fn open_store(dir: &tempfile::TempDir) -> Database {
    let db = Database::connect(dir.path().join("standings.db"))
        .await
        .unwrap();
    db.create_tables().await.unwrap();
    db.write_schema_version().await.unwrap();
    db
}

fn driver_event(name: &str, team: &str, position: i64, kind: EventKind) -> DriverEvent {
    DriverEvent {
        driver_name: name.to_string(),
        team: team.to_string(),
        driver_number: Some(1),
        color: Some("#3671C6".to_string()),
        nationality: None,
        position: Some(position),
        points: scoring::points(Some(position), kind),
        qualifying_position: Some(position),
        positions_gained: 0,
        grid_position: Some(position),
        pit_stops: Some(2),
        fastest_lap: false,
        laps: Some(57),
        status: Some("Finished".to_string()),
    }
}

#[tokio::test]
async fn schema_version_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_store(&dir).await;
    assert_eq!(
        db.read_schema_version().await.unwrap(),
        Some(schema::schema_hash())
    );
}

#[tokio::test]
async fn fresh_store_needs_rebuild() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::connect(dir.path().join("standings.db"))
        .await
        .unwrap();
    assert!(db.needs_rebuild(2025).await.unwrap());
}

#[tokio::test]
async fn stamped_store_with_schedule_does_not_need_rebuild() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_store(&dir).await;

    // Still stale: no schedule rows for the season yet.
    assert!(db.needs_rebuild(2025).await.unwrap());

    let schedule = ScheduleRepository::new(db.pool());
    schedule
        .upsert_entry(db.pool(), &ScheduleEntry {
            season: 2025,
            round: 1,
            name: "Australian Grand Prix".to_string(),
            date: "2025-03-16".parse().unwrap(),
            country: Some("Australia".to_string()),
            is_sprint: false,
            qualifying_date: Some("2025-03-15".parse().unwrap()),
            sprint_date: None,
        })
        .await
        .unwrap();

    assert!(!db.needs_rebuild(2025).await.unwrap());
}

#[tokio::test]
async fn sprint_upsert_never_touches_race_columns() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_store(&dir).await;
    let drivers = DriverRepository::new(db.pool());

    drivers
        .upsert_event(db.pool(), 2025, 2, EventKind::Race, &driver_event(
            "Lando Norris",
            "McLaren",
            1,
            EventKind::Race,
        ))
        .await
        .unwrap();
    drivers
        .upsert_event(db.pool(), 2025, 2, EventKind::Sprint, &driver_event(
            "Lando Norris",
            "McLaren",
            3,
            EventKind::Sprint,
        ))
        .await
        .unwrap();

    let rows = drivers.round_results(2025, 2).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.points, 25);
    assert_eq!(row.position, Some(1));
    assert_eq!(row.sprint_points, 6);
    assert_eq!(row.sprint_position, Some(3));

    // Re-ingesting the race leaves the sprint columns alone too.
    drivers
        .upsert_event(db.pool(), 2025, 2, EventKind::Race, &driver_event(
            "Lando Norris",
            "McLaren",
            2,
            EventKind::Race,
        ))
        .await
        .unwrap();
    let rows = drivers.round_results(2025, 2).await.unwrap();
    assert_eq!(rows[0].points, 18);
    assert_eq!(rows[0].sprint_points, 6);
    assert_eq!(rows[0].sprint_position, Some(3));
}

#[tokio::test]
async fn repeated_upsert_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_store(&dir).await;
    let drivers = DriverRepository::new(db.pool());
    let event = driver_event("Max Verstappen", "Red Bull Racing", 1, EventKind::Race);

    for _ in 0..3 {
        drivers
            .upsert_event(db.pool(), 2025, 1, EventKind::Race, &event)
            .await
            .unwrap();
    }

    let rows = drivers.round_results(2025, 1).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].points, 25);
}

#[tokio::test]
async fn totals_are_prefix_sums_and_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_store(&dir).await;
    let drivers = DriverRepository::new(db.pool());

    drivers
        .upsert_event(db.pool(), 2025, 1, EventKind::Race, &driver_event(
            "Oscar Piastri",
            "McLaren",
            2,
            EventKind::Race,
        ))
        .await
        .unwrap();
    drivers
        .upsert_event(db.pool(), 2025, 2, EventKind::Sprint, &driver_event(
            "Oscar Piastri",
            "McLaren",
            1,
            EventKind::Sprint,
        ))
        .await
        .unwrap();
    drivers
        .upsert_event(db.pool(), 2025, 2, EventKind::Race, &driver_event(
            "Oscar Piastri",
            "McLaren",
            1,
            EventKind::Race,
        ))
        .await
        .unwrap();

    recompute_totals(db.pool(), 2025).await.unwrap();
    let first = drivers.round_results(2025, 2).await.unwrap();
    // 18 (round 1) + 8 (sprint) + 25 (race) = 51
    assert_eq!(first[0].total_points, 51);

    recompute_totals(db.pool(), 2025).await.unwrap();
    let second = drivers.round_results(2025, 2).await.unwrap();
    assert_eq!(first[0].total_points, second[0].total_points);

    let round_one = drivers.round_results(2025, 1).await.unwrap();
    assert_eq!(round_one[0].total_points, 18);
}

#[tokio::test]
async fn standings_aggregate_ranks_by_total_points() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_store(&dir).await;
    let drivers = DriverRepository::new(db.pool());
    let teams = TeamRepository::new(db.pool());

    for (round, (norris, verstappen)) in [(1, (1, 2)), (2, (2, 1)), (3, (1, 3))] {
        drivers
            .upsert_event(db.pool(), 2025, round, EventKind::Race, &driver_event(
                "Lando Norris",
                "McLaren",
                norris,
                EventKind::Race,
            ))
            .await
            .unwrap();
        drivers
            .upsert_event(db.pool(), 2025, round, EventKind::Race, &driver_event(
                "Max Verstappen",
                "Red Bull Racing",
                verstappen,
                EventKind::Race,
            ))
            .await
            .unwrap();
    }
    teams
        .upsert_event(db.pool(), 2025, 1, EventKind::Race, &TeamEvent {
            team: "McLaren".to_string(),
            points: 25,
            wins: 1,
            podiums: 1,
            fastest_laps: 0,
            color: Some("#FF8000".to_string()),
        })
        .await
        .unwrap();

    let standings = drivers.season_standings(2025).await.unwrap();
    assert_eq!(standings[0].driver_name, "Lando Norris");
    assert_eq!(standings[0].total_points, 25 + 18 + 25);
    assert_eq!(standings[0].position, 1);
    assert_eq!(standings[1].driver_name, "Max Verstappen");
    assert_eq!(standings[1].position, 2);

    let team_standings = teams.season_standings(2025).await.unwrap();
    assert_eq!(team_standings[0].team, "McLaren");
    assert_eq!(team_standings[0].wins, 1);
}
