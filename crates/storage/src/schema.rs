//! The durable schema and its structural version hash.
//!
//! The standings store is rebuilt from the telemetry source whenever the
//! structure below changes, so the whole DDL is kept in one place and hashed.
//! A store whose persisted hash differs from [`schema_hash`] is stale.

use sha2::{Digest, Sha256};

pub const CREATE_RACE_SCHEDULE: &str = r#"
CREATE TABLE IF NOT EXISTS race_schedule (
    season INTEGER NOT NULL,
    round INTEGER NOT NULL,
    name TEXT NOT NULL,
    date TEXT NOT NULL,
    country TEXT,
    is_sprint INTEGER NOT NULL DEFAULT 0,
    qualifying_date TEXT,
    sprint_date TEXT,
    PRIMARY KEY (season, round)
)
"#;

pub const CREATE_DRIVER_STANDINGS: &str = r#"
CREATE TABLE IF NOT EXISTS driver_standings (
    season INTEGER NOT NULL,
    round INTEGER NOT NULL,
    driver_name TEXT NOT NULL,
    team TEXT NOT NULL,
    points INTEGER NOT NULL DEFAULT 0,
    sprint_points INTEGER NOT NULL DEFAULT 0,
    total_points INTEGER NOT NULL DEFAULT 0,
    position INTEGER,
    sprint_position INTEGER,
    qualifying_position INTEGER,
    positions_gained INTEGER NOT NULL DEFAULT 0,
    grid_position INTEGER,
    pit_stops INTEGER,
    fastest_lap INTEGER NOT NULL DEFAULT 0,
    laps INTEGER,
    status TEXT,
    driver_number INTEGER,
    color TEXT,
    nationality TEXT,
    PRIMARY KEY (season, round, driver_name)
)
"#;

pub const CREATE_TEAM_STANDINGS: &str = r#"
CREATE TABLE IF NOT EXISTS team_standings (
    season INTEGER NOT NULL,
    round INTEGER NOT NULL,
    team TEXT NOT NULL,
    points INTEGER NOT NULL DEFAULT 0,
    sprint_points INTEGER NOT NULL DEFAULT 0,
    total_points INTEGER NOT NULL DEFAULT 0,
    wins INTEGER NOT NULL DEFAULT 0,
    podiums INTEGER NOT NULL DEFAULT 0,
    fastest_laps INTEGER NOT NULL DEFAULT 0,
    color TEXT,
    PRIMARY KEY (season, round, team)
)
"#;

pub const CREATE_SCHEMA_VERSION: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    hash TEXT PRIMARY KEY
)
"#;

pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_race_schedule_season ON race_schedule(season)",
    "CREATE INDEX IF NOT EXISTS idx_race_schedule_date ON race_schedule(date)",
    "CREATE INDEX IF NOT EXISTS idx_driver_standings_season_round ON driver_standings(season, round)",
    "CREATE INDEX IF NOT EXISTS idx_driver_standings_driver ON driver_standings(driver_name)",
    "CREATE INDEX IF NOT EXISTS idx_driver_standings_team ON driver_standings(team)",
    "CREATE INDEX IF NOT EXISTS idx_team_standings_season_round ON team_standings(season, round)",
    "CREATE INDEX IF NOT EXISTS idx_team_standings_team ON team_standings(team)",
];

pub const DROP_TABLES: &[&str] = &[
    "DROP TABLE IF EXISTS race_schedule",
    "DROP TABLE IF EXISTS driver_standings",
    "DROP TABLE IF EXISTS team_standings",
    "DROP TABLE IF EXISTS schema_version",
];

/// All entity DDL in a fixed order. Index definitions are deliberately
/// excluded: adding an index does not invalidate existing data.
fn structural_definition() -> String {
    [
        CREATE_RACE_SCHEDULE,
        CREATE_DRIVER_STANDINGS,
        CREATE_TEAM_STANDINGS,
        CREATE_SCHEMA_VERSION,
    ]
    .join("\n")
}

/// SHA-256 of the structural definition, hex-encoded.
pub fn schema_hash() -> String {
    let mut hasher = Sha256::new();
    hasher.update(structural_definition().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable() {
        assert_eq!(schema_hash(), schema_hash());
    }

    #[test]
    fn hash_is_hex_sha256() {
        let hash = schema_hash();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hash_tracks_definition_changes() {
        let mut hasher = Sha256::new();
        hasher.update(b"some other definition");
        let other = hex::encode(hasher.finalize());
        assert_ne!(schema_hash(), other);
    }
}
