use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ingest::{JolpicaClient, Pipeline, rebuild, validate};
use storage::{BackupCoordinator, Database};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "standings-ingest")]
#[command(about = "Season standings ingestion and maintenance", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_PATH", default_value = "./standings.db")]
    database_path: PathBuf,

    #[arg(long, env = "BACKUP_DIR", default_value = "./backups")]
    backup_dir: PathBuf,

    #[arg(long, env = "PROVIDER_URL")]
    provider_url: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scheduled update: rebuild if the store is stale, otherwise ingest
    /// incrementally, then sweep for sprint data gaps.
    Update {
        #[arg(long)]
        season: i64,
    },
    /// Force a snapshot-and-rebuild of the store.
    Rebuild {
        #[arg(long)]
        season: i64,
    },
    /// Report (and optionally repair) partially ingested sprint data.
    Validate {
        #[arg(long)]
        season: i64,

        #[arg(long)]
        repair: bool,
    },
    /// Snapshot the store.
    Backup,
    /// Restore a snapshot; the most recent one when no handle is given.
    Restore {
        #[arg(long)]
        handle: Option<String>,
    },
    /// List available snapshots.
    Backups,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("standings_ingest={log_level},ingest={log_level},storage={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Update { season } => {
            let pipeline = connect_pipeline(&cli).await?;
            rebuild::run_update(&pipeline, season, &cli.backup_dir).await?;
        }
        Commands::Rebuild { season } => {
            let pipeline = connect_pipeline(&cli).await?;
            rebuild::rebuild(&pipeline, season, &cli.backup_dir).await?;
        }
        Commands::Validate { season, repair } => {
            let pipeline = connect_pipeline(&cli).await?;
            let issues = if repair {
                validate::validate_and_repair(&pipeline, season).await?
            } else {
                validate::validate(pipeline.db(), season).await?
            };
            if issues.is_empty() {
                tracing::info!("No issues found");
            }
            for issue in issues {
                tracing::warn!(%issue, "Unresolved issue");
            }
        }
        Commands::Backup => {
            let db = Database::connect(&cli.database_path).await?;
            let _guard = db.acquire_write().await;
            db.checkpoint().await?;
            let hash = db.read_schema_version().await?;
            let coordinator = BackupCoordinator::new(&cli.database_path, &cli.backup_dir);
            let handle = coordinator.snapshot(hash).await?;
            tracing::info!(id = %handle.id, "Snapshot created");
        }
        Commands::Restore { handle } => {
            let coordinator = BackupCoordinator::new(&cli.database_path, &cli.backup_dir);
            let handle = match handle {
                Some(id) => {
                    let handle = coordinator.handle(&id).await?;
                    coordinator.restore(&handle).await?;
                    handle
                }
                None => coordinator.restore_latest().await?,
            };
            tracing::info!(id = %handle.id, "Store restored");
        }
        Commands::Backups => {
            let coordinator = BackupCoordinator::new(&cli.database_path, &cli.backup_dir);
            let metas = coordinator.list().await?;
            if metas.is_empty() {
                tracing::info!("No snapshots found");
            }
            for meta in metas {
                tracing::info!(
                    timestamp = %meta.timestamp,
                    schema_hash = %meta.schema_hash.as_deref().unwrap_or("unknown"),
                    path = %meta.backup_path,
                    "Snapshot"
                );
            }
        }
    }

    Ok(())
}

async fn connect_pipeline(cli: &Cli) -> Result<Pipeline<JolpicaClient>, Box<dyn std::error::Error>> {
    let db = Database::connect(&cli.database_path).await?;
    db.create_tables().await?;
    let provider = match &cli.provider_url {
        Some(url) => JolpicaClient::with_base_url(url),
        None => JolpicaClient::new(),
    };
    Ok(Pipeline::new(db, provider))
}
