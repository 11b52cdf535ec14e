// CLI tool for copying events from the JSON file store into MongoDB.
// Run with: cargo run --bin import-events -- --help

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use campusconnect_api::ApiConfig;
use campusconnect_core::EventFilters;
use campusconnect_storage::{EventStore, FileStore, MongoStore};

#[derive(Debug, Default, PartialEq)]
struct Args {
    dry_run: bool,
    migrate: bool,
    file: Option<PathBuf>,
    help: bool,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Args::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--dry-run" | "-n" => parsed.dry_run = true,
                "--migrate" | "-m" => parsed.migrate = true,
                "--file" | "-f" => {
                    let path = args.next().context("--file requires a value")?;
                    parsed.file = Some(PathBuf::from(path));
                }
                "--help" | "-h" => parsed.help = true,
                other => bail!("Unknown argument: {other}"),
            }
        }

        Ok(parsed)
    }
}

fn print_help() {
    eprintln!(
        r#"
import-events - Copy events from the JSON file store into MongoDB

USAGE:
    import-events [OPTIONS]

OPTIONS:
    -f, --file <PATH>   Events file to read (default: EVENTS_FILE or data/events.json)
    -n, --dry-run       List the events that would be imported without writing
    -m, --migrate       Backfill defaults and indexes after importing
    -h, --help          Show this help message

ENVIRONMENT:
    MONGODB_URI         MongoDB connection string (required unless --dry-run)
    MONGODB_DATABASE    Database name (default: campusconnect)
    EVENTS_FILE         Events file when --file is not given

Imported events get new ids and empty registration state.
"#
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("import_events=info,campusconnect_storage=info")
            }),
        )
        .init();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            print_help();
            return Err(e);
        }
    };
    if args.help {
        print_help();
        return Ok(());
    }

    let config = ApiConfig::from_env().store;
    let path = args.file.unwrap_or(config.events_file);
    if !path.exists() {
        bail!("Events file {} does not exist", path.display());
    }

    let source = FileStore::new(&path);
    let events = source
        .list_events(&EventFilters::default())
        .await
        .with_context(|| format!("Failed to read events from {}", path.display()))?;
    tracing::info!(count = events.len(), path = %path.display(), "Found events in JSON file");

    if args.dry_run {
        for event in &events {
            tracing::info!(title = %event.title, date = %event.date, "Would import");
        }
        tracing::info!("DRY RUN: Would import {} events", events.len());
        return Ok(());
    }

    let uri = config.mongodb_uri.context("MONGODB_URI not set")?;
    let target = MongoStore::connect(&uri, &config.database)
        .await
        .context("Invalid MongoDB configuration")?;
    target.ping().await.context("Failed to reach MongoDB")?;
    tracing::info!(database = %config.database, "Connected to MongoDB");

    let report = target.import_events(events).await?;
    tracing::info!(
        imported = report.imported,
        failed = report.failed,
        "Import finished"
    );

    if args.migrate {
        let migration = target.migrate().await.context("Migration failed")?;
        tracing::info!(
            events_updated = migration.events_updated,
            users_updated = migration.users_updated,
            "Migration finished"
        );
    }

    let counts = target.collection_counts().await?;
    tracing::info!("MongoDB now contains {} events", counts.events);

    target.shutdown().await;
    if report.failed > 0 {
        bail!("{} events failed to import", report.failed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args> {
        Args::parse(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_parse_flags() {
        let args = parse(&["-n", "--file", "backup/events.json", "--migrate"]).unwrap();
        assert_eq!(
            args,
            Args {
                dry_run: true,
                migrate: true,
                file: Some(PathBuf::from("backup/events.json")),
                help: false,
            }
        );
        assert_eq!(parse(&[]).unwrap(), Args::default());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse(&["--file"]).is_err());
        let err = parse(&["--force"]).unwrap_err();
        assert_eq!(err.to_string(), "Unknown argument: --force");
    }
}
