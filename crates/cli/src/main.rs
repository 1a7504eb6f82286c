//! Queuedesk CLI - run list actions and import documents against the SQLite store

mod import;
mod logging;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use queuedesk_core::application::{ListOptions, ListResponse, ListService};
use queuedesk_core::domain::{CollectionName, NormalizedRecord, NormalizedValue, OrderBy};
use queuedesk_core::port::id_provider::UuidProvider;
use queuedesk_infra_sqlite::{create_pool, run_migrations, SqliteDocumentStore, StoreConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tabled::builder::Builder;
use tabled::{Table, Tabled};
use tracing::info;

#[derive(Parser)]
#[command(name = "queuedesk")]
#[command(about = "Queuedesk list actions over a SQLite document store", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database file or sqlite: URL (default: ~/.queuedesk/documents.db)
    #[arg(long, env = "QUEUEDESK_DB_PATH", global = true)]
    db_path: Option<String>,

    /// Log output format
    #[arg(long, env = "QUEUEDESK_LOG_FORMAT", value_enum, default_value = "pretty", global = true)]
    log_format: logging::LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// List records of a collection
    List {
        /// Collection (logbook, lanes, services, staff, violations, activity, offices, users)
        #[arg(value_parser = parse_collection)]
        collection: CollectionName,

        #[command(flatten)]
        filters: FilterArgs,

        /// Explicit sort field (overrides the default ordering)
        #[arg(long)]
        order_by: Option<String>,

        /// Sort the explicit field descending
        #[arg(long, requires = "order_by")]
        descending: bool,

        /// Print the raw {success, entries|message} response
        #[arg(long)]
        json: bool,
    },

    /// Import documents from a JSON file (array of objects, optional "_docId" per object)
    ///
    /// Timestamps are written as {"__timestamp": {"seconds": <i64>, "nanos": <u32>}}.
    Import {
        #[arg(value_parser = parse_collection)]
        collection: CollectionName,

        /// Path to the JSON file
        file: PathBuf,
    },

    /// Show every collection with its fields and default ordering
    Collections,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Filter: office == VALUE
    #[arg(long)]
    office: Option<String>,

    /// Filter: officeId == VALUE
    #[arg(long)]
    office_id: Option<String>,

    /// Filter: department == VALUE
    #[arg(long)]
    department: Option<String>,

    /// Filter: date == VALUE
    #[arg(long)]
    date: Option<String>,
}

impl From<FilterArgs> for ListOptions {
    fn from(args: FilterArgs) -> Self {
        ListOptions {
            office: args.office,
            office_id: args.office_id,
            department: args.department,
            date: args.date,
        }
    }
}

#[derive(Tabled)]
struct CollectionRow {
    collection: String,
    fields: String,
    filtered_order: String,
    unfiltered_order: String,
}

fn parse_collection(s: &str) -> std::result::Result<CollectionName, String> {
    s.parse::<CollectionName>().map_err(|e| e.to_string())
}

async fn open_store(db_path: Option<String>) -> Result<SqliteDocumentStore> {
    let mut config = StoreConfig::from_env().context("Invalid store configuration")?;
    if let Some(path) = db_path {
        config.database_url = StoreConfig::new(path).database_url;
    }

    info!(database_url = %config.database_url, "Opening document store");

    let pool = create_pool(&config)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    Ok(SqliteDocumentStore::new(pool))
}

fn render_value(value: &NormalizedValue) -> String {
    match value {
        NormalizedValue::Text(s) => s.clone(),
        NormalizedValue::Flag(b) => b.to_string(),
    }
}

fn render_entries(collection: CollectionName, entries: &[NormalizedRecord]) -> String {
    let schema = collection.schema();

    let mut builder = Builder::default();
    builder.push_record(
        std::iter::once("id".to_string()).chain(schema.field_names().map(str::to_string)),
    );
    for entry in entries {
        builder.push_record(std::iter::once(entry.id.clone()).chain(
            schema
                .field_names()
                .map(|name| entry.get(name).map(render_value).unwrap_or_default()),
        ));
    }

    builder.build().to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format)?;

    match cli.command {
        Commands::List {
            collection,
            filters,
            order_by,
            descending,
            json,
        } => {
            let store = open_store(cli.db_path).await?;
            let service = ListService::new(Arc::new(store));
            let options = ListOptions::from(filters);

            let response = match order_by {
                Some(field) => {
                    let order = if descending {
                        OrderBy::descending(field)
                    } else {
                        OrderBy::ascending(field)
                    };
                    service
                        .query(options.to_request(collection).order_by(order))
                        .await
                }
                None => service.list(collection, options).await,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            }

            match response {
                ListResponse::Success { entries } if !json => {
                    if entries.is_empty() {
                        println!("{}", format!("No {} found", collection).yellow());
                    } else {
                        println!("{}", render_entries(collection, &entries));
                        println!("{}", format!("{} record(s)", entries.len()).cyan());
                    }
                }
                ListResponse::Success { .. } => {}
                ListResponse::Failure { message } => {
                    if !json {
                        eprintln!("{} {}", "✗".red(), message.red().bold());
                    }
                    bail!(message);
                }
            }
        }

        Commands::Import { collection, file } => {
            let store = open_store(cli.db_path).await?;
            let count = import::import_file(&store, &UuidProvider, collection, &file).await?;

            println!(
                "{}",
                format!("✓ Imported {} document(s) into {}", count, collection)
                    .green()
                    .bold()
            );
        }

        Commands::Collections => {
            let rows: Vec<CollectionRow> = CollectionName::ALL
                .into_iter()
                .map(|collection| {
                    let schema = collection.schema();
                    CollectionRow {
                        collection: collection.to_string(),
                        fields: schema.field_names().collect::<Vec<_>>().join(", "),
                        filtered_order: format!("{} ASC", schema.secondary_field),
                        unfiltered_order: format!("{} DESC", schema.primary_date_field),
                    }
                })
                .collect();

            println!("{}", "Collections".cyan().bold());
            println!("{}", Table::new(rows));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use queuedesk_core::domain::RawDocument;
    use serde_json::json;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_arguments() {
        let cli = Cli::try_parse_from([
            "queuedesk",
            "list",
            "logbook",
            "--office",
            "Manila",
            "--date",
            "2024-05-01",
        ])
        .unwrap();

        match cli.command {
            Commands::List {
                collection,
                filters,
                ..
            } => {
                assert_eq!(collection, CollectionName::Logbook);
                let options = ListOptions::from(filters);
                assert_eq!(options.office.as_deref(), Some("Manila"));
                assert_eq!(options.date.as_deref(), Some("2024-05-01"));
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_unknown_collection_is_rejected() {
        assert!(Cli::try_parse_from(["queuedesk", "list", "tickets"]).is_err());
    }

    #[test]
    fn test_descending_requires_order_by() {
        assert!(Cli::try_parse_from(["queuedesk", "list", "lanes", "--descending"]).is_err());
    }

    #[test]
    fn test_render_entries_has_every_column() {
        let record = CollectionName::Lanes
            .schema()
            .normalize(&RawDocument::from_json("lane-1", json!({"name": "Express"})).unwrap());
        let table = render_entries(CollectionName::Lanes, &[record]);

        assert!(table.contains("lane-1"));
        assert!(table.contains("Express"));
        assert!(table.contains("createdAt"));
        assert!(table.contains("false"));
    }
}
