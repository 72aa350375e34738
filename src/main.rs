use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use fedora::{import_artifacts, import_people, Catalog, ImportReport, SqliteStore};

#[derive(Parser, Debug)]
#[command(name = "fedora")]
#[command(about = "Fedora catalog administration", version)]
struct Args {
    /// SQLite database file
    #[arg(long, env = "FEDORA_DB", default_value = "fedora.db", global = true)]
    db: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database schema
    Init,
    /// Load people from a CSV file with headers first,last,title
    ImportPeople { csv: PathBuf },
    /// Load artifacts from a CSV file with headers name,shiny
    ImportArtifacts { csv: PathBuf },
    /// Print the fixed tool listing
    Tools,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    match args.command {
        Command::Init => {
            SqliteStore::open(&args.db)?;
            info!("schema ready in {}", args.db.display());
        }
        Command::ImportPeople { csv } => {
            let catalog = open_catalog(&args.db)?;
            print_report("people", &import_people(&catalog, &csv)?);
        }
        Command::ImportArtifacts { csv } => {
            let catalog = open_catalog(&args.db)?;
            print_report("artifacts", &import_artifacts(&catalog, &csv)?);
        }
        Command::Tools => {
            println!("{}", serde_json::to_string_pretty(&fedora::list_tools())?);
        }
    }

    Ok(())
}

fn open_catalog(db: &std::path::Path) -> Result<Catalog> {
    let store = SqliteStore::open(db)?;
    Ok(Catalog::new(Arc::new(store)))
}

fn print_report(what: &str, report: &ImportReport) {
    println!("✓ Inserted {} {}", report.inserted, what);
    if !report.rejected.is_empty() {
        println!("✗ Rejected {} rows:", report.rejected.len());
        for (line, reason) in &report.rejected {
            println!("   line {}: {}", line, reason);
        }
    }
}
