mod sheet;

use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use database::{export, import, kpi, location, Database};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "importer")]
#[command(about = "Import distributor spreadsheets into Vanto CRM and export contacts")]
struct Args {
    /// SQLite database URL. Falls back to SQLITE_PATH env.
    #[arg(long, global = true)]
    database: Option<String>,

    /// Keep the database in the OS temp directory. Falls back to CRM_TEMP_STORAGE env.
    #[arg(long, global = true)]
    temp_storage: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upsert contacts from a CSV or Excel file
    Import {
        /// Input file (.csv, .xlsx, .xls, .ods)
        file: PathBuf,

        /// Worksheet to read (defaults to the first)
        #[arg(long)]
        sheet: Option<String>,
    },

    /// Write every contact to a CSV file
    Export {
        /// Output file
        file: PathBuf,
    },

    /// Print the dashboard counts
    Kpis,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let explicit = args.database.or_else(|| env::var("SQLITE_PATH").ok());
    let temp_storage = args.temp_storage
        || location::temp_storage_enabled(env::var(location::TEMP_STORAGE_VAR).ok().as_deref());
    let url = location::resolve_url(explicit.as_deref(), temp_storage);

    let db = Database::connect(&url).await?;
    db.ensure_schema().await?;

    match args.command {
        Command::Import { file, sheet } => {
            let records = sheet::read_records(&file, sheet.as_deref())?;
            info!(file = %file.display(), rows = records.len(), "Read spreadsheet");

            let summary = import::import_batch(db.pool(), &records).await?;
            println!(
                "Imported {} rows: {} new, {} updated, {} with recovered values",
                summary.total(),
                summary.inserted,
                summary.updated,
                summary.recovered
            );
        }
        Command::Export { file } => {
            let writer = BufWriter::new(File::create(&file)?);
            let rows = export::export_csv(db.pool(), writer).await?;
            println!("Exported {} contacts to {}", rows, file.display());
        }
        Command::Kpis => {
            let kpis = kpi::kpis(db.pool()).await?;
            for (name, count) in kpis.as_map() {
                println!("{:<16}{}", name, count);
            }

            let levels = kpi::level_distribution(db.pool()).await?;
            if !levels.is_empty() {
                println!();
                for level in levels {
                    println!("level {:<10}{}", level.level, level.count);
                }
            }
        }
    }

    db.close().await;
    Ok(())
}
