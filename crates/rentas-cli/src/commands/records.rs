//! Records command - inspect persisted extraction results.

use clap::{Args, Subcommand};
use console::style;

use rentas_core::store::{RecordStore, StoredRecord};

use super::load_config;

/// Arguments for the records command.
#[derive(Args)]
pub struct RecordsArgs {
    #[command(subcommand)]
    command: RecordsCommand,
}

#[derive(Subcommand)]
enum RecordsCommand {
    /// List stored records, most recent first
    List {
        /// Only records with this RADICADO
        #[arg(short, long)]
        radicado: Option<String>,

        /// Maximum number of records
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Print full records as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(args: RecordsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let Some(database) = &config.storage.database else {
        anyhow::bail!(
            "No database configured. Run 'rentas config set storage.database <path>' first."
        );
    };
    if !database.exists() {
        anyhow::bail!("Database not found: {}", database.display());
    }

    let store = RecordStore::open(database)?;

    match args.command {
        RecordsCommand::List { radicado, limit, json } => {
            let records = match radicado {
                Some(radicado) => store.find_by_radicado(&radicado)?,
                None => store.list(limit)?,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&to_json(&records))?);
            } else if records.is_empty() {
                println!("{} No records found.", style("ℹ").blue());
            } else {
                for record in &records {
                    println!("{}", format_line(record));
                }
            }
        }
    }

    Ok(())
}

fn to_json(records: &[StoredRecord]) -> serde_json::Value {
    records
        .iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id,
                "file_path": r.file_path,
                "processed_at": r.processed_at.to_rfc3339(),
                "data": r.fields,
            })
        })
        .collect()
}

fn format_line(record: &StoredRecord) -> String {
    format!(
        "{:>5}  {}  {:<14}  {:>2}/{}  {}",
        record.id,
        record.processed_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S"),
        record.radicado.as_deref().unwrap_or("-"),
        record.fields.found_count(),
        record.fields.len(),
        record.file_path
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentas_core::fields::FieldEngine;
    use std::path::Path;

    #[test]
    fn test_format_and_json() {
        let store = RecordStore::open_in_memory().unwrap();
        let result = FieldEngine::new().parse("RADICADO N°: 777   \nCLASE: VENTA");
        store.save(Path::new("/uploads/a.pdf"), &result).unwrap();

        let records = store.list(5).unwrap();
        let line = format_line(&records[0]);
        assert!(line.contains("777"));
        assert!(line.contains(" 2/13"));
        assert!(line.ends_with("/uploads/a.pdf"));

        let json = to_json(&records);
        assert_eq!(json[0]["data"]["CLASE"], "VENTA");
        assert_eq!(json[0]["file_path"], "/uploads/a.pdf");
    }
}
