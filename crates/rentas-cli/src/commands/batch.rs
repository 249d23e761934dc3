//! Batch processing command for multiple settlement PDFs.
//!
//! Also the manual re-trigger for files the watcher failed to process.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use rentas_core::channel::persist;
use rentas_core::fields::CATALOG;
use rentas_core::models::record::ExtractionResult;
use rentas_core::pipeline::{has_pdf_extension, IngestionPipeline};

use super::process::{format_result, OutputFormat};
use super::{load_config, open_store};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    result: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let store = open_store(&config)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| has_pdf_extension(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let pipeline = Arc::new(IngestionPipeline::from_config(&config.pdf));
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();

        let worker = Arc::clone(&pipeline);
        let input = path.clone();
        let outcome = tokio::task::spawn_blocking(move || worker.process(&input)).await?;

        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok(result) => {
                if let Some(store) = &store {
                    persist(store, &path, &result);
                }
                results.push(ProcessResult {
                    path,
                    result: Some(result),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        result: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.result.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for item in &successful {
            if let Some(result) = &item.result {
                let output_name = item.path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("boleta");

                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_result(result, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args.output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for item in &failed {
            println!(
                "  - {}: {}",
                item.path.display(),
                item.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// One row per file: status, every field, timing and error.
fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status"];
    header.extend(CATALOG.iter().map(|spec| spec.field_name));
    header.extend(["processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for item in results {
        let filename = item.path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let mut row = vec![filename.to_string()];
        match &item.result {
            Some(result) => {
                row.push("success".to_string());
                row.extend(CATALOG.iter().map(|spec| result.value(spec.field_name).to_string()));
            }
            None => {
                row.push("error".to_string());
                row.extend(CATALOG.iter().map(|_| String::new()));
            }
        }
        row.push(item.processing_time_ms.to_string());
        row.push(item.error.clone().unwrap_or_default());

        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentas_core::fields::FieldEngine;

    #[test]
    fn test_summary_rows() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("summary.csv");

        let results = vec![
            ProcessResult {
                path: PathBuf::from("/uploads/a.pdf"),
                result: Some(FieldEngine::new().parse("RADICADO N°: 42   ")),
                error: None,
                processing_time_ms: 12,
            },
            ProcessResult {
                path: PathBuf::from("/uploads/b.pdf"),
                result: None,
                error: Some("no extractable text in document".to_string()),
                processing_time_ms: 3,
            },
        ];
        write_summary(&summary, &results).unwrap();

        let mut reader = csv::Reader::from_path(&summary).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), CATALOG.len() + 4);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "a.pdf");
        assert_eq!(&rows[0][1], "success");
        assert_eq!(&rows[0][2], "42");
        assert_eq!(&rows[1][1], "error");
        assert_eq!(&rows[1][CATALOG.len() + 3], "no extractable text in document");
    }
}
