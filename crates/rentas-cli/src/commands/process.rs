//! Process command - extract fields from a single settlement PDF.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use rentas_core::fields::CATALOG;
use rentas_core::models::record::ExtractionResult;
use rentas_core::models::wire::DataResponse;
use rentas_core::pipeline::IngestionPipeline;

use super::{load_config, open_store};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show how many fields were found
    #[arg(long)]
    show_summary: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON `{"data": ...}` envelope
    Json,
    /// CSV with one column per field
    Csv,
    /// Plain text, one field per line
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let store = open_store(&config)?;

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message("Extracting fields...");

    let pipeline = IngestionPipeline::from_config(&config.pdf);
    let input = args.input.clone();
    let outcome = tokio::task::spawn_blocking(move || pipeline.process(&input)).await?;

    let result = match outcome {
        Ok(result) => {
            pb.finish_with_message("Done");
            result
        }
        Err(e) => {
            pb.finish_and_clear();
            anyhow::bail!("Failed to process {}: {} ({:?})", args.input.display(), e, e.kind());
        }
    };

    if let Some(store) = &store {
        rentas_core::channel::persist(store, &args.input, &result);
    }

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_summary {
        println!();
        println!(
            "{} Fields found: {}/{}",
            style("ℹ").blue(),
            result.found_count(),
            result.len()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(&DataResponse {
            data: result.clone(),
        })?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(CATALOG.iter().map(|spec| spec.field_name))?;
    wtr.write_record(CATALOG.iter().map(|spec| result.value(spec.field_name)))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let width = CATALOG.iter().map(|spec| spec.field_name.len()).max().unwrap_or(0);

    result
        .iter()
        .map(|(name, value)| format!("{:width$}  {}\n", name, value, width = width))
        .collect()
}
