//! Command-line driver: reads listing summaries from a JSON file, enriches
//! them and writes the CSV table.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rateflow::prelude::*;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "rateflow", version, about = "Enrich rental listings with nightly-rate calendars")]
struct Args {
    /// JSON file with listing summaries: a search-result envelope or a plain array.
    listings: PathBuf,

    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of listings to process from the front of the file.
    #[arg(short = 'n', long)]
    target_count: Option<usize>,

    /// CSV output path.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the result as JSON on stdout.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn load_config(&self) -> Result<RateflowConfig> {
        let mut config = match &self.config {
            Some(path) => RateflowConfig::from_json_file(path)?,
            None => RateflowConfig::default(),
        };
        if let Some(target_count) = self.target_count {
            config.pipeline.target_count = target_count;
        }
        if let Some(output) = &self.output {
            config.export.output_path.clone_from(output);
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.load_config()?;
    init_logging(&config.logging)?;

    let text = std::fs::read_to_string(&args.listings)
        .with_context(|| format!("Failed to read {}", args.listings.display()))?;
    let listings = listings_from_json(&text).context("Failed to decode listing summaries")?;
    info!(count = listings.len(), path = %args.listings.display(), "Loaded listings");

    let fetcher = Arc::new(HttpFetcher::new(config.fetch.clone())?);
    let pipeline = EnrichmentPipeline::from_config(fetcher, &config)
        .with_event_sink(Arc::new(LoggingEventSink::debug()));

    let token = Arc::new(CancellationToken::new());
    {
        let token = Arc::clone(&token);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel("interrupted");
            }
        });
    }

    let outcome = pipeline
        .run_with_cancellation(&listings, config.pipeline.target_count, token)
        .await?;

    match &outcome {
        RunOutcome::Completed(result) => {
            let exporter = CsvExporter::new(&config.export.output_path);
            exporter.export(&result.schema, &result.rows)?;
            info!(
                rows = result.row_count(),
                path = %exporter.path().display(),
                "Wrote rate table"
            );
        }
        RunOutcome::Empty(reason) => warn!(%reason, "Nothing to export"),
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }
    Ok(())
}
