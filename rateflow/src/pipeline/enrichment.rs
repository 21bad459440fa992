//! Batch orchestration: bounded concurrent fetches, then ordered finalisation.

use serde_json::json;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::assemble::{assemble, FetchedListing};
use super::models::{AggregateResult, RunOutcome};
use crate::calendar::{CalendarAligner, Clock};
use crate::cancellation::CancellationToken;
use crate::config::{PipelineConfig, RateflowConfig};
use crate::errors::{EmptyInputError, RateflowError};
use crate::events::{
    EventSink, NoOpEventSink, LISTING_COMPLETED, RUN_COMPLETED, RUN_FAILED, RUN_STARTED,
};
use crate::extract::EmbeddedStateExtractor;
use crate::fetch::{FetchConfig, FetchProgress, Fetcher};
use crate::listing::ListingSummary;
use crate::observability::SpanTimer;
use crate::table::TableExporter;

/// Enriches listing summaries with their nightly-rate calendars.
///
/// Each listing is fetched, decoded and aligned as an independent task on a
/// worker pool of `max_concurrent` permits. Results land in a slot per input
/// position; once every task has finished the slots are turned into rows in
/// input order, which is also when the table schema is widened. The first
/// failing listing cancels the rest and becomes the run's only error.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = EnrichmentPipeline::new(Arc::new(HttpFetcher::new(FetchConfig::new())?));
/// match pipeline.run(&listings, 50).await? {
///     RunOutcome::Completed(result) => println!("{} rows", result.row_count()),
///     RunOutcome::Empty(reason) => println!("{reason}"),
/// }
/// ```
pub struct EnrichmentPipeline {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<EmbeddedStateExtractor>,
    aligner: CalendarAligner,
    fetch_config: FetchConfig,
    config: PipelineConfig,
    event_sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for EnrichmentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentPipeline")
            .field("extractor", &self.extractor)
            .field("aligner", &self.aligner)
            .field("fetch_config", &self.fetch_config)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EnrichmentPipeline {
    /// Creates a pipeline with default configuration around `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(EmbeddedStateExtractor::new()),
            aligner: CalendarAligner::default(),
            fetch_config: FetchConfig::default(),
            config: PipelineConfig::default(),
            event_sink: Arc::new(NoOpEventSink),
        }
    }

    /// Creates a pipeline from a loaded configuration.
    #[must_use]
    pub fn from_config(fetcher: Arc<dyn Fetcher>, config: &RateflowConfig) -> Self {
        Self::new(fetcher)
            .with_config(config.pipeline.clone())
            .with_fetch_config(config.fetch.clone())
    }

    /// Sets the batch configuration.
    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the fetch configuration used to resolve detail URLs.
    #[must_use]
    pub fn with_fetch_config(mut self, fetch_config: FetchConfig) -> Self {
        self.fetch_config = fetch_config;
        self
    }

    /// Replaces the source of "today".
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.aligner = CalendarAligner::new(clock);
        self
    }

    /// Replaces the embedded-state extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: EmbeddedStateExtractor) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Batch configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Enriches the first `target_count` listings.
    ///
    /// Returns [`RunOutcome::Empty`] when that selection is empty. Any fetch
    /// or parse failure aborts the whole run.
    pub async fn run(
        &self,
        listings: &[ListingSummary],
        target_count: usize,
    ) -> Result<RunOutcome, RateflowError> {
        self.run_with_cancellation(listings, target_count, Arc::new(CancellationToken::new()))
            .await
    }

    /// Runs, then hands the table to `exporter`.
    ///
    /// An export failure is the run's error. Empty runs export nothing.
    pub async fn run_and_export(
        &self,
        listings: &[ListingSummary],
        target_count: usize,
        exporter: &dyn TableExporter,
    ) -> Result<RunOutcome, RateflowError> {
        let outcome = self.run(listings, target_count).await?;

        if let RunOutcome::Completed(result) = &outcome {
            exporter
                .export(&result.schema, &result.rows)
                .map_err(|e| {
                    error!(run_id = %result.run_id, error = %e, "Table export failed");
                    RateflowError::Export(e)
                })?;
        }

        Ok(outcome)
    }

    /// Like [`run`](Self::run), but aborts with [`RateflowError::Cancelled`]
    /// once `token` is cancelled.
    ///
    /// The token is only read. A failing listing does not cancel it.
    pub async fn run_with_cancellation(
        &self,
        listings: &[ListingSummary],
        target_count: usize,
        token: Arc<CancellationToken>,
    ) -> Result<RunOutcome, RateflowError> {
        self.config.validate().map_err(RateflowError::Config)?;

        let selected = &listings[..listings.len().min(target_count)];
        if selected.is_empty() {
            let reason = if listings.is_empty() {
                "no listings supplied"
            } else {
                "target count is zero"
            };
            info!(reason, "Nothing to enrich");
            return Ok(RunOutcome::Empty(EmptyInputError::new(reason)));
        }

        if token.is_cancelled() {
            return Err(cancelled_error(&token));
        }

        let run_id = Uuid::now_v7().to_string();
        let timer = SpanTimer::start();
        let window_length = self.aligner.window_length();

        info!(
            run_id = %run_id,
            listings = selected.len(),
            skipped = listings.len() - selected.len(),
            window_length,
            max_concurrent = self.config.max_concurrent,
            "Starting enrichment run"
        );
        self.event_sink.try_emit(
            RUN_STARTED,
            Some(json!({
                "runId": &run_id,
                "listings": selected.len(),
                "windowLength": window_length,
            })),
        );

        let fetched = match self.fetch_all(selected, window_length, &run_id, &token).await {
            Ok(fetched) => fetched,
            Err(e) => {
                error!(run_id = %run_id, error = %e, "Enrichment run failed");
                self.event_sink.try_emit(
                    RUN_FAILED,
                    Some(json!({ "runId": &run_id, "error": e.to_dict() })),
                );
                return Err(e);
            }
        };

        let assembled = assemble(
            fetched,
            &self.config.default_currency_symbol,
            &run_id,
            self.event_sink.as_ref(),
        );
        let result = AggregateResult {
            run_id,
            rows: assembled.rows,
            per_listing_rate_maps: assembled.rate_maps,
            schema: assembled.schema,
        };

        let elapsed_ms = timer.elapsed_ms();
        info!(
            run_id = %result.run_id,
            rows = result.row_count(),
            columns = result.schema.len(),
            elapsed_ms,
            "Enrichment run complete"
        );
        self.event_sink.try_emit(
            RUN_COMPLETED,
            Some(json!({
                "runId": &result.run_id,
                "rows": result.row_count(),
                "columns": result.schema.len(),
                "durationMs": elapsed_ms,
            })),
        );

        Ok(RunOutcome::Completed(result))
    }

    /// Fetches every selected listing and returns them in input order.
    async fn fetch_all(
        &self,
        selected: &[ListingSummary],
        window_length: usize,
        run_id: &str,
        token: &Arc<CancellationToken>,
    ) -> Result<Vec<FetchedListing>, RateflowError> {
        let jobs = selected
            .iter()
            .enumerate()
            .map(|(index, listing)| {
                let url = self
                    .fetch_config
                    .resolve_url(&listing.detail_url)
                    .map_err(|source| RateflowError::Fetch {
                        listing_id: listing.id.clone(),
                        url: listing.detail_url.clone(),
                        source,
                    })?;
                Ok(ListingJob {
                    index,
                    listing: listing.clone(),
                    url,
                })
            })
            .collect::<Result<Vec<_>, RateflowError>>()?;

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent));
        let mut tasks = JoinSet::new();
        for job in jobs {
            tasks.spawn(process_listing(
                job,
                Worker {
                    fetcher: Arc::clone(&self.fetcher),
                    extractor: Arc::clone(&self.extractor),
                    aligner: self.aligner.clone(),
                    semaphore: Arc::clone(&semaphore),
                    token: Arc::clone(token),
                    window_length,
                },
            ));
        }

        let mut slots: Vec<Option<FetchedListing>> = (0..selected.len()).map(|_| None).collect();
        let mut progress = FetchProgress::new(selected.len());

        while let Some(joined) = tasks.join_next().await {
            let outcome = joined
                .map_err(|e| RateflowError::Internal(format!("listing task failed: {e}")))
                .and_then(std::convert::identity);

            match outcome {
                Ok(item) => {
                    let percent = progress.advance();
                    info!(run_id, listing_id = %item.listing.id, percent, "Progress: {percent}%");
                    self.event_sink.try_emit(
                        LISTING_COMPLETED,
                        Some(json!({
                            "runId": run_id,
                            "listingId": &item.listing.id,
                            "index": item.index,
                            "hasDates": item.window.is_some(),
                            "completed": progress.completed,
                            "total": progress.total,
                            "percent": percent,
                        })),
                    );
                    let index = item.index;
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(item);
                    }
                }
                Err(e) => {
                    // The caller's token is left alone; aborting drops the in-flight tasks.
                    tasks.abort_all();
                    return Err(e);
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

/// One listing to process.
struct ListingJob {
    index: usize,
    listing: ListingSummary,
    url: String,
}

/// Shared handles each listing task needs.
struct Worker {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<EmbeddedStateExtractor>,
    aligner: CalendarAligner,
    semaphore: Arc<Semaphore>,
    token: Arc<CancellationToken>,
    window_length: usize,
}

async fn process_listing(job: ListingJob, worker: Worker) -> Result<FetchedListing, RateflowError> {
    let token = &worker.token;

    let permit = tokio::select! {
        () = token.cancelled() => return Err(cancelled_error(token)),
        permit = Arc::clone(&worker.semaphore).acquire_owned() => permit
            .map_err(|_| RateflowError::Internal("worker pool closed".to_string()))?,
    };

    debug!(listing_id = %job.listing.id, url = %job.url, "Fetching detail page");
    let html = tokio::select! {
        () = token.cancelled() => return Err(cancelled_error(token)),
        fetched = worker.fetcher.fetch(&job.url) => fetched.map_err(|source| RateflowError::Fetch {
            listing_id: job.listing.id.clone(),
            url: job.url.clone(),
            source,
        })?,
    };
    drop(permit);

    let summary = worker
        .extractor
        .extract(&html)
        .map_err(|source| RateflowError::Parse {
            listing_id: job.listing.id.clone(),
            source,
        })?;
    let window = summary
        .date_range()
        .map(|(begin, end)| worker.aligner.align(begin, end, worker.window_length));

    Ok(FetchedListing {
        index: job.index,
        listing: job.listing,
        url: job.url,
        summary,
        window,
    })
}

fn cancelled_error(token: &CancellationToken) -> RateflowError {
    RateflowError::Cancelled(token.reason().unwrap_or_else(|| "run cancelled".to_string()))
}
