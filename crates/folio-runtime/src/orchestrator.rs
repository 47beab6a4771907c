//! Orchestrator — one pipeline execution per document, bounded concurrency.

use std::sync::Arc;

use folio_core::{Error, ParseConfig, Result};
use folio_structure::{Document, Extraction, Pipeline};
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::types::BatchSummary;

/// Documents of a batch, in input order, plus the summary.
#[derive(Debug)]
pub struct BatchOutput {
    pub documents: Vec<Result<Document>>,
    pub summary: BatchSummary,
}

/// Runs the structuring pipeline over many documents.
pub struct Orchestrator {
    pipeline: Arc<Pipeline>,
    workers: usize,
}

impl Orchestrator {
    /// Validate `config` and size the worker pool (available cores by default).
    pub fn new(config: &ParseConfig) -> Result<Self> {
        let pipeline = Pipeline::new(config)?;
        let workers = config.workers.unwrap_or_else(available_workers);

        info!(
            "Orchestrator initialized: workers={}, min_words={}, max_words={:?}",
            workers,
            pipeline.thresholds().min_words_per_chapter,
            pipeline.thresholds().max_words_per_chunk
        );

        Ok(Self::with_pipeline(pipeline, workers))
    }

    /// Create with an explicit pipeline and worker count (for testing).
    pub fn with_pipeline(pipeline: Pipeline, workers: usize) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Structure one document on the current thread.
    pub fn parse_one(&self, extraction: Extraction) -> Document {
        self.pipeline.parse(extraction)
    }

    /// Structure every extraction, at most `workers` at a time.
    ///
    /// A worker that panics fails only its own slot.
    pub async fn parse_batch(&self, extractions: Vec<Extraction>) -> BatchOutput {
        let start = std::time::Instant::now();
        let total = extractions.len();
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut handles = Vec::with_capacity(total);

        for (index, extraction) in extractions.into_iter().enumerate() {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    handles.push(Err(Error::Internal(format!("worker pool closed: {}", e))));
                    continue;
                }
            };
            let pipeline = Arc::clone(&self.pipeline);
            handles.push(Ok(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                debug!("Worker parsing document {}", index);
                pipeline.parse(extraction)
            })));
        }

        let mut documents = Vec::with_capacity(total);
        for (index, handle) in handles.into_iter().enumerate() {
            let result = match handle {
                Ok(handle) => handle.await.map_err(|e| {
                    Error::Internal(format!("worker for document {} failed: {}", index, e))
                }),
                Err(e) => Err(e),
            };
            documents.push(result);
        }

        let mut summary = BatchSummary::tally(documents.iter().map(|r| r.as_ref().ok()));
        summary.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Batch complete: documents={}, failed={}, chapters={}, words={}, warnings={}, duration={}ms",
            summary.documents,
            summary.failed,
            summary.chapters,
            summary.words,
            summary.warnings,
            summary.duration_ms
        );

        BatchOutput { documents, summary }
    }
}

/// Number of cores available to this process.
pub fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
