//! Order-preserving parallel summarization over a bounded worker pool.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use summa_core::SummaryLength;
use summa_ingest::Chunk;
use summa_llm::SummaryBackend;
use tracing::{debug, warn};

use crate::cancel::CancellationToken;
use crate::error::PipelineError;

/// Summary of one chunk, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSummary {
    /// Chunk index within its text unit.
    pub index: usize,
    /// Ordinal of the text unit.
    pub unit: usize,
    /// Bytes of source text the summary covers.
    pub source_bytes: usize,
    /// Backend output, or empty when the backend failed.
    pub text: String,
}

/// Owns a long-lived rayon pool and fans chunks out over it.
pub struct Dispatcher {
    pool: Arc<rayon::ThreadPool>,
    workers: usize,
}

impl Dispatcher {
    /// Build a pool with `workers` threads (0 = one per CPU core).
    pub fn new(workers: usize) -> Result<Self, PipelineError> {
        let workers = if workers == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            workers
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("summa-worker-{i}"))
            .build()?;
        debug!("Dispatcher pool started with {} workers", workers);
        Ok(Self {
            pool: Arc::new(pool),
            workers,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Summarize `chunks` in parallel, yielding results in input order.
    ///
    /// The returned iterator is lazy: chunks are submitted as results are
    /// drained, with at most two per worker in flight. `cancel` is checked
    /// before every submission.
    pub fn map<I>(
        &self,
        chunks: I,
        backend: Arc<dyn SummaryBackend>,
        length: SummaryLength,
        cancel: CancellationToken,
    ) -> OrderedResults<I::IntoIter>
    where
        I: IntoIterator<Item = Chunk>,
    {
        OrderedResults {
            pool: Arc::clone(&self.pool),
            chunks: chunks.into_iter(),
            pending: VecDeque::new(),
            window: self.workers * 2,
            backend,
            length,
            cancel,
        }
    }
}

struct Pending {
    index: usize,
    unit: usize,
    source_bytes: usize,
    rx: Receiver<String>,
}

/// Lazy, single-pass sequence of chunk summaries in submission order.
pub struct OrderedResults<I> {
    pool: Arc<rayon::ThreadPool>,
    chunks: I,
    pending: VecDeque<Pending>,
    window: usize,
    backend: Arc<dyn SummaryBackend>,
    length: SummaryLength,
    cancel: CancellationToken,
}

impl<I: Iterator<Item = Chunk>> OrderedResults<I> {
    fn fill(&mut self) {
        while self.pending.len() < self.window {
            if self.cancel.is_cancelled() {
                return;
            }
            let Some(chunk) = self.chunks.next() else {
                return;
            };
            let (tx, rx) = mpsc::sync_channel(1);
            self.pending.push_back(Pending {
                index: chunk.index,
                unit: chunk.unit,
                source_bytes: chunk.content.len(),
                rx,
            });

            let backend = Arc::clone(&self.backend);
            let length = self.length;
            self.pool.spawn(move || {
                let summary = summarize_chunk(backend.as_ref(), &chunk, length);
                // The consumer may have dropped the iterator.
                let _ = tx.send(summary);
            });
        }
    }
}

impl<I: Iterator<Item = Chunk>> Iterator for OrderedResults<I> {
    type Item = ChunkSummary;

    fn next(&mut self) -> Option<ChunkSummary> {
        self.fill();
        let pending = self.pending.pop_front()?;
        let text = pending.rx.recv().unwrap_or_default();
        Some(ChunkSummary {
            index: pending.index,
            unit: pending.unit,
            source_bytes: pending.source_bytes,
            text,
        })
    }
}

/// Run the backend on one chunk, mapping errors and panics to "".
pub fn summarize_chunk(backend: &dyn SummaryBackend, chunk: &Chunk, length: SummaryLength) -> String {
    let (min_length, max_length) = length.bounds(chunk.words);
    debug!(
        unit = chunk.unit,
        chunk = chunk.index,
        words = chunk.words,
        min_length,
        max_length,
        "Summarizing chunk"
    );

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        backend.summarize(&chunk.content, min_length, max_length)
    }));
    match outcome {
        Ok(Ok(summary)) => summary,
        Ok(Err(e)) => {
            warn!(unit = chunk.unit, chunk = chunk.index, error = %e, "Chunk summarization failed");
            String::new()
        }
        Err(_) => {
            warn!(unit = chunk.unit, chunk = chunk.index, "Backend panicked while summarizing chunk");
            String::new()
        }
    }
}
