//! Incremental per-file and per-folder summarization.
//!
//! Each file moves through `Detecting -> Extracting -> Summarizing -> Done`.
//! Text units are pulled one at a time, chunked, and dispatched; summaries
//! are yielded as soon as the dispatcher hands them back in order. Nothing
//! beyond one unit's in-flight window is held in memory.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::vec;

use summa_core::{Config, SummaryLength};
use summa_ingest::{extract_units_with, Chunk, ChunkConfig, Chunker, ExtractOptions, ExtractionError, TextUnits};
use summa_llm::{SharedBackend, SummaryBackend};
use tracing::{debug, error, info};

use crate::cancel::CancellationToken;
use crate::dispatch::{Dispatcher, OrderedResults};
use crate::error::PipelineError;
use crate::event::SummaryEvent;

#[derive(Debug, Clone, Default)]
pub struct SummarizerOptions {
    pub chunk: ChunkConfig,
    pub extract: ExtractOptions,
    pub length: SummaryLength,
    /// Worker threads (0 = one per CPU core).
    pub workers: usize,
    pub cancel: CancellationToken,
}

impl SummarizerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chunk: ChunkConfig::from(&config.chunking),
            extract: ExtractOptions {
                txt_block_bytes: config.chunking.txt_block_bytes,
            },
            length: config.pipeline.summary_length,
            workers: config.pipeline.workers,
            cancel: CancellationToken::new(),
        }
    }
}

/// Owns the worker pool and the loaded backend for its whole lifetime.
pub struct Summarizer {
    backend: Arc<dyn SummaryBackend>,
    dispatcher: Dispatcher,
    chunker: Chunker,
    options: SummarizerOptions,
}

impl Summarizer {
    /// Load the shared backend (once per process) and start the pool.
    /// Initialization failures surface here, before any file is touched.
    pub fn new(shared: &SharedBackend, options: SummarizerOptions) -> Result<Self, PipelineError> {
        let backend = shared.get()?;
        Self::with_backend(backend, options)
    }

    pub fn with_backend(
        backend: Arc<dyn SummaryBackend>,
        options: SummarizerOptions,
    ) -> Result<Self, PipelineError> {
        let dispatcher = Dispatcher::new(options.workers)?;
        info!(
            backend = backend.name(),
            workers = dispatcher.workers(),
            length = %options.length,
            max_chunk_words = options.chunk.max_chunk_words,
            "Summarizer ready"
        );
        Ok(Self {
            backend,
            dispatcher,
            chunker: Chunker::new(options.chunk.clone()),
            options,
        })
    }

    pub fn options(&self) -> &SummarizerOptions {
        &self.options
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.options.cancel.clone()
    }

    pub fn summarize_file(&self, path: impl AsRef<Path>) -> FileSummaries<'_> {
        FileSummaries {
            summarizer: self,
            path: path.as_ref().to_path_buf(),
            state: FileState::Detecting,
        }
    }

    pub fn summarize_folder(&self, dir: impl AsRef<Path>) -> FolderSummaries<'_> {
        let dir = dir.as_ref();
        let (files, failure) = match list_files(dir) {
            Ok(files) => {
                info!("Summarizing {} files in {}", files.len(), dir.display());
                (files, None)
            }
            Err(e) => {
                error!("Cannot read folder {}: {}", dir.display(), e);
                let event = SummaryEvent::Failed {
                    file: dir.to_path_buf(),
                    message: ExtractionError::Io(e).to_string(),
                };
                (VecDeque::new(), Some(event))
            }
        };
        FolderSummaries {
            summarizer: self,
            files,
            current: None,
            failure,
        }
    }

    /// Summarize a single file, or every regular file of a directory.
    pub fn summarize_path<'a>(&'a self, path: &Path) -> Box<dyn Iterator<Item = SummaryEvent> + 'a> {
        if path.is_dir() {
            Box::new(self.summarize_folder(path))
        } else {
            Box::new(self.summarize_file(path))
        }
    }
}

/// Regular files of `dir`, sorted by file name.
fn list_files(dir: &Path) -> std::io::Result<VecDeque<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files.into())
}

enum FileState {
    Detecting,
    Extracting(TextUnits),
    Summarizing {
        units: TextUnits,
        results: OrderedResults<vec::IntoIter<Chunk>>,
    },
    Done,
}

/// Lazy stream of events for one file.
pub struct FileSummaries<'a> {
    summarizer: &'a Summarizer,
    path: PathBuf,
    state: FileState,
}

impl FileSummaries<'_> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn fail(&self, e: ExtractionError) -> SummaryEvent {
        error!("Error reading {}: {}", self.path.display(), e);
        SummaryEvent::Failed {
            file: self.path.clone(),
            message: e.to_string(),
        }
    }
}

impl Iterator for FileSummaries<'_> {
    type Item = SummaryEvent;

    fn next(&mut self) -> Option<SummaryEvent> {
        let s = self.summarizer;
        loop {
            match std::mem::replace(&mut self.state, FileState::Done) {
                FileState::Detecting => match extract_units_with(&self.path, &s.options.extract) {
                    Ok(units) => {
                        info!("Summarizing {} ({})", self.path.display(), units.kind());
                        self.state = FileState::Extracting(units);
                    }
                    Err(ExtractionError::UnsupportedType(ext)) => {
                        info!("Skipping {}: unsupported type '{}'", self.path.display(), ext);
                        return Some(SummaryEvent::Unsupported {
                            file: self.path.clone(),
                        });
                    }
                    Err(e) => return Some(self.fail(e)),
                },
                FileState::Extracting(mut units) => {
                    if s.options.cancel.is_cancelled() {
                        info!("Cancelled while summarizing {}", self.path.display());
                        return None;
                    }
                    match units.next() {
                        None => {
                            info!("Finished {}", self.path.display());
                            return None;
                        }
                        Some(Err(e)) => return Some(self.fail(e)),
                        Some(Ok(unit)) if unit.text.trim().is_empty() => {
                            debug!("Skipping empty unit {} of {}", unit.ordinal, self.path.display());
                            self.state = FileState::Extracting(units);
                        }
                        Some(Ok(unit)) => {
                            let chunks = s.chunker.chunk_unit(&unit);
                            debug!(
                                unit = unit.ordinal,
                                chunks = chunks.len(),
                                "Dispatching unit of {}",
                                self.path.display()
                            );
                            let results = s.dispatcher.map(
                                chunks,
                                Arc::clone(&s.backend),
                                s.options.length,
                                s.options.cancel.clone(),
                            );
                            self.state = FileState::Summarizing { units, results };
                        }
                    }
                }
                FileState::Summarizing { units, mut results } => match results.next() {
                    Some(summary) => {
                        self.state = FileState::Summarizing { units, results };
                        return Some(SummaryEvent::Summary {
                            file: self.path.clone(),
                            unit: summary.unit,
                            chunk: summary.index,
                            source_bytes: summary.source_bytes,
                            text: summary.text,
                        });
                    }
                    None => self.state = FileState::Extracting(units),
                },
                FileState::Done => return None,
            }
        }
    }
}

/// Lazy stream of events for every regular file of a folder, in file-name
/// order.
pub struct FolderSummaries<'a> {
    summarizer: &'a Summarizer,
    files: VecDeque<PathBuf>,
    current: Option<FileSummaries<'a>>,
    failure: Option<SummaryEvent>,
}

impl Iterator for FolderSummaries<'_> {
    type Item = SummaryEvent;

    fn next(&mut self) -> Option<SummaryEvent> {
        if let Some(event) = self.failure.take() {
            return Some(event);
        }
        loop {
            if let Some(event) = self.current.as_mut().and_then(|file| file.next()) {
                return Some(event);
            }
            if self.summarizer.options.cancel.is_cancelled() {
                return None;
            }
            let path = self.files.pop_front()?;
            self.current = Some(self.summarizer.summarize_file(path));
        }
    }
}
