//! Fixed-size word chunking.
//!
//! Splits each text unit into windows of at most `max_chunk_words` words,
//! then halves any window that still exceeds the backend's hard input limit.
//! Chunks never overlap: joining them with single spaces gives back the
//! whitespace-normalized unit.

mod helpers;
mod types;

pub use helpers::{chunk_words, count_words, fit_to_limit};
pub use types::{Chunk, ChunkConfig};

use super::TextUnit;

/// Stateless chunker bound to one [`ChunkConfig`].
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Chunk one text unit. Indices are 0-based within the unit.
    pub fn chunk_unit(&self, unit: &TextUnit) -> Vec<Chunk> {
        chunk_words(&unit.text, self.config.max_chunk_words)
            .into_iter()
            .flat_map(|window| fit_to_limit(&window, self.config.backend_limit_words))
            .enumerate()
            .map(|(index, content)| Chunk {
                index,
                unit: unit.ordinal,
                words: count_words(&content),
                content,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
