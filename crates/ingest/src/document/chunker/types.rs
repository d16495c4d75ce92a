//! Chunk configuration and output types.

// ── Configuration ───────────────────────────────────────────────────────────

/// Configuration for the chunker.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Maximum words per chunk (default: 400).
    pub max_chunk_words: usize,
    /// Hard input limit of the summarization backend (default: 1024).
    pub backend_limit_words: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chunk_words: 400,
            backend_limit_words: 1024,
        }
    }
}

impl From<&summa_core::config::ChunkingConfig> for ChunkConfig {
    fn from(c: &summa_core::config::ChunkingConfig) -> Self {
        Self {
            max_chunk_words: c.max_chunk_words,
            backend_limit_words: c.backend_max_words,
        }
    }
}

// ── Chunk output ────────────────────────────────────────────────────────────

/// A chunk of words ready for the summarization backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based index within the text unit.
    pub index: usize,
    /// Ordinal of the text unit the chunk came from.
    pub unit: usize,
    /// Space-joined words.
    pub content: String,
    /// Word count of `content`.
    pub words: usize,
}

impl Chunk {
    /// Build a standalone chunk, e.g. for feeding the dispatcher directly.
    pub fn new(index: usize, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            index,
            unit: 0,
            words: content.split_whitespace().count(),
            content,
        }
    }
}
