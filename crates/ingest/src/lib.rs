pub mod document;

pub use document::chunker::{Chunk, ChunkConfig, Chunker};
pub use document::{
    extract_units, extract_units_with, measure_total, measure_total_folder, ExtractOptions,
    ExtractionError, TextUnit, TextUnits,
};
