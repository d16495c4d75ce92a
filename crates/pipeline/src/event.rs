use std::path::{Path, PathBuf};

/// Sentinel text for files whose extension is not supported.
pub const UNSUPPORTED_FORMAT: &str = "Unsupported file format.";

/// One item of the summarizer's output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryEvent {
    /// Summary of one chunk.
    Summary {
        file: PathBuf,
        unit: usize,
        chunk: usize,
        source_bytes: usize,
        text: String,
    },
    /// The file's extension is not pdf, docx or txt.
    Unsupported { file: PathBuf },
    /// The file could not be read; nothing further is produced for it.
    Failed { file: PathBuf, message: String },
}

impl SummaryEvent {
    pub fn file(&self) -> &Path {
        match self {
            Self::Summary { file, .. } | Self::Unsupported { file } | Self::Failed { file, .. } => file,
        }
    }

    /// The string a presentation layer shows for this event.
    pub fn text(&self) -> String {
        match self {
            Self::Summary { text, .. } => text.clone(),
            Self::Unsupported { .. } => UNSUPPORTED_FORMAT.to_string(),
            Self::Failed { message, .. } => format!("Error reading file: {message}"),
        }
    }

    /// Bytes of source text consumed to produce this event.
    pub fn source_bytes(&self) -> usize {
        match self {
            Self::Summary { source_bytes, .. } => *source_bytes,
            _ => 0,
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Summary { .. })
    }
}
