pub mod cancel;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod progress;
pub mod summarizer;

pub use cancel::CancellationToken;
pub use dispatch::{ChunkSummary, Dispatcher, OrderedResults};
pub use error::PipelineError;
pub use event::SummaryEvent;
pub use progress::Progress;
pub use summarizer::{FileSummaries, FolderSummaries, Summarizer, SummarizerOptions};
