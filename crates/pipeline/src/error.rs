use summa_llm::LlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("summarization backend unavailable: {0}")]
    Backend(#[from] LlmError),

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
