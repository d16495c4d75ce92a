//! Process-wide summarization backend with one-time initialization.

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use tracing::{error, info};

use crate::provider::{LlmError, SummaryBackend};

type Factory = Box<dyn Fn() -> Result<Arc<dyn SummaryBackend>, LlmError> + Send + Sync>;

/// Lazily loaded backend shared by every worker.
///
/// The factory runs at most once, even when several threads call [`get`]
/// concurrently; late callers block until the first load finishes. The
/// outcome is cached, so a failed load keeps failing without retrying.
///
/// [`get`]: SharedBackend::get
pub struct SharedBackend {
    factory: Factory,
    cell: OnceLock<Result<Arc<dyn SummaryBackend>, String>>,
}

impl SharedBackend {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn SummaryBackend>, LlmError> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            cell: OnceLock::new(),
        }
    }

    /// Wrap an already-loaded backend.
    pub fn ready(backend: Arc<dyn SummaryBackend>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Ok(backend));
        Self {
            factory: Box::new(|| Err(LlmError::Init("backend already loaded".into()))),
            cell,
        }
    }

    /// Load the backend on first call and return it.
    pub fn get(&self) -> Result<Arc<dyn SummaryBackend>, LlmError> {
        let slot = self.cell.get_or_init(|| {
            info!("Initializing summarization backend");
            let started = Instant::now();
            match (self.factory)() {
                Ok(backend) => {
                    info!(
                        backend = backend.name(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Summarization backend ready"
                    );
                    Ok(backend)
                }
                Err(e) => {
                    error!(error = %e, "Summarization backend failed to initialize");
                    Err(e.to_string())
                }
            }
        });
        slot.clone().map_err(LlmError::Init)
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl fmt::Debug for SharedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBackend")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
