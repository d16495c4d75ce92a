pub mod grammar;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod shared;

pub use grammar::{GrammarCorrector, LanguageToolCorrector, NoopCorrector};
pub use provider::{FnBackend, LlmError, Message, Role, SummaryBackend};
pub use providers::{backend_factory, create_backend};
pub use shared::SharedBackend;
