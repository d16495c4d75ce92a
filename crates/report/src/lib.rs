//! Formatted PDF report output for collected summaries.

mod image;
pub mod layout;
mod writer;

pub use layout::{paginate, wrap, PlacedLine, WRAP_WIDTH};
pub use writer::{render, ReportError, FOOTER_TEXT};
