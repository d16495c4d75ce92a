use std::panic::{self, AssertUnwindSafe};

use super::{ExtractionError, TextUnit};

/// Extract one text unit per non-blank page. Ordinals are 1-based page
/// numbers, so skipped pages leave gaps.
pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<TextUnit>, ExtractionError> {
    // pdf-extract panics on some malformed inputs instead of returning Err.
    let pages = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem_by_pages(bytes)))
        .map_err(|_| ExtractionError::PdfError("parser panicked on malformed document".into()))?
        .map_err(|e| ExtractionError::PdfError(e.to_string()))?;

    let units: Vec<TextUnit> = pages
        .into_iter()
        .enumerate()
        .filter_map(|(i, page)| {
            let text = page.trim();
            (!text.is_empty()).then(|| TextUnit {
                ordinal: i + 1,
                text: text.to_string(),
            })
        })
        .collect();

    if units.is_empty() {
        // Scanned/image-only PDFs carry no text layer.
        tracing::warn!("PDF contains no extractable text");
    }
    Ok(units)
}
