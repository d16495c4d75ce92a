pub mod chunker;
mod docx;
mod pdf;
mod txt;

use std::fs::File;
use std::path::Path;

use summa_core::DocumentKind;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("DOCX extraction failed: {0}")]
    DocxError(String),
    #[error("Text is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One extraction-granularity piece of a document: a PDF page, a DOCX
/// paragraph or a plain-text block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    /// 1-based position of the unit within its document.
    pub ordinal: usize,
    /// The extracted text content.
    pub text: String,
}

impl TextUnit {
    pub fn byte_len(&self) -> usize {
        self.text.len()
    }
}

/// Extraction knobs that depend on the document kind.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Block size in bytes for streaming plain-text files.
    pub txt_block_bytes: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { txt_block_bytes: 2048 }
    }
}

/// Lazy sequence of text units for one document.
///
/// Plain-text files are streamed block by block; PDF and DOCX units are
/// parsed up front (both formats need the whole file to be decoded) and then
/// handed out one at a time.
pub struct TextUnits {
    kind: DocumentKind,
    source: UnitSource,
}

enum UnitSource {
    Parsed(std::vec::IntoIter<TextUnit>),
    Blocks(txt::BlockReader<File>),
}

impl TextUnits {
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }
}

impl Iterator for TextUnits {
    type Item = Result<TextUnit, ExtractionError>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.source {
            UnitSource::Parsed(units) => units.next().map(Ok),
            UnitSource::Blocks(reader) => reader.next(),
        }
    }
}

fn detect(path: &Path) -> Result<DocumentKind, ExtractionError> {
    DocumentKind::from_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        ExtractionError::UnsupportedType(ext)
    })
}

/// Open a document and return its text units with default options.
pub fn extract_units(path: impl AsRef<Path>) -> Result<TextUnits, ExtractionError> {
    extract_units_with(path, &ExtractOptions::default())
}

/// Open a document and return its text units.
///
/// Unsupported extensions are reported as [`ExtractionError::UnsupportedType`]
/// before the file is touched.
pub fn extract_units_with(
    path: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<TextUnits, ExtractionError> {
    let path = path.as_ref();
    let kind = detect(path)?;
    debug!("Extracting {} as {}", path.display(), kind);

    let source = match kind {
        DocumentKind::Pdf => {
            let bytes = std::fs::read(path)?;
            UnitSource::Parsed(pdf::extract_pdf(&bytes)?.into_iter())
        }
        DocumentKind::Docx => {
            let file = File::open(path)?;
            UnitSource::Parsed(docx::extract_docx(file)?.into_iter())
        }
        DocumentKind::Txt => {
            let file = File::open(path)?;
            UnitSource::Blocks(txt::BlockReader::new(file, options.txt_block_bytes))
        }
    };

    Ok(TextUnits { kind, source })
}

/// Total byte length of all text units of a document.
///
/// Used as the denominator for progress reporting. Plain-text files are
/// measured from metadata without reading them.
pub fn measure_total(path: impl AsRef<Path>) -> Result<u64, ExtractionError> {
    let path = path.as_ref();
    match detect(path)? {
        DocumentKind::Txt => Ok(std::fs::metadata(path)?.len()),
        _ => {
            let mut total = 0u64;
            for unit in extract_units(path)? {
                total += unit?.byte_len() as u64;
            }
            Ok(total)
        }
    }
}

/// Sum of [`measure_total`] over the regular files of a directory.
/// Files that cannot be measured count as zero.
pub fn measure_total_folder(dir: impl AsRef<Path>) -> Result<u64, ExtractionError> {
    let mut total = 0u64;
    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match measure_total(&path) {
            Ok(n) => total += n,
            Err(e) => debug!("Skipping {} in total: {}", path.display(), e),
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unsupported_extension_is_typed() {
        let err = extract_units("report.xyz").err().unwrap();
        assert!(matches!(err, ExtractionError::UnsupportedType(ref ext) if ext == "xyz"));
        assert_eq!(err.to_string(), "Unsupported file type: xyz");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_units(dir.path().join("absent.txt")).err().unwrap();
        assert!(matches!(err, ExtractionError::Io(_)));
    }

    #[test]
    fn txt_units_stream_in_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let text = (0..500).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        std::fs::write(&path, &text).unwrap();

        let units: Vec<TextUnit> = extract_units_with(&path, &ExtractOptions { txt_block_bytes: 256 })
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert!(units.len() > 1);
        let rejoined = units.iter().map(|u| u.text.as_str()).collect::<Vec<_>>().join(" ");
        assert_eq!(rejoined.split_whitespace().collect::<Vec<_>>().join(" "), text);
    }

    #[test]
    fn corrupt_pdf_fails_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        let mut f = File::create(&path).unwrap();
        f.write_all(b"this is not a pdf at all").unwrap();

        let err = extract_units(&path).err().unwrap();
        assert!(matches!(err, ExtractionError::PdfError(_)));
    }

    #[test]
    fn measures_txt_from_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "hello world").unwrap();
        assert_eq!(measure_total(&path).unwrap(), 11);
    }

    #[test]
    fn folder_total_skips_unmeasurable_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "abc").unwrap();
        std::fs::write(dir.path().join("b.txt"), "defgh").unwrap();
        std::fs::write(dir.path().join("c.xyz"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        assert_eq!(measure_total_folder(dir.path()).unwrap(), 8);
    }
}
