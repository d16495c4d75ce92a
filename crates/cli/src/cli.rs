use std::path::PathBuf;

use clap::Parser;

/// Summarize PDF, DOCX and TXT documents with a local or hosted LLM.
///
/// PATH may be a single file or a folder; every regular file of a folder is
/// summarized in file-name order. Summaries are printed as they arrive.
#[derive(Parser, Debug)]
#[command(name = "summa", version, about = "Chunked document summarizer")]
pub struct CliArgs {
    /// File or folder to summarize
    #[arg(required_unless_present = "list_models")]
    pub path: Option<PathBuf>,

    /// Summary length: small, medium or large (default from SUMMARY_LENGTH)
    #[arg(long)]
    pub length: Option<String>,

    /// Maximum words per chunk (default from CHUNK_MAX_WORDS)
    #[arg(long)]
    pub chunk_words: Option<usize>,

    /// Worker threads, 0 for one per CPU core (default from SUMMARY_WORKERS)
    #[arg(long)]
    pub workers: Option<usize>,

    /// LLM provider: ollama or openai (default from LLM_PROVIDER)
    #[arg(long)]
    pub provider: Option<String>,

    /// Model name override for the selected provider
    #[arg(long)]
    pub model: Option<String>,

    /// Run the collected summary through LanguageTool before writing the report
    #[arg(long, requires = "pdf")]
    pub grammar: bool,

    /// Write the collected summaries to this PDF file
    #[arg(long, value_name = "OUT")]
    pub pdf: Option<PathBuf>,

    /// Report header
    #[arg(long, env = "SUMMA_REPORT_HEADER", default_value = "Document Summary")]
    pub header: String,

    /// Image placed in the report's top-right corner (JPEG only, .jpg or .jpeg)
    #[arg(long, requires = "pdf", value_parser = parse_jpeg_path)]
    pub image: Option<PathBuf>,

    /// List the models the configured provider serves, then exit
    #[arg(long)]
    pub list_models: bool,

    /// Measure the input first so progress can show a percentage
    #[arg(long)]
    pub total_progress: bool,
}

/// The report embeds images as DCT streams, so only JPEG files are taken.
fn parse_jpeg_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => Ok(path),
        _ => Err(format!("'{}' is not a JPEG image (.jpg or .jpeg)", value)),
    }
}
