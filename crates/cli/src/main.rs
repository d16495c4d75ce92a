mod cli;
mod terminal;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use summa_core::config::load_dotenv;
use summa_core::Config;
use summa_ingest::{measure_total, measure_total_folder};
use summa_llm::{backend_factory, create_backend, GrammarCorrector, LanguageToolCorrector, SharedBackend};
use summa_pipeline::{CancellationToken, Progress, Summarizer, SummarizerOptions, SummaryEvent};

use crate::cli::CliArgs;
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only summaries.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let args = CliArgs::parse();
    let mut config = Config::from_env();
    apply_overrides(&mut config, &args)?;
    config.log_summary();

    // First Ctrl+C cancels cooperatively, a second one exits immediately.
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, finishing chunks in flight");
            signal_token.cancel();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    // The pipeline and the HTTP backends are blocking.
    tokio::task::spawn_blocking(move || run(args, config, cancel))
        .await
        .context("summarizer task panicked")?
}

/// Fold command-line flags over the environment config.
fn apply_overrides(config: &mut Config, args: &CliArgs) -> Result<()> {
    if let Some(provider) = &args.provider {
        config.llm.provider = provider.to_lowercase();
    }
    if let Some(model) = &args.model {
        match config.llm.provider.as_str() {
            "openai" => config.llm.openai_model = model.clone(),
            _ => config.ollama.model = model.clone(),
        }
    }
    if let Some(length) = &args.length {
        config.pipeline.summary_length = length
            .parse()
            .with_context(|| format!("invalid --length '{}'", length))?;
    }
    if let Some(words) = args.chunk_words {
        config.chunking.max_chunk_words = words.max(1);
    }
    if let Some(workers) = args.workers {
        config.pipeline.workers = workers;
    }
    Ok(())
}

fn run(args: CliArgs, config: Config, cancel: CancellationToken) -> Result<()> {
    let terminal = Terminal::new();

    if args.list_models {
        let backend = create_backend(&config.llm, &config.ollama).context("failed to create LLM backend")?;
        let models = backend
            .list_models()
            .with_context(|| format!("failed to list models from {}", backend.name()))?;
        terminal.print_models(backend.name(), &models)?;
        return Ok(());
    }

    let path = args.path.clone().context("no input path given")?;
    terminal.print_banner(&config.llm.provider, config.model_name())?;

    let shared = SharedBackend::new(backend_factory(config.llm.clone(), config.ollama.clone()));
    let mut options = SummarizerOptions::from_config(&config);
    options.cancel = cancel.clone();

    let spinner = terminal.start_spinner("Initializing model...")?;
    let summarizer = Summarizer::new(&shared, options);
    spinner.stop();
    let summarizer = summarizer.context("failed to initialize summarization backend")?;

    let folder = path.is_dir();
    let total = if args.total_progress { measure(&path, folder) } else { 0 };
    let mut progress = Progress::new(total);
    let mut report = args.pdf.as_ref().map(|_| ReportText::new(folder));
    let mut current_file: Option<PathBuf> = None;
    let mut count = 0;

    for event in summarizer.summarize_path(&path) {
        if folder && current_file.as_deref() != Some(event.file()) {
            terminal.print_file_header(event.file())?;
            current_file = Some(event.file().to_path_buf());
        }
        terminal.display_event(&event)?;
        progress.record(&event);
        count += 1;
        terminal.print_progress(&progress, count)?;
        if let Some(report) = report.as_mut() {
            report.push(&event);
        }
    }

    if cancel.is_cancelled() {
        terminal.print_info("[cancelled]")?;
    } else {
        progress.finish();
        terminal.print_progress(&progress, count)?;
        terminal.keep_progress()?;
        terminal.print_info(&format!("Done: {} chunks summarized", count))?;
    }

    if let (Some(out), Some(report)) = (args.pdf.as_ref(), report) {
        let mut text = report.text();
        if args.grammar {
            text = correct_grammar(&config, &terminal, text)?;
        }
        summa_report::render(out, &text, &args.header, args.image.as_deref())
            .with_context(|| format!("failed to write report to {}", out.display()))?;
        terminal.print_info(&format!("Report written to {}", out.display()))?;
    }

    Ok(())
}

/// Total bytes to process, or 0 when the input cannot be measured.
fn measure(path: &Path, folder: bool) -> u64 {
    let measured = if folder { measure_total_folder(path) } else { measure_total(path) };
    measured.unwrap_or_else(|e| {
        warn!("Cannot measure {} for progress: {}", path.display(), e);
        0
    })
}

/// Run `text` through LanguageTool. A failing server leaves the text as is.
fn correct_grammar(config: &Config, terminal: &Terminal, text: String) -> Result<String> {
    let corrector = LanguageToolCorrector::new(
        config.grammar.url.clone(),
        config.grammar.language.clone(),
        Duration::from_secs(config.llm.timeout_secs.max(1)),
    )
    .context("failed to create grammar corrector")?;

    let spinner = terminal.start_spinner("Correcting grammar...")?;
    let corrected = corrector.correct(&text);
    spinner.stop();
    match corrected {
        Ok(corrected) => Ok(corrected),
        Err(e) => {
            warn!(error = %e, "Grammar correction failed, keeping uncorrected text");
            terminal.print_error(&format!("grammar correction failed: {}", e))?;
            Ok(text)
        }
    }
}

/// Report body assembled from events, one paragraph per summary. Folder
/// input gets a file-name paragraph ahead of each file's summaries.
struct ReportText {
    folder: bool,
    current_file: Option<PathBuf>,
    paragraphs: Vec<String>,
}

impl ReportText {
    fn new(folder: bool) -> Self {
        Self {
            folder,
            current_file: None,
            paragraphs: Vec::new(),
        }
    }

    fn push(&mut self, event: &SummaryEvent) {
        if self.folder && self.current_file.as_deref() != Some(event.file()) {
            let name = event
                .file()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| event.file().display().to_string());
            self.paragraphs.push(name);
            self.current_file = Some(event.file().to_path_buf());
        }
        let text = event.text();
        if !text.trim().is_empty() {
            self.paragraphs.push(text);
        }
    }

    fn text(&self) -> String {
        self.paragraphs.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use summa_core::SummaryLength;

    fn summary(file: &str, text: &str) -> SummaryEvent {
        SummaryEvent::Summary {
            file: PathBuf::from(file),
            unit: 1,
            chunk: 0,
            source_bytes: 10,
            text: text.to_string(),
        }
    }

    #[test]
    fn report_groups_folder_output_by_file() {
        let mut report = ReportText::new(true);
        report.push(&summary("docs/a.txt", "First."));
        report.push(&summary("docs/a.txt", ""));
        report.push(&summary("docs/a.txt", "Second."));
        report.push(&SummaryEvent::Unsupported { file: PathBuf::from("docs/b.xyz") });
        assert_eq!(
            report.text(),
            "a.txt\n\nFirst.\n\nSecond.\n\nb.xyz\n\nUnsupported file format."
        );
    }

    #[test]
    fn report_for_single_file_has_no_headings() {
        let mut report = ReportText::new(false);
        report.push(&summary("a.txt", "One."));
        report.push(&summary("a.txt", "Two."));
        assert_eq!(report.text(), "One.\n\nTwo.");
    }

    #[test]
    fn flags_override_config() {
        let mut config = Config::for_profile("CLITEST");
        config.llm.provider = "ollama".into();
        let args = CliArgs::try_parse_from([
            "summa", "in.txt", "--provider", "OpenAI", "--model", "gpt-4o", "--length", "large",
            "--chunk-words", "0", "--workers", "2",
        ])
        .unwrap();
        apply_overrides(&mut config, &args).unwrap();
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.openai_model, "gpt-4o");
        assert_eq!(config.pipeline.summary_length, SummaryLength::Large);
        assert_eq!(config.chunking.max_chunk_words, 1);
        assert_eq!(config.pipeline.workers, 2);
    }

    #[test]
    fn bad_length_is_rejected() {
        let mut config = Config::for_profile("CLITEST");
        let args = CliArgs::try_parse_from(["summa", "in.txt", "--length", "huge"]).unwrap();
        assert!(apply_overrides(&mut config, &args).is_err());
    }
}
