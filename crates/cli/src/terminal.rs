use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use summa_pipeline::{Progress, SummaryEvent};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const FILE: Color = Color::Green;
    const SUMMARY: Color = Color::Cyan;
    const NOTICE: Color = Color::Yellow;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
}

/// Summaries go to stdout; progress, spinner and notices go to stderr so the
/// summary text can be piped cleanly.
pub struct Terminal {
    /// Whether a progress line is currently drawn on stderr.
    progress_shown: AtomicBool,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            progress_shown: AtomicBool::new(false),
        }
    }

    /// Print the startup banner.
    pub fn print_banner(&self, provider: &str, model: &str) -> Result<()> {
        let mut stderr = io::stderr();
        execute!(
            stderr,
            SetForegroundColor(Colors::HEADER),
            Print("summa"),
            ResetColor,
            Print(" - Document Summarizer\n"),
            SetForegroundColor(Colors::DIM),
            Print(format!("Provider: {} | Model: {}\n", provider, model)),
            Print("Ctrl+C stops after the chunks in flight.\n"),
            Print("---\n"),
            ResetColor,
        )?;
        stderr.flush()?;
        Ok(())
    }

    /// Heading printed when output moves on to a new file.
    pub fn print_file_header(&self, path: &Path) -> Result<()> {
        self.clear_progress()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::FILE),
            Print(format!("\n== {} ==\n", path.display())),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Display one pipeline event with appropriate formatting.
    pub fn display_event(&self, event: &SummaryEvent) -> Result<()> {
        self.clear_progress()?;
        let mut stdout = io::stdout();
        match event {
            SummaryEvent::Summary { text, .. } if text.is_empty() => {
                execute!(
                    stdout,
                    SetForegroundColor(Colors::DIM),
                    Print("[chunk skipped]\n"),
                    ResetColor,
                )?;
            }
            SummaryEvent::Summary { text, .. } => {
                execute!(
                    stdout,
                    SetForegroundColor(Colors::SUMMARY),
                    Print(text),
                    ResetColor,
                    Print("\n"),
                )?;
            }
            SummaryEvent::Unsupported { .. } => {
                execute!(
                    stdout,
                    SetForegroundColor(Colors::NOTICE),
                    Print(format!("{}\n", event.text())),
                    ResetColor,
                )?;
            }
            SummaryEvent::Failed { .. } => {
                execute!(
                    stdout,
                    SetForegroundColor(Colors::ERROR),
                    Print(format!("{}\n", event.text())),
                    ResetColor,
                )?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    /// Redraw the progress line on stderr.
    pub fn print_progress(&self, progress: &Progress, events: usize) -> Result<()> {
        let line = if progress.total() > 0 {
            format!("\r[{:>3}%] {} chunks", progress.percent(), events)
        } else {
            format!("\r[...] {} chunks", events)
        };
        let mut stderr = io::stderr();
        execute!(stderr, SetForegroundColor(Colors::DIM), Print(line), ResetColor)?;
        stderr.flush()?;
        self.progress_shown.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// End the progress line so it stays on screen.
    pub fn keep_progress(&self) -> Result<()> {
        if self.progress_shown.swap(false, Ordering::SeqCst) {
            let mut stderr = io::stderr();
            execute!(stderr, Print("\n"))?;
            stderr.flush()?;
        }
        Ok(())
    }

    fn clear_progress(&self) -> Result<()> {
        if self.progress_shown.swap(false, Ordering::SeqCst) {
            let mut stderr = io::stderr();
            execute!(stderr, Print(format!("\r{}\r", " ".repeat(32))))?;
            stderr.flush()?;
        }
        Ok(())
    }

    /// Show a spinner on stderr while a blocking step runs.
    pub fn start_spinner(&self, message: &str) -> Result<SpinnerHandle> {
        let message = message.to_string();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = std::thread::spawn(move || {
            let frames = ['|', '/', '-', '\\'];
            let mut i = 0;
            while running_clone.load(Ordering::SeqCst) {
                let mut stderr = io::stderr();
                execute!(
                    stderr,
                    SetForegroundColor(Colors::DIM),
                    Print(format!("\r{} {}", frames[i % frames.len()], message)),
                    ResetColor,
                )
                .ok();
                stderr.flush().ok();
                i += 1;
                std::thread::sleep(std::time::Duration::from_millis(100));
            }
            let mut stderr = io::stderr();
            execute!(stderr, Print(format!("\r{}\r", " ".repeat(message.len() + 2)))).ok();
            stderr.flush().ok();
        });

        Ok(SpinnerHandle {
            running,
            thread: Some(handle),
        })
    }

    /// Print a model listing.
    pub fn print_models(&self, provider: &str, models: &[String]) -> Result<()> {
        let mut stdout = io::stdout();
        if models.is_empty() {
            execute!(
                stdout,
                SetForegroundColor(Colors::DIM),
                Print(format!("No models found for {}.\n", provider)),
                ResetColor,
            )?;
            return Ok(());
        }

        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print(format!("Models served by {}:\n", provider)),
            ResetColor,
        )?;
        for model in models {
            execute!(stdout, Print(format!("  {}\n", model)))?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Print an error message.
    pub fn print_error(&self, msg: &str) -> Result<()> {
        self.clear_progress()?;
        let mut stderr = io::stderr();
        execute!(
            stderr,
            SetForegroundColor(Colors::ERROR),
            Print(format!("Error: {}\n", msg)),
            ResetColor,
        )?;
        stderr.flush()?;
        Ok(())
    }

    /// Print an info message.
    pub fn print_info(&self, msg: &str) -> Result<()> {
        self.clear_progress()?;
        let mut stderr = io::stderr();
        execute!(
            stderr,
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n", msg)),
            ResetColor,
        )?;
        stderr.flush()?;
        Ok(())
    }
}

/// Handle to a running spinner. Drop or call stop() to terminate it.
pub struct SpinnerHandle {
    running: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl SpinnerHandle {
    /// Stop the spinner and wait for its line to be cleared.
    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        self.halt();
    }
}
