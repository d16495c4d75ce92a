use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use summa_ingest::{measure_total_folder, ChunkConfig, ExtractOptions};
use summa_llm::{FnBackend, SummaryBackend};
use summa_pipeline::{Progress, Summarizer, SummarizerOptions, SummaryEvent};

fn word_count() -> Arc<dyn SummaryBackend> {
    Arc::new(FnBackend::new("count", |text: &str, _, _| {
        Ok(text.split_whitespace().count().to_string())
    }))
}

fn summarizer(max_chunk_words: usize, txt_block_bytes: usize) -> Summarizer {
    let options = SummarizerOptions {
        chunk: ChunkConfig {
            max_chunk_words,
            backend_limit_words: 1024,
        },
        extract: ExtractOptions { txt_block_bytes },
        workers: 4,
        ..Default::default()
    };
    Summarizer::with_backend(word_count(), options).unwrap()
}

fn write(dir: &Path, name: &str, contents: &[u8]) {
    let mut f = std::fs::File::create(dir.join(name)).unwrap();
    f.write_all(contents).unwrap();
}

#[test]
fn unsupported_file_yields_exactly_one_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "data.xyz", b"a b c");

    let events: Vec<SummaryEvent> = summarizer(2, 2048)
        .summarize_path(&dir.path().join("data.xyz"))
        .collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].text(), "Unsupported file format.");
}

#[test]
fn missing_file_yields_one_failure() {
    let dir = tempfile::tempdir().unwrap();
    let events: Vec<SummaryEvent> = summarizer(2, 2048)
        .summarize_file(dir.path().join("gone.txt"))
        .collect();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], SummaryEvent::Failed { .. }));
    assert!(events[0].text().starts_with("Error reading file: "));
}

#[test]
fn binary_txt_yields_one_failure() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "blob.txt", b"\xff\xfe\x00bad");

    let events: Vec<SummaryEvent> = summarizer(2, 2048)
        .summarize_file(dir.path().join("blob.txt"))
        .collect();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], SummaryEvent::Failed { .. }));
    assert!(events[0].text().contains("not valid UTF-8"));
}

#[test]
fn corrupt_pdf_does_not_stop_the_folder() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", b"one two three");
    write(dir.path(), "b.pdf", b"%PDF-1.4 this is not really a pdf");
    write(dir.path(), "c.txt", b"four five");
    std::fs::create_dir(dir.path().join("nested")).unwrap();

    let events: Vec<SummaryEvent> = summarizer(2, 2048).summarize_folder(dir.path()).collect();

    let failed: Vec<&SummaryEvent> = events.iter().filter(|e| e.is_error()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].file(), dir.path().join("b.pdf"));

    let summaries: Vec<(String, String)> = events
        .iter()
        .filter(|e| !e.is_error())
        .map(|e| {
            let name = e.file().file_name().unwrap().to_string_lossy().into_owned();
            (name, e.text())
        })
        .collect();
    assert_eq!(
        summaries,
        vec![
            ("a.txt".to_string(), "2".to_string()),
            ("a.txt".to_string(), "1".to_string()),
            ("c.txt".to_string(), "2".to_string()),
        ]
    );
}

#[test]
fn unreadable_folder_yields_one_failure() {
    let dir = tempfile::tempdir().unwrap();
    let events: Vec<SummaryEvent> = summarizer(2, 2048)
        .summarize_folder(dir.path().join("missing"))
        .collect();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], SummaryEvent::Failed { .. }));
}

#[test]
fn large_txt_streams_in_order_across_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let words: Vec<String> = (0..1000).map(|i| format!("word{i}")).collect();
    write(dir.path(), "long.txt", words.join(" ").as_bytes());

    let events: Vec<SummaryEvent> = summarizer(50, 512)
        .summarize_file(dir.path().join("long.txt"))
        .collect();

    let mut last = (0, 0);
    let mut total_words = 0;
    for event in &events {
        let SummaryEvent::Summary { unit, chunk, text, .. } = event else {
            panic!("unexpected event {event:?}");
        };
        assert!((*unit, *chunk) > last);
        last = (*unit, *chunk);
        let n: usize = text.parse().unwrap();
        assert!(n <= 50);
        total_words += n;
    }
    assert!(last.0 > 1, "expected several blocks");
    assert_eq!(total_words, 1000);
}

#[test]
fn progress_reaches_the_measured_total() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", b"alpha beta gamma delta");
    write(dir.path(), "b.txt", b"epsilon zeta");

    let total = measure_total_folder(dir.path()).unwrap();
    let mut progress = Progress::new(total);
    for event in summarizer(1, 2048).summarize_folder(dir.path()) {
        progress.record(&event);
    }
    // Separators between words are not part of any chunk.
    assert!(progress.processed() < total);
    assert!(progress.percent() >= 80);
    progress.finish();
    assert_eq!(progress.percent(), 100);
}
