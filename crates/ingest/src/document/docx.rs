use std::io::{Read, Seek};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{ExtractionError, TextUnit};

const DOCUMENT_PART: &str = "word/document.xml";

fn docx_err(e: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::DocxError(e.to_string())
}

/// Extract one text unit per non-empty paragraph of a DOCX package.
pub fn extract_docx<R: Read + Seek>(reader: R) -> Result<Vec<TextUnit>, ExtractionError> {
    let mut archive = zip::ZipArchive::new(reader).map_err(docx_err)?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(docx_err)?
        .read_to_string(&mut xml)?;

    let paragraphs = paragraphs_from_xml(&xml)?;
    Ok(paragraphs
        .into_iter()
        .enumerate()
        .map(|(i, text)| TextUnit {
            ordinal: i + 1,
            text,
        })
        .collect())
}

/// Elements whose content is not part of the enclosing paragraph's text:
/// text boxes carry their own `w:p` elements, and `mc:Fallback` repeats
/// what `mc:Choice` already holds.
fn is_detached(local_name: &[u8]) -> bool {
    matches!(local_name, b"txbxContent" | b"Fallback")
}

/// Walk WordprocessingML and collect the text of every body `w:p` element.
/// Runs (`w:t`) are concatenated; tabs and breaks become whitespace.
fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut detached_depth = 0usize;

    loop {
        let event = reader.read_event().map_err(docx_err)?;
        if detached_depth > 0 {
            match &event {
                Event::Start(e) if is_detached(e.local_name().as_ref()) => detached_depth += 1,
                Event::End(e) if is_detached(e.local_name().as_ref()) => detached_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }
        match event {
            Event::Start(e) if is_detached(e.local_name().as_ref()) => detached_depth = 1,
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => current.clear(),
                b"t" => in_text = true,
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => {
                current.push_str(&t.unescape().map_err(docx_err)?);
            }
            Event::CData(t) if in_text => {
                current.push_str(&String::from_utf8_lossy(&t));
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    let text = current.trim();
                    if !text.is_empty() {
                        paragraphs.push(text.to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
