//! Grammar correction through a LanguageTool server.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::provider::LlmError;

/// Upper bound on characters sent per LanguageTool request.
const MAX_REQUEST_CHARS: usize = 20_000;

pub trait GrammarCorrector: Send + Sync {
    fn correct(&self, text: &str) -> Result<String, LlmError>;
}

/// Returns its input unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCorrector;

impl GrammarCorrector for NoopCorrector {
    fn correct(&self, text: &str) -> Result<String, LlmError> {
        Ok(text.to_string())
    }
}

pub struct LanguageToolCorrector {
    client: reqwest::blocking::Client,
    url: String,
    language: String,
}

impl LanguageToolCorrector {
    pub fn new(url: String, language: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            language,
        })
    }

    fn check(&self, text: &str) -> Result<Vec<Correction>, LlmError> {
        let url = format!("{}/v2/check", self.url);
        debug!("LanguageTool request to {} ({} chars)", url, text.len());

        let response = self
            .client
            .post(&url)
            .form(&[("text", text), ("language", self.language.as_str())])
            .send()?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::ApiError { status, body });
        }

        let body: CheckResponse = response
            .json()
            .map_err(|e| LlmError::ParseError(e.to_string()))?;
        Ok(body.into_corrections())
    }
}

impl GrammarCorrector for LanguageToolCorrector {
    fn correct(&self, text: &str) -> Result<String, LlmError> {
        let mut out = String::with_capacity(text.len());
        for batch in batches(text, MAX_REQUEST_CHARS) {
            let corrections = self.check(batch)?;
            out.push_str(&apply_corrections(batch, &corrections));
        }
        Ok(out)
    }
}

// ── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<RuleMatch>,
}

#[derive(Debug, Deserialize)]
struct RuleMatch {
    offset: usize,
    length: usize,
    #[serde(default)]
    replacements: Vec<Replacement>,
}

#[derive(Debug, Deserialize)]
struct Replacement {
    value: String,
}

impl CheckResponse {
    fn into_corrections(self) -> Vec<Correction> {
        self.matches
            .into_iter()
            .filter_map(|m| {
                let replacement = m.replacements.into_iter().next()?.value;
                Some(Correction {
                    offset: m.offset,
                    length: m.length,
                    replacement,
                })
            })
            .collect()
    }
}

/// A single suggested edit. Offsets are in UTF-16 code units, the way
/// LanguageTool reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub offset: usize,
    pub length: usize,
    pub replacement: String,
}

/// Apply corrections right to left. Overlapping or out-of-range edits are
/// skipped.
pub fn apply_corrections(text: &str, corrections: &[Correction]) -> String {
    // utf16_to_byte[i] = byte offset of the char starting at UTF-16 unit i.
    let mut utf16_to_byte = vec![None; text.encode_utf16().count() + 1];
    let mut unit = 0;
    for (byte, ch) in text.char_indices() {
        utf16_to_byte[unit] = Some(byte);
        unit += ch.len_utf16();
    }
    utf16_to_byte[unit] = Some(text.len());

    let mut sorted: Vec<&Correction> = corrections.iter().collect();
    sorted.sort_by(|a, b| b.offset.cmp(&a.offset));

    let mut out = text.to_string();
    let mut floor = usize::MAX;
    for c in sorted {
        let end = c.offset + c.length;
        if end > floor {
            continue;
        }
        let (Some(Some(start_b)), Some(Some(end_b))) =
            (utf16_to_byte.get(c.offset), utf16_to_byte.get(end))
        else {
            continue;
        };
        out.replace_range(*start_b..*end_b, &c.replacement);
        floor = c.offset;
    }
    out
}

/// Split `text` into consecutive slices of at most `max_chars` bytes, cutting
/// after a newline when possible and always on a char boundary.
fn batches(text: &str, max_chars: usize) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = text;
    while rest.len() > max_chars {
        let mut cut = max_chars;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        if cut == 0 {
            cut = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        if let Some(nl) = rest[..cut].rfind('\n') {
            cut = nl + 1;
        }
        let (head, tail) = rest.split_at(cut);
        out.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        out.push(rest);
    }
    out
}
