use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SummaError;

/// Supported input document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// Detect the kind from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" | "text" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target summary length relative to the input chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Small,
    #[default]
    Medium,
    Large,
}

impl SummaryLength {
    /// `(min, max)` summary length in words for an input of `words` words.
    ///
    /// small: 1/5 to 1/3, medium: 1/3 to 1/2, large: 1/2 to 1x.
    pub fn bounds(&self, words: usize) -> (usize, usize) {
        match self {
            Self::Small => (words / 5, words / 3),
            Self::Medium => (words / 3, words / 2),
            Self::Large => (words / 2, words),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryLength {
    type Err = SummaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" | "short" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" | "long" => Ok(Self::Large),
            _ => Err(SummaError::InvalidValue {
                key: "summary length",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_kind_case_insensitively() {
        assert_eq!(DocumentKind::from_path(Path::new("a/b/Report.PDF")), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_path(Path::new("notes.docx")), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_path(Path::new("notes.txt")), Some(DocumentKind::Txt));
        assert_eq!(DocumentKind::from_path(Path::new("notes.xyz")), None);
        assert_eq!(DocumentKind::from_path(Path::new("README")), None);
    }

    #[test]
    fn length_bounds_follow_fractions() {
        assert_eq!(SummaryLength::Small.bounds(300), (60, 100));
        assert_eq!(SummaryLength::Medium.bounds(300), (100, 150));
        assert_eq!(SummaryLength::Large.bounds(300), (150, 300));
        assert_eq!(SummaryLength::Medium.bounds(1), (0, 0));
    }

    #[test]
    fn parses_length_names() {
        assert_eq!("Small".parse::<SummaryLength>().unwrap(), SummaryLength::Small);
        assert_eq!(" large ".parse::<SummaryLength>().unwrap(), SummaryLength::Large);
        assert!("huge".parse::<SummaryLength>().is_err());
        assert_eq!(SummaryLength::default(), SummaryLength::Medium);
    }
}
