//! Text wrapping and page placement on a US Letter page.
//!
//! Vertical positions are tracked in tenths of a point so page breaks do not
//! depend on float rounding.

/// Characters per body line.
pub const WRAP_WIDTH: usize = 85;

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN_LEFT: f32 = 72.0;

const FIRST_PAGE_TOP: i32 = 6480; // below header and image
const PAGE_TOP: i32 = 7200;
const PAGE_BOTTOM: i32 = 720;
const LINE_STEP: i32 = 216;

/// One body line with its baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub y: f32,
    pub text: String,
}

/// Greedy word wrap. Runs of whitespace collapse to one space; words longer
/// than `width` are broken.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for piece in chars.chunks(width) {
            let piece_len = piece.len();
            if line_len > 0 && line_len + 1 + piece_len > width {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.extend(piece);
            line_len += piece_len;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Wrap every paragraph (blank-line separated) and distribute the lines over
/// pages. Always returns at least one page.
pub fn paginate(text: &str) -> Vec<Vec<PlacedLine>> {
    let mut pages = vec![Vec::new()];
    let mut y = FIRST_PAGE_TOP;

    for paragraph in text.split("\n\n") {
        for line in wrap(paragraph, WRAP_WIDTH) {
            if y < PAGE_BOTTOM {
                pages.push(Vec::new());
                y = PAGE_TOP;
            }
            if let Some(page) = pages.last_mut() {
                page.push(PlacedLine {
                    y: y as f32 / 10.0,
                    text: line,
                });
            }
            y -= LINE_STEP;
        }
    }
    pages
}
