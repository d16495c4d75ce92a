use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use thiserror::Error;
use tracing::{debug, info};

use crate::image::jpeg_info;
use crate::layout::{paginate, PlacedLine, MARGIN_LEFT, PAGE_HEIGHT, PAGE_WIDTH};

pub const FOOTER_TEXT: &str = "Generated by AI Text Summarizer";

const HEADER_COLOR: (f32, f32, f32) = (0.2, 0.4, 0.8);
const FOOTER_GRAY: f32 = 0.5;
const IMAGE_SIZE: f32 = 144.0;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Unsupported image (only JPEG is embedded): {0}")]
    UnsupportedImage(String),
}

/// Write `text` as a paginated US Letter PDF at `output_path`.
///
/// The first page carries `header` in 18pt bold and, when given, `image`
/// (JPEG) in the top-right corner. Paragraphs are separated by blank lines
/// and wrapped at 85 characters. The footer goes on the last page.
pub fn render(
    output_path: impl AsRef<Path>,
    text: &str,
    header: &str,
    image: Option<&Path>,
) -> Result<(), ReportError> {
    let output_path = output_path.as_ref();
    let pages = paginate(text);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font = |name: &str| {
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => Object::Name(name.as_bytes().to_vec()),
            "Encoding" => "WinAnsiEncoding",
        }
    };
    let regular_id = doc.add_object(font("Helvetica"));
    let bold_id = doc.add_object(font("Helvetica-Bold"));
    let italic_id = doc.add_object(font("Helvetica-Oblique"));

    let mut resources = dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
            "F3" => italic_id,
        },
    };
    let image_id = match image {
        Some(path) => {
            let id = embed_jpeg(&mut doc, path)?;
            resources.set("XObject", dictionary! { "Im1" => id });
            Some(id)
        }
        None => None,
    };
    let resources_id = doc.add_object(resources);

    let last = pages.len() - 1;
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for (i, lines) in pages.iter().enumerate() {
        let mut ops = Vec::new();
        if i == 0 {
            header_ops(&mut ops, header);
            if image_id.is_some() {
                image_ops(&mut ops);
            }
        }
        body_ops(&mut ops, lines);
        if i == last {
            footer_ops(&mut ops);
        }

        let content = Content { operations: ops };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    doc.save(output_path)?;

    info!("Wrote {} page report to {}", page_count, output_path.display());
    Ok(())
}

fn embed_jpeg(doc: &mut Document, path: &Path) -> Result<ObjectId, ReportError> {
    let bytes = std::fs::read(path)?;
    let info = jpeg_info(&bytes).ok_or_else(|| ReportError::UnsupportedImage(path.display().to_string()))?;
    debug!("Embedding {}x{} image {}", info.width, info.height, path.display());

    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => info.width as i64,
            "Height" => info.height as i64,
            "ColorSpace" => info.color_space(),
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        bytes,
    )
    .with_compression(false);
    Ok(doc.add_object(stream))
}

fn text_op(ops: &mut Vec<Operation>, font: &str, size: i64, x: f32, y: f32, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]));
    ops.push(Operation::new("ET", vec![]));
}

fn fill_color(ops: &mut Vec<Operation>, (r, g, b): (f32, f32, f32)) {
    ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
}

fn header_ops(ops: &mut Vec<Operation>, header: &str) {
    fill_color(ops, HEADER_COLOR);
    text_op(ops, "F2", 18, MARGIN_LEFT, PAGE_HEIGHT - 72.0, header);
}

fn image_ops(ops: &mut Vec<Operation>) {
    let x = PAGE_WIDTH - 3.0 * 72.0;
    let y = PAGE_HEIGHT - 2.0 * 72.0;
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new(
        "cm",
        vec![IMAGE_SIZE.into(), 0.into(), 0.into(), IMAGE_SIZE.into(), x.into(), y.into()],
    ));
    ops.push(Operation::new("Do", vec![Object::Name(b"Im1".to_vec())]));
    ops.push(Operation::new("Q", vec![]));
}

fn body_ops(ops: &mut Vec<Operation>, lines: &[PlacedLine]) {
    fill_color(ops, (0.0, 0.0, 0.0));
    for line in lines {
        text_op(ops, "F1", 12, MARGIN_LEFT, line.y, &line.text);
    }
}

fn footer_ops(ops: &mut Vec<Operation>) {
    fill_color(ops, (FOOTER_GRAY, FOOTER_GRAY, FOOTER_GRAY));
    text_op(ops, "F3", 10, MARGIN_LEFT, 36.0, FOOTER_TEXT);
}

/// Encode for the standard fonts' WinAnsi encoding. Typographic quotes and
/// dashes fold to ASCII; anything else outside Latin-1 becomes '?'.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .flat_map(|c| {
            let folded: &[u8] = match c {
                '\u{2018}' | '\u{2019}' => b"'",
                '\u{201C}' | '\u{201D}' => b"\"",
                '\u{2013}' | '\u{2014}' => b"-",
                '\u{2026}' => b"...",
                c if (c as u32) < 0x100 && !c.is_control() => return vec![c as u32 as u8],
                _ => b"?",
            };
            folded.to_vec()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::tests::fake_jpeg;

    #[test]
    fn win_ansi_folds_and_replaces() {
        assert_eq!(win_ansi("caf\u{e9} \u{201C}ok\u{201D}"), b"caf\xe9 \"ok\"".to_vec());
        assert_eq!(win_ansi("\u{4e2d}\u{2026}"), b"?...".to_vec());
    }

    #[test]
    fn writes_loadable_pdf_with_expected_pages() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.pdf");
        let text = (0..60).map(|i| format!("Paragraph {i}.")).collect::<Vec<_>>().join("\n\n");

        render(&out, &text, "Quarterly Summary", None).unwrap();

        let doc = Document::load(&out).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn empty_text_still_gets_a_page() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("empty.pdf");
        render(&out, "", "Nothing here", None).unwrap();
        assert_eq!(Document::load(&out).unwrap().get_pages().len(), 1);
    }

    #[test]
    fn embeds_jpeg_and_rejects_other_images() {
        let dir = tempfile::tempdir().unwrap();
        let jpg = dir.path().join("logo.jpg");
        std::fs::write(&jpg, fake_jpeg(32, 16, 3)).unwrap();
        let out = dir.path().join("with-image.pdf");
        render(&out, "Body text.", "Header", Some(&jpg)).unwrap();
        assert!(Document::load(&out).is_ok());

        let png = dir.path().join("logo.png");
        std::fs::write(&png, b"\x89PNG\r\n\x1a\n").unwrap();
        let err = render(dir.path().join("x.pdf"), "t", "h", Some(&png)).unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedImage(_)));
    }
}
