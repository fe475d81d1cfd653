//! A4 PDF rendering of a `ClinicalReport` using printpdf's built-in fonts.

use printpdf::*;
use std::io::BufWriter;
use tracing::debug;

use super::{ClinicalReport, ReportError};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const TOP: f32 = 280.0;
const BOTTOM_MARGIN: f32 = 20.0;
const LEFT: f32 = 20.0;
const INDENT: f32 = 25.0;
const WRAP_CHARS: usize = 85;

/// Built-in fonts only cover plain ASCII; swap or drop everything else.
pub fn sanitize(text: &str) -> String {
    let replaced = text.replace('≥', ">=").replace('≤', "<=");
    let kept: String = replaced
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect();
    kept.trim().to_string()
}

/// Cursor over the document that starts a new page when the current one is full
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl PageWriter {
    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < BOTTOM_MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP;
            self.pages += 1;
        }
    }

    fn text(&mut self, text: &str, size: f32, x: f32, font: &IndirectFontRef, advance: f32) {
        self.ensure_space(advance);
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
        self.y -= advance;
    }

    fn gap(&mut self, amount: f32) {
        self.y -= amount;
    }
}

/// Render the report to PDF bytes
pub fn render_pdf(report: &ClinicalReport) -> Result<Vec<u8>, ReportError> {
    let (doc, page1, layer1) =
        PdfDocument::new(&report.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Font(e.to_string()))?;

    let mut writer = PageWriter { doc, layer, y: TOP, pages: 1 };

    writer.text(&sanitize(&report.title), 16.0, LEFT, &bold, 10.0);

    for section in report.sections() {
        writer.gap(4.0);
        // keep a heading together with at least its first line
        writer.ensure_space(12.0);
        writer.text(&sanitize(&section.heading), 12.0, LEFT, &bold, 6.0);
        for line in &section.lines {
            for wrapped in wrap_text(&sanitize(line), WRAP_CHARS) {
                writer.text(&wrapped, 10.0, INDENT, &font, 5.0);
            }
        }
    }

    debug!(pages = writer.pages, "Rendered clinical report PDF");

    let mut buf = BufWriter::new(Vec::new());
    writer
        .doc
        .save(&mut buf)
        .map_err(|e| ReportError::Save(e.to_string()))?;
    buf.into_inner()
        .map_err(|e| ReportError::Save(e.to_string()))
}

/// Greedy word wrap on character count.
///
/// Words longer than a line are hard-split so nothing runs off the page.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    let pieces = text.split_whitespace().flat_map(|word| {
        let chars: Vec<char> = word.chars().collect();
        chars
            .chunks(max_chars)
            .map(|chunk| chunk.iter().collect::<String>())
            .collect::<Vec<String>>()
    });

    for piece in pieces {
        let piece_len = piece.chars().count();
        if current_len > 0 && current_len + piece_len + 1 > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(&piece);
        current_len += piece_len;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::patient::PatientProfile;
    use crate::services::assessment::assess;

    #[test]
    fn test_sanitize_strips_glyphs() {
        assert_eq!(
            sanitize("🟥 URGENT: Likely diabetes (HbA1c ≥48)"),
            "URGENT: Likely diabetes (HbA1c >=48)"
        );
        assert_eq!(
            sanitize("🚭 Smoking cessation: Refer to NHS Stop Smoking Services"),
            "Smoking cessation: Refer to NHS Stop Smoking Services"
        );
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let url = "https://www.nhs.uk/conditions/type-2-diabetes/preventing-type-2-diabetes";
        let lines = wrap_text(&format!("See {}", url), 20);

        assert!(lines.iter().all(|line| line.chars().count() <= 20));
        assert_eq!(lines.concat().replace(' ', ""), format!("See{}", url));
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn test_render_pdf_produces_document() {
        let profile = PatientProfile {
            hba1c: 50,
            smoker: true,
            medications: Some("Metformin 500mg twice daily, Ramipril 5mg once daily, Atorvastatin 20mg at night".to_string()),
            ..Default::default()
        };
        let report = ClinicalReport::build(Some("Jane Doe"), &profile, &assess(&profile));

        let bytes = render_pdf(&report).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
