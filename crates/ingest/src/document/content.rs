//! Styled text runs read from a PDF page content stream.
//!
//! A run ends when the font, the font size or the text line changes, so
//! every span carries the size and weight it was drawn with. Effective size
//! is the `Tf` size scaled by the vertical factor of the text matrix.

use std::collections::BTreeMap;

use lexis_core::TextSpan;
use lopdf::content::Operation;
use lopdf::{Dictionary, Document as PdfDocument, Encoding, Object, ObjectId};

/// Substrings of a `BaseFont` name that mark a heavy face
/// (`Helvetica-Bold`, `ABCDEF+Arial-BlackItalic`, `Roboto-Heavy`).
const BOLD_MARKERS: [&str; 4] = ["bold", "black", "heavy", "demi"];
/// `FontWeight` from the font descriptor at or above which a face is bold.
const BOLD_WEIGHT: f32 = 600.0;
/// `TJ` adjustments below this (thousandths of an em) are word gaps.
const WORD_GAP: f32 = -100.0;
const SIZE_EPSILON: f32 = 0.01;

struct PageFont<'a> {
    encoding: Option<Encoding<'a>>,
    bold: bool,
}

pub(crate) fn is_bold_font_name(base_font: &str) -> bool {
    let name = base_font.to_lowercase();
    BOLD_MARKERS.iter().any(|marker| name.contains(marker))
}

fn font_weight(font: &Dictionary, pdf: &PdfDocument) -> Option<f32> {
    let descriptor = font.get_deref(b"FontDescriptor", pdf).ok()?.as_dict().ok()?;
    descriptor.get(b"FontWeight").ok()?.as_float().ok()
}

fn page_fonts(pdf: &PdfDocument, page_id: ObjectId) -> lopdf::Result<BTreeMap<Vec<u8>, PageFont<'_>>> {
    let fonts = pdf.get_page_fonts(page_id)?;
    Ok(fonts
        .into_iter()
        .map(|(name, font)| {
            let base_font = font
                .get(b"BaseFont")
                .and_then(Object::as_name_str)
                .unwrap_or_default();
            let bold = is_bold_font_name(base_font)
                || font_weight(font, pdf).is_some_and(|w| w >= BOLD_WEIGHT);
            let font = PageFont {
                encoding: font.get_font_encoding(pdf).ok(),
                bold,
            };
            (name, font)
        })
        .collect())
}

fn decode_operand(encoding: &Encoding<'_>, operand: &Object, out: &mut String) {
    match operand {
        Object::String(bytes, _) => {
            if let Ok(text) = PdfDocument::decode_text(encoding, bytes) {
                out.push_str(&text);
            }
        }
        Object::Array(items) => {
            for item in items {
                decode_operand(encoding, item, out);
            }
        }
        Object::Integer(gap) if (*gap as f32) < WORD_GAP => out.push(' '),
        Object::Real(gap) if *gap < WORD_GAP => out.push(' '),
        _ => {}
    }
}

fn number(operands: &[Object], index: usize) -> Option<f32> {
    operands.get(index).and_then(|o| o.as_float().ok())
}

#[derive(Default)]
struct Runs {
    spans: Vec<TextSpan>,
    text: String,
    font_size: f32,
    bold: bool,
}

impl Runs {
    fn push(&mut self, text: &str, font_size: f32, bold: bool) {
        let restyled = self.bold != bold || (self.font_size - font_size).abs() > SIZE_EPSILON;
        if restyled && !self.text.trim().is_empty() {
            self.flush();
        }
        self.font_size = font_size;
        self.bold = bold;
        self.text.push_str(text);
    }

    fn flush(&mut self) {
        let text = self.text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() {
            let size = (self.font_size * 10.0).round() / 10.0;
            self.spans.push(TextSpan::new(text, size, self.bold));
        }
        self.text.clear();
    }
}

struct TextState {
    font: Option<Vec<u8>>,
    font_size: f32,
    /// Vertical scale of the text matrix.
    scale: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: None,
            font_size: 0.0,
            scale: 1.0,
        }
    }
}

/// Walk the operations of one page and collect styled runs.
fn collect_runs(operations: &[Operation], fonts: &BTreeMap<Vec<u8>, PageFont<'_>>) -> Vec<TextSpan> {
    let mut state = TextState::default();
    let mut runs = Runs::default();

    for op in operations {
        let operands = op.operands.as_slice();
        let shown = match op.operator.as_str() {
            "BT" => {
                runs.flush();
                state.scale = 1.0;
                None
            }
            "ET" | "T*" => {
                runs.flush();
                None
            }
            "Tf" => {
                state.font = operands
                    .first()
                    .and_then(|o| o.as_name().ok())
                    .map(<[u8]>::to_vec);
                state.font_size = number(operands, 1).unwrap_or(state.font_size);
                None
            }
            "Tm" => {
                runs.flush();
                if let (Some(c), Some(d)) = (number(operands, 2), number(operands, 3)) {
                    let scale = c.hypot(d);
                    state.scale = if scale > 0.0 { scale } else { 1.0 };
                }
                None
            }
            "Td" | "TD" => {
                if number(operands, 1).is_some_and(|ty| ty != 0.0) {
                    runs.flush();
                }
                None
            }
            "Tj" | "TJ" => operands.first(),
            "'" => {
                runs.flush();
                operands.first()
            }
            "\"" => {
                runs.flush();
                operands.get(2)
            }
            _ => None,
        };

        let Some(operand) = shown else { continue };
        let Some(font) = state.font.as_ref().and_then(|name| fonts.get(name)) else {
            continue;
        };
        let Some(encoding) = font.encoding.as_ref() else {
            continue;
        };
        let mut text = String::new();
        decode_operand(encoding, operand, &mut text);
        runs.push(&text, state.font_size * state.scale, font.bold);
    }

    runs.flush();
    runs.spans
}

/// Styled spans of one page in drawing order. Errors mean the page has no
/// usable content stream or font resources.
pub(crate) fn page_spans(pdf: &PdfDocument, page_id: ObjectId) -> lopdf::Result<Vec<TextSpan>> {
    let fonts = page_fonts(pdf, page_id)?;
    let content = pdf.get_and_decode_page_content(page_id)?;
    Ok(collect_runs(&content.operations, &fonts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_names() {
        assert!(is_bold_font_name("Helvetica-Bold"));
        assert!(is_bold_font_name("ABCDEF+Arial-BoldItalicMT"));
        assert!(is_bold_font_name("Roboto-Black"));
        assert!(is_bold_font_name("MyriadPro-Demi"));
        assert!(!is_bold_font_name("Helvetica"));
        assert!(!is_bold_font_name("TimesNewRomanPS-ItalicMT"));
    }

    #[test]
    fn runs_split_on_style_and_merge_within_a_line() {
        let mut runs = Runs::default();
        runs.push("Relatório ", 18.0, true);
        runs.push("Anual", 18.0, true);
        runs.push("  corpo  do texto ", 10.0, false);
        runs.flush();
        assert_eq!(
            runs.spans,
            vec![
                TextSpan::new("Relatório Anual", 18.0, true),
                TextSpan::new("corpo do texto", 10.0, false),
            ]
        );
    }

    #[test]
    fn blank_runs_are_dropped() {
        let mut runs = Runs::default();
        runs.push("   ", 12.0, false);
        runs.flush();
        assert!(runs.spans.is_empty());
    }

    #[test]
    fn operations_without_fonts_yield_nothing() {
        let ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F9".into(), 12.into()]),
            Operation::new("Tj", vec![Object::string_literal("invisible")]),
            Operation::new("ET", vec![]),
        ];
        assert!(collect_runs(&ops, &BTreeMap::new()).is_empty());
    }
}
