use lexis_core::{Page, TextSpan};

use super::layout::{heading_font_size, BODY_FONT_SIZE};

/// Markdown becomes a single page. Heading markers are stripped from the
/// text and the headings become bold spans sized by level.
pub fn extract_md(bytes: &[u8]) -> Vec<Page> {
    let raw = String::from_utf8_lossy(bytes);

    let mut lines = Vec::new();
    let mut spans = Vec::new();
    for line in raw.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') {
            let level = trimmed.chars().take_while(|c| *c == '#').count();
            let heading = trimmed.trim_start_matches('#').trim();
            if !heading.is_empty() {
                spans.push(TextSpan::new(heading, heading_font_size(level), true));
            }
            lines.push(heading.to_string());
        } else {
            if !trimmed.is_empty() {
                spans.push(TextSpan::new(trimmed.trim_end(), BODY_FONT_SIZE, is_strong(trimmed)));
            }
            lines.push(line.to_string());
        }
    }

    let text = lines.join("\n");
    vec![Page::new(1, text.trim()).with_spans(spans)]
}

/// A line wrapped entirely in `**` or `__`.
fn is_strong(line: &str) -> bool {
    let line = line.trim();
    line.len() > 4
        && ((line.starts_with("**") && line.ends_with("**"))
            || (line.starts_with("__") && line.ends_with("__")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold_texts(page: &Page) -> Vec<String> {
        page.spans
            .as_ref()
            .unwrap()
            .iter()
            .filter(|s| s.bold)
            .map(|s| s.text.clone())
            .collect()
    }

    #[test]
    fn extract_headings() {
        let content = b"# Title\n\nSome text.\n\n## Section 1\n\nMore text.\n\n### Subsection\n";
        let pages = extract_md(content);
        assert_eq!(pages.len(), 1);
        assert_eq!(bold_texts(&pages[0]), vec!["Title", "Section 1", "Subsection"]);
    }

    #[test]
    fn heading_markers_are_stripped_from_text() {
        let pages = extract_md(b"## 1. Introducao geral\ncorpo");
        assert_eq!(pages[0].text, "1. Introducao geral\ncorpo");
    }

    #[test]
    fn preserves_full_content() {
        let content = b"# Hello\n\nParagraph one.\n\n## World\n\nParagraph two.";
        let pages = extract_md(content);
        assert!(pages[0].text.contains("Paragraph one."));
        assert!(pages[0].text.contains("Paragraph two."));
    }

    #[test]
    fn strong_line_is_bold() {
        let pages = extract_md(b"**Aviso importante**\ntexto comum");
        assert_eq!(bold_texts(&pages[0]), vec!["**Aviso importante**"]);
    }

    #[test]
    fn no_headings() {
        let content = b"Just plain text without any headings.";
        let pages = extract_md(content);
        assert!(bold_texts(&pages[0]).is_empty());
        assert_eq!(pages[0].text, "Just plain text without any headings.");
    }

    #[test]
    fn empty_markdown() {
        let pages = extract_md(b"");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text, "");
        assert!(pages[0].spans.as_ref().unwrap().is_empty());
    }
}
