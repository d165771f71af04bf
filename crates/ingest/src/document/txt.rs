use lexis_core::Page;

use super::layout::spans_from_text;

pub fn extract_txt(bytes: &[u8]) -> Vec<Page> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();

    vec![Page::new(1, text).with_spans(spans_from_text(text))]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_simple_text() {
        let content = b"Hello, world!\nThis is a test file.";
        let pages = extract_txt(content);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
        assert!(pages[0].text.contains("Hello, world!"));
        assert_eq!(pages[0].spans.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn extract_utf8_text() {
        let content = "Ünïcödé têxto com acentuação".as_bytes();
        let pages = extract_txt(content);
        assert_eq!(pages[0].text, "Ünïcödé têxto com acentuação");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let pages = extract_txt(&[b'o', b'k', 0xFF, b'!']);
        assert!(pages[0].text.starts_with("ok"));
        assert!(pages[0].text.contains('\u{FFFD}'));
    }

    #[test]
    fn extract_empty_text() {
        let pages = extract_txt(b"");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text, "");
        assert!(pages[0].spans.as_ref().unwrap().is_empty());
    }

    #[test]
    fn trims_whitespace() {
        let content = b"  \n  Hello  \n  ";
        let pages = extract_txt(content);
        assert_eq!(pages[0].text, "Hello");
    }
}
