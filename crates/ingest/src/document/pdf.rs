use lexis_core::{ImageFormat, ImageInfo, Page};
use lopdf::Document as PdfDocument;
use tracing::{debug, info, warn};

use super::content::page_spans;
use super::layout::spans_from_text;
use super::ExtractionError;

const PROGRESS_EVERY: usize = 20;

pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<Page>, ExtractionError> {
    let pdf = PdfDocument::load_mem(bytes).map_err(|e| ExtractionError::InvalidPdf(e.to_string()))?;
    let page_ids = pdf.get_pages();
    let total = page_ids.len();
    debug!(pages = total, "PDF opened");

    let mut pages = Vec::with_capacity(total);
    for (i, (&page_number, &page_id)) in page_ids.iter().enumerate() {
        let number = page_number as usize;
        let mut page = match pdf.extract_text(&[page_number]) {
            Ok(text) => {
                let text = text.trim();
                let spans = match page_spans(&pdf, page_id) {
                    Ok(spans) if !spans.is_empty() => spans,
                    Ok(_) => spans_from_text(text),
                    Err(e) => {
                        debug!(page = number, error = %e, "no usable content stream, estimating layout");
                        spans_from_text(text)
                    }
                };
                Page::new(number, text).with_spans(spans)
            }
            Err(e) => {
                warn!(page = number, error = %e, "failed to extract page text");
                Page::failed(number, e.to_string())
            }
        };

        match pdf.get_page_images(page_id) {
            Ok(images) => {
                page.images = images
                    .iter()
                    .enumerate()
                    .map(|(idx, img)| ImageInfo {
                        page_number: number,
                        index: idx + 1,
                        width: img.width,
                        height: img.height,
                        format: image_format(img.filters.as_deref()),
                    })
                    .collect();
            }
            Err(e) => warn!(page = number, error = %e, "failed to list page images"),
        }

        pages.push(page);
        if (i + 1) % PROGRESS_EVERY == 0 {
            debug!(done = i + 1, total, "extracting pages");
        }
    }

    let has_text = pages
        .iter()
        .any(|p| p.error.is_none() && !p.text.trim().is_empty());
    if !has_text && !pages.is_empty() {
        if let Some(fallback) = extract_with_pdf_extract(bytes, pages.len()) {
            info!(pages = fallback.len(), "recovered text with pdf-extract");
            // Images found by lopdf are kept on their pages.
            for (page, recovered) in pages.iter_mut().zip(fallback) {
                page.text = recovered.text;
                page.spans = recovered.spans;
                page.error = None;
            }
        }
    }

    Ok(pages)
}

/// Classify an image stream by its filter chain. Flate layers are undone
/// on export; the innermost filter decides the stored encoding.
pub(crate) fn image_format(filters: Option<&[String]>) -> ImageFormat {
    let filters = filters.unwrap_or_default();
    match filters.iter().map(String::as_str).find(|f| *f != "FlateDecode") {
        None => ImageFormat::Raw,
        Some("DCTDecode") => ImageFormat::Jpeg,
        Some("JPXDecode") => ImageFormat::Jpeg2000,
        Some(_) => ImageFormat::Unsupported,
    }
}

/// Whole-document extraction used when the per-page backend finds no text.
/// pdf-extract separates pages with form feeds.
fn extract_with_pdf_extract(bytes: &[u8], page_count: usize) -> Option<Vec<Page>> {
    let text = match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!(error = %e, "pdf-extract fallback failed");
            return None;
        }
    };
    if text.trim().is_empty() {
        return None;
    }

    let mut parts: Vec<String> = text.split('\x0C').map(str::to_string).collect();
    if parts.len() > page_count {
        let tail = parts.split_off(page_count).join("\n");
        if let Some(last) = parts.last_mut() {
            last.push('\n');
            last.push_str(&tail);
        }
    }

    Some(
        parts
            .into_iter()
            .enumerate()
            .map(|(i, part)| {
                let text = part.trim();
                Page::new(i + 1, text).with_spans(spans_from_text(text))
            })
            .collect(),
    )
}
