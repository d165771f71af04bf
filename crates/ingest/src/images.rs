//! Export of images embedded in PDF pages.
//!
//! JPEG and JPEG 2000 streams are written as stored. Raw and Flate-compressed
//! pixel data is decoded and re-encoded as PNG. Fax and JBIG2 images are
//! skipped.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;
use image::{GrayImage, RgbImage};
use lexis_core::ImageFormat;
use lopdf::filters::png::decode_frame;
use lopdf::xobject::PdfImage;
use lopdf::{Document as PdfDocument, Object};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::document::{image_format, read_bytes, ExtractionError};
use crate::files::{ensure_directory, unique_filename};

const PROGRESS_EVERY: usize = 20;

#[derive(Debug, Error)]
enum ImageError {
    #[error("unsupported filter {0}")]
    Filter(String),
    #[error("corrupt compressed data: {0}")]
    Inflate(std::io::Error),
    #[error("bad predictor data: {0}")]
    Predictor(std::io::Error),
    #[error("unsupported pixel layout: {0}")]
    Layout(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Default export directory for a document: `imagens/<file stem>`.
pub fn default_output_dir(pdf_path: &Path) -> PathBuf {
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "documento".to_string());
    Path::new("imagens").join(stem)
}

fn open(pdf_path: &Path) -> Result<PdfDocument, ExtractionError> {
    if !pdf_path.exists() {
        return Err(ExtractionError::NotFound(pdf_path.to_path_buf()));
    }
    let bytes = read_bytes(pdf_path)?;
    PdfDocument::load_mem(&bytes).map_err(|e| ExtractionError::InvalidPdf(e.to_string()))
}

/// Write every exportable image of `pdf_path` into `output_dir` as
/// `page{N}_img{M}.{ext}` and return the written paths in page order.
///
/// Failures on a single page or image are logged and skipped.
pub fn extract_images(pdf_path: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
    let pdf = open(pdf_path)?;
    let output_dir = ensure_directory(output_dir)?;
    info!(dir = %output_dir.display(), "extracting images");
    Ok(write_images(&pdf, &output_dir))
}

fn write_images(pdf: &PdfDocument, output_dir: &Path) -> Vec<PathBuf> {
    let pages = pdf.get_pages();
    let total = pages.len();
    let mut written = Vec::new();
    let mut skipped = 0usize;

    for (i, (&page_number, &page_id)) in pages.iter().enumerate() {
        if (i + 1) % PROGRESS_EVERY == 0 {
            debug!(page = page_number, total, "processing images");
        }
        let images = match pdf.get_page_images(page_id) {
            Ok(images) => images,
            Err(e) => {
                warn!(page = page_number, error = %e, "failed to read page images");
                continue;
            }
        };

        for (idx, img) in images.iter().enumerate() {
            let format = image_format(img.filters.as_deref());
            let Some(ext) = format.extension() else {
                debug!(page = page_number, image = idx + 1, filters = ?img.filters, "skipping image");
                skipped += 1;
                continue;
            };

            let base = format!("page{page_number}_img{}", idx + 1);
            let name = unique_filename(output_dir, &base, ext);
            let path = output_dir.join(&name);
            match export_image(img, format, &path) {
                Ok(()) => {
                    debug!(file = %name, "image written");
                    written.push(path);
                }
                Err(e) => {
                    warn!(page = page_number, image = idx + 1, error = %e, "failed to export image");
                    skipped += 1;
                }
            }
        }
    }

    info!(extracted = written.len(), skipped, "image extraction finished");
    written
}

fn export_image(img: &PdfImage<'_>, format: ImageFormat, path: &Path) -> Result<(), ImageError> {
    let data = undo_flate(img)?;
    match format {
        ImageFormat::Raw => write_png(img, undo_predictor(img, data)?, path),
        _ => Ok(fs::write(path, data)?),
    }
}

/// Remove the Flate layers of the filter chain, stopping at the stored
/// image encoding.
fn undo_flate(img: &PdfImage<'_>) -> Result<Vec<u8>, ImageError> {
    let mut data = img.content.to_vec();
    for filter in img.filters.iter().flatten() {
        match filter.as_str() {
            "FlateDecode" => {
                let mut inflated = Vec::with_capacity(data.len() * 2);
                ZlibDecoder::new(data.as_slice())
                    .read_to_end(&mut inflated)
                    .map_err(ImageError::Inflate)?;
                data = inflated;
            }
            "DCTDecode" | "JPXDecode" => break,
            other => return Err(ImageError::Filter(other.to_string())),
        }
    }
    Ok(data)
}

/// Undo PNG row predictors (`Predictor` 10-15) declared in `DecodeParms`.
fn undo_predictor(img: &PdfImage<'_>, data: Vec<u8>) -> Result<Vec<u8>, ImageError> {
    let Ok(params) = img.origin_dict.get(b"DecodeParms").and_then(Object::as_dict) else {
        return Ok(data);
    };
    let param = |key: &[u8], default: i64| params.get(key).and_then(Object::as_i64).unwrap_or(default);
    if !(10..=15).contains(&param(b"Predictor", 1)) {
        return Ok(data);
    }
    let colors = param(b"Colors", 1).max(1) as usize;
    let bits = param(b"BitsPerComponent", 8).max(8) as usize;
    let columns = param(b"Columns", 1).max(1) as usize;
    decode_frame(&data, colors * bits / 8, columns).map_err(ImageError::Predictor)
}

fn channels(color_space: Option<&str>, pixels: usize, samples: usize) -> Option<usize> {
    match color_space {
        Some("DeviceGray" | "CalGray") => Some(1),
        Some("DeviceRGB" | "CalRGB") => Some(3),
        Some("DeviceCMYK") => Some(4),
        // ICCBased and friends: infer from the sample count.
        _ => [1, 3, 4].into_iter().find(|n| pixels * n == samples),
    }
}

/// Expand 1-bit samples (rows padded to whole bytes) to 8-bit gray.
fn expand_bits(data: &[u8], width: usize, height: usize) -> Vec<u8> {
    let stride = width.div_ceil(8);
    let mut out = Vec::with_capacity(width * height);
    for row in 0..height {
        for x in 0..width {
            let byte = data.get(row * stride + x / 8).copied().unwrap_or(0);
            let bit = (byte >> (7 - x % 8)) & 1;
            out.push(if bit == 1 { 255 } else { 0 });
        }
    }
    out
}

fn cmyk_to_rgb(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(4)
        .flat_map(|p| {
            let k = 255 - p[3] as u16;
            let channel = |v: u8| ((255 - v as u16) * k / 255) as u8;
            [channel(p[0]), channel(p[1]), channel(p[2])]
        })
        .collect()
}

fn write_png(img: &PdfImage<'_>, data: Vec<u8>, path: &Path) -> Result<(), ImageError> {
    let (width, height) = match (u32::try_from(img.width), u32::try_from(img.height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(ImageError::Layout(format!("{}x{} pixels", img.width, img.height))),
    };
    let pixels = width as usize * height as usize;

    let mut data = match img.bits_per_component.unwrap_or(8) {
        8 => data,
        1 => expand_bits(&data, width as usize, height as usize),
        bits => return Err(ImageError::Layout(format!("{bits} bits per component"))),
    };
    let channels = channels(img.color_space.as_deref(), pixels, data.len())
        .ok_or_else(|| ImageError::Layout(format!("color space {:?}", img.color_space)))?;
    let needed = pixels * channels;
    if data.len() < needed {
        return Err(ImageError::Layout(format!(
            "expected {needed} bytes of pixel data, found {}",
            data.len()
        )));
    }
    data.truncate(needed);

    let mismatch = || ImageError::Layout("buffer does not match dimensions".to_string());
    match channels {
        1 => GrayImage::from_raw(width, height, data)
            .ok_or_else(mismatch)?
            .save_with_format(path, image::ImageFormat::Png)?,
        3 => RgbImage::from_raw(width, height, data)
            .ok_or_else(mismatch)?
            .save_with_format(path, image::ImageFormat::Png)?,
        _ => RgbImage::from_raw(width, height, cmyk_to_rgb(&data))
            .ok_or_else(mismatch)?
            .save_with_format(path, image::ImageFormat::Png)?,
    }
    Ok(())
}
