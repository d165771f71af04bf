pub mod document;
pub mod files;
pub mod images;

pub use document::{detect_file_type, extract_pages, load_document, read_bytes, ExtractionError};
pub use files::{ensure_directory, format_bytes, unique_filename};
pub use images::{default_output_dir, extract_images};
