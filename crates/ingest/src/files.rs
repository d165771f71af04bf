use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

const UNITS: [&str; 5] = ["KB", "MB", "GB", "TB", "PB"];

/// Create `path` and all missing parents.
pub fn ensure_directory(path: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(path)?;
    debug!(dir = %path.display(), "directory ready");
    Ok(path.to_path_buf())
}

/// First free name of the form `base.ext`, `base_1.ext`, `base_2.ext`, ...
/// inside `dir`. The extension may be given with or without the leading dot.
pub fn unique_filename(dir: &Path, base: &str, extension: &str) -> String {
    let extension = extension.trim_start_matches('.');
    let mut name = format!("{base}.{extension}");
    let mut counter = 1;
    while dir.join(&name).exists() {
        name = format!("{base}_{counter}.{extension}");
        counter += 1;
    }
    name
}

/// Human-readable size with binary multiples. Sizes below one kilobyte are
/// printed as whole bytes.
pub fn format_bytes(size: u64) -> String {
    if size < 1024 {
        return format!("{size} bytes");
    }
    let mut value = size as f64 / 1024.0;
    for unit in &UNITS[..UNITS.len() - 1] {
        if value < 1024.0 {
            return format!("{value:.2} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.2} {}", UNITS[UNITS.len() - 1])
}
