//! Pure Rust probing backend built on the `image` crate.
//!
//! Dimensions are read from the container header through
//! [`ImageReader::into_dimensions`]; pixel data is never decoded. The format is
//! sniffed from the file's magic bytes first and falls back to the extension,
//! so a mislabeled `.jpg` that is really a PNG still measures correctly.
//!
//! | Format | Decoder feature |
//! |---|---|
//! | JPEG | `jpeg` |
//! | PNG | `png` |
//! | TIFF | `tiff` |
//! | WebP | `webp` |
//! | GIF (first frame header) | `gif` |
//!
//! Animated GIFs normally bypass this backend; see [`super::gif`].

use super::backend::{BackendError, Dimensions, ImageBackend};
use image::ImageReader;
use std::path::Path;

/// Production backend using the `image` crate's header probes.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "Failed to read dimensions of {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Ok(Dimensions { width, height })
    }
}
