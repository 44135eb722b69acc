//! Minimal GIF header reader.
//!
//! Animated GIFs are measured from the Logical Screen Descriptor instead of
//! going through a decoder: the general probe path does not reliably report
//! dimensions for multi-frame files, and the header is all the manifest needs.
//!
//! Layout of the first 10 bytes:
//!
//! ```text
//! 0..6   signature   "GIF87a" | "GIF89a"
//! 6..8   width       u16 little-endian
//! 8..10  height      u16 little-endian
//! ```

use super::backend::{BackendError, Dimensions};
use std::path::Path;

const HEADER_LEN: usize = 10;
const SIGNATURES: [&[u8; 6]; 2] = [b"GIF87a", b"GIF89a"];

/// Parse width and height from the start of a GIF file.
///
/// Returns `None` when the buffer is shorter than the header or the
/// signature is not a GIF one; offsets are never trusted without it.
pub fn read_gif_dimensions(bytes: &[u8]) -> Option<Dimensions> {
    let header = bytes.get(..HEADER_LEN)?;
    if !SIGNATURES.iter().any(|sig| header.starts_with(*sig)) {
        return None;
    }
    Some(Dimensions {
        width: u16::from_le_bytes([header[6], header[7]]) as u32,
        height: u16::from_le_bytes([header[8], header[9]]) as u32,
    })
}

/// Read a GIF from disk and return its logical screen size.
pub fn identify_gif(path: &Path) -> Result<Dimensions, BackendError> {
    let bytes = std::fs::read(path)?;
    read_gif_dimensions(&bytes).ok_or_else(|| {
        BackendError::ProcessingFailed(format!("Not a readable GIF header: {}", path.display()))
    })
}
