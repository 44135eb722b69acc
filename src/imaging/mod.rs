//! Image geometry from headers, in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** (JPEG, PNG, TIFF, WebP) | `image::ImageReader::into_dimensions` |
//! | **Identify** (GIF) | custom Logical Screen Descriptor reader |
//! | **Layout size** | [`compute_target_size`] |
//!
//! Sizing math lives apart from probing so it can be tested without files.
//! Scans take any [`ImageBackend`]; tests swap in a mock.

pub mod backend;
mod calculations;
pub mod gif;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{SizeBounds, compute_target_size};
pub use gif::{identify_gif, read_gif_dimensions};
pub use rust_backend::RustBackend;
