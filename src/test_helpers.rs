//! Shared test utilities for the media-manifest test suite.
//!
//! Provides fixture writers for building project trees on the fly and lookup
//! helpers that work with scan output (`Manifest`, `MediaAsset`).
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_png(&tmp.path().join("alpha/collage/1.png"), 40, 20);
//! touch(tmp.path(), "alpha/approach/01.mp4");
//!
//! let manifest = scan(tmp.path(), Category::Collage).unwrap();
//! assert_eq!(asset_ids(find_project(&manifest, "alpha")), vec!["1"]);
//! ```

use std::path::Path;

use crate::scan::{Manifest, MediaAsset};

// =========================================================================
// Fixture writers (parent directories are created)
// =========================================================================

/// Write placeholder bytes at `root/rel`. Passes extension filters but
/// fails any real image probe.
pub fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    ensure_parent(&path);
    std::fs::write(&path, "fake image").unwrap();
}

/// Write a real PNG of the given size (regardless of the path's extension).
pub fn write_png(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]))
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

/// Write a real JPEG of the given size.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    image::RgbImage::from_pixel(width, height, image::Rgb([40, 120, 200]))
        .save_with_format(path, image::ImageFormat::Jpeg)
        .unwrap();
}

/// Write a GIF header (plus trailer) declaring the given logical screen size.
pub fn write_gif(path: &Path, width: u16, height: u16) {
    ensure_parent(path);
    let mut bytes = b"GIF89a".to_vec();
    bytes.extend_from_slice(&width.to_le_bytes());
    bytes.extend_from_slice(&height.to_le_bytes());
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x3B]);
    std::fs::write(path, bytes).unwrap();
}

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
}

// =========================================================================
// Manifest lookups (panic with the available ids on miss)
// =========================================================================

/// Assets of a project. Panics if the project is not in the manifest.
pub fn find_project<'a>(manifest: &'a Manifest, project: &str) -> &'a [MediaAsset] {
    manifest.get(project).unwrap_or_else(|| {
        panic!(
            "project '{project}' not found. Available: {:?}",
            manifest.project_ids()
        )
    })
}

/// All asset ids in manifest order.
pub fn asset_ids(assets: &[MediaAsset]) -> Vec<String> {
    assets.iter().map(|a| a.id.clone()).collect()
}

/// All asset `src` paths in manifest order.
pub fn asset_srcs(assets: &[MediaAsset]) -> Vec<String> {
    assets.iter().map(|a| a.src.clone()).collect()
}
