//! The three media categories a project folder can hold.
//!
//! Each category owns a subfolder inside every project directory and its own
//! rules for which files count as assets:
//!
//! | Category | Folder | Accepts | Sizing |
//! |----------|--------|---------|--------|
//! | `collage` | `collage/` | raster images + GIF | capped to a max height, GIFs also floored to it |
//! | `approach` | `approach/` | raster images + GIF + video | none |
//! | `prototype` | `prototypes/` | raster images + GIF | none |
//!
//! When several files share a stem (`01.png`, `01.mp4`), the category's
//! priority list decides which one represents the logical asset. The lists
//! encode "video over still, animated over static" and are kept exactly as the
//! site expects them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Still-image formats shared by every category (GIF is listed separately).
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "webp"];

/// Formats served as `<video>` on the approach page.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];

const COLLAGE_PRIORITY: &[&str] = &["gif", "webp", "png", "jpg", "jpeg", "tif", "tiff"];

const APPROACH_PRIORITY: &[&str] = &[
    "mp4", "webm", "mov", "jpg", "jpeg", "png", "webp", "gif", "tif", "tiff",
];

const PROTOTYPE_PRIORITY: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "tif", "tiff"];

/// A media role within a project directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Collage,
    Approach,
    Prototype,
}

/// Whether an asset renders as an image or a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Collage, Category::Approach, Category::Prototype];

    /// Short name used in logs, CLI arguments, and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Category::Collage => "collage",
            Category::Approach => "approach",
            Category::Prototype => "prototype",
        }
    }

    /// Subfolder of a project directory holding this category's files.
    ///
    /// Note the plural for prototypes.
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Collage => "collage",
            Category::Approach => "approach",
            Category::Prototype => "prototypes",
        }
    }

    /// Extension preference used to pick one file per logical id.
    pub fn priority(self) -> &'static [&'static str] {
        match self {
            Category::Collage => COLLAGE_PRIORITY,
            Category::Approach => APPROACH_PRIORITY,
            Category::Prototype => PROTOTYPE_PRIORITY,
        }
    }

    /// Whether a lowercase extension (no dot) belongs to this category.
    pub fn accepts(self, ext: &str) -> bool {
        if ext == "gif" || IMAGE_EXTENSIONS.contains(&ext) {
            return true;
        }
        self == Category::Approach && VIDEO_EXTENSIONS.contains(&ext)
    }

    pub fn kind_for(self, ext: &str) -> MediaKind {
        if self == Category::Approach && VIDEO_EXTENSIONS.contains(&ext) {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }

    /// Only collage items carry layout geometry.
    pub fn needs_geometry(self) -> bool {
        self == Category::Collage
    }

    /// Only approach items carry a `type` field.
    pub fn reports_kind(self) -> bool {
        self == Category::Approach
    }

    /// Final path segment of the dev server endpoint.
    pub fn endpoint(self) -> &'static str {
        match self {
            Category::Collage => "__dev-collage-manifest",
            Category::Approach => "__dev-approach-manifest",
            Category::Prototype => "__dev-prototype-manifest",
        }
    }

    /// Resolve a request path to a category by endpoint suffix.
    ///
    /// Matching on the suffix lets the endpoints live under any base path
    /// (`/portfolio/__dev-collage-manifest` works the same as the bare one).
    /// Query strings must already be stripped.
    pub fn from_endpoint_path(path: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| {
            path.strip_suffix(c.endpoint())
                .is_some_and(|prefix| prefix.ends_with('/'))
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        })
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "collage" => Ok(Category::Collage),
            "approach" => Ok(Category::Approach),
            "prototype" | "prototypes" => Ok(Category::Prototype),
            other => Err(format!(
                "unknown category '{other}' (expected collage, approach, or prototype)"
            )),
        }
    }
}
