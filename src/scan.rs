//! Filesystem scanning and manifest generation.
//!
//! Walks the projects root and produces one [`Manifest`] per [`Category`]:
//! a mapping from project id to that project's media assets.
//!
//! ## Directory Structure
//!
//! ```text
//! public/projects/                 # Projects root
//! ├── 1-harbor-lights/             # Project (directory name = project id)
//! │   ├── collage/                 # Collage images and GIFs
//! │   │   ├── 1.png
//! │   │   ├── 2.gif
//! │   │   ├── 2.png                # Loses to 2.gif (animated wins)
//! │   │   └── 10.jpg               # Sorted after 2 (natural order)
//! │   ├── approach/                # Process photos and videos
//! │   │   ├── 01.mp4
//! │   │   └── 01.png               # Loses to 01.mp4 (video wins)
//! │   └── prototypes/              # Early still images
//! │       └── sketch-1.jpg
//! └── 2-paper-garden/
//!     └── collage/                 # No approach/ or prototypes/: fine
//!         └── hero.webp
//! ```
//!
//! ## Rules
//!
//! - Projects and files are ordered by [`natural_cmp`].
//! - A file's logical id is its name without the extension. When several
//!   files share an id, the category's priority list picks one.
//! - Collage assets are measured and sized for layout; see
//!   [`compute_target_size`](crate::imaging::compute_target_size).
//! - Projects with no assets for the category are left out.
//!
//! ## Failure Handling
//!
//! | Situation | Result |
//! |-----------|--------|
//! | projects root missing / not a directory | [`ScanError`] |
//! | project has no category folder | project contributes nothing |
//! | category folder unreadable | logged, project contributes nothing |
//! | one collage file unreadable or corrupt | logged, file left out |

use crate::category::{Category, MediaKind};
use crate::config::ManifestConfig;
use crate::imaging::{
    BackendError, Dimensions, ImageBackend, RustBackend, SizeBounds, compute_target_size,
    identify_gif,
};
use crate::naming::{natural_cmp, split_file_name};
use rayon::prelude::*;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Projects root not found: {0}")]
    RootNotFound(PathBuf),
    #[error("Projects root is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One discovered media file, as the front end sees it.
///
/// Field order matches the emitted JSON: `id`, `type`, `width`, `height`, `src`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaAsset {
    /// Logical name: file name without extension.
    pub id: String,
    #[serde(skip)]
    pub category: Category,
    /// Image or video. Only reported for approach assets.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaKind>,
    /// Layout width. Only set for collage assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Layout height. Only set for collage assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Public path of the original, untouched file.
    pub src: String,
}

/// Assets of one project, in natural order of id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectAssets {
    pub project: String,
    pub assets: Vec<MediaAsset>,
}

/// Manifest for one category: project id → assets.
///
/// Serializes as a JSON object whose keys keep the natural project order,
/// which a `BTreeMap` would not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub category: Category,
    pub projects: Vec<ProjectAssets>,
}

impl Manifest {
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            projects: Vec::new(),
        }
    }

    /// Assets for a project, if it contributed any.
    pub fn get(&self, project: &str) -> Option<&[MediaAsset]> {
        self.projects
            .iter()
            .find(|p| p.project == project)
            .map(|p| p.assets.as_slice())
    }

    pub fn project_ids(&self) -> Vec<&str> {
        self.projects.iter().map(|p| p.project.as_str()).collect()
    }

    pub fn asset_count(&self) -> usize {
        self.projects.iter().map(|p| p.assets.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.projects.len()))?;
        for project in &self.projects {
            map.serialize_entry(&project.project, &project.assets)?;
        }
        map.end()
    }
}

/// Settings that shape manifest output, independent of the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    /// URL prefix for `src` (e.g. `/projects`).
    pub public_prefix: String,
    /// Collage height cap; also the GIF floor.
    pub collage_max_height: u32,
}

impl ScanSettings {
    pub fn from_config(config: &ManifestConfig) -> Self {
        Self {
            public_prefix: config.public_prefix.clone(),
            collage_max_height: config.collage.max_height,
        }
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self::from_config(&ManifestConfig::default())
    }
}

/// Scan with the production backend and default settings.
pub fn scan(root: &Path, category: Category) -> Result<Manifest, ScanError> {
    build_manifest(root, category, &RustBackend::new(), &ScanSettings::default())
}

/// Build the manifest for one category from the current filesystem contents.
///
/// Only structural problems with `root` itself are errors; everything below
/// the project level is skipped and logged. See the [module docs](self).
pub fn build_manifest(
    root: &Path,
    category: Category,
    backend: &impl ImageBackend,
    settings: &ScanSettings,
) -> Result<Manifest, ScanError> {
    let mut manifest = Manifest::empty(category);

    for (project_id, project_path) in list_project_dirs(root)? {
        let category_dir = project_path.join(category.dir_name());
        let files = list_sorted_files(&category_dir);
        let selected = pick_preferred_files(&files, category);
        if selected.is_empty() {
            continue;
        }

        let assets = build_assets(
            &project_id,
            &category_dir,
            &selected,
            category,
            backend,
            settings,
        );
        tracing::debug!(
            "{category}: {project_id} → {} of {} files",
            assets.len(),
            files.len()
        );

        if !assets.is_empty() {
            manifest.projects.push(ProjectAssets {
                project: project_id,
                assets,
            });
        }
    }

    Ok(manifest)
}

/// List project directories under the root, in natural order.
fn list_project_dirs(root: &Path) -> Result<Vec<(String, PathBuf)>, ScanError> {
    let meta = fs::metadata(root).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ScanError::RootNotFound(root.to_path_buf()),
        _ => ScanError::Io(e),
    })?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut dirs: Vec<(String, PathBuf)> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| (e.file_name().to_string_lossy().to_string(), e.path()))
        .filter(|(name, path)| !name.starts_with('.') && path.is_dir())
        .collect();

    dirs.sort_by(|a, b| natural_cmp(&a.0, &b.0));
    Ok(dirs)
}

/// List regular file names in a category folder, in natural order.
///
/// A missing folder is the normal "no assets" case; any other read failure
/// is logged and treated the same way so one project cannot sink the scan.
fn list_sorted_files(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!("Skipping unreadable folder {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();

    files.sort_by(|a, b| natural_cmp(a, b));
    files
}

/// The file chosen to represent one logical id.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Selected {
    id: String,
    file_name: String,
    ext: String,
}

/// Filter to accepted extensions and keep one file per logical id.
///
/// Ids whose variants all miss the priority list are dropped; with the
/// extension filter in front that cannot happen, but nothing relies on it.
fn pick_preferred_files(files: &[String], category: Category) -> Vec<Selected> {
    let mut order: Vec<&str> = Vec::new();
    let mut grouped: HashMap<&str, Vec<(&str, String)>> = HashMap::new();

    for file in files {
        let Some((stem, ext)) = split_file_name(file) else {
            continue;
        };
        if !category.accepts(&ext) {
            continue;
        }
        grouped
            .entry(stem)
            .or_insert_with(|| {
                order.push(stem);
                Vec::new()
            })
            .push((file.as_str(), ext));
    }

    let mut selected: Vec<Selected> = order
        .into_iter()
        .filter_map(|id| {
            let variants = grouped.get(id)?;
            category.priority().iter().find_map(|preferred| {
                variants
                    .iter()
                    .find(|(_, ext)| ext == preferred)
                    .map(|(file, ext)| Selected {
                        id: id.to_string(),
                        file_name: file.to_string(),
                        ext: ext.clone(),
                    })
            })
        })
        .collect();

    selected.sort_by(|a, b| natural_cmp(&a.id, &b.id));
    selected
}

fn build_assets(
    project_id: &str,
    category_dir: &Path,
    selected: &[Selected],
    category: Category,
    backend: &impl ImageBackend,
    settings: &ScanSettings,
) -> Vec<MediaAsset> {
    let src_prefix = format!(
        "{}/{}/{}",
        settings.public_prefix.trim_end_matches('/'),
        project_id,
        category.dir_name()
    );

    let to_asset = |entry: &Selected| -> Option<MediaAsset> {
        let (width, height) = if category.needs_geometry() {
            let path = category_dir.join(&entry.file_name);
            match layout_size(&path, &entry.ext, backend, settings.collage_max_height) {
                Ok(size) => (Some(size.width), Some(size.height)),
                Err(e) => {
                    tracing::warn!("Skipping {category} asset {}: {}", path.display(), e);
                    return None;
                }
            }
        } else {
            (None, None)
        };

        Some(MediaAsset {
            id: entry.id.clone(),
            category,
            kind: category
                .reports_kind()
                .then(|| category.kind_for(&entry.ext)),
            width,
            height,
            src: format!("{src_prefix}/{}", entry.file_name),
        })
    };

    if category.needs_geometry() {
        // Indexed parallel collect keeps input order.
        selected
            .par_iter()
            .map(to_asset)
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    } else {
        selected.iter().filter_map(to_asset).collect()
    }
}

/// Measure a collage file and compute its layout size.
///
/// GIFs are read straight from their header and always land exactly on
/// `max_height`; other formats go through the backend and only shrink.
fn layout_size(
    path: &Path,
    ext: &str,
    backend: &impl ImageBackend,
    max_height: u32,
) -> Result<Dimensions, BackendError> {
    let is_gif = ext == "gif";
    let native = if is_gif {
        identify_gif(path)?
    } else {
        backend.identify(path)?
    };

    if native.width == 0 || native.height == 0 {
        return Err(BackendError::ProcessingFailed(format!(
            "Zero dimension {}x{}",
            native.width, native.height
        )));
    }

    let bounds = if is_gif {
        SizeBounds::exact(max_height)
    } else {
        SizeBounds::cap(max_height)
    };
    Ok(compute_target_size(native, bounds))
}
