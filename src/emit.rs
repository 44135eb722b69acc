//! Static manifest artifacts for production builds.
//!
//! In development the front end polls the live endpoints; a production
//! bundle instead imports manifests that were generated ahead of time. This
//! module builds all three categories once and writes them to disk.
//!
//! ## Formats
//!
//! | Format | Files | Consumed by |
//! |--------|-------|-------------|
//! | `ts` | `projectCollageManifest.ts`, `approachManifest.ts`, `prototypeManifest.ts` | `import { PROJECT_COLLAGE_MANIFEST } from '../generated/projectCollageManifest'` |
//! | `json` | `collage-manifest.json`, `approach-manifest.json`, `prototype-manifest.json` | `fetch` or a JSON import |
//!
//! TypeScript modules export an item type alongside the constant so
//! components can type their props without a separate declaration file.

use crate::category::Category;
use crate::imaging::ImageBackend;
use crate::scan::{Manifest, ScanError, ScanSettings, build_manifest};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),
}

/// On-disk format of generated manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum ArtifactFormat {
    #[serde(rename = "json")]
    #[value(name = "json")]
    Json,
    #[serde(rename = "ts")]
    #[value(name = "ts")]
    TypeScript,
}

/// One file written by [`write_manifests`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFile {
    pub category: Category,
    pub path: PathBuf,
    pub projects: usize,
    pub assets: usize,
}

/// TypeScript names for a category: (file stem, constant, item type).
fn ts_names(category: Category) -> (&'static str, &'static str, &'static str) {
    match category {
        Category::Collage => (
            "projectCollageManifest",
            "PROJECT_COLLAGE_MANIFEST",
            "CollageMediaItem",
        ),
        Category::Approach => ("approachManifest", "APPROACH_MANIFEST", "ApproachMediaItem"),
        Category::Prototype => (
            "prototypeManifest",
            "PROTOTYPE_MANIFEST",
            "PrototypeMediaItem",
        ),
    }
}

/// Field list of the exported item type, matching the JSON shape.
fn ts_item_fields(category: Category) -> &'static str {
    match category {
        Category::Collage => "  id: string;\n  width: number;\n  height: number;\n  src: string;\n",
        Category::Approach => "  id: string;\n  type: 'image' | 'video';\n  src: string;\n",
        Category::Prototype => "  id: string;\n  src: string;\n",
    }
}

/// File name of the artifact for a category.
pub fn artifact_file_name(category: Category, format: ArtifactFormat) -> String {
    match format {
        ArtifactFormat::Json => format!("{}-manifest.json", category.name()),
        ArtifactFormat::TypeScript => format!("{}.ts", ts_names(category).0),
    }
}

/// Render a manifest in the requested format.
pub fn render_artifact(manifest: &Manifest, format: ArtifactFormat) -> Result<String, EmitError> {
    let json = serde_json::to_string_pretty(manifest)?;
    Ok(match format {
        ArtifactFormat::Json => format!("{json}\n"),
        ArtifactFormat::TypeScript => {
            let (_, constant, item_type) = ts_names(manifest.category);
            format!(
                "// Generated by media-manifest from the {dir}/ folders. Do not edit.\n\
                 \n\
                 export type {item_type} = {{\n{fields}}};\n\
                 \n\
                 export const {constant}: Record<string, {item_type}[]> = {json};\n",
                dir = manifest.category.dir_name(),
                fields = ts_item_fields(manifest.category),
            )
        }
    })
}

/// Build every category's manifest and write it to `out_dir`.
///
/// The output directory is created if needed. Any scan error aborts before
/// later categories are written; files already written are left in place
/// and will be overwritten by the next successful build.
pub fn write_manifests(
    root: &Path,
    out_dir: &Path,
    format: ArtifactFormat,
    backend: &impl ImageBackend,
    settings: &ScanSettings,
) -> Result<Vec<EmittedFile>, EmitError> {
    fs::create_dir_all(out_dir)?;

    let mut emitted = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        let manifest = build_manifest(root, category, backend, settings)?;
        let path = out_dir.join(artifact_file_name(category, format));
        fs::write(&path, render_artifact(&manifest, format)?)?;
        tracing::info!(
            "Wrote {} ({} projects, {} assets)",
            path.display(),
            manifest.projects.len(),
            manifest.asset_count()
        );

        emitted.push(EmittedFile {
            category,
            path,
            projects: manifest.projects.len(),
            assets: manifest.asset_count(),
        });
    }
    Ok(emitted)
}
