//! CLI output formatting for scans and builds.
//!
//! Output is **project-centric**: the header line for each project is its
//! positional index and id, with the assets it contributed listed beneath.
//! The `src` each asset will be served from is shown as indented context so
//! a missing or misnamed file is easy to trace.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Collage (2 projects, 3 assets)
//! 001 alpha (2 assets)
//!     001 1  600x300
//!         Source: /projects/alpha/collage/1.gif
//!     002 2  200x300
//!         Source: /projects/alpha/collage/2.png
//! 002 beta (1 asset)
//!     001 cover  300x300
//!         Source: /projects/beta/collage/cover.jpg
//! ```
//!
//! Approach assets show `[video]` or `[image]` in place of the dimensions;
//! prototype assets show the id alone.
//!
//! ## Build
//!
//! ```text
//! collage    generated/projectCollageManifest.ts (2 projects, 3 assets)
//! approach   generated/approachManifest.ts (1 project, 2 assets)
//! prototype  generated/prototypeManifest.ts (0 projects, 0 assets)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::emit::EmittedFile;
use crate::scan::{Manifest, MediaAsset};

fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One asset line: index, id, and whatever the category reports about it.
///
/// ```text
/// 001 1  600x300
/// 001 01  [video]
/// 001 sketch
/// ```
fn asset_line(index: usize, asset: &MediaAsset) -> String {
    let detail = match (asset.width, asset.height, asset.kind) {
        (Some(w), Some(h), _) => format!("  {w}x{h}"),
        (_, _, Some(kind)) => format!("  [{kind}]"),
        _ => String::new(),
    };
    format!("{} {}{}", format_index(index), asset.id, detail)
}

// ============================================================================
// Scan output
// ============================================================================

pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({}, {})",
        title_case(manifest.category.name()),
        plural(manifest.projects.len(), "project"),
        plural(manifest.asset_count(), "asset")
    )];

    if manifest.is_empty() {
        lines.push(format!(
            "{}No {}/ media found",
            indent(1),
            manifest.category.dir_name()
        ));
        return lines;
    }

    for (i, project) in manifest.projects.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            project.project,
            plural(project.assets.len(), "asset")
        ));
        for (j, asset) in project.assets.iter().enumerate() {
            lines.push(format!("{}{}", indent(1), asset_line(j + 1, asset)));
            lines.push(format!("{}Source: {}", indent(2), asset.src));
        }
    }
    lines
}

pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

pub fn format_build_output(files: &[EmittedFile]) -> Vec<String> {
    files
        .iter()
        .map(|f| {
            format!(
                "{:<10} {} ({}, {})",
                f.category.name(),
                f.path.display(),
                plural(f.projects, "project"),
                plural(f.assets, "asset")
            )
        })
        .collect()
}

pub fn print_build_output(files: &[EmittedFile]) {
    for line in format_build_output(files) {
        println!("{}", line);
    }
}
