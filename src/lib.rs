//! # Media Manifest
//!
//! Builds per-project media manifests for a portfolio front end. The
//! filesystem is the data source: every subdirectory of the projects root is
//! a project, and each project may hold up to three media folders.
//!
//! ```text
//! public/projects/
//! ├── alpha/
//! │   ├── collage/        # images with layout dimensions
//! │   │   ├── 1.gif
//! │   │   ├── 1.png       # shadowed by 1.gif
//! │   │   └── 2.jpg
//! │   ├── approach/       # videos and images, each tagged with its kind
//! │   │   └── 01.mp4
//! │   └── prototypes/     # images listed by path only
//! │       └── sketch.png
//! └── beta/
//!     └── collage/
//!         └── cover.webp
//! ```
//!
//! A manifest maps each project id to its assets in natural order:
//!
//! ```json
//! { "alpha": [ { "id": "1", "width": 600, "height": 300, "src": "/projects/alpha/collage/1.gif" } ] }
//! ```
//!
//! # Two Ways to Consume a Manifest
//!
//! ```text
//! serve   GET /__dev-collage-manifest   →  fresh JSON on every poll
//! build   generated/*.ts | *.json       →  snapshots bundled at build time
//! ```
//!
//! Both paths go through [`scan::build_manifest`], so a production bundle
//! sees exactly what the dev server served for the same tree.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`category`] | The three media categories: folders, accepted extensions, priority, endpoints |
//! | [`naming`] | Natural ordering and `stem.ext` splitting |
//! | [`imaging`] | Header-only dimension probing, GIF screen descriptor parsing, target sizing |
//! | [`scan`] | Walks the projects root and produces a [`scan::Manifest`] per category |
//! | [`cache`] | Fingerprint-keyed manifest cache for the dev server |
//! | [`emit`] | Writes static JSON or TypeScript manifest artifacts |
//! | [`server`] | axum dev server: manifest endpoints plus static files |
//! | [`config`] | `media-manifest.toml` loading, stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One File Per Id
//!
//! A designer often exports the same frame as `1.png` and `1.gif`. Only one
//! should reach the page, so files are grouped by id and each category's
//! extension priority picks the winner. Collage prefers animated formats;
//! approach prefers video.
//!
//! ## Headers, Not Pixels
//!
//! Collage layout needs dimensions only. [`imaging::RustBackend`] reads image
//! headers through the `image` crate and never decodes pixel data, and GIFs
//! are read straight from their Logical Screen Descriptor.
//!
//! ## Failure Isolation
//!
//! One unreadable file drops that asset; one unreadable folder drops that
//! folder. Only a missing or non-directory projects root fails the scan.

pub mod cache;
pub mod category;
pub mod config;
pub mod emit;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod scan;
pub mod server;

#[cfg(test)]
pub(crate) mod test_helpers;
