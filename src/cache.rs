//! In-memory manifest cache for the dev server.
//!
//! The front end polls every manifest endpoint every couple of seconds, and
//! a collage scan reads the header of every image on each poll. This module
//! lets the server answer from memory while the projects tree is unchanged.
//!
//! # Design
//!
//! ## Fingerprint
//!
//! A cached manifest is valid only for the exact tree it was built from.
//! The tree is summarized as a SHA-256 **fingerprint** over every entry under
//! the projects root, in sorted order:
//!
//! - path relative to the root
//! - file size
//! - modification time (nanoseconds since the epoch)
//!
//! Adding, removing, renaming, or rewriting any file changes at least one of
//! these, so a fingerprint match means a fresh scan would read the same
//! names and the same bytes. Walking the tree only stats entries; it never
//! opens image files, which is where the scan spends its time.
//!
//! ## Locking
//!
//! [`build_cached`] holds the cache lock only to look up and to store. The
//! scan itself runs unlocked, so overlapping requests each finish on their
//! own; whichever stores last wins, and both results are valid snapshots.
//!
//! ## Bypassing the cache
//!
//! Pass `--no-cache` to `serve` to rescan on every request.

use crate::category::Category;
use crate::scan::{Manifest, ScanError};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::UNIX_EPOCH;
use walkdir::WalkDir;

/// A manifest and the fingerprint of the tree it was built from.
#[derive(Debug, Clone)]
struct CachedManifest {
    fingerprint: String,
    manifest: Arc<Manifest>,
}

/// Per-category manifest cache.
#[derive(Debug, Default)]
pub struct ManifestCache {
    entries: HashMap<Category, CachedManifest>,
    stats: CacheStats,
}

impl ManifestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached manifest if it was built from `fingerprint`.
    ///
    /// Counts a hit or a miss.
    pub fn lookup(&mut self, category: Category, fingerprint: &str) -> Option<Arc<Manifest>> {
        match self.entries.get(&category) {
            Some(cached) if cached.fingerprint == fingerprint => {
                self.stats.hits += 1;
                Some(Arc::clone(&cached.manifest))
            }
            _ => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Record a freshly built manifest, replacing any previous entry.
    pub fn store(&mut self, category: Category, fingerprint: String, manifest: Arc<Manifest>) {
        self.entries.insert(
            category,
            CachedManifest {
                fingerprint,
                manifest,
            },
        );
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

/// Summary of cache performance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} hits, {} misses", self.hits, self.misses)
    }
}

/// SHA-256 fingerprint of every entry under `root`.
///
/// Entries that cannot be read still contribute their path and an error
/// marker, so a permission change is noticed too.
pub fn fingerprint_tree(root: &Path) -> io::Result<String> {
    // Fail the same way a scan would when the root itself is missing.
    std::fs::metadata(root)?;

    let mut hasher = Sha256::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        match entry {
            Ok(entry) => {
                let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
                hasher.update(rel.to_string_lossy().as_bytes());
                hasher.update(b"\0");
                if let Ok(meta) = entry.metadata() {
                    hasher.update(meta.len().to_le_bytes());
                    let mtime = meta
                        .modified()
                        .ok()
                        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                        .map(|d| d.as_nanos())
                        .unwrap_or(0);
                    hasher.update(mtime.to_le_bytes());
                    hasher.update([meta.is_dir() as u8]);
                }
            }
            Err(e) => {
                let path = e.path().map(|p| p.to_string_lossy().to_string());
                hasher.update(b"!err\0");
                hasher.update(path.unwrap_or_default().as_bytes());
            }
        }
        hasher.update(b"\n");
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Return a manifest for `category`, from the cache when the tree is unchanged.
///
/// `build` runs without the lock held. If the tree cannot be fingerprinted
/// the cache is bypassed and `build` decides the outcome (e.g. a missing
/// root still surfaces as [`ScanError::RootNotFound`]).
pub fn build_cached<F>(
    cache: &Mutex<ManifestCache>,
    root: &Path,
    category: Category,
    build: F,
) -> Result<Arc<Manifest>, ScanError>
where
    F: FnOnce() -> Result<Manifest, ScanError>,
{
    let fingerprint = match fingerprint_tree(root) {
        Ok(fp) => fp,
        Err(e) => {
            tracing::debug!("Cache bypassed for {category}: {e}");
            return build().map(Arc::new);
        }
    };

    if let Some(hit) = lock(cache).lookup(category, &fingerprint) {
        tracing::debug!("Cache hit for {category} manifest");
        return Ok(hit);
    }

    let manifest = Arc::new(build()?);
    lock(cache).store(category, fingerprint, Arc::clone(&manifest));
    Ok(manifest)
}

/// Lock the cache, recovering from a poisoned lock; every write is a single
/// map insert, so the data is never left half-updated.
fn lock(cache: &Mutex<ManifestCache>) -> std::sync::MutexGuard<'_, ManifestCache> {
    cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
