//! Image probing backend trait and shared types.
//!
//! The manifest only ever needs an image's pixel size, so the [`ImageBackend`]
//! trait has a single operation. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend); tests swap in a
//! recording mock so scan logic can run against placeholder files.

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image probing backends.
///
/// `Sync` so one backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    /// Get image dimensions without decoding pixel data.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock backend answering from a filename → dimensions table.
    ///
    /// Files not in the table fail to identify, which is how tests model a
    /// corrupt image. Every call is recorded.
    #[derive(Default)]
    pub struct MockBackend {
        pub dimensions: HashMap<String, Dimensions>,
        pub identified: Mutex<Vec<String>>,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, file_name: &str, width: u32, height: u32) -> Self {
            self.dimensions
                .insert(file_name.to_string(), Dimensions { width, height });
            self
        }

        pub fn identified(&self) -> Vec<String> {
            self.identified.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            self.identified.lock().unwrap().push(name.clone());

            self.dimensions
                .get(&name)
                .copied()
                .ok_or_else(|| BackendError::ProcessingFailed(format!("No mock dimensions for {name}")))
        }
    }

    #[test]
    fn mock_answers_known_files() {
        let backend = MockBackend::new().with("a.png", 800, 600);

        let dims = backend.identify(Path::new("/p/collage/a.png")).unwrap();
        assert_eq!(dims, Dimensions { width: 800, height: 600 });
        assert_eq!(backend.identified(), vec!["a.png"]);
    }

    #[test]
    fn mock_fails_unknown_files() {
        let backend = MockBackend::new();
        assert!(backend.identify(Path::new("/p/collage/b.png")).is_err());
        assert_eq!(backend.identified(), vec!["b.png"]);
    }
}
