//! Gallery persistence boundary
//!
//! The store owns nothing but the full-gallery load/save contract:
//! load-all, save-all, idempotent reload. Malformed persisted data is
//! never fatal; callers degrade to an empty gallery via
//! [`load_or_empty`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::EventSink;
use crate::types::{Embedding, Gallery, GalleryError, Severity};

/// Full-gallery persistence contract
pub trait GalleryStore {
    fn load(&self) -> Result<Gallery, GalleryError>;
    fn save(&self, gallery: &Gallery) -> Result<(), GalleryError>;
}

/// On-disk record, one per enrolled identity: a label plus raw
/// descriptor arrays. Kept flat so exports are hand-inspectable.
#[derive(Debug, Serialize, Deserialize)]
struct StoredIdentity {
    label: String,
    descriptors: Vec<Vec<f32>>,
}

/// JSON-file-backed gallery store
#[derive(Debug, Clone)]
pub struct JsonGalleryStore {
    path: PathBuf,
}

impl JsonGalleryStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GalleryStore for JsonGalleryStore {
    fn load(&self) -> Result<Gallery, GalleryError> {
        if !self.path.exists() {
            return Ok(Gallery::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let stored: Vec<StoredIdentity> =
            serde_json::from_str(&raw).map_err(|e| GalleryError::Malformed(e.to_string()))?;

        let mut gallery = Gallery::new();
        for identity in stored {
            for descriptor in identity.descriptors {
                let embedding = Embedding::new(descriptor)
                    .map_err(|e| GalleryError::Malformed(e.to_string()))?;
                gallery.enroll(&identity.label, embedding)?;
            }
        }
        Ok(gallery)
    }

    fn save(&self, gallery: &Gallery) -> Result<(), GalleryError> {
        let stored: Vec<StoredIdentity> = gallery
            .identities()
            .iter()
            .map(|i| StoredIdentity {
                label: i.label.clone(),
                descriptors: i
                    .embeddings
                    .iter()
                    .map(|e| e.values().to_vec())
                    .collect(),
            })
            .collect();
        let json =
            serde_json::to_string_pretty(&stored).map_err(|e| GalleryError::Malformed(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Load a gallery, degrading malformed or unreadable data to an empty
/// gallery with a warning record. The system keeps running either way.
pub fn load_or_empty(store: &dyn GalleryStore, sink: &dyn EventSink) -> Gallery {
    match store.load() {
        Ok(gallery) => {
            if !gallery.is_empty() {
                sink.record(
                    &format!("Loaded {} enrolled user(s)", gallery.len()),
                    Severity::Success,
                );
            }
            gallery
        }
        Err(e) => {
            sink.record(
                &format!("Failed to load enrollments, starting empty: {}", e),
                Severity::Warn,
            );
            Gallery::new()
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
