//! Photo upload — turns image files into focusable items.
//!
//! Uploads run on their own thread and publish into the shared
//! [`ItemRegistry`]; the frame loop picks the new photos up from the next
//! snapshot it takes.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::thread;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{info, warn};
use tree_mode::{FocusableItem, ItemId, ItemRegistry, RegistryError};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

// ════════════════════════════════════════════════════════════════════════════
// UploadError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no such file or directory: {0}")]
    NotFound(PathBuf),

    #[error("not an image file: {0}")]
    Unsupported(PathBuf),

    #[error("failed to read {path}")]
    Io {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// True if the path has one of the accepted image extensions.
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|ok| e.eq_ignore_ascii_case(ok)))
        .unwrap_or(false)
}

/// Expand directories (one level, sorted) and check every file.
///
/// Files named explicitly must be images; non-image files inside a
/// directory are skipped.
pub fn collect_images(paths: &[PathBuf]) -> Result<Vec<PathBuf>, UploadError> {
    let mut out = Vec::new();
    for path in paths {
        if !path.exists() {
            return Err(UploadError::NotFound(path.clone()));
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .map_err(|source| UploadError::Io { path: path.clone(), source })?;
            let mut found = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|source| UploadError::Io { path: path.clone(), source })?;
                let p = entry.path();
                if p.is_file() && is_image(&p) {
                    found.push(p);
                }
            }
            found.sort();
            out.extend(found);
        } else if is_image(path) {
            out.push(path.clone());
        } else {
            return Err(UploadError::Unsupported(path.clone()));
        }
    }
    Ok(out)
}

// ════════════════════════════════════════════════════════════════════════════
// Uploader
// ════════════════════════════════════════════════════════════════════════════

/// One upload request: every file in it becomes visible at the same time.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadRequest {
    pub paths: Vec<PathBuf>,
}

/// Creates items for image files and appends them to the registry.
pub struct Uploader {
    registry: ItemRegistry,
    rng:      StdRng,
}

impl Uploader {
    pub fn new(registry: ItemRegistry) -> Self {
        Uploader { registry, rng: StdRng::from_entropy() }
    }

    /// Deterministic ids, for reproducible sessions and tests.
    pub fn seeded(registry: ItemRegistry, seed: u64) -> Self {
        Uploader { registry, rng: StdRng::seed_from_u64(seed) }
    }

    /// Validate `paths`, then publish all resulting photos as one batch.
    pub fn upload(&mut self, paths: &[PathBuf]) -> Result<Vec<FocusableItem>, UploadError> {
        let files = collect_images(paths)?;
        let items: Vec<FocusableItem> = files
            .iter()
            .map(|path| FocusableItem {
                id:    ItemId::generate(&mut self.rng),
                label: display_name(path),
            })
            .collect();

        let total = self.registry.append(items.clone())?;
        info!(added = items.len(), total, "photos uploaded");
        Ok(items)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Run an uploader on its own thread; it stops when the sender is dropped.
pub fn spawn_uploader(mut uploader: Uploader) -> Sender<UploadRequest> {
    let (tx, rx) = mpsc::channel::<UploadRequest>();
    thread::spawn(move || {
        for req in rx {
            if let Err(e) = uploader.upload(&req.paths) {
                warn!(error = %e, "upload rejected");
            }
        }
    });
    tx
}

// ════════════════════════════════════════════════════════════════════════════
// PhotoQueue
// ════════════════════════════════════════════════════════════════════════════

/// Photos named in the configuration, waiting to be uploaded one at a time.
#[derive(Debug, Default)]
pub struct PhotoQueue {
    pending: VecDeque<PathBuf>,
}

impl PhotoQueue {
    pub fn from_paths(paths: &[PathBuf]) -> Result<Self, UploadError> {
        Ok(PhotoQueue { pending: collect_images(paths)?.into() })
    }

    pub fn pop_next(&mut self) -> Option<PathBuf> { self.pending.pop_front() }

    pub fn drain_all(&mut self) -> Vec<PathBuf> { self.pending.drain(..).collect() }

    pub fn len(&self) -> usize { self.pending.len() }

    pub fn is_empty(&self) -> bool { self.pending.is_empty() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
