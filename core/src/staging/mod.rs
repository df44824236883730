//! File staging store.
//!
//! Holds the files the user selected together with a preview handle per
//! file. Previews are scoped resources: the store acquires one when a file is
//! staged and releases it exactly once when the file leaves the store, be it
//! through [`StagingStore::add`] replacing the set, [`StagingStore::remove`],
//! [`StagingStore::clear`] or the store being dropped.

#[cfg(feature = "native")]
mod disk;

#[cfg(feature = "native")]
pub use disk::{DiskFile, PathPreviews};

use async_trait::async_trait;

use crate::error::BuildResult;
use crate::mime::{is_image, resolve_content_type};

// =============================================================================
// Capabilities
// =============================================================================

/// A selected file whose bytes can be read on demand.
#[async_trait(?Send)]
pub trait FileSource: Clone {
    /// Display name (used for MIME inference and logs).
    fn name(&self) -> &str;

    /// MIME type reported by the selection source, if any.
    fn declared_type(&self) -> Option<&str>;

    /// Size in bytes as reported at selection time.
    fn size(&self) -> u64;

    /// Read the whole file into memory.
    async fn read_bytes(&self) -> BuildResult<Vec<u8>>;

    /// Declared type, or the type inferred from the name.
    fn content_type(&self) -> Option<String> {
        resolve_content_type(self.declared_type(), self.name())
    }
}

/// Locally generated preview URL for a staged file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle {
    url: String,
}

impl PreviewHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Allocates and revokes preview handles.
///
/// `release` must tolerate a handle it already released, but the staging
/// store never releases the same handle twice.
pub trait PreviewAllocator<F> {
    fn acquire(&self, file: &F) -> PreviewHandle;
    fn release(&self, handle: &PreviewHandle);
}

// =============================================================================
// Staged Files
// =============================================================================

/// A file held by the store.
#[derive(Debug)]
pub struct StagedFile<F> {
    source: F,
    preview: Option<PreviewHandle>,
}

impl<F: FileSource> StagedFile<F> {
    pub fn source(&self) -> &F {
        &self.source
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    /// Preview URL, `None` once released.
    pub fn preview_url(&self) -> Option<&str> {
        self.preview.as_ref().map(PreviewHandle::url)
    }
}

/// Outcome of [`StagingStore::add`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    /// Names of files now staged.
    pub accepted: Vec<String>,
    /// Names of files refused because they are not images.
    pub rejected: Vec<String>,
}

// =============================================================================
// Store
// =============================================================================

/// Current selection of files awaiting upload.
pub struct StagingStore<F: FileSource, P: PreviewAllocator<F>> {
    files: Vec<StagedFile<F>>,
    previews: P,
}

impl<F: FileSource, P: PreviewAllocator<F>> StagingStore<F, P> {
    pub fn new(previews: P) -> Self {
        Self {
            files: Vec::new(),
            previews,
        }
    }

    /// Replace the staged set with the image files among `files`.
    ///
    /// Handles of the previous set are released first. An empty or
    /// all-rejected selection still replaces (and so empties) the set.
    pub fn add(&mut self, files: impl IntoIterator<Item = F>) -> StageReport {
        self.clear();

        let mut report = StageReport::default();
        for file in files {
            let accepted = file.content_type().is_some_and(|t| is_image(&t));
            if !accepted {
                log::warn!("Skipping '{}': not an image", file.name());
                report.rejected.push(file.name().to_string());
                continue;
            }

            let preview = self.previews.acquire(&file);
            report.accepted.push(file.name().to_string());
            self.files.push(StagedFile {
                source: file,
                preview: Some(preview),
            });
        }

        log::info!(
            "Staged {} file(s), rejected {}",
            report.accepted.len(),
            report.rejected.len()
        );
        report
    }

    /// Unstage the first file called `name`.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.files.iter().position(|f| f.name() == name) {
            Some(index) => {
                let mut file = self.files.remove(index);
                self.release(&mut file);
                true
            }
            None => false,
        }
    }

    /// Unstage everything.
    pub fn clear(&mut self) {
        let mut files = std::mem::take(&mut self.files);
        for file in files.iter_mut() {
            self.release(file);
        }
    }

    pub fn files(&self) -> &[StagedFile<F>] {
        &self.files
    }

    /// Cloned sources, used as the snapshot of a batch.
    pub fn sources(&self) -> Vec<F> {
        self.files.iter().map(|f| f.source.clone()).collect()
    }

    /// `(name, preview url)` pairs for thumbnails.
    pub fn previews(&self) -> Vec<(String, String)> {
        self.files
            .iter()
            .filter_map(|f| Some((f.name().to_string(), f.preview_url()?.to_string())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn allocator(&self) -> &P {
        &self.previews
    }

    fn release(&self, file: &mut StagedFile<F>) {
        if let Some(handle) = file.preview.take() {
            self.previews.release(&handle);
        }
    }
}

impl<F: FileSource, P: PreviewAllocator<F>> Drop for StagingStore<F, P> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingPreviews, MemoryFile};

    fn images() -> Vec<MemoryFile> {
        vec![
            MemoryFile::new("a.png", vec![1; 16]),
            MemoryFile::new("b.jpg", vec![2; 16]),
        ]
    }

    #[test]
    fn test_add_filters_non_images() {
        let mut store = StagingStore::new(CountingPreviews::default());
        let report = store.add(vec![
            MemoryFile::new("a.png", vec![1]),
            MemoryFile::new("notes.txt", vec![2]),
            MemoryFile::new("raw", vec![3]).with_type("image/webp"),
        ]);

        assert_eq!(report.accepted, vec!["a.png", "raw"]);
        assert_eq!(report.rejected, vec!["notes.txt"]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.allocator().acquired(), 2);
    }

    #[test]
    fn test_add_replaces_and_releases_previous() {
        let previews = CountingPreviews::default();
        let mut store = StagingStore::new(previews.clone());
        store.add(images());
        store.add(vec![MemoryFile::new("c.gif", vec![3])]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.files()[0].name(), "c.gif");
        assert_eq!(previews.acquired(), 3);
        assert_eq!(previews.released(), 2);
        assert_eq!(previews.double_releases(), 0);
    }

    #[test]
    fn test_remove_releases_one() {
        let previews = CountingPreviews::default();
        let mut store = StagingStore::new(previews.clone());
        store.add(images());

        assert!(store.remove("a.png"));
        assert!(!store.remove("a.png"));
        assert_eq!(previews.released(), 1);
        assert_eq!(store.previews().len(), 1);
    }

    #[test]
    fn test_clear_then_drop_releases_exactly_once() {
        let previews = CountingPreviews::default();
        {
            let mut store = StagingStore::new(previews.clone());
            store.add(images());
            store.clear();
            assert!(store.is_empty());
        }
        assert_eq!(previews.acquired(), 2);
        assert_eq!(previews.released(), 2);
        assert_eq!(previews.double_releases(), 0);
    }

    #[test]
    fn test_drop_releases_remaining() {
        let previews = CountingPreviews::default();
        {
            let mut store = StagingStore::new(previews.clone());
            store.add(images());
        }
        assert_eq!(previews.released(), 2);
        assert_eq!(previews.double_releases(), 0);
    }
}
