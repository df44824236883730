//! Files staged from the local filesystem (CLI).

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{FileSource, PreviewAllocator, PreviewHandle};
use crate::error::{BuildError, BuildResult};

/// A file on disk. Bytes are read lazily at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
    size: u64,
}

impl DiskFile {
    /// Stat `path` and remember its name and size.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = std::fs::metadata(&path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string();

        Ok(Self {
            path,
            name,
            size: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait(?Send)]
impl FileSource for DiskFile {
    fn name(&self) -> &str {
        &self.name
    }

    // The filesystem carries no declared type; it is inferred from the name.
    fn declared_type(&self) -> Option<&str> {
        None
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read_bytes(&self) -> BuildResult<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| BuildError::read(&self.name, e))
    }
}

/// Previews for disk files are plain `file://` URLs; nothing to revoke.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathPreviews;

impl PreviewAllocator<DiskFile> for PathPreviews {
    fn acquire(&self, file: &DiskFile) -> PreviewHandle {
        let absolute = std::fs::canonicalize(file.path()).unwrap_or_else(|_| file.path().to_path_buf());
        PreviewHandle::new(format!("file://{}", absolute.display()))
    }

    fn release(&self, _handle: &PreviewHandle) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_disk_file_reads_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pic.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let file = DiskFile::open(&path).unwrap();
        assert_eq!(file.name(), "pic.png");
        assert_eq!(file.size(), 3);
        assert_eq!(file.content_type().as_deref(), Some("image/png"));
        assert_eq!(file.read_bytes().await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_removed_file_is_build_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.jpg");
        std::fs::write(&path, [1u8]).unwrap();

        let file = DiskFile::open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let err = file.read_bytes().await.unwrap_err();
        assert!(matches!(err, BuildError::Read { ref name, .. } if name == "gone.jpg"));
    }

    #[test]
    fn test_path_preview_is_file_url() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.gif");
        std::fs::write(&path, [0u8]).unwrap();

        let handle = PathPreviews.acquire(&DiskFile::open(&path).unwrap());
        assert!(handle.url().starts_with("file://"));
        assert!(handle.url().ends_with("a.gif"));
    }
}
